use task_scheduler::SchedulerError;
use task_scheduler::task_id::{DELIMITER, TaskId, decode, encode};

#[test]
fn encode_joins_package_and_task_with_delimiter() {
    let id = encode("app", "build");
    assert_eq!(id.as_str(), "app#build");
    assert_eq!(id.to_string(), "app#build");
    assert_eq!(DELIMITER, '#');
}

#[test]
fn decode_inverts_encode() {
    for (pkg, task) in [("app", "build"), ("@scope/lib", "test"), ("a", "")] {
        let id = encode(pkg, task);
        assert_eq!(decode(id.as_str()), (pkg, task));
        assert_eq!(id.parts(), (pkg, task));
        assert_eq!(id.package(), pkg);
        assert_eq!(id.task(), task);
    }
}

#[test]
fn decode_splits_on_first_delimiter() {
    assert_eq!(decode("pkg#task#extra"), ("pkg", "task#extra"));
    assert_eq!(decode("no-delimiter"), ("no-delimiter", ""));
}

#[test]
fn sentinel_has_empty_task_name() {
    let sentinel = TaskId::sentinel("lib");
    assert_eq!(sentinel.as_str(), "lib#");
    assert!(sentinel.is_sentinel());
    assert!(!TaskId::new("lib", "build").is_sentinel());
}

#[test]
fn try_new_rejects_reserved_delimiter() {
    match TaskId::try_new("a#b", "build") {
        Err(SchedulerError::InvalidName { name, .. }) => assert_eq!(name, "a#b"),
        other => panic!("expected InvalidName, got {other:?}"),
    }
    assert!(TaskId::try_new("a", "bu#ild").is_err());
    assert!(TaskId::try_new("a", "build").is_ok());
}

#[test]
fn parse_from_string() {
    let id: TaskId = "web#lint".parse().unwrap();
    assert_eq!(id, TaskId::new("web", "lint"));
    assert!("missing-delimiter".parse::<TaskId>().is_err());
}
