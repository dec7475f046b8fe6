use task_scheduler::logging::{LOG_ENV_VAR, init_logging, resolve_level};
use task_scheduler::types::LogLevel;

#[test]
fn explicit_level_wins_over_environment() {
    assert_eq!(resolve_level(Some(LogLevel::Error), Some("debug")), LogLevel::Error);
}

#[test]
fn environment_level_is_parsed() {
    assert_eq!(resolve_level(None, Some("debug")), LogLevel::Debug);
    assert_eq!(resolve_level(None, Some(" WARNING ")), LogLevel::Warn);
    assert_eq!(resolve_level(None, Some("trace")), LogLevel::Trace);
}

#[test]
fn missing_or_invalid_level_defaults_to_info() {
    assert_eq!(resolve_level(None, None), LogLevel::Info);
    assert_eq!(resolve_level(None, Some("loud")), LogLevel::Info);
}

#[test]
fn invalid_level_reports_choices() {
    let err = "loud".parse::<LogLevel>().unwrap_err();
    assert!(err.contains("loud"));
    assert!(err.contains("expected error, warn, info, debug or trace"));
}

#[test]
fn level_maps_onto_tracing() {
    assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
    assert_eq!(tracing::Level::from(LogLevel::Debug), tracing::Level::DEBUG);
}

#[test]
fn subscriber_can_only_be_installed_once() {
    assert_eq!(LOG_ENV_VAR, "TASK_SCHEDULER_LOG");
    assert!(init_logging(Some(LogLevel::Warn)).is_ok());
    assert!(init_logging(None).is_err());
}
