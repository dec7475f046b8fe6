// src/graph/validate.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{Result, SchedulerError};
use crate::graph::package_graph::{PackageGraph, PackageInfo, RawPackageGraph};
use crate::task_id::DELIMITER;

impl TryFrom<RawPackageGraph> for PackageGraph {
    type Error = SchedulerError;

    fn try_from(raw: RawPackageGraph) -> std::result::Result<Self, Self::Error> {
        validate_raw_graph(&raw)?;
        Ok(PackageGraph::new_unchecked(raw.packages))
    }
}

fn validate_raw_graph(raw: &RawPackageGraph) -> Result<()> {
    validate_names(raw)?;
    validate_dependencies(raw)?;
    dependency_order(&raw.packages)?;
    Ok(())
}

fn validate_names(raw: &RawPackageGraph) -> Result<()> {
    for name in raw.packages.keys() {
        if name.is_empty() {
            return Err(SchedulerError::ConfigError(
                "package names must not be empty".to_string(),
            ));
        }
        if name.contains(DELIMITER) {
            return Err(SchedulerError::InvalidName {
                name: name.clone(),
                reason: format!("'{DELIMITER}' is reserved as the task id delimiter"),
            });
        }
    }
    Ok(())
}

fn validate_dependencies(raw: &RawPackageGraph) -> Result<()> {
    for (name, info) in raw.packages.iter() {
        for dep in info.dependencies.iter() {
            if !raw.packages.contains_key(dep) {
                return Err(SchedulerError::ConfigError(format!(
                    "package '{}' has unknown dependency '{}'",
                    name, dep
                )));
            }
            if dep == name {
                return Err(SchedulerError::ConfigError(format!(
                    "package '{}' cannot depend on itself",
                    name
                )));
            }
        }
    }
    Ok(())
}

/// Topologically order packages (dependencies first).
///
/// Edge direction: dependency -> dependent. For `app` depending on `lib` we
/// add `lib -> app`. Dependencies on unknown packages are ignored here.
pub(crate) fn dependency_order(packages: &BTreeMap<String, PackageInfo>) -> Result<Vec<String>> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in packages.keys() {
        graph.add_node(name.as_str());
    }

    for (name, info) in packages.iter() {
        for dep in info.dependencies.iter() {
            if packages.contains_key(dep) {
                graph.add_edge(dep.as_str(), name.as_str(), ());
            }
        }
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order.into_iter().map(str::to_string).collect()),
        Err(cycle) => Err(SchedulerError::DagCycle(format!(
            "cycle detected in package graph involving package '{}'",
            cycle.node_id()
        ))),
    }
}
