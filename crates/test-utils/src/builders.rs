#![allow(dead_code)]

use task_scheduler::graph::{PackageGraph, PackageInfo, RawPackageGraph};

/// Builder for `PackageGraph` to simplify test setup.
pub struct PackageGraphBuilder {
    raw: RawPackageGraph,
}

impl PackageGraphBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawPackageGraph::new(),
        }
    }

    /// Add a package at `location` depending on `deps`.
    pub fn with_package(mut self, name: &str, location: &str, deps: &[&str]) -> Self {
        let mut info = PackageInfo::new(location);
        for dep in deps {
            info = info.depends_on(*dep);
        }
        self.raw.insert(name, info);
        self
    }

    pub fn raw(self) -> RawPackageGraph {
        self.raw
    }

    pub fn build(self) -> PackageGraph {
        PackageGraph::try_from(self.raw).expect("Failed to build valid package graph from builder")
    }
}

impl Default for PackageGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `A` (at `a`) depends on `B` (at `b`).
pub fn two_package_graph() -> PackageGraph {
    PackageGraphBuilder::new()
        .with_package("A", "a", &["B"])
        .with_package("B", "b", &[])
        .build()
}

/// A single package `A` at `a`.
pub fn single_package_graph() -> PackageGraph {
    PackageGraphBuilder::new().with_package("A", "a", &[]).build()
}
