// src/graph/package_graph.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::errors::Result;

/// One package in the monorepo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageInfo {
    /// Path of the package, relative to the pipeline's working directory.
    pub location: String,

    /// Names of packages this package depends on.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl PackageInfo {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            dependencies: Vec::new(),
        }
    }

    pub fn depends_on(mut self, package: impl Into<String>) -> Self {
        self.dependencies.push(package.into());
        self
    }
}

/// Package graph exactly as supplied by a collaborator, before validation.
///
/// Deserializes from a map of package name to `{ location, dependencies }`:
///
/// ```json
/// {
///   "app": { "location": "packages/app", "dependencies": ["lib"] },
///   "lib": { "location": "packages/lib" }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RawPackageGraph {
    pub packages: BTreeMap<String, PackageInfo>,
}

impl RawPackageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, info: PackageInfo) {
        self.packages.insert(name.into(), info);
    }
}

/// Validated package graph: every dependency is a known package and there
/// are no cycles.
///
/// Construct with `PackageGraph::try_from(raw)` (see [`super::validate`]) or,
/// when the caller has already validated, [`PackageGraph::new_unchecked`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "RawPackageGraph")]
pub struct PackageGraph {
    packages: BTreeMap<String, PackageInfo>,
}

impl PackageGraph {
    /// Wrap a package map without validating it.
    pub fn new_unchecked(packages: BTreeMap<String, PackageInfo>) -> Self {
        Self { packages }
    }

    pub fn get(&self, package: &str) -> Option<&PackageInfo> {
        self.packages.get(package)
    }

    pub fn contains(&self, package: &str) -> bool {
        self.packages.contains_key(package)
    }

    pub fn location_of(&self, package: &str) -> Option<&str> {
        self.packages.get(package).map(|p| p.location.as_str())
    }

    /// Direct dependencies of a package. Unknown packages have none.
    pub fn dependencies_of(&self, package: &str) -> &[String] {
        self.packages
            .get(package)
            .map(|p| p.dependencies.as_slice())
            .unwrap_or(&[])
    }

    /// All package names, in sorted order.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Packages ordered so that each one comes after all of its dependencies.
    ///
    /// Fails with `DagCycle` for graphs built with `new_unchecked` that
    /// contain a cycle.
    pub fn dependency_order(&self) -> Result<Vec<String>> {
        super::validate::dependency_order(&self.packages)
    }
}
