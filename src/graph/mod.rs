//! Package graph - the static definition of every known package.
//!
//! The graph is append-only: packages are added by [`PackageGraph::define`],
//! either directly or implicitly as a dependency of another package, and are
//! never removed.

use std::collections::HashMap;

use log::trace;

/// A node in the dependency graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    /// Direct dependencies, in declaration order
    pub depends_on: Vec<String>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            depends_on: Vec::new(),
        }
    }
}

/// Name-keyed mapping of every package ever defined.
///
/// Every name referenced as a dependency is also a key of the graph.
#[derive(Debug, Clone, Default)]
pub struct PackageGraph {
    packages: HashMap<String, Package>,
}

impl PackageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define `name` with the given direct dependencies.
    ///
    /// Replaces any prior dependency list of `name`. Dependencies that are not
    /// yet known are registered without dependencies of their own; existing
    /// definitions are left alone.
    pub fn define<I, S>(&mut self, name: &str, deps: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let depends_on: Vec<String> = deps.into_iter().map(Into::into).collect();

        for dep in &depends_on {
            if !self.packages.contains_key(dep) {
                trace!("Registering {} as a dependency of {}", dep, name);
                self.packages.insert(dep.clone(), Package::new(dep.as_str()));
            }
        }

        self.packages.insert(
            name.to_string(),
            Package {
                name: name.to_string(),
                depends_on,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// All package names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.packages.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_registers_dependencies() {
        let mut graph = PackageGraph::new();
        graph.define("a", ["b", "c"]);

        assert!(graph.contains("a"));
        assert!(graph.contains("b"));
        assert!(graph.contains("c"));
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.get("a").unwrap().depends_on, vec!["b", "c"]);
        assert!(graph.get("b").unwrap().depends_on.is_empty());
    }

    #[test]
    fn test_define_keeps_existing_dependency_definition() {
        let mut graph = PackageGraph::new();
        graph.define("b", ["d"]);
        graph.define("a", ["b"]);

        assert_eq!(graph.get("b").unwrap().depends_on, vec!["d"]);
    }

    #[test]
    fn test_redefine_replaces_dependency_list() {
        let mut graph = PackageGraph::new();
        graph.define("a", ["b", "c"]);
        graph.define("a", ["d"]);

        assert_eq!(graph.get("a").unwrap().depends_on, vec!["d"]);
        // Previously registered packages stay in the graph
        assert!(graph.contains("b"));
        assert!(graph.contains("c"));
    }

    #[test]
    fn test_define_without_dependencies() {
        let mut graph = PackageGraph::new();
        graph.define("solo", Vec::<String>::new());

        assert_eq!(graph.names(), vec!["solo"]);
        assert!(graph.get("solo").unwrap().depends_on.is_empty());
    }

    #[test]
    fn test_duplicate_edges_are_kept() {
        let mut graph = PackageGraph::new();
        graph.define("a", ["b", "b"]);

        assert_eq!(graph.get("a").unwrap().depends_on, vec!["b", "b"]);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_empty_graph() {
        let graph = PackageGraph::new();
        assert!(graph.is_empty());
        assert!(graph.get("x").is_none());
    }
}
