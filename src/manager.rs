//! Installation tracker over a [`PackageGraph`].
//!
//! `install` and `remove` are depth-first traversals of the dependency edges.
//! Every installed package keeps the set of installed packages that reached it
//! through a direct edge; a package can only be removed once that set is empty.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use log::{debug, trace};

use crate::error::DepsError;
use crate::graph::PackageGraph;

#[derive(Debug, Clone, Default)]
pub struct PackageManager {
    graph: PackageGraph,
    /// installed package -> dependency list it was installed with
    installed: BTreeMap<String, Vec<String>>,
    /// dependency -> installed packages that required it directly
    dependents: HashMap<String, BTreeSet<String>>,
}

impl PackageManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager over an existing graph with nothing installed.
    pub fn with_graph(graph: PackageGraph) -> Self {
        Self {
            graph,
            ..Default::default()
        }
    }

    pub fn graph(&self) -> &PackageGraph {
        &self.graph
    }

    /// Define `name` and its direct dependencies. See [`PackageGraph::define`].
    ///
    /// Installed state is not touched, even when `name` is installed.
    pub fn define<I, S>(&mut self, name: &str, deps: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.graph.define(name, deps);
    }

    /// Install `name` and, before it, every dependency not yet installed.
    ///
    /// Returns the newly installed packages, dependencies first and `name`
    /// last. Installing an installed package is a no-op returning an empty list.
    #[tracing::instrument(skip(self))]
    pub fn install(&mut self, name: &str) -> Result<Vec<String>, DepsError> {
        if !self.graph.contains(name) {
            return Err(DepsError::NotDefined(name.to_string()));
        }
        if self.installed.contains_key(name) {
            debug!("{} is already installed", name);
            return Ok(Vec::new());
        }
        if let Some(path) = self.find_cycle(name) {
            return Err(DepsError::Cycle { path });
        }

        let order = self.install_package(name)?;
        debug!("Installed {} package(s): {:?}", order.len(), order);
        Ok(order)
    }

    fn install_package(&mut self, name: &str) -> Result<Vec<String>, DepsError> {
        let depends_on = match self.graph.get(name) {
            Some(package) => package.depends_on.clone(),
            None => return Err(DepsError::NotDefined(name.to_string())),
        };
        if self.installed.contains_key(name) {
            return Ok(Vec::new());
        }

        self.installed.insert(name.to_string(), depends_on.clone());

        let mut order = Vec::new();
        for dep in &depends_on {
            self.dependents
                .entry(dep.clone())
                .or_default()
                .insert(name.to_string());

            // No rollback: packages installed by earlier siblings stay installed
            let mut path = self.install_package(dep)?;
            path.append(&mut order);
            order = path;
        }
        order.push(name.to_string());
        Ok(order)
    }

    /// Remove `name`, then every dependency no other installed package needs.
    ///
    /// Returns the removed packages, `name` first. Removing a package that is
    /// not installed is a no-op returning an empty list.
    #[tracing::instrument(skip(self))]
    pub fn remove(&mut self, name: &str) -> Result<Vec<String>, DepsError> {
        let order = self.remove_package(name)?;
        if !order.is_empty() {
            debug!("Removed {} package(s): {:?}", order.len(), order);
        }
        Ok(order)
    }

    fn remove_package(&mut self, name: &str) -> Result<Vec<String>, DepsError> {
        if !self.installed.contains_key(name) {
            return Ok(Vec::new());
        }

        let dependents = self.dependents(name);
        if !dependents.is_empty() {
            return Err(DepsError::HasDependents {
                name: name.to_string(),
                dependents,
            });
        }

        // Walk the edges attributed at install time, not a later redefinition
        let depends_on = self.installed.remove(name).unwrap_or_default();

        let mut order = vec![name.to_string()];
        for dep in &depends_on {
            self.detach(dep, name);
            match self.remove_package(dep) {
                Ok(path) => order.extend(path),
                Err(e) => trace!("Keeping {}: {}", dep, e),
            }
        }
        Ok(order)
    }

    fn detach(&mut self, dep: &str, dependent: &str) {
        if let Some(set) = self.dependents.get_mut(dep) {
            set.remove(dependent);
            if set.is_empty() {
                self.dependents.remove(dep);
            }
        }
    }

    /// Names of all installed packages.
    pub fn list(&self) -> Vec<String> {
        self.installed.keys().cloned().collect()
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.graph.contains(name)
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.contains_key(name)
    }

    /// Declared direct dependencies of `name`, or `None` if it is not defined.
    pub fn dependencies(&self, name: &str) -> Option<&[String]> {
        self.graph.get(name).map(|p| p.depends_on.as_slice())
    }

    /// Installed packages currently holding a reference on `name`, sorted.
    pub fn dependents(&self, name: &str) -> Vec<String> {
        self.dependents
            .get(name)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Look for a cycle among the packages an install of `name` would visit.
    ///
    /// Installed packages end the traversal, so only the part of the graph
    /// that is about to be installed is checked.
    fn find_cycle(&self, name: &str) -> Option<Vec<String>> {
        let mut path = Vec::new();
        let mut done = HashSet::new();
        self.visit(name, &mut path, &mut done)
    }

    fn visit<'g>(
        &'g self,
        name: &str,
        path: &mut Vec<&'g str>,
        done: &mut HashSet<&'g str>,
    ) -> Option<Vec<String>> {
        if self.installed.contains_key(name) || done.contains(name) {
            return None;
        }
        if let Some(start) = path.iter().position(|p| *p == name) {
            let mut cycle: Vec<String> = path[start..].iter().map(|p| p.to_string()).collect();
            cycle.push(name.to_string());
            return Some(cycle);
        }

        let package = self.graph.get(name)?;
        path.push(package.name.as_str());
        for dep in &package.depends_on {
            if let Some(cycle) = self.visit(dep, path, done) {
                return Some(cycle);
            }
        }
        path.pop();
        done.insert(package.name.as_str());
        None
    }
}
