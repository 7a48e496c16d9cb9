//! Errors raised by the package manager core.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepsError {
    /// The package was never declared with `define`.
    #[error("package {0} not defined")]
    NotDefined(String),

    /// Installed packages still depend on the package being removed.
    #[error("there are other packages that depend on {name}: {}", .dependents.join(", "))]
    HasDependents {
        name: String,
        dependents: Vec<String>,
    },

    /// The packages that would be installed form a dependency cycle.
    /// `path` starts and ends with the same package.
    #[error("dependency cycle detected: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },
}
