//! JSON package manifest.
//!
//! ```json
//! { "packages": [ { "name": "a", "depends_on": ["b", "c"] }, { "name": "g" } ] }
//! ```

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::manager::PackageManager;
use crate::runtime::Runtime;

/// A single package definition in a manifest
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PackageDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Manifest {
    #[serde(default)]
    pub packages: Vec<PackageDef>,
}

impl Manifest {
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let manifest: Manifest = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))?;
        debug!(
            "Loaded {} package definition(s) from {:?}",
            manifest.packages.len(),
            path
        );
        Ok(manifest)
    }

    /// Define every package in document order.
    pub fn apply(&self, manager: &mut PackageManager) {
        for def in &self.packages {
            manager.define(&def.name, def.depends_on.iter().cloned());
        }
    }
}
