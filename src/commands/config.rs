use anyhow::Result;
use log::debug;

use std::path::PathBuf;

use crate::{manager::PackageManager, manifest::Manifest, runtime::Runtime};

/// Environment variable naming the manifest when `--manifest` is not given
pub const MANIFEST_ENV: &str = "SIMPLEDEPS_MANIFEST";

/// Manifest picked up from the working directory as a last resort
pub const DEFAULT_MANIFEST: &str = "simpledeps.json";

pub struct Config<R: Runtime> {
    pub runtime: R,
    pub manifest: Option<PathBuf>,
}

impl<R: Runtime> Config<R> {
    /// Resolve the manifest: explicit path, then `SIMPLEDEPS_MANIFEST`, then
    /// `simpledeps.json` in the current directory if it exists.
    pub fn new(runtime: R, manifest: Option<PathBuf>) -> Result<Self> {
        let manifest = match manifest {
            Some(path) => Some(path),
            None => match runtime.env_var(MANIFEST_ENV) {
                Ok(path) if !path.is_empty() => {
                    debug!("Using manifest from {}: {}", MANIFEST_ENV, path);
                    Some(PathBuf::from(path))
                }
                _ => {
                    let candidate = runtime.current_dir()?.join(DEFAULT_MANIFEST);
                    if runtime.exists(&candidate) {
                        debug!("Using manifest {:?}", candidate);
                        Some(candidate)
                    } else {
                        None
                    }
                }
            },
        };

        Ok(Self { runtime, manifest })
    }

    /// Build a manager with the manifest's packages defined and nothing installed.
    pub fn load_manager(&self) -> Result<PackageManager> {
        let mut manager = PackageManager::new();
        if let Some(path) = &self.manifest {
            Manifest::load(&self.runtime, path)?.apply(&mut manager);
        }
        Ok(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    #[test]
    fn test_explicit_manifest_wins() {
        // No expectations: an explicit path bypasses env and cwd lookups
        let runtime = MockRuntime::new();

        let config = Config::new(runtime, Some(PathBuf::from("/deps.json"))).unwrap();

        assert_eq!(config.manifest, Some(PathBuf::from("/deps.json")));
    }

    #[test]
    fn test_manifest_from_env() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(MANIFEST_ENV))
            .returning(|_| Ok("/env/deps.json".to_string()));

        let config = Config::new(runtime, None).unwrap();

        assert_eq!(config.manifest, Some(PathBuf::from("/env/deps.json")));
    }

    #[test]
    fn test_manifest_from_current_dir() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .returning(|_| Err(std::env::VarError::NotPresent));
        runtime
            .expect_current_dir()
            .returning(|| Ok(PathBuf::from("/work")));
        runtime
            .expect_exists()
            .with(eq(PathBuf::from("/work/simpledeps.json")))
            .returning(|_| true);

        let config = Config::new(runtime, None).unwrap();

        assert_eq!(
            config.manifest,
            Some(PathBuf::from("/work/simpledeps.json"))
        );
    }

    #[test]
    fn test_no_manifest() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .returning(|_| Err(std::env::VarError::NotPresent));
        runtime
            .expect_current_dir()
            .returning(|| Ok(PathBuf::from("/work")));
        runtime.expect_exists().returning(|_| false);

        let config = Config::new(runtime, None).unwrap();
        assert_eq!(config.manifest, None);

        let manager = config.load_manager().unwrap();
        assert!(manager.graph().is_empty());
    }

    #[test]
    fn test_load_manager_applies_manifest() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .with(eq(PathBuf::from("/deps.json")))
            .returning(|_| {
                Ok(r#"{"packages":[{"name":"g","depends_on":["h"]}]}"#.to_string())
            });

        let config = Config::new(runtime, Some(PathBuf::from("/deps.json"))).unwrap();
        let manager = config.load_manager().unwrap();

        assert!(manager.is_defined("g"));
        assert!(manager.is_defined("h"));
        assert!(manager.list().is_empty());
    }
}
