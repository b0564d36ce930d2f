use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::core::model::{Dependencies, Environment, Package};
use crate::error::{ErrorContext, GoboError, Result};

/// Reads and writes the environment / package-list pair of a workspace instance.
///
/// A missing or malformed file is a [`GoboError::Config`].
pub trait ManifestStore {
    fn read_environment(&self, path: &Path) -> Result<Environment>;
    fn write_environment(&self, path: &Path, env: &Environment) -> Result<()>;
    fn read_packages(&self, path: &Path) -> Result<Dependencies>;
    fn write_packages(&self, path: &Path, deps: &Dependencies) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TomlManifestStore;

impl ManifestStore for TomlManifestStore {
    fn read_environment(&self, path: &Path) -> Result<Environment> {
        read_toml(path, "environment")
    }

    fn write_environment(&self, path: &Path, env: &Environment) -> Result<()> {
        debug!("writing environment '{}' to {}", env.name, path.display());
        write_toml(path, env)
    }

    fn read_packages(&self, path: &Path) -> Result<Dependencies> {
        let mut deps: Dependencies = read_toml(path, "package list")?;
        deps.packages.iter_mut().for_each(Package::normalize);
        Ok(deps)
    }

    fn write_packages(&self, path: &Path, deps: &Dependencies) -> Result<()> {
        debug!("writing {} packages to {}", deps.packages.len(), path.display());
        write_toml(path, deps)
    }
}

fn read_toml<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| GoboError::Config {
        message: format!("unable to read {} file: {}", what, e),
        path: Some(path.to_path_buf()),
    })?;

    toml::from_str(&content).map_err(|e| GoboError::Config {
        message: format!("invalid {} file: {}", what, e),
        path: Some(path.to_path_buf()),
    })
}

fn write_toml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = toml::to_string_pretty(value).map_err(|e| GoboError::Config {
        message: format!("failed to serialize: {}", e),
        path: Some(path.to_path_buf()),
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_io_context(|| format!("creating directory {}", parent.display()))?;
    }
    fs::write(path, content).with_io_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Host, HostUser};
    use tempfile::tempdir;

    fn sample_host() -> Host {
        Host {
            operating_system: "linux".to_string(),
            tool_version: "0.1.0".to_string(),
            hostname: "build-01".to_string(),
            user: HostUser {
                username: "gopher".to_string(),
                name: "Go Pher".to_string(),
                uid: "1000".to_string(),
                gid: "1000".to_string(),
                home_dir: "/home/gopher".to_string(),
            },
        }
    }

    #[test]
    fn environment_and_packages_round_trip() {
        let tmp = tempdir().unwrap();
        let env_path = tmp.path().join("gobo.toml");
        let pak_path = tmp.path().join("packages.toml");

        let env = Environment::new("dev", sample_host());
        let mut deps = Dependencies::new(vec![
            Package::new("github.com/z/last", "v2.0.0", "2024-05-01T10:00:00+00:00"),
            Package::new("github.com/a/first", "9f8e7d6c", "2024-05-01T10:00:01+00:00"),
        ]);
        deps.comment = Some("pinned for the release branch".to_string());
        deps.packages[1].comment = Some("fork".to_string());

        let store = TomlManifestStore;
        store.write_environment(&env_path, &env).unwrap();
        store.write_packages(&pak_path, &deps).unwrap();

        assert_eq!(store.read_environment(&env_path).unwrap(), env);
        let back = store.read_packages(&pak_path).unwrap();
        assert_eq!(back, deps);
        let paths: Vec<_> = back.packages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["github.com/z/last", "github.com/a/first"]);
    }

    #[test]
    fn empty_package_list_round_trips() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("packages.toml");
        TomlManifestStore.write_packages(&path, &Dependencies::default()).unwrap();
        assert!(TomlManifestStore.read_packages(&path).unwrap().packages.is_empty());
    }

    #[test]
    fn missing_and_malformed_files_are_config_errors() {
        let tmp = tempdir().unwrap();
        let missing = TomlManifestStore
            .read_environment(&tmp.path().join("gobo.toml"))
            .unwrap_err();
        assert!(missing.is_config_error());

        let bad = tmp.path().join("packages.toml");
        fs::write(&bad, "[[package]\npath = 1").unwrap();
        assert!(TomlManifestStore.read_packages(&bad).unwrap_err().is_config_error());
    }
}
