use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ErrorContext, GoboError, Result};

/// Main gobo configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoboConfig {
    pub paths: PathsConfig,
    pub install: InstallConfig,
    pub ui: UiConfig,
}

/// Where the live workspace and the snapshot store live
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Live workspace root (defaults to $GOPATH, then ~/go)
    pub workspace: Option<PathBuf>,
    /// Snapshot store root (defaults to $GOBO_HOME, then ~/.gobo)
    pub store: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Package list read by `gobo install` when no file is given
    pub default_file: PathBuf,
}

/// UI and display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub colored: bool,
    /// Print the ascii banner before each command
    pub banner: bool,
    /// Log level used when neither -v nor RUST_LOG is given
    pub log_level: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            default_file: PathBuf::from("gobo.toml"),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            colored: std::env::var("NO_COLOR").is_err(),
            banner: true,
            log_level: "warn".to_string(),
        }
    }
}

impl GoboConfig {
    /// Load configuration from file or fall back to defaults
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .with_io_context(|| format!("reading config file {}", config_path.display()))?;

            toml::from_str(&content).map_err(|e| GoboError::Config {
                message: format!("Invalid TOML: {}", e),
                path: Some(config_path.to_path_buf()),
            })
        } else {
            Ok(Self::default())
        }
    }

    pub fn save<P: AsRef<Path>>(&self, config_path: P) -> Result<()> {
        let config_path = config_path.as_ref();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_io_context(|| format!("creating config directory {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| GoboError::Config {
            message: format!("Failed to serialize config: {}", e),
            path: Some(config_path.to_path_buf()),
        })?;

        fs::write(config_path, content)
            .with_io_context(|| format!("writing config file {}", config_path.display()))?;

        Ok(())
    }

    pub fn load_global() -> Result<Self> {
        Self::load(Self::global_config_path()?)
    }

    /// `~/.config/gobo/config.toml`. Kept outside the store, which `restore` wipes.
    pub fn global_config_path() -> Result<PathBuf> {
        Ok(home_dir()?.join(".config").join("gobo").join("config.toml"))
    }

    /// Live workspace root: flag, then `$GOPATH` (first entry), then config, then `~/go`.
    pub fn workspace_root(&self, flag: Option<&Path>) -> Result<PathBuf> {
        let home = home_dir().ok();
        resolve_workspace_root(self, flag, std::env::var_os("GOPATH"), home)
    }

    /// Snapshot store root: flag, then `$GOBO_HOME`, then config, then `~/.gobo`.
    pub fn store_root(&self, flag: Option<&Path>) -> Result<PathBuf> {
        let home = home_dir().ok();
        resolve_store_root(self, flag, std::env::var_os("GOBO_HOME"), home)
    }
}

fn home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| GoboError::Config {
            message: "HOME environment variable not set".to_string(),
            path: None,
        })
}

pub(crate) fn resolve_workspace_root(
    config: &GoboConfig,
    flag: Option<&Path>,
    gopath: Option<OsString>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(first) = gopath
        .as_deref()
        .and_then(|value| std::env::split_paths(value).find(|p| !p.as_os_str().is_empty()))
    {
        return Ok(first);
    }
    if let Some(path) = &config.paths.workspace {
        return Ok(path.clone());
    }
    home.map(|home| home.join("go")).ok_or_else(|| GoboError::Config {
        message: "cannot determine workspace root: set GOPATH or HOME".to_string(),
        path: None,
    })
}

pub(crate) fn resolve_store_root(
    config: &GoboConfig,
    flag: Option<&Path>,
    gobo_home: Option<OsString>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(value) = gobo_home.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(value));
    }
    if let Some(path) = &config.paths.store {
        return Ok(path.clone());
    }
    home.map(|home| home.join(".gobo")).ok_or_else(|| GoboError::Config {
        message: "cannot determine store root: set GOBO_HOME or HOME".to_string(),
        path: None,
    })
}
