use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorContext, GoboError, Result};

/// Subdirectories that make up a materialized workspace.
pub const WORKSPACE_DIRS: [&str; 3] = ["src", "pkg", "bin"];

pub const ENVIRONMENT_FILE: &str = "gobo.toml";
pub const PACKAGES_FILE: &str = "packages.toml";

/// Store entry holding the pristine pre-tool backup.
pub const INITIAL_ENVIRONMENT: &str = "initial";

/// Path arithmetic for the live workspace and the snapshot store.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceLayout {
    pub workspace_root: PathBuf,
    pub store_root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(workspace_root: P, store_root: Q) -> Self {
        Self {
            workspace_root: workspace_root.as_ref().to_path_buf(),
            store_root: store_root.as_ref().to_path_buf(),
        }
    }

    /// Like [`WorkspaceLayout::new`], but refuses a store that lives inside the
    /// workspace or contains it. Backup copies the workspace into the store and
    /// restore deletes the store, so the two trees must be disjoint.
    pub fn resolve<P: AsRef<Path>, Q: AsRef<Path>>(workspace_root: P, store_root: Q) -> Result<Self> {
        let layout = Self::new(workspace_root, store_root);
        let workspace = absolute(&layout.workspace_root)?;
        let store = absolute(&layout.store_root)?;

        if store.starts_with(&workspace) || workspace.starts_with(&store) {
            return Err(GoboError::Validation {
                field: "store root".to_string(),
                value: layout.store_root.display().to_string(),
                reason: format!(
                    "must not overlap the workspace {}",
                    layout.workspace_root.display()
                ),
            });
        }
        Ok(layout)
    }

    pub fn source_root(&self) -> PathBuf {
        self.workspace_root.join("src")
    }

    pub fn environment_file(&self) -> PathBuf {
        self.workspace_root.join(ENVIRONMENT_FILE)
    }

    pub fn packages_file(&self) -> PathBuf {
        self.workspace_root.join(PACKAGES_FILE)
    }

    pub fn has_live_manifest(&self) -> bool {
        self.environment_file().is_file()
    }

    pub fn store_dir(&self, name: &str) -> PathBuf {
        self.store_root.join(name)
    }

    pub fn initial_dir(&self) -> PathBuf {
        self.store_dir(INITIAL_ENVIRONMENT)
    }

    /// Backup copy of the tool executable kept beside the stored environments.
    pub fn tool_backup(&self) -> PathBuf {
        self.store_root.join(tool_file_name())
    }

    /// Where `create` drops the tool so the fresh workspace can run it again.
    pub fn workspace_tool(&self) -> PathBuf {
        self.workspace_root.join("bin").join(tool_file_name())
    }

    /// Stored environment names, reserved entry excluded, in lexical order.
    pub fn stored_environments(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        if !self.store_root.exists() {
            return Ok(names);
        }

        let entries = fs::read_dir(&self.store_root)
            .with_io_context(|| format!("reading store directory {}", self.store_root.display()))?;

        for entry in entries {
            let entry = entry.with_io_context(|| "reading store entry".to_string())?;
            let is_dir = entry
                .file_type()
                .with_io_context(|| "getting file type for store entry".to_string())?
                .is_dir();
            if !is_dir {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name != INITIAL_ENVIRONMENT {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    /// Create whichever of `src`, `pkg`, `bin` are missing from the live workspace.
    pub fn ensure_workspace_dirs(&self) -> Result<()> {
        for dir in WORKSPACE_DIRS {
            let path = self.workspace_root.join(dir);
            if !path.exists() {
                fs::create_dir_all(&path)
                    .with_io_context(|| format!("creating directory {}", path.display()))?;
            }
        }
        Ok(())
    }
}

/// Absolute, lexically normalized form of `path`. Does not touch the disk
/// beyond reading the current directory.
fn absolute(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .with_io_context(|| "reading the current directory".to_string())?
            .join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

fn tool_file_name() -> String {
    format!("gobo{}", std::env::consts::EXE_SUFFIX)
}

/// Reject names that cannot be used as a store entry.
pub fn validate_environment_name(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("name must not be empty")
    } else if name == INITIAL_ENVIRONMENT {
        Some("name is reserved for the pre-gobo backup")
    } else if name == "." || name == ".." {
        Some("name must not be a relative path component")
    } else if name.contains('/') || name.contains('\\') {
        Some("name must not contain path separators")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(GoboError::Validation {
            field: "environment name".to_string(),
            value: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
