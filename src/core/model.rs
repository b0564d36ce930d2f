use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of one workspace instance, persisted as `gobo.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    #[serde(rename = "created")]
    pub date_created: DateTime<Utc>,
    #[serde(rename = "modified")]
    pub date_modified: DateTime<Utc>,
    pub host: Host,
}

/// Machine and user that last touched an environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub operating_system: String,
    pub tool_version: String,
    #[serde(rename = "host")]
    pub hostname: String,
    #[serde(default)]
    pub user: HostUser,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostUser {
    pub username: String,
    pub name: String,
    pub uid: String,
    pub gid: String,
    pub home_dir: String,
}

/// Ordered package record paired with an [`Environment`], persisted as `packages.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dependencies {
    /// Free text for humans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, rename = "package")]
    pub packages: Vec<Package>,
}

/// A single checked-out package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Import path, e.g. `github.com/pkg/errors`. Unique within one list.
    pub path: String,
    /// Where the package was fetched from; empty means same as `path`.
    #[serde(default)]
    pub origin: String,
    /// Tag name when the checkout sits exactly on a tag, otherwise the commit hash.
    #[serde(default)]
    pub revision: String,
    #[serde(default, rename = "revisionTime")]
    pub revision_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Environment {
    pub fn new(name: impl Into<String>, host: Host) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            date_created: now,
            date_modified: now,
            host,
        }
    }
}

impl Package {
    pub fn new(path: impl Into<String>, revision: impl Into<String>, revision_time: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            origin: path.clone(),
            path,
            revision: revision.into(),
            revision_time: revision_time.into(),
            comment: None,
        }
    }

    /// Fill in `origin` when the manifest left it out.
    pub fn normalize(&mut self) {
        if self.origin.is_empty() {
            self.origin = self.path.clone();
        }
    }
}

impl Dependencies {
    pub fn new(packages: Vec<Package>) -> Self {
        Self {
            comment: None,
            packages,
        }
    }
}
