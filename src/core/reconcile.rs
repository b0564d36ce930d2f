//! Package reconciliation: what is actually checked out under `src`, and how
//! that differs from what a manifest recorded.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::core::model::Package;
use crate::error::Result;
use crate::system::vcs::Vcs;

/// Directory entry whose presence marks a package root.
pub const VCS_MARKER: &str = ".git";

/// Outcome of diffing a recorded package list against the disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub changed: bool,
    /// Recorded packages first (original order), then new ones (discovery order).
    pub packages: Vec<Package>,
    pub updated: Vec<String>,
    pub added: Vec<String>,
}

pub struct Reconciler<'a> {
    source_root: PathBuf,
    vcs: &'a dyn Vcs,
}

impl<'a> Reconciler<'a> {
    pub fn new<P: AsRef<Path>>(source_root: P, vcs: &'a dyn Vcs) -> Self {
        Self {
            source_root: source_root.as_ref().to_path_buf(),
            vcs,
        }
    }

    /// Tag name if the checkout is exactly at one, otherwise the head commit hash.
    pub fn determine_bookmark(&self, package_dir: &Path) -> Result<String> {
        if let Some(tag) = self.vcs.exact_tag(package_dir)? {
            debug!("bookmark for {} is tag {}", package_dir.display(), tag);
            return Ok(tag);
        }
        let hash = self.vcs.head_commit(package_dir)?;
        debug!("bookmark for {} is HEAD {}", package_dir.display(), hash);
        Ok(hash)
    }

    /// Walk `src` depth-first in lexical order and describe every package root.
    ///
    /// Builds a fresh list on every call. Packages whose bookmark cannot be
    /// determined are skipped with a warning.
    pub fn installed_packages(&self) -> Vec<Package> {
        let mut packages = Vec::new();

        if !self.source_root.is_dir() {
            debug!("no source tree at {}", self.source_root.display());
            return packages;
        }

        info!("walking {} for installed packages", self.source_root.display());
        let walker = WalkDir::new(&self.source_root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != VCS_MARKER);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping unreadable entry under {}: {}", self.source_root.display(), err);
                    continue;
                }
            };
            if !entry.file_type().is_dir() || !entry.path().join(VCS_MARKER).exists() {
                continue;
            }

            let Some(import_path) = self.import_path(entry.path()) else {
                continue;
            };
            match self.determine_bookmark(entry.path()) {
                Ok(revision) => packages.push(Package::new(import_path, revision, scan_time())),
                Err(err) => warn!("cannot determine revision of {}: {}", import_path, err),
            }
        }

        packages
    }

    /// Diff `recorded` against the disk.
    ///
    /// Recorded entries keep their order and get their revision refreshed in
    /// place; packages found on disk but not recorded are appended in
    /// discovery order. Recorded packages missing from disk are kept as is.
    pub fn diff_and_update(&self, recorded: Vec<Package>) -> Reconciliation {
        let live = self.installed_packages();
        self.merge(recorded, live)
    }

    fn merge(&self, recorded: Vec<Package>, live: Vec<Package>) -> Reconciliation {
        let mut changed = false;
        let mut updated = Vec::new();
        let mut added = Vec::new();
        let mut packages = Vec::with_capacity(recorded.len() + live.len());

        for mut package in recorded {
            let dir = self.package_dir(&package.path);
            if !dir.join(VCS_MARKER).exists() {
                debug!("{} is no longer checked out, keeping its record", package.path);
                packages.push(package);
                continue;
            }

            match self.determine_bookmark(&dir) {
                Ok(bookmark) if bookmark != package.revision => {
                    info!(
                        "{} moved from {} to {}",
                        package.path, package.revision, bookmark
                    );
                    package.revision = bookmark;
                    package.revision_time = scan_time();
                    updated.push(package.path.clone());
                    changed = true;
                }
                Ok(_) => {}
                Err(err) => warn!("cannot determine revision of {}: {}", package.path, err),
            }
            packages.push(package);
        }

        let mut known: HashSet<String> = packages.iter().map(|p| p.path.clone()).collect();
        for package in live {
            if known.insert(package.path.clone()) {
                info!("new package {} found", package.path);
                added.push(package.path.clone());
                packages.push(package);
                changed = true;
            }
        }

        Reconciliation {
            changed,
            packages,
            updated,
            added,
        }
    }

    fn package_dir(&self, import_path: &str) -> PathBuf {
        import_path
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.source_root.clone(), |dir, part| dir.join(part))
    }

    fn import_path(&self, dir: &Path) -> Option<String> {
        let relative = dir.strip_prefix(&self.source_root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }
}

fn scan_time() -> String {
    Utc::now().to_rfc3339()
}
