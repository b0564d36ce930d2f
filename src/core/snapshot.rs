use std::path::Path;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::core::layout::{
    validate_environment_name, WorkspaceLayout, ENVIRONMENT_FILE, INITIAL_ENVIRONMENT,
    PACKAGES_FILE, WORKSPACE_DIRS,
};
use crate::core::manifest::ManifestStore;
use crate::core::model::{Dependencies, Environment, Host, Package};
use crate::core::prompt::{self, Prompt};
use crate::core::reconcile::Reconciler;
use crate::core::transfer::Transfer;
use crate::error::{ErrorContext, GoboError, Result};
use crate::system::toolchain::PackageInstaller;
use crate::system::vcs::Vcs;

pub const SAVE_QUESTION: &str =
    "The current environment has uncommitted changes, update now? (y): ";

pub const RESTORE_QUESTION: &str = "The restore command deletes all environments and gobo files, \
then restores your workspace to the state it was in before you ran gobo for the first time. \
Are you sure this is what you want to do? (yes/no): ";

/// Collaborators the engine drives. Built once by the caller.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub transfer: &'a dyn Transfer,
    pub manifests: &'a dyn ManifestStore,
    pub vcs: &'a dyn Vcs,
    pub installer: &'a dyn PackageInstaller,
    pub prompt: &'a dyn Prompt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Unchanged,
    Declined,
    Written,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstallReport {
    pub installed: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub saved: Option<SaveOutcome>,
}

/// Moves the live workspace in and out of the snapshot store.
///
/// Exactly one environment is live at a time. Every other known environment
/// sits under `<store>/<name>` with its own `src`/`pkg`/`bin` and manifest pair.
pub struct SnapshotEngine<'a> {
    layout: WorkspaceLayout,
    services: Services<'a>,
    reconciler: Reconciler<'a>,
    host: Host,
}

impl<'a> SnapshotEngine<'a> {
    pub fn new(layout: WorkspaceLayout, services: Services<'a>, host: Host) -> Self {
        let reconciler = Reconciler::new(layout.source_root(), services.vcs);
        Self {
            layout,
            services,
            reconciler,
            host,
        }
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    /// The live environment, if the workspace has a manifest.
    pub fn active_environment(&self) -> Result<Option<Environment>> {
        if !self.layout.has_live_manifest() {
            return Ok(None);
        }
        self.services
            .manifests
            .read_environment(&self.layout.environment_file())
            .map(Some)
    }

    /// Stored environment names, excluding the reserved backup.
    pub fn environments(&self) -> Result<Vec<String>> {
        self.layout.stored_environments()
    }

    /// Start a new environment called `name` and make it live.
    ///
    /// Without `populate` the current workspace is stashed under the previous
    /// environment's name (`initial` when none was active) and the new one
    /// starts empty. With `populate` the directories stay in place and the
    /// new manifest is seeded from the packages found on disk.
    pub fn create(&self, name: &str, populate: bool, is_initial: bool) -> Result<()> {
        validate_environment_name(name)?;

        let current = self.active_environment()?;
        if let Some(env) = &current {
            if env.name == name {
                return Err(GoboError::AlreadyActive {
                    name: name.to_string(),
                });
            }
        }
        if self.layout.store_dir(name).exists() {
            return Err(GoboError::AlreadyExists {
                resource: "environment".to_string(),
                identifier: name.to_string(),
            });
        }

        if current.is_some() && !is_initial {
            self.save_before_switch();
        }

        let previous = current
            .as_ref()
            .map(|env| env.name.as_str())
            .unwrap_or(INITIAL_ENVIRONMENT);

        let packages = if populate {
            info!("populating '{}' from the current workspace", name);
            self.reconciler.installed_packages()
        } else {
            info!("stashing current workspace as '{}'", previous);
            self.stash_directories(previous)?;
            Vec::new()
        };
        self.stash_manifests(previous)?;

        let environment = Environment::new(name, self.host.clone());
        self.services
            .manifests
            .write_environment(&self.layout.environment_file(), &environment)?;
        self.services
            .manifests
            .write_packages(&self.layout.packages_file(), &Dependencies::new(packages))?;

        self.layout.ensure_workspace_dirs()?;
        let store_dir = self.layout.store_dir(name);
        std::fs::create_dir_all(&store_dir).map_err(|e| GoboError::Io {
            source: e,
            context: format!("creating store directory {}", store_dir.display()),
        })?;

        if !populate {
            self.install_tool_copy()?;
        }

        info!("environment '{}' created", name);
        Ok(())
    }

    /// Stash the live environment and materialize `name` in its place.
    pub fn activate(&self, name: &str) -> Result<()> {
        validate_environment_name(name)?;

        // Without a live manifest there is no name to stash the workspace under.
        let Some(current) = self.active_environment()? else {
            return Err(GoboError::NoActiveEnvironment {
                operation: "activate".to_string(),
            });
        };
        if current.name == name {
            return Err(GoboError::AlreadyActive {
                name: name.to_string(),
            });
        }

        let stored = self.layout.store_dir(name);
        if !stored.is_dir() {
            return Err(GoboError::NotFound {
                resource: "environment".to_string(),
                identifier: name.to_string(),
            });
        }
        if !stored.join(ENVIRONMENT_FILE).is_file() {
            return Err(GoboError::NotFound {
                resource: "environment manifest".to_string(),
                identifier: stored.join(ENVIRONMENT_FILE).display().to_string(),
            });
        }

        self.save_before_switch();

        let previous = current.name.as_str();
        info!("stashing '{}' and activating '{}'", previous, name);
        self.stash_directories(previous)?;
        self.stash_manifests(previous)?;

        for dir in WORKSPACE_DIRS {
            let from = stored.join(dir);
            if from.exists() {
                self.services
                    .transfer
                    .move_path(&from, &self.layout.workspace_root.join(dir))?;
            }
        }
        for file in [ENVIRONMENT_FILE, PACKAGES_FILE] {
            let from = stored.join(file);
            if from.exists() {
                self.services
                    .transfer
                    .move_path(&from, &self.layout.workspace_root.join(file))?;
            }
        }

        self.layout.ensure_workspace_dirs()?;
        info!("environment '{}' activated", name);
        Ok(())
    }

    /// Reconcile the live manifest with the disk and persist any drift.
    ///
    /// When not `silent`, an answer of `n`/`N` skips the write.
    pub fn save(&self, silent: bool) -> Result<SaveOutcome> {
        let env_path = self.layout.environment_file();
        let pak_path = self.layout.packages_file();

        let mut env = self.services.manifests.read_environment(&env_path)?;
        let mut deps = self.services.manifests.read_packages(&pak_path)?;

        let result = self.reconciler.diff_and_update(std::mem::take(&mut deps.packages));
        env.host = self.host.clone();
        deps.packages = result.packages;

        if !result.changed {
            info!("no environment changes detected for '{}'", env.name);
            return Ok(SaveOutcome::Unchanged);
        }

        if !silent {
            let answer = self.services.prompt.ask(SAVE_QUESTION)?;
            if prompt::declines(&answer) {
                info!("not saving updates to '{}'", env.name);
                return Ok(SaveOutcome::Declined);
            }
        }

        info!(
            "committing updates to '{}' ({} updated, {} added)",
            env.name,
            result.updated.len(),
            result.added.len()
        );
        env.date_modified = Utc::now();
        self.services.manifests.write_environment(&env_path, &env)?;
        self.services.manifests.write_packages(&pak_path, &deps)?;
        Ok(SaveOutcome::Written)
    }

    /// Remove a dormant environment from the store.
    pub fn delete(&self, name: &str) -> Result<()> {
        validate_environment_name(name)?;

        if let Some(env) = self.active_environment()? {
            if env.name == name {
                return Err(GoboError::ActiveEnvironment {
                    name: name.to_string(),
                    operation: "delete".to_string(),
                });
            }
        }

        let stored = self.layout.store_dir(name);
        if !stored.is_dir() {
            return Err(GoboError::NotFound {
                resource: "environment".to_string(),
                identifier: name.to_string(),
            });
        }

        info!("removing environment '{}' at {}", name, stored.display());
        self.services
            .transfer
            .remove_tree(&stored)
            .with_context(|| format!("deleting environment '{}'", name))
    }

    /// Capture the pristine workspace once. Returns `true` on the first run.
    pub fn backup(&self, executable: &Path) -> Result<bool> {
        let initial = self.layout.initial_dir();
        if initial.exists() {
            debug!("initial backup already exists at {}", initial.display());
            return Ok(false);
        }

        info!("creating initial backup at {}", initial.display());
        if self.layout.workspace_root.is_dir() {
            self.services
                .transfer
                .copy_dir(&self.layout.workspace_root, &initial)?;
        } else {
            std::fs::create_dir_all(&initial).map_err(|e| GoboError::Io {
                source: e,
                context: format!("creating {}", initial.display()),
            })?;
        }
        self.services
            .transfer
            .copy_file(executable, &self.layout.tool_backup())?;

        Ok(true)
    }

    /// Put the pre-gobo workspace back and delete every stored environment.
    ///
    /// Asks for `yes`; returns `false` when cancelled.
    pub fn restore(&self) -> Result<bool> {
        let answer = self.services.prompt.ask(RESTORE_QUESTION)?;
        if !prompt::confirms_destruction(&answer) {
            info!("restore cancelled");
            return Ok(false);
        }

        let initial = self.layout.initial_dir();
        for dir in WORKSPACE_DIRS {
            let live = self.layout.workspace_root.join(dir);
            warn!("removing live {} at {}", dir, live.display());
            self.services.transfer.remove_tree(&live)?;
        }
        for dir in WORKSPACE_DIRS {
            let backup = initial.join(dir);
            if backup.is_dir() {
                warn!("restoring {} from {}", dir, backup.display());
                self.services
                    .transfer
                    .copy_dir(&backup, &self.layout.workspace_root.join(dir))?;
            }
        }
        for file in [self.layout.environment_file(), self.layout.packages_file()] {
            self.services.transfer.remove_tree(&file)?;
        }

        warn!("removing store {}", self.layout.store_root.display());
        self.services.transfer.remove_tree(&self.layout.store_root)?;
        Ok(true)
    }

    /// Install every package listed in `file`, then save silently.
    ///
    /// A package that fails to install is logged and skipped.
    pub fn install(&self, file: &Path) -> Result<InstallReport> {
        let deps = self.services.manifests.read_packages(file)?;
        info!("installing {} packages from {}", deps.packages.len(), file.display());
        let mut report = InstallReport::default();

        for package in &deps.packages {
            match self.services.installer.install(package) {
                Ok(()) => report.installed.push(package.path.clone()),
                Err(err) => {
                    error!("error installing {}: {}", package.path, err);
                    report.failed.push((package.path.clone(), err.to_string()));
                }
            }
        }

        report.saved = Some(self.save(true)?);
        Ok(report)
    }

    /// Packages currently recorded for the live environment.
    pub fn recorded_packages(&self) -> Result<Vec<Package>> {
        Ok(self
            .services
            .manifests
            .read_packages(&self.layout.packages_file())?
            .packages)
    }

    fn save_before_switch(&self) {
        info!("running save on the current environment first");
        if let Err(err) = self.save(false) {
            error!("error saving current environment: {}", err);
        }
    }

    fn stash_directories(&self, name: &str) -> Result<()> {
        let target = self.layout.store_dir(name);
        for dir in WORKSPACE_DIRS {
            let live = self.layout.workspace_root.join(dir);
            if live.exists() {
                debug!("moving live {} into {}", dir, target.display());
                self.services.transfer.move_path(&live, &target.join(dir))?;
            }
        }
        Ok(())
    }

    fn stash_manifests(&self, name: &str) -> Result<()> {
        let target = self.layout.store_dir(name);
        for (live, file) in [
            (self.layout.environment_file(), ENVIRONMENT_FILE),
            (self.layout.packages_file(), PACKAGES_FILE),
        ] {
            if live.exists() {
                self.services.transfer.move_path(&live, &target.join(file))?;
            }
        }
        Ok(())
    }

    fn install_tool_copy(&self) -> Result<()> {
        let backup = self.layout.tool_backup();
        if !backup.is_file() {
            warn!(
                "no tool backup at {}; the new workspace has no gobo binary",
                backup.display()
            );
            return Ok(());
        }
        self.services
            .transfer
            .copy_file(&backup, &self.layout.workspace_tool())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::TomlManifestStore;
    use crate::core::prompt::scripted::ScriptedPrompt;
    use crate::core::reconcile::{fake::FakeVcs, VCS_MARKER};
    use crate::core::transfer::FsTransfer;
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    #[derive(Default)]
    struct RecordingInstaller {
        fail: Vec<String>,
        calls: RefCell<Vec<(String, String)>>,
    }

    impl PackageInstaller for RecordingInstaller {
        fn install(&self, package: &Package) -> Result<()> {
            self.calls
                .borrow_mut()
                .push((package.path.clone(), package.revision.clone()));
            if self.fail.contains(&package.path) {
                return Err(GoboError::Command {
                    command: format!("go get {}", package.path),
                    exit_code: Some(1),
                    stderr: "unreachable".to_string(),
                });
            }
            Ok(())
        }
    }

    struct Harness {
        tmp: TempDir,
        layout: WorkspaceLayout,
        vcs: FakeVcs,
        prompt: ScriptedPrompt,
        installer: RecordingInstaller,
    }

    impl Harness {
        fn new(answers: &[&str]) -> Self {
            let tmp = tempdir().unwrap();
            let layout = WorkspaceLayout::new(tmp.path().join("go"), tmp.path().join("store"));
            for dir in WORKSPACE_DIRS {
                fs::create_dir_all(layout.workspace_root.join(dir)).unwrap();
            }
            Self {
                tmp,
                layout,
                vcs: FakeVcs::default(),
                prompt: ScriptedPrompt::new(answers),
                installer: RecordingInstaller::default(),
            }
        }

        fn engine(&self) -> SnapshotEngine<'_> {
            let services = Services {
                transfer: &FsTransfer,
                manifests: &TomlManifestStore,
                vcs: &self.vcs,
                installer: &self.installer,
                prompt: &self.prompt,
            };
            SnapshotEngine::new(self.layout.clone(), services, Host::default())
        }

        fn live(&self, rel: &str) -> PathBuf {
            self.layout.workspace_root.join(rel)
        }

        fn checkout(&self, import_path: &str, tag: &str) -> PathBuf {
            let dir = self.layout.source_root().join(import_path);
            fs::create_dir_all(dir.join(VCS_MARKER)).unwrap();
            self.vcs.set_tag(&dir, tag);
            dir
        }

        fn executable(&self) -> PathBuf {
            let exe = self.tmp.path().join("gobo-build");
            fs::write(&exe, b"#!gobo").unwrap();
            exe
        }

        fn active_name(&self) -> Option<String> {
            self.engine().active_environment().unwrap().map(|e| e.name)
        }
    }

    #[test]
    fn create_from_nothing_stashes_pristine_workspace() {
        let h = Harness::new(&[]);
        fs::write(h.live("src/marker.txt"), "pristine").unwrap();
        let engine = h.engine();
        assert!(engine.backup(&h.executable()).unwrap());

        engine.create("dev", false, true).unwrap();

        assert_eq!(h.active_name().as_deref(), Some("dev"));
        assert!(engine.recorded_packages().unwrap().is_empty());
        assert!(!h.live("src/marker.txt").exists());
        assert_eq!(
            fs::read_to_string(h.layout.initial_dir().join("src/marker.txt")).unwrap(),
            "pristine"
        );
        for dir in WORKSPACE_DIRS {
            assert!(h.live(dir).is_dir());
        }
        assert!(h.layout.store_dir("dev").is_dir());
        assert_eq!(fs::read(h.layout.workspace_tool()).unwrap(), b"#!gobo");
    }

    #[test]
    fn create_rejects_active_and_stored_names() {
        let h = Harness::new(&[]);
        let engine = h.engine();
        engine.create("dev", false, true).unwrap();

        assert!(matches!(
            engine.create("dev", false, false),
            Err(GoboError::AlreadyActive { .. })
        ));

        engine.create("other", false, false).unwrap();
        let err = engine.create("dev", false, false).unwrap_err();
        assert!(matches!(err, GoboError::AlreadyExists { .. }));
        assert!(err.is_user_error());
        assert!(engine.create("initial", false, false).unwrap_err().is_user_error());
    }

    #[test]
    fn create_stashes_previous_environment_under_its_name() {
        let h = Harness::new(&[]);
        let engine = h.engine();
        engine.create("first", false, true).unwrap();
        fs::write(h.live("pkg/cache.a"), "cache").unwrap();

        engine.create("second", false, false).unwrap();

        assert_eq!(h.active_name().as_deref(), Some("second"));
        let stored = h.layout.store_dir("first");
        assert_eq!(fs::read_to_string(stored.join("pkg/cache.a")).unwrap(), "cache");
        let stored_env = TomlManifestStore
            .read_environment(&stored.join(ENVIRONMENT_FILE))
            .unwrap();
        assert_eq!(stored_env.name, "first");
        assert!(stored.join(PACKAGES_FILE).is_file());
    }

    #[test]
    fn populate_seeds_packages_and_leaves_directories() {
        let h = Harness::new(&[]);
        h.checkout("github.com/x/lib", "v1.0.0");
        let engine = h.engine();
        engine.create("base", false, true).unwrap();
        // base starts empty; put a package back into the live tree
        h.checkout("github.com/x/lib", "v1.0.0");
        engine.save(true).unwrap();

        engine.create("clone", true, false).unwrap();

        assert_eq!(h.active_name().as_deref(), Some("clone"));
        let packages = engine.recorded_packages().unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].path, "github.com/x/lib");
        assert_eq!(packages[0].revision, "v1.0.0");
        assert!(h.live("src/github.com/x/lib").is_dir());
        assert!(h.layout.store_dir("base").join(ENVIRONMENT_FILE).is_file());
        assert!(!h.layout.store_dir("base").join("src").exists());
    }

    #[test]
    fn activate_swaps_workspaces() {
        let h = Harness::new(&[]);
        let engine = h.engine();
        engine.create("one", false, true).unwrap();
        fs::write(h.live("bin/tool-one"), "1").unwrap();
        engine.create("two", false, false).unwrap();
        fs::write(h.live("bin/tool-two"), "2").unwrap();

        engine.activate("one").unwrap();

        assert_eq!(h.active_name().as_deref(), Some("one"));
        assert!(h.live("bin/tool-one").is_file());
        assert!(!h.live("bin/tool-two").exists());
        assert!(h.layout.store_dir("two").join("bin/tool-two").is_file());
        assert!(!h.layout.store_dir("one").join(ENVIRONMENT_FILE).exists());
        for dir in WORKSPACE_DIRS {
            assert!(h.live(dir).is_dir());
        }
    }

    #[test]
    fn activating_the_active_environment_changes_nothing() {
        let h = Harness::new(&[]);
        let engine = h.engine();
        engine.create("one", false, true).unwrap();
        fs::write(h.live("src/keep.go"), "package keep").unwrap();

        let err = engine.activate("one").unwrap_err();

        assert!(matches!(err, GoboError::AlreadyActive { .. }));
        assert!(err.is_user_error());
        assert_eq!(h.active_name().as_deref(), Some("one"));
        assert!(h.live("src/keep.go").is_file());
        assert_eq!(h.prompt.times_asked(), 0);
    }

    #[test]
    fn activating_unknown_environment_is_not_found() {
        let h = Harness::new(&[]);
        let engine = h.engine();
        engine.create("one", false, true).unwrap();

        assert!(matches!(
            engine.activate("missing"),
            Err(GoboError::NotFound { .. })
        ));
        assert_eq!(h.active_name().as_deref(), Some("one"));
    }

    #[test]
    fn activate_without_live_manifest_keeps_pristine_backup() {
        let h = Harness::new(&[]);
        fs::write(h.live("src/original.go"), "package original").unwrap();
        let engine = h.engine();
        engine.backup(&h.executable()).unwrap();
        engine.create("one", false, true).unwrap();
        engine.create("two", false, false).unwrap();
        fs::remove_file(h.layout.environment_file()).unwrap();
        fs::write(h.live("src/scratch.go"), "package scratch").unwrap();

        let err = engine.activate("one").unwrap_err();

        assert!(matches!(err, GoboError::NoActiveEnvironment { .. }));
        let initial = h.layout.initial_dir();
        assert!(initial.join("src/original.go").is_file());
        assert!(!initial.join("src/scratch.go").exists());
        assert!(h.live("src/scratch.go").is_file());
        assert!(h.layout.store_dir("one").join(ENVIRONMENT_FILE).is_file());
    }

    #[test]
    fn failed_implicit_save_does_not_block_switching() {
        let h = Harness::new(&[]);
        let engine = h.engine();
        engine.create("a", false, true).unwrap();
        fs::write(h.layout.packages_file(), "[[package]\npath = ").unwrap();

        engine.create("b", false, false).unwrap();
        assert_eq!(h.active_name().as_deref(), Some("b"));
        assert!(h.layout.store_dir("a").join(PACKAGES_FILE).is_file());

        fs::write(h.layout.packages_file(), "not = [valid").unwrap();
        engine.activate("a").unwrap();
        assert_eq!(h.active_name().as_deref(), Some("a"));
        assert!(h.layout.store_dir("b").join(ENVIRONMENT_FILE).is_file());
        assert_eq!(h.prompt.times_asked(), 0);
    }

    #[test]
    fn deleting_the_active_environment_is_refused() {
        let h = Harness::new(&[]);
        let engine = h.engine();
        engine.create("one", false, true).unwrap();

        let err = engine.delete("one").unwrap_err();

        assert!(matches!(err, GoboError::ActiveEnvironment { .. }));
        assert!(h.layout.store_dir("one").is_dir());
    }

    #[test]
    fn delete_removes_dormant_environment() {
        let h = Harness::new(&[]);
        let engine = h.engine();
        engine.create("one", false, true).unwrap();
        engine.create("two", false, false).unwrap();

        engine.delete("one").unwrap();

        assert!(!h.layout.store_dir("one").exists());
        assert_eq!(engine.environments().unwrap(), vec!["two"]);
        assert!(matches!(engine.delete("one"), Err(GoboError::NotFound { .. })));
    }

    #[test]
    fn save_prompts_and_respects_decline() {
        let h = Harness::new(&["n\n", "\n"]);
        let engine = h.engine();
        engine.create("dev", false, true).unwrap();
        h.checkout("example.com/new", "v0.3.0");

        assert_eq!(engine.save(false).unwrap(), SaveOutcome::Declined);
        assert!(engine.recorded_packages().unwrap().is_empty());

        assert_eq!(engine.save(false).unwrap(), SaveOutcome::Written);
        assert_eq!(engine.recorded_packages().unwrap().len(), 1);
        assert_eq!(h.prompt.times_asked(), 2);

        assert_eq!(engine.save(false).unwrap(), SaveOutcome::Unchanged);
        assert_eq!(h.prompt.times_asked(), 2);
    }

    #[test]
    fn silent_save_writes_without_asking() {
        let h = Harness::new(&[]);
        let engine = h.engine();
        engine.create("dev", false, true).unwrap();
        let before = engine.active_environment().unwrap().unwrap();
        h.checkout("example.com/new", "v0.3.0");

        assert_eq!(engine.save(true).unwrap(), SaveOutcome::Written);

        let after = engine.active_environment().unwrap().unwrap();
        assert_eq!(h.prompt.times_asked(), 0);
        assert_eq!(after.name, before.name);
        assert_eq!(after.date_created, before.date_created);
        assert!(after.date_modified >= before.date_modified);
    }

    #[test]
    fn save_without_manifest_is_config_error() {
        let h = Harness::new(&[]);
        assert!(h.engine().save(true).unwrap_err().is_config_error());
    }

    #[test]
    fn backup_runs_once() {
        let h = Harness::new(&[]);
        let engine = h.engine();
        let exe = h.executable();

        assert!(engine.backup(&exe).unwrap());
        assert!(h.layout.initial_dir().join("src").is_dir());
        assert!(h.layout.tool_backup().is_file());
        assert!(!engine.backup(&exe).unwrap());
    }

    #[test]
    fn restore_needs_explicit_yes() {
        let h = Harness::new(&["y\n"]);
        let engine = h.engine();
        engine.backup(&h.executable()).unwrap();
        engine.create("dev", false, true).unwrap();

        assert!(!engine.restore().unwrap());
        assert!(h.layout.store_root.exists());
        assert_eq!(h.active_name().as_deref(), Some("dev"));
    }

    #[test]
    fn restore_reinstates_pristine_workspace() {
        let h = Harness::new(&["yes\n"]);
        fs::write(h.live("src/original.go"), "package original").unwrap();
        let engine = h.engine();
        engine.backup(&h.executable()).unwrap();
        engine.create("dev", false, true).unwrap();
        fs::write(h.live("src/scratch.go"), "package scratch").unwrap();
        engine.create("other", false, false).unwrap();

        assert!(engine.restore().unwrap());

        assert!(h.live("src/original.go").is_file());
        assert!(!h.live("src/scratch.go").exists());
        assert!(!h.layout.environment_file().exists());
        assert!(!h.layout.packages_file().exists());
        assert!(!h.layout.store_root.exists());
        assert!(h.active_name().is_none());
    }

    #[test]
    fn install_continues_past_failures_then_saves() {
        let mut h = Harness::new(&[]);
        h.installer.fail = vec!["example.com/broken".to_string()];
        let engine = h.engine();
        engine.create("dev", false, true).unwrap();

        let list = h.tmp.path().join("gobo.toml");
        TomlManifestStore
            .write_packages(
                &list,
                &Dependencies::new(vec![
                    Package::new("example.com/broken", "v1", ""),
                    Package::new("example.com/good", "v2", ""),
                ]),
            )
            .unwrap();
        h.checkout("example.com/good", "v2");

        let report = engine.install(&list).unwrap();

        assert_eq!(report.installed, vec!["example.com/good"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "example.com/broken");
        assert_eq!(report.saved, Some(SaveOutcome::Written));
        assert_eq!(h.installer.calls.borrow().len(), 2);
        assert_eq!(engine.recorded_packages().unwrap()[0].path, "example.com/good");
    }

    #[test]
    fn install_from_missing_file_is_config_error() {
        let h = Harness::new(&[]);
        let engine = h.engine();
        engine.create("dev", false, true).unwrap();
        let err = engine.install(&h.tmp.path().join("absent.toml")).unwrap_err();
        assert!(err.is_config_error());
    }
}
