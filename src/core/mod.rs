pub mod layout;
pub mod manifest;
pub mod model;
pub mod prompt;
pub mod reconcile;
pub mod snapshot;
pub mod transfer;

pub use layout::{WorkspaceLayout, ENVIRONMENT_FILE, INITIAL_ENVIRONMENT, PACKAGES_FILE, WORKSPACE_DIRS};
pub use manifest::{ManifestStore, TomlManifestStore};
pub use model::{Dependencies, Environment, Host, HostUser, Package};
pub use prompt::{Prompt, StdinPrompt};
pub use reconcile::{Reconciler, Reconciliation};
pub use snapshot::{InstallReport, SaveOutcome, Services, SnapshotEngine};
pub use transfer::{FsTransfer, Transfer};
