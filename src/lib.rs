//! gobo keeps several named GOPATH environments on one machine.
//!
//! One environment is live in the workspace at a time; the others are stashed
//! in a snapshot store. Each environment records the revision of every
//! package checked out under `src` so it can be reproduced later.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod system;

pub use config::GoboConfig;
pub use core::{SnapshotEngine, WorkspaceLayout};
pub use error::{GoboError, Result};
