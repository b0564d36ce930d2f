use std::path::Path;

use crate::cli::ui::{create_progress_bar, print_info, print_success, print_version};
use crate::core::model::Host;
use crate::core::snapshot::SnapshotEngine;
use crate::error::Result;

/// Take the one-time workspace backup. Returns `true` on the first run.
pub fn handle_backup(engine: &SnapshotEngine, executable: &Path) -> Result<bool> {
    if engine.layout().initial_dir().exists() {
        return Ok(false);
    }

    let pb = create_progress_bar("Backing up your workspace before first use");
    let result = engine.backup(executable);
    pb.finish_and_clear();

    let first_run = result?;
    if first_run {
        print_info(&format!(
            "Backed up {} to {}",
            engine.layout().workspace_root.display(),
            engine.layout().initial_dir().display()
        ));
    }
    Ok(first_run)
}

/// Handle `gobo restore`
pub fn handle_restore(engine: &SnapshotEngine) -> Result<()> {
    if engine.restore()? {
        print_success("Workspace restored; all environments removed");
    } else {
        print_info("Restore cancelled");
    }
    Ok(())
}

pub fn handle_version(host: &Host) -> Result<()> {
    print_version(host);
    Ok(())
}
