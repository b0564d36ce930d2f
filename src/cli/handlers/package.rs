use std::path::Path;

use crate::cli::ui::{create_progress_bar, print_install_report};
use crate::core::snapshot::SnapshotEngine;
use crate::error::{GoboError, Result};

/// Handle `gobo install`
pub fn handle_install(engine: &SnapshotEngine, file: &Path) -> Result<()> {
    if engine.active_environment()?.is_none() {
        return Err(GoboError::NoActiveEnvironment {
            operation: "install".to_string(),
        });
    }

    let pb = create_progress_bar(&format!("Installing packages from {}", file.display()));
    let result = engine.install(file);
    pb.finish_and_clear();

    print_install_report(&result?);
    Ok(())
}
