use tracing::debug;

use crate::cli::ui::{print_empty_store, print_environments, print_info, print_success};
use crate::core::prompt::{answer_line, Prompt};
use crate::core::snapshot::{SaveOutcome, SnapshotEngine};
use crate::error::{GoboError, Result};

pub const LIST_QUESTION: &str = "Enter a number to activate (blank to cancel): ";

/// Handle environment creation
pub fn handle_create(engine: &SnapshotEngine, name: &str, populate: bool, first_run: bool) -> Result<()> {
    engine.create(name, populate, first_run)?;
    if populate {
        let count = engine.recorded_packages()?.len();
        print_success(&format!("Created environment '{}' with {} packages", name, count));
    } else {
        print_success(&format!("Created environment '{}'", name));
    }
    Ok(())
}

/// Handle environment switching
pub fn handle_activate(engine: &SnapshotEngine, name: &str) -> Result<()> {
    engine.activate(name)?;
    print_success(&format!("Activated environment '{}'", name));
    Ok(())
}

/// Handle environment deletion
pub fn handle_delete(engine: &SnapshotEngine, name: &str) -> Result<()> {
    engine.delete(name)?;
    print_success(&format!("Deleted environment '{}'", name));
    Ok(())
}

/// Handle `gobo save`. Always silent from the command line.
pub fn handle_save(engine: &SnapshotEngine) -> Result<()> {
    if engine.active_environment()?.is_none() {
        return Err(GoboError::NoActiveEnvironment {
            operation: "save".to_string(),
        });
    }
    match engine.save(true)? {
        SaveOutcome::Unchanged => print_info("Nothing to save"),
        SaveOutcome::Declined => print_info("Save skipped"),
        SaveOutcome::Written => print_success("Saved package revisions"),
    }
    Ok(())
}

/// Handle environment listing and interactive selection
pub fn handle_list(engine: &SnapshotEngine, prompt: &dyn Prompt) -> Result<()> {
    let names = engine.environments()?;
    let active = engine.active_environment()?.map(|env| env.name);

    if names.is_empty() {
        print_empty_store();
        return Ok(());
    }
    print_environments(&names, active.as_deref());

    let raw = prompt.ask(LIST_QUESTION)?;
    let Some(choice) = parse_selection(&raw, names.len())? else {
        debug!("list selection cancelled");
        return Ok(());
    };

    let selected = &names[choice];
    if active.as_deref() == Some(selected.as_str()) {
        print_info(&format!("'{}' is already active", selected));
        return Ok(());
    }
    handle_activate(engine, selected)
}

/// Zero-based index for a 1-based answer. Blank or end of input cancels.
fn parse_selection(raw: &str, count: usize) -> Result<Option<usize>> {
    let answer = answer_line(raw).unwrap_or("").trim();
    if answer.is_empty() {
        return Ok(None);
    }

    match answer.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Ok(Some(n - 1)),
        _ => Err(GoboError::Validation {
            field: "selection".to_string(),
            value: answer.to_string(),
            reason: format!("expected a number between 1 and {}", count),
        }),
    }
}
