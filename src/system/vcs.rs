use std::path::Path;
use std::process::{Command, Output};

use tracing::debug;

use crate::error::{ErrorContext, GoboError, Result};

/// The two revision queries package reconciliation needs.
pub trait Vcs {
    /// Tag name when the checkout at `repo` sits exactly on a tag.
    fn exact_tag(&self, repo: &Path) -> Result<Option<String>>;

    /// Full commit identifier of the checkout head at `repo`.
    fn head_commit(&self, repo: &Path) -> Result<String>;
}

/// [`Vcs`] backed by the `git` executable.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCli;

pub(crate) fn base_git_command() -> Command {
    let mut command = Command::new("git");
    command.arg("-c").arg("core.quotepath=false");
    if cfg!(windows) {
        command.arg("-c").arg("core.longpaths=true");
    }
    command
}

fn run_git(repo: &Path, args: &[&str]) -> Result<Output> {
    base_git_command()
        .args(args)
        .current_dir(repo)
        .output()
        .with_io_context(|| format!("launching git {} in {}", args.join(" "), repo.display()))
}

fn stdout_line(output: &Output, command: &str) -> Result<String> {
    let text = String::from_utf8(output.stdout.clone()).map_err(|e| GoboError::Generic {
        message: format!("{} produced non-UTF-8 output", command),
        source: Some(Box::new(e)),
    })?;
    Ok(text.trim().to_string())
}

impl Vcs for GitCli {
    fn exact_tag(&self, repo: &Path) -> Result<Option<String>> {
        let output = run_git(repo, &["describe", "--exact-match"])?;
        if !output.status.success() {
            debug!(
                "{} is not checked out at a tag: {}",
                repo.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }

        let tag = stdout_line(&output, "git describe")?;
        Ok(if tag.is_empty() { None } else { Some(tag) })
    }

    fn head_commit(&self, repo: &Path) -> Result<String> {
        let output = run_git(repo, &["rev-parse", "HEAD"])?;
        if !output.status.success() {
            return Err(GoboError::Command {
                command: format!("git rev-parse HEAD (in {})", repo.display()),
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let hash = stdout_line(&output, "git rev-parse")?;
        if hash.is_empty() || !hash.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(GoboError::Validation {
                field: "commit hash".to_string(),
                value: hash,
                reason: format!("unexpected git rev-parse output in {}", repo.display()),
            });
        }
        Ok(hash)
    }
}
