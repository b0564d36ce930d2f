use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::core::model::Package;
use crate::error::{ErrorContext, GoboError, Result};
use crate::system::vcs::base_git_command;

/// Fetches a package and pins it to a recorded revision.
pub trait PackageInstaller {
    fn install(&self, package: &Package) -> Result<()>;
}

/// `go get`, `git checkout <revision>`, `go install` against a GOPATH workspace.
#[derive(Debug, Clone)]
pub struct GoToolchain {
    workspace_root: PathBuf,
}

impl GoToolchain {
    pub fn new<P: AsRef<Path>>(workspace_root: P) -> Self {
        Self {
            workspace_root: workspace_root.as_ref().to_path_buf(),
        }
    }

    fn go(&self, args: &[&str]) -> Command {
        let mut command = Command::new("go");
        command
            .args(args)
            .env("GOPATH", &self.workspace_root)
            .env("GO111MODULE", "off");
        command
    }

    fn package_dir(&self, package: &Package) -> PathBuf {
        package
            .path
            .split('/')
            .fold(self.workspace_root.join("src"), |dir, part| dir.join(part))
    }
}

fn run(mut command: Command, display: String) -> Result<()> {
    let output = command
        .output()
        .with_io_context(|| format!("launching {}", display))?;
    if !output.status.success() {
        return Err(GoboError::Command {
            command: display,
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

impl PackageInstaller for GoToolchain {
    fn install(&self, package: &Package) -> Result<()> {
        info!("go get {}", package.path);
        run(self.go(&["get", "-d", &package.path]), format!("go get {}", package.path))?;

        if !package.revision.is_empty() {
            let dir = self.package_dir(package);
            info!("git checkout {} in {}", package.revision, dir.display());
            let mut checkout = base_git_command();
            checkout.args(["checkout", &package.revision]).current_dir(&dir);
            run(checkout, format!("git checkout {}", package.revision))?;
        }

        info!("go install {}", package.path);
        run(self.go(&["install", &package.path]), format!("go install {}", package.path))
    }
}
