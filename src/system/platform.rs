use crate::core::model::{Host, HostUser};

impl Host {
    /// Snapshot of the machine and user running this process.
    pub fn current() -> Self {
        Self {
            operating_system: std::env::consts::OS.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            hostname: whoami::fallible::hostname().unwrap_or_else(|_| "unknown".to_string()),
            user: HostUser::current(),
        }
    }
}

impl HostUser {
    pub fn current() -> Self {
        let mut user = Self {
            username: whoami::username(),
            name: whoami::realname(),
            ..Default::default()
        };
        fill_account_details(&mut user);
        user
    }
}

#[cfg(unix)]
fn fill_account_details(user: &mut HostUser) {
    let uid = nix::unistd::getuid();
    user.uid = uid.to_string();
    user.gid = nix::unistd::getgid().to_string();

    if let Ok(Some(account)) = nix::unistd::User::from_uid(uid) {
        user.home_dir = account.dir.display().to_string();
        if user.username.is_empty() {
            user.username = account.name;
        }
    }
}

#[cfg(not(unix))]
fn fill_account_details(user: &mut HostUser) {
    if let Some(home) = std::env::var_os("USERPROFILE") {
        user.home_dir = std::path::PathBuf::from(home).display().to_string();
    }
}
