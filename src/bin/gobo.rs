use std::process;

use clap::Parser;
use tracing::debug;

use gobo::cli::handlers;
use gobo::cli::ui::{print_banner, print_error, print_warning, set_colored};
use gobo::cli::{Cli, Commands};
use gobo::config::GoboConfig;
use gobo::core::{FsTransfer, Host, Services, SnapshotEngine, StdinPrompt, TomlManifestStore, WorkspaceLayout};
use gobo::error::{ErrorContext, Result};
use gobo::logging::init_logging;
use gobo::system::{GitCli, GoToolchain};

fn main() {
    let cli = Cli::parse();
    let config = load_config();

    init_logging(cli.verbose, &config.ui.log_level);
    set_colored(config.ui.colored && !cli.no_color);

    if let Err(error) = run_app(cli, config) {
        print_error(&error);
        process::exit(1);
    }
}

fn run_app(cli: Cli, config: GoboConfig) -> Result<()> {
    let layout = WorkspaceLayout::resolve(
        config.workspace_root(cli.gopath.as_deref())?,
        config.store_root(cli.store.as_deref())?,
    )?;
    debug!(
        "workspace {} store {}",
        layout.workspace_root.display(),
        layout.store_root.display()
    );

    let installer = GoToolchain::new(&layout.workspace_root);
    let prompt = StdinPrompt;
    let services = Services {
        transfer: &FsTransfer,
        manifests: &TomlManifestStore,
        vcs: &GitCli,
        installer: &installer,
        prompt: &prompt,
    };
    let host = Host::current();
    let engine = SnapshotEngine::new(layout, services, host.clone());

    let executable = std::env::current_exe()
        .with_io_context(|| "locating the gobo executable".to_string())?;
    let first_run = handlers::handle_backup(&engine, &executable)?;

    if should_print_banner(&cli.command, &config) {
        let active = engine.active_environment().ok().flatten().map(|env| env.name);
        print_banner(active.as_deref());
    }

    match cli.command {
        Commands::Create { name, populate } => {
            handlers::handle_create(&engine, &name, populate, first_run)
        }
        Commands::Save => handlers::handle_save(&engine),
        Commands::Activate { name } => handlers::handle_activate(&engine, &name),
        Commands::Delete { name } => handlers::handle_delete(&engine, &name),
        Commands::List => handlers::handle_list(&engine, &prompt),
        Commands::Install { file } => {
            let file = file.unwrap_or_else(|| config.install.default_file.clone());
            handlers::handle_install(&engine, &file)
        }
        Commands::Restore => handlers::handle_restore(&engine),
        Commands::Version => handlers::handle_version(&host),
    }
}

fn load_config() -> GoboConfig {
    match GoboConfig::load_global() {
        Ok(config) => config,
        Err(error) => {
            print_warning(&format!("{}; using default settings", error));
            GoboConfig::default()
        }
    }
}

fn should_print_banner(command: &Commands, config: &GoboConfig) -> bool {
    config.ui.banner && !matches!(command, Commands::Version)
}
