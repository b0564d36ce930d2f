use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "gobo",
    version,
    about = "Named GOPATH environments: stash, switch and pin your Go workspace"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Live workspace root (defaults to $GOPATH, then ~/go)
    #[arg(long, global = true, value_name = "DIR")]
    pub gopath: Option<PathBuf>,

    /// Snapshot store root (defaults to $GOBO_HOME, then ~/.gobo)
    #[arg(long, global = true, value_name = "DIR")]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new environment and make it active
    Create {
        name: String,
        #[arg(short, long, help = "Keep the current packages and record them in the new environment")]
        populate: bool,
    },

    /// Record package revision changes in the active environment
    Save,

    /// Stash the active environment and switch to NAME
    Activate { name: String },

    /// Delete a stored environment
    Delete { name: String },

    /// List stored environments and pick one to activate
    List,

    /// Install the packages listed in a package file at their recorded revisions
    Install {
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Put the workspace back the way it was before gobo first ran
    Restore,

    /// Show version and host information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_with_populate() {
        let cli = Cli::try_parse_from(["gobo", "create", "dev", "-p"]).unwrap();
        match cli.command {
            Commands::Create { name, populate } => {
                assert_eq!(name, "dev");
                assert!(populate);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["gobo", "list", "--gopath", "/w", "--store", "/s", "-v"]).unwrap();
        assert!(matches!(cli.command, Commands::List));
        assert_eq!(cli.gopath, Some(PathBuf::from("/w")));
        assert_eq!(cli.store, Some(PathBuf::from("/s")));
        assert!(cli.verbose);
    }

    #[test]
    fn install_file_is_optional() {
        let cli = Cli::try_parse_from(["gobo", "install"]).unwrap();
        assert!(matches!(cli.command, Commands::Install { file: None }));
        let cli = Cli::try_parse_from(["gobo", "install", "-f", "deps.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::Install { file: Some(_) }));
    }

    #[test]
    fn activate_requires_a_name() {
        assert!(Cli::try_parse_from(["gobo", "activate"]).is_err());
    }
}
