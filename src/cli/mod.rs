pub mod commands;
pub mod handlers;
pub mod ui;

pub use commands::{Cli, Commands};
pub use ui::{print_banner, print_error, print_success, print_warning};
