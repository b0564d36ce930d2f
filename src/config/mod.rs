pub mod settings;

pub use settings::{GoboConfig, InstallConfig, PathsConfig, UiConfig};
