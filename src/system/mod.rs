pub mod platform;
pub mod toolchain;
pub mod vcs;

pub use toolchain::{GoToolchain, PackageInstaller};
pub use vcs::{GitCli, Vcs};
