pub mod environment;
pub mod package;
pub mod system;

pub use environment::*;
pub use package::*;
pub use system::*;
