pub mod config;
pub mod init;
pub mod status;

pub use config::*;
pub use init::*;
pub use status::*;
