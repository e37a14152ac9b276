/// Cross-cutting utilities shared by every layer
pub mod environment;
pub mod error;
pub mod logging;
pub mod result;
pub mod templates;

pub use environment::Environment;
pub use error::StatusLineError;
pub use result::StatusLineResult;
