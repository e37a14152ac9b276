pub mod generate_status;

pub use generate_status::{StatusLineEngine, NO_CONFIGURATION_LINE, SETUP_NEEDED_LINE};
