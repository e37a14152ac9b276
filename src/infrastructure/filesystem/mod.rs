pub mod config_store;

pub use config_store::{local_config_file, ConfigDirs, ConfigStore};
