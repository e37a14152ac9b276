pub mod config_tree;
pub mod probe;
pub mod project_identity;

pub use config_tree::{ConfigLayer, EffectiveConfig};
pub use probe::{Liveness, Probe};
pub use project_identity::ProjectIdentity;
