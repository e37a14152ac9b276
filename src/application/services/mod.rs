pub mod config_resolver;
pub mod git_status;
pub mod project_detector;
pub mod server_detector;
pub mod status_renderer;

pub use config_resolver::{ConfigResolver, ConfigSources, ProjectContext, ProjectEntry};
pub use git_status::GitStatusCollector;
pub use project_detector::{DetectionReport, ProjectDetector};
pub use server_detector::ServerDetector;
pub use status_renderer::{RenderOptions, StatusRenderer};
