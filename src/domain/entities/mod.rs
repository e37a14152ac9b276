pub mod detected_server;
pub mod host_context;
pub mod repo_status;
pub mod settings;

pub use detected_server::DetectedServer;
pub use host_context::HostContext;
pub use repo_status::{RepoHealth, RepoStatus};
pub use settings::{
    LoggingConfig, OutputFormat, ProjectKind, RepoRole, RepositoryConfig, ServerConfig,
    ServerTemplate, StatusLineSettings,
};
