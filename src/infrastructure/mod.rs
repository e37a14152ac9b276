/// Infrastructure layer modules
///
/// Concrete access to the outside world:
/// - Process execution with timeouts (every external tool goes through `CommandRunner`)
/// - Git queries via the `git` CLI
/// - Port liveness probing via `lsof` / `netstat`
/// - Configuration files on disk
pub mod filesystem;
pub mod git;
pub mod network;
pub mod process;

// Re-export commonly used types
pub use filesystem::{ConfigDirs, ConfigStore};
pub use git::GitCli;
pub use network::PortProbeChain;
pub use process::{CommandRunner, SystemCommandRunner};
