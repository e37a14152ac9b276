//! # cc-status-line - repository and dev server status line
//!
//! `cc-status-line` prints a compact status line for an editor or agent
//! host: the branch and health of every configured git repository, followed
//! by the development servers currently listening on their ports.
//!
//! ## Quick Start
//!
//! ```bash
//! # detect the project layout and write its configuration
//! cc-status-line --init
//!
//! # print the status line (what the host runs on every refresh)
//! cc-status-line
//! ```
//!
//! Typical output:
//!
//! ```text
//! 📂 Repos ▶ ✅SHOP:main │ 🟡API:feature/login-2*
//! 🖥️ Servers ▶ 🌶️Flask:5000
//! ```
//!
//! ## Configuration
//!
//! The effective configuration is a deep merge of four YAML layers, lowest
//! precedence first:
//!
//! 1. built-in defaults
//! 2. `config.yaml` in the config directory
//! 3. `projects/<identity>.yaml`, where the identity comes from the `origin`
//!    remote or, without one, from a hash of the project path
//! 4. `.cc-status-line.yaml` in the project directory
//!
//! ## Architecture
//!
//! - [`domain`]: configuration model, identities and status snapshots
//! - [`application`]: config resolution, collectors, renderer and the status engine
//! - [`infrastructure`]: git and port probing through external commands, config files
//! - [`presentation`]: CLI interface
//! - [`common`]: errors, logging and the environment snapshot
//!
//! ## Error Handling
//!
//! - [`common::error::StatusLineError`]: main error type
//! - [`common::result::StatusLineResult`]: alias for `Result<T, StatusLineError>`
//!
//! Printing the status line never fails. Anything that goes wrong while
//! collecting state becomes a single diagnostic line, see
//! [`application::use_cases::StatusLineEngine`].
//!
//! ## Using the Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cc_status_line::application::services::ConfigResolver;
//! use cc_status_line::application::use_cases::StatusLineEngine;
//! use cc_status_line::common::Environment;
//! use cc_status_line::infrastructure::filesystem::ConfigDirs;
//! use cc_status_line::infrastructure::process::{CommandRunner, SystemCommandRunner};
//!
//! # async fn example() -> std::io::Result<()> {
//! let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner::new());
//! let dirs = ConfigDirs::locate(None, &Environment::from_process());
//! let resolver = ConfigResolver::new(dirs, Arc::clone(&runner), std::env::current_dir()?);
//!
//! let (project, config) = resolver.resolve(None).await;
//! for line in StatusLineEngine::new(runner, project.directory).execute(&config).await {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::StatusLineError;
pub use crate::common::result::StatusLineResult as Result;
