pub mod commands;

use std::io::Read;
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use colored::Colorize;

use crate::application::services::config_resolver::ConfigResolver;
use crate::common::environment::Environment;
use crate::common::logging::{LogHandle, LogSettings};
use crate::domain::entities::host_context::HostContext;
use crate::infrastructure::filesystem::ConfigDirs;
use crate::infrastructure::process::{CommandRunner, SystemCommandRunner};

use commands::{ConfigCommand, InitCommand, StatusCommand};

/// Largest host context payload read from stdin
const MAX_HOST_CONTEXT_BYTES: u64 = 64 * 1024;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_DATE"),
    ", ",
    env!("BUILD_TARGET"),
    ")"
);

/// cc-status-line - git repository state and local dev servers on one status line
#[derive(Parser, Debug)]
#[command(name = "cc-status-line")]
#[command(about = "Status line with git repository state and development server detection")]
#[command(version, long_version = LONG_VERSION)]
#[command(group(
    ArgGroup::new("action")
        .args(["init", "config", "config_info", "list_projects", "reset", "global_config"])
))]
pub struct Cli {
    /// Detect the project layout and write its configuration
    #[arg(long, visible_alias = "setup")]
    pub init: bool,

    /// Show the merged configuration for the current project
    #[arg(long)]
    pub config: bool,

    /// Show configuration file locations and sources
    #[arg(long)]
    pub config_info: bool,

    /// List all configured projects
    #[arg(long)]
    pub list_projects: bool,

    /// Delete the configuration of the current project
    #[arg(long)]
    pub reset: bool,

    /// Show defaults merged with the global configuration
    #[arg(long)]
    pub global_config: bool,

    /// Custom configuration directory
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Project directory (defaults to the enclosing git work tree)
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    fn is_status_run(&self) -> bool {
        !(self.init
            || self.config
            || self.config_info
            || self.list_projects
            || self.reset
            || self.global_config)
    }
}

/// Everything a command needs, built once per invocation
pub struct CommandContext {
    pub env: Environment,
    pub runner: Arc<dyn CommandRunner>,
    pub resolver: ConfigResolver,
    /// `-C`, or the directory reported by the host
    pub directory: Option<PathBuf>,
    pub no_color: bool,
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let env = Environment::from_process();

        let log = LogSettings::from_environment(&env)
            .build()
            .unwrap_or_else(|e| {
                eprintln!("{} {}", "Warning:".yellow().bold(), e);
                LogHandle::disabled()
            });
        let _log_guard = log.enter();

        let no_color = self.cli.no_color || env.no_color;
        if no_color {
            colored::control::set_override(false);
        }

        let status_run = self.cli.is_status_run();
        let ctx = match self.build_context(env, no_color, status_run) {
            Ok(ctx) => ctx,
            Err(e) if status_run => {
                tracing::error!("cannot start: {:#}", e);
                println!("{}", crate::application::use_cases::SETUP_NEEDED_LINE);
                return Ok(());
            }
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                exit(1);
            }
        };

        if status_run {
            for line in StatusCommand::new().execute(&ctx).await {
                println!("{}", line);
            }
            return Ok(());
        }

        match self.handle_command(&ctx).await {
            Ok(()) => Ok(()),
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    fn build_context(
        &self,
        env: Environment,
        no_color: bool,
        status_run: bool,
    ) -> anyhow::Result<CommandContext> {
        let cwd = std::env::current_dir().context("cannot determine current directory")?;

        let hinted = if status_run {
            read_host_context().and_then(|context| context.working_directory())
        } else {
            None
        };
        let directory = self.cli.directory.clone().or(hinted);

        let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner::new());
        let dirs = ConfigDirs::locate(self.cli.config_dir.as_deref(), &env);
        tracing::debug!(config_dir = %dirs.root().display(), "using config directory");
        let resolver = ConfigResolver::new(dirs, Arc::clone(&runner), cwd);

        Ok(CommandContext {
            env,
            runner,
            resolver,
            directory,
            no_color,
        })
    }

    async fn handle_command(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        if self.cli.init {
            InitCommand::new().execute(ctx).await
        } else if self.cli.config {
            ConfigCommand::Show.execute(ctx).await
        } else if self.cli.config_info {
            ConfigCommand::Info.execute(ctx).await
        } else if self.cli.list_projects {
            ConfigCommand::ListProjects.execute(ctx).await
        } else if self.cli.reset {
            ConfigCommand::Reset.execute(ctx).await
        } else {
            ConfigCommand::ShowGlobal.execute(ctx).await
        }
    }
}

/// Parse the JSON the host pipes in. Nothing is read from an interactive terminal.
fn read_host_context() -> Option<HostContext> {
    if atty::is(atty::Stream::Stdin) {
        return None;
    }

    let mut raw = String::new();
    if let Err(e) = std::io::stdin()
        .take(MAX_HOST_CONTEXT_BYTES)
        .read_to_string(&mut raw)
    {
        tracing::debug!("cannot read stdin: {}", e);
        return None;
    }
    HostContext::parse(&raw)
}
