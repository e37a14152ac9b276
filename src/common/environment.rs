use std::env;
use std::path::PathBuf;

pub const CONFIG_DIR_VAR: &str = "CCSL_CONFIG_DIR";
pub const XDG_CONFIG_HOME_VAR: &str = "XDG_CONFIG_HOME";
pub const XDG_STATE_HOME_VAR: &str = "XDG_STATE_HOME";
pub const NO_COLOR_VAR: &str = "NO_COLOR";
pub const DEBUG_VAR: &str = "CCSL_DEBUG";
pub const LOG_FILE_VAR: &str = "CCSL_LOG_FILE";
pub const LOG_LEVEL_VAR: &str = "CCSL_LOG_LEVEL";

/// Snapshot of every environment input the tool consults.
///
/// Taken once at startup and passed down, so the resolver, logger and
/// renderer never read process state on their own. Empty variables are
/// stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub config_dir: Option<String>,
    pub xdg_config_home: Option<String>,
    pub xdg_state_home: Option<String>,
    pub home_dir: Option<PathBuf>,
    pub no_color: bool,
    pub debug: bool,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

impl Environment {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            config_dir: non_empty_var(CONFIG_DIR_VAR),
            xdg_config_home: non_empty_var(XDG_CONFIG_HOME_VAR),
            xdg_state_home: non_empty_var(XDG_STATE_HOME_VAR),
            home_dir: dirs::home_dir(),
            no_color: non_empty_var(NO_COLOR_VAR).is_some(),
            debug: env::var(DEBUG_VAR).map(|v| v == "1").unwrap_or(false),
            log_file: non_empty_var(LOG_FILE_VAR),
            log_level: non_empty_var(LOG_LEVEL_VAR),
        }
    }

    /// Expand a leading `~` against the captured home directory
    pub fn expand_home(&self, raw: &str) -> PathBuf {
        match (raw.strip_prefix('~'), &self.home_dir) {
            (Some(rest), Some(home)) if rest.is_empty() => home.clone(),
            (Some(rest), Some(home)) if rest.starts_with('/') || rest.starts_with('\\') => {
                home.join(&rest[1..])
            }
            _ => PathBuf::from(raw),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
