//! Status line formatting.
//!
//! Pure string building: no I/O and no global color state. Escape codes are
//! produced from `colored::Color` directly, so the colored output with the
//! escapes removed is exactly the plain output.

use colored::Color;

use crate::domain::entities::detected_server::DetectedServer;
use crate::domain::entities::repo_status::{RepoHealth, RepoStatus};
use crate::domain::entities::settings::OutputFormat;

pub const REPOS_PREFIX: &str = "📂 Repos ▶ ";
pub const SERVERS_PREFIX: &str = "🖥️ Servers ▶ ";
pub const SEPARATOR: &str = " │ ";

const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub colors: bool,
    pub multiline: bool,
    pub show_changes: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            colors: true,
            multiline: true,
            show_changes: true,
        }
    }
}

impl RenderOptions {
    /// Colors need the config flag on and no `NO_COLOR`/`--no-color` override
    pub fn from_output_format(format: &OutputFormat, no_color: bool) -> Self {
        Self {
            colors: format.colors() && !no_color,
            multiline: format.multiline(),
            show_changes: format.show_changes(),
        }
    }
}

pub struct StatusRenderer {
    options: RenderOptions,
}

impl StatusRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Multiline: a repos line and a servers line, each only when non-empty.
    /// Single line: counts joined by the separator, or nothing at all.
    pub fn render(&self, repos: &[RepoStatus], servers: &[DetectedServer]) -> Vec<String> {
        let mut lines = Vec::new();

        if self.options.multiline {
            if !repos.is_empty() {
                lines.push(self.render_repositories(repos));
            }
            if !servers.is_empty() {
                lines.push(self.render_servers(servers));
            }
        } else {
            let mut parts = Vec::new();
            if !repos.is_empty() {
                parts.push(format!("📂 {} repos", repos.len()));
            }
            if !servers.is_empty() {
                parts.push(format!("🖥️ {} servers", servers.len()));
            }
            if !parts.is_empty() {
                lines.push(parts.join(SEPARATOR));
            }
        }

        lines
    }

    fn render_repositories(&self, repos: &[RepoStatus]) -> String {
        let parts: Vec<String> = repos.iter().map(|r| self.render_repository(r)).collect();
        format!("{}{}", REPOS_PREFIX, parts.join(SEPARATOR))
    }

    fn render_repository(&self, repo: &RepoStatus) -> String {
        let behind = if repo.behind > 0 {
            self.paint(&format!("-{}", repo.behind), Color::Red)
        } else {
            String::new()
        };
        let changes = if repo.has_changes && self.options.show_changes {
            self.paint("*", Color::Yellow)
        } else {
            String::new()
        };

        format!(
            "{}{}:{}{}{}",
            status_glyph(repo.health()),
            self.paint(&repo.name, Color::BrightCyan),
            self.paint(&repo.branch, branch_color(&repo.branch)),
            behind,
            changes
        )
    }

    fn render_servers(&self, servers: &[DetectedServer]) -> String {
        let parts: Vec<String> = servers
            .iter()
            .map(|server| {
                format!(
                    "{}{}:{}",
                    server.emoji,
                    self.paint(&server.name, Color::BrightGreen),
                    self.paint(&server.port.to_string(), Color::BrightYellow)
                )
            })
            .collect();
        format!("{}{}", SERVERS_PREFIX, parts.join(SEPARATOR))
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.options.colors {
            format!("\x1b[{}m{}{}", color.to_fg_str(), text, RESET)
        } else {
            text.to_string()
        }
    }
}

pub fn status_glyph(health: RepoHealth) -> &'static str {
    match health {
        RepoHealth::Dirty => "🟡",
        RepoHealth::FarBehind => "🔴",
        RepoHealth::Behind => "⚠️",
        RepoHealth::Clean => "✅",
    }
}

/// Fixed palette by branch family
pub fn branch_color(branch: &str) -> Color {
    if branch == "main" || branch == "master" {
        Color::BrightGreen
    } else if branch.starts_with("feat") {
        Color::BrightBlue
    } else if ["fix", "hotfix", "bugfix"].iter().any(|p| branch.starts_with(p)) {
        Color::BrightRed
    } else if branch.starts_with("dev") {
        Color::BrightYellow
    } else if branch.starts_with("release") {
        Color::BrightMagenta
    } else {
        Color::Cyan
    }
}
