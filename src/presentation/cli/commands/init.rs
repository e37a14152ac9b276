use anyhow::{Context, Result};
use colored::Colorize;

use crate::application::services::project_detector::{DetectionReport, ProjectDetector};
use crate::common::result::ResultExt;
use crate::presentation::cli::CommandContext;

/// Detect the project layout and write its per-project configuration
pub struct InitCommand;

impl Default for InitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl InitCommand {
    pub fn new() -> Self {
        Self
    }

    /// Execute the init command
    pub async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let project = ctx
            .resolver
            .locate_project(ctx.directory.as_deref())
            .await;
        let templates = ctx
            .resolver
            .resolve_for(&project)
            .settings()
            .context("current configuration is invalid")?
            .server_templates;

        let report = ProjectDetector::new(&project.directory).detect(&templates);
        print_report(&report);

        // Detected keys replace what was saved before, anything else is kept
        let mut layer = ctx
            .resolver
            .project_layer(&project.identity)
            .unwrap_or_default();
        layer.set("name", report.name.as_str());
        layer.set("type", report.kind.as_str());
        layer.set("root_path", project.directory.to_string_lossy().into_owned());
        layer.set(
            "repositories",
            serde_yaml::to_value(&report.repositories)
                .with_config_error("cannot serialize detected repositories")?,
        );
        layer.set(
            "servers",
            serde_yaml::to_value(&report.servers)
                .with_config_error("cannot serialize detected servers")?,
        );

        let path = ctx
            .resolver
            .save_project(&project.identity, layer)
            .context("failed to save project configuration")?;
        tracing::info!(path = %path.display(), "project configuration written");

        println!();
        println!(
            "{} {}",
            "✅ Configuration saved for project:".green().bold(),
            report.name
        );
        println!("📁 Project ID: {}", project.identity);
        println!();
        println!("🚀 Run 'cc-status-line' to see your status line!");

        Ok(())
    }
}

fn print_report(report: &DetectionReport) {
    println!(
        "🔍 Detected {} project: {}",
        report.kind.to_string().cyan(),
        report.name.bold()
    );

    if report.repositories.is_empty() {
        println!("📂 No repositories found");
    } else {
        println!("📂 Repositories:");
        for repo in &report.repositories {
            println!("   • {} ({})", repo.name, repo.path.display());
        }
    }

    if report.servers.is_empty() {
        println!("🖥️ No development servers detected");
    } else {
        println!("🖥️ Servers:");
        for server in &report.servers {
            let ports: Vec<String> = server.ports.iter().map(u16::to_string).collect();
            println!("   {} {} ({})", server.emoji, server.name, ports.join(", "));
        }
    }
}
