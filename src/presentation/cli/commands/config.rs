use anyhow::{Context, Result};
use colored::Colorize;

use crate::application::services::config_resolver::LayerSource;
use crate::common::environment::{CONFIG_DIR_VAR, XDG_CONFIG_HOME_VAR};
use crate::presentation::cli::CommandContext;

/// Read-mostly configuration management actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Merged configuration of the current project as YAML
    Show,
    /// Where each layer lives and whether it exists
    Info,
    ListProjects,
    /// Delete the current project's layer
    Reset,
    /// Defaults merged with the global file, as JSON
    ShowGlobal,
}

impl ConfigCommand {
    pub async fn execute(self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Show => show(ctx).await,
            Self::Info => info(ctx).await,
            Self::ListProjects => list_projects(ctx),
            Self::Reset => reset(ctx).await,
            Self::ShowGlobal => show_global(ctx),
        }
    }
}

async fn show(ctx: &CommandContext) -> Result<()> {
    let (project, config) = ctx.resolver.resolve(ctx.directory.as_deref()).await;
    let yaml = config.to_yaml().context("cannot render configuration")?;

    println!("📋 Current Configuration ({})", project.identity);
    println!("{}", "=".repeat(50));
    print!("{}", yaml);
    Ok(())
}

async fn info(ctx: &CommandContext) -> Result<()> {
    let project = ctx
        .resolver
        .locate_project(ctx.directory.as_deref())
        .await;
    let sources = ctx.resolver.config_sources(&project);

    println!("📁 Configuration Information");
    println!("{}", "=".repeat(40));
    println!("Project ID: {}", sources.identity);
    println!("Project Directory: {}", sources.project_directory.display());
    println!("Config Directory: {}", sources.config_dir.display());
    println!();
    println!("Configuration Files:");
    println!("  🌐 Global:  {}", describe(&sources.global));
    println!("  📁 Project: {}", describe(&sources.project));
    println!("  📄 Local:   {}", describe(&sources.local));
    println!();
    println!("Environment Variables:");
    println!(
        "  {}: {}",
        CONFIG_DIR_VAR,
        ctx.env.config_dir.as_deref().unwrap_or("not set")
    );
    println!(
        "  {}: {}",
        XDG_CONFIG_HOME_VAR,
        ctx.env.xdg_config_home.as_deref().unwrap_or("not set")
    );
    Ok(())
}

fn describe(source: &LayerSource) -> String {
    format!(
        "{} {}",
        source.path.display(),
        if source.exists { "✅" } else { "❌" }
    )
}

fn list_projects(ctx: &CommandContext) -> Result<()> {
    let projects = ctx.resolver.list_projects();

    if projects.is_empty() {
        println!("📁 No projects configured yet.");
        println!("💡 Run 'cc-status-line --init' in a project directory to get started.");
        return Ok(());
    }

    println!("📁 Configured Projects:");
    for project in &projects {
        println!(
            "  • {} ({}) - {}",
            project.name().bold(),
            project.kind(),
            project.root_path()
        );
    }
    Ok(())
}

async fn reset(ctx: &CommandContext) -> Result<()> {
    let project = ctx
        .resolver
        .locate_project(ctx.directory.as_deref())
        .await;

    let existed = ctx
        .resolver
        .delete_project(&project.identity)
        .context("failed to delete project configuration")?;
    if existed {
        println!("✅ Configuration reset for current project.");
    } else {
        println!("❌ No configuration found to reset.");
    }
    Ok(())
}

fn show_global(ctx: &CommandContext) -> Result<()> {
    let json = ctx
        .resolver
        .global_config()
        .to_json_pretty()
        .context("cannot render global configuration")?;

    println!("🌐 Global Configuration:");
    println!("{}", json);
    Ok(())
}
