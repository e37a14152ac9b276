use std::sync::Arc;

use crate::application::use_cases::StatusLineEngine;
use crate::common::logging::LogSettings;
use crate::common::result::StatusLineResultExt;
use crate::presentation::cli::CommandContext;

/// Print the status line for the current project
pub struct StatusCommand;

impl Default for StatusCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusCommand {
    pub fn new() -> Self {
        Self
    }

    /// Lines to print. Never fails: every problem ends up as a diagnostic line.
    pub async fn execute(&self, ctx: &CommandContext) -> Vec<String> {
        let (project, config) = ctx.resolver.resolve(ctx.directory.as_deref()).await;

        // The logging section is only known now, so sinks are rebuilt for the rest of the run
        let log = config
            .settings()
            .to_option_logged()
            .map(|settings| LogSettings::resolve(&ctx.env, &settings.logging))
            .and_then(|settings| settings.build().to_option_logged());
        let _log_guard = log.as_ref().map(|handle| handle.enter());

        tracing::info!(project = %project.identity, "generating status line");

        StatusLineEngine::new(Arc::clone(&ctx.runner), project.directory)
            .with_no_color(ctx.no_color)
            .execute(&config)
            .await
    }
}
