use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;

use futures::FutureExt;

use crate::application::services::git_status::GitStatusCollector;
use crate::application::services::server_detector::ServerDetector;
use crate::application::services::status_renderer::{RenderOptions, StatusRenderer};
use crate::common::result::StatusLineResult;
use crate::domain::value_objects::config_tree::EffectiveConfig;
use crate::infrastructure::network::PortProbeChain;
use crate::infrastructure::process::CommandRunner;

/// Shown when nothing is configured to report on
pub const NO_CONFIGURATION_LINE: &str = "❌ No configuration - Run 'cc-status-line --init'";

/// Shown when the pipeline fails for any reason
pub const SETUP_NEEDED_LINE: &str = "❌ Setup needed: cc-status-line --init";

/// Collects repository and server state and renders it.
///
/// This is the failure boundary of a status run: an error or a panic
/// anywhere below turns into [`SETUP_NEEDED_LINE`] instead of reaching
/// the caller.
pub struct StatusLineEngine {
    runner: Arc<dyn CommandRunner>,
    project_dir: PathBuf,
    no_color: bool,
    probes: PortProbeChain,
}

impl StatusLineEngine {
    pub fn new(runner: Arc<dyn CommandRunner>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            project_dir: project_dir.into(),
            no_color: false,
            probes: PortProbeChain::platform_default(),
        }
    }

    /// Force colors off regardless of configuration
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    pub fn with_probe_chain(mut self, probes: PortProbeChain) -> Self {
        self.probes = probes;
        self
    }

    /// Lines to print for this configuration, never empty-handed when nothing is configured
    pub async fn execute(&self, config: &EffectiveConfig) -> Vec<String> {
        if !config.has_status_sources() {
            return vec![NO_CONFIGURATION_LINE.to_string()];
        }
        self.generate(config).await
    }

    /// Run the pipeline, converting any failure into the setup diagnostic
    pub async fn generate(&self, config: &EffectiveConfig) -> Vec<String> {
        match AssertUnwindSafe(self.try_generate(config))
            .catch_unwind()
            .await
        {
            Ok(Ok(lines)) => lines,
            Ok(Err(e)) => {
                tracing::error!("status line generation failed: {}", e);
                vec![SETUP_NEEDED_LINE.to_string()]
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!("status line generation panicked: {}", message);
                vec![SETUP_NEEDED_LINE.to_string()]
            }
        }
    }

    async fn try_generate(&self, config: &EffectiveConfig) -> StatusLineResult<Vec<String>> {
        let settings = config.settings()?;
        let project_root = settings
            .root_path
            .clone()
            .unwrap_or_else(|| self.project_dir.clone());

        let collector = GitStatusCollector::new(Arc::clone(&self.runner));
        let mut repos = Vec::with_capacity(settings.repositories.len());
        for repo in &settings.repositories {
            if let Some(status) = collector.status_for(repo, &project_root).await {
                repos.push(status);
            }
        }

        let detector = ServerDetector::new(Arc::clone(&self.runner), self.probes.clone());
        let servers = detector.detect(&settings.servers).await;

        tracing::debug!(
            repos = repos.len(),
            servers = servers.len(),
            "collected status"
        );

        let renderer = StatusRenderer::new(RenderOptions::from_output_format(
            &settings.output_format,
            self.no_color,
        ));
        Ok(renderer.render(&repos, &servers))
    }
}
