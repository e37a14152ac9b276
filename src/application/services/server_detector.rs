use std::sync::Arc;

use crate::domain::entities::detected_server::DetectedServer;
use crate::domain::entities::settings::ServerConfig;
use crate::infrastructure::network::PortProbeChain;
use crate::infrastructure::process::CommandRunner;

/// Finds which configured servers are currently listening
pub struct ServerDetector {
    runner: Arc<dyn CommandRunner>,
    probes: PortProbeChain,
}

impl ServerDetector {
    pub fn new(runner: Arc<dyn CommandRunner>, probes: PortProbeChain) -> Self {
        Self { runner, probes }
    }

    /// One entry per enabled config with a live port, in config order.
    /// Ports are tried in declared order and the first live one wins.
    pub async fn detect(&self, configs: &[ServerConfig]) -> Vec<DetectedServer> {
        let mut detected = Vec::new();

        for config in configs.iter().filter(|c| c.enabled) {
            for &port in &config.ports {
                if self.probes.is_active(self.runner.as_ref(), port).await {
                    tracing::debug!(server = %config.name, port, "server detected");
                    detected.push(DetectedServer::new(&config.name, port, &config.emoji));
                    break;
                }
            }
        }

        detected
    }
}
