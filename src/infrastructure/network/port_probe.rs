//! Local port liveness probing.
//!
//! Each strategy wraps one system tool. The chain asks them in order and
//! stops at the first one that gives a definite answer, so a host without
//! `lsof` still gets detection through `netstat`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::value_objects::probe::Liveness;
use crate::infrastructure::process::{CommandRunner, CommandSpec};

/// Upper bound for a single probe invocation
pub const PORT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[async_trait]
pub trait PortProbe: Send + Sync {
    fn name(&self) -> &'static str;

    async fn probe(&self, runner: &dyn CommandRunner, port: u16) -> Liveness;
}

/// `lsof -i:PORT`: any output means something holds the port
#[derive(Debug, Clone, Copy, Default)]
pub struct LsofProbe;

#[async_trait]
impl PortProbe for LsofProbe {
    fn name(&self) -> &'static str {
        "lsof"
    }

    async fn probe(&self, runner: &dyn CommandRunner, port: u16) -> Liveness {
        let spec = CommandSpec::new("lsof", PORT_PROBE_TIMEOUT).arg(format!("-i:{}", port));
        match runner.run(&spec).await {
            Ok(output) if !output.stdout_trimmed().is_empty() => Liveness::Active,
            Ok(_) => Liveness::Inactive,
            Err(e) if e.is_unavailable() => {
                tracing::debug!("lsof unavailable: {}", e);
                Liveness::Indeterminate
            }
            Err(e) => {
                tracing::debug!(port, "lsof probe failed: {}", e);
                Liveness::Inactive
            }
        }
    }
}

/// `netstat -an`: scans the socket table for the port as an address suffix
#[derive(Debug, Clone, Copy, Default)]
pub struct NetstatProbe;

#[async_trait]
impl PortProbe for NetstatProbe {
    fn name(&self) -> &'static str {
        "netstat"
    }

    async fn probe(&self, runner: &dyn CommandRunner, port: u16) -> Liveness {
        let spec = CommandSpec::new("netstat", PORT_PROBE_TIMEOUT).arg("-an");
        match runner.run(&spec).await {
            Ok(output) if netstat_lists_port(&output.stdout, port) => Liveness::Active,
            Ok(_) => Liveness::Inactive,
            Err(e) if e.is_unavailable() => {
                tracing::debug!("netstat unavailable: {}", e);
                Liveness::Indeterminate
            }
            Err(e) => {
                tracing::debug!(port, "netstat probe failed: {}", e);
                Liveness::Inactive
            }
        }
    }
}

/// True when some address in the table ends in `:PORT` or `.PORT`.
///
/// Matching on whole address tokens keeps port 80 from matching `:8080`.
pub fn netstat_lists_port(table: &str, port: u16) -> bool {
    let wanted = port.to_string();
    table.split_whitespace().any(|token| {
        token
            .rsplit_once(|c| c == ':' || c == '.')
            .map(|(_, suffix)| suffix == wanted)
            .unwrap_or(false)
    })
}

/// Ordered list of probing strategies
#[derive(Clone)]
pub struct PortProbeChain {
    strategies: Vec<Arc<dyn PortProbe>>,
}

impl PortProbeChain {
    pub fn new(strategies: Vec<Arc<dyn PortProbe>>) -> Self {
        Self { strategies }
    }

    /// `lsof` then `netstat` on Unix-likes, `netstat` alone on Windows
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Self::new(vec![Arc::new(NetstatProbe)])
        } else {
            Self::new(vec![Arc::new(LsofProbe), Arc::new(NetstatProbe)])
        }
    }

    /// First definite answer wins. Inactive when no strategy could run.
    pub async fn is_active(&self, runner: &dyn CommandRunner, port: u16) -> bool {
        for strategy in &self.strategies {
            match strategy.probe(runner, port).await {
                Liveness::Active => return true,
                Liveness::Inactive => return false,
                Liveness::Indeterminate => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        port,
                        "no answer, trying next strategy"
                    );
                }
            }
        }
        false
    }
}

impl Default for PortProbeChain {
    fn default() -> Self {
        Self::platform_default()
    }
}
