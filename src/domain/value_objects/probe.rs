/// Outcome of asking the system a question that may legitimately have no answer.
///
/// `Absent` means the answer is known not to exist (no upstream, no remote).
/// `Degraded` means the question could not be answered at all; the reason is
/// kept for logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    Value(T),
    Absent,
    Degraded(String),
}

impl<T> Probe<T> {
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self::Degraded(reason.into())
    }

    /// Collapse to a plain value, logging why a fallback was used
    pub fn or_fallback(self, what: &str, fallback: T) -> T {
        match self {
            Self::Value(v) => v,
            Self::Absent => fallback,
            Self::Degraded(reason) => {
                tracing::debug!("{} unavailable: {}", what, reason);
                fallback
            }
        }
    }
}

/// Result of a single port probing strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Active,
    Inactive,
    /// The strategy could not run; the next one should be tried
    Indeterminate,
}
