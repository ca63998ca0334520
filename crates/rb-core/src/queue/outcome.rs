use std::fmt::{Display, Formatter};

use rand::Rng;

use crate::config::QueueConfig;

/// Result of adding a request to the queue.
///
/// `position` is 1-based and counts the in-flight entry as position 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The queue was idle; a drain begins with this subject.
    Started,
    /// Subject already queued and this channel is already waiting on it.
    MergedSameOrigin { position: usize, eta: EtaEstimate },
    /// Subject already queued; the new origin was appended to its entry.
    MergedNewOrigin { position: usize, eta: EtaEstimate },
    /// Subject was not present and was appended behind the current work.
    Queued { position: usize, eta: EtaEstimate },
}

impl EnqueueOutcome {
    pub fn position(&self) -> Option<usize> {
        match self {
            EnqueueOutcome::Started => None,
            EnqueueOutcome::MergedSameOrigin { position, .. }
            | EnqueueOutcome::MergedNewOrigin { position, .. }
            | EnqueueOutcome::Queued { position, .. } => Some(*position),
        }
    }
}

/// Approximate wait, never a guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtaEstimate {
    pub seconds: u64,
}

impl Display for EtaEstimate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.seconds > 60 {
            write!(f, "{:.2} minutes", self.seconds as f64 / 60.0)
        } else {
            write!(f, "{} seconds", self.seconds)
        }
    }
}

/// Per-job duration range used to scale the queue position into an ETA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtaPolicy {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl EtaPolicy {
    pub fn estimate(&self, position: usize) -> EtaEstimate {
        let per_job = if self.min_secs >= self.max_secs {
            self.min_secs
        } else {
            rand::rng().random_range(self.min_secs..=self.max_secs)
        };
        EtaEstimate {
            seconds: per_job.saturating_mul(position as u64),
        }
    }
}

impl From<&QueueConfig> for EtaPolicy {
    fn from(config: &QueueConfig) -> Self {
        Self {
            min_secs: config.eta_min_secs,
            max_secs: config.eta_max_secs,
        }
    }
}
