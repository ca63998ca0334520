use thiserror::Error;

use super::result::ComputationResult;

/// Heartbeat from a running calculator. Not a real completion fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub chunks_read: u64,
    /// Capped at 99 so a heartbeat never claims completion
    pub percent_approx: u8,
}

impl ProgressEvent {
    pub fn from_chunks(chunks_read: u64) -> Self {
        Self {
            chunks_read,
            percent_approx: chunks_read.min(99) as u8,
        }
    }
}

/// Everything a job runner reports for one run, in order.
/// Exactly one terminal event (`Completed` or `Failed`) ends the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Progress(ProgressEvent),
    Completed(ComputationResult),
    Failed(JobFailure),
}

impl JobEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobEvent::Progress(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobFailure {
    /// The calculator produced no usable artifact, usually because it rejected the id.
    #[error("no usable result was produced for this subject")]
    InvalidSubject,

    /// The calculator exited abnormally before emitting its result.
    #[error("calculator exited abnormally (exit code {exit_code:?})")]
    ProcessFailure { exit_code: Option<i32> },

    #[error("calculator did not finish within {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    #[error("failed to start calculator: {0}")]
    Spawn(String),
}

impl JobFailure {
    /// Whether running the same subject again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, JobFailure::ProcessFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_percent_is_capped() {
        assert_eq!(ProgressEvent::from_chunks(0).percent_approx, 0);
        assert_eq!(ProgressEvent::from_chunks(45).percent_approx, 45);
        assert_eq!(ProgressEvent::from_chunks(10_000).percent_approx, 99);
    }

    #[test]
    fn only_process_failures_are_retryable() {
        assert!(JobFailure::ProcessFailure { exit_code: Some(1) }.is_retryable());
        assert!(!JobFailure::InvalidSubject.is_retryable());
        assert!(!JobFailure::Timeout { timeout_secs: 5 }.is_retryable());
        assert!(!JobFailure::Spawn("not found".into()).is_retryable());
    }
}
