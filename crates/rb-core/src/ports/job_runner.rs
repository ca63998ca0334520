use tokio::sync::mpsc;

use crate::computation::JobEvent;
use crate::ids::SubjectId;

/// Events of one run; the channel closes after the terminal event.
pub type JobEvents = mpsc::Receiver<JobEvent>;

/// Runs the external computation for a subject.
///
/// Implementations report, they never message anyone: progress heartbeats
/// followed by exactly one `Completed` or `Failed`. Start-up errors are
/// reported as `Failed(JobFailure::Spawn)` on the returned stream.
#[async_trait::async_trait]
pub trait JobRunnerPort: Send + Sync {
    async fn run(&self, subject_id: &SubjectId) -> JobEvents;
}
