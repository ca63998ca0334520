//! Use case for scheduling calculator runs
//! 调度计算任务的用例
//!
//! `submit` parses and enqueues a request. The first request on an idle queue
//! spawns the drain task, which runs jobs one at a time in FIFO order and
//! delivers every notification of a job before starting the next one.

mod status;

use std::sync::Arc;

use rb_core::config::AppConfig;
use rb_core::ports::{JobRunnerPort, MessengerPort, OutgoingMessage, ResultCachePort};
use rb_core::queue::EtaPolicy;
use rb_core::{
    parse_calculate_command, render_page, CommandError, ComputationResult, EnqueueOutcome,
    JobEvent, JobFailure, OriginRef, QueueEntry, RequestQueue, SubjectId,
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

use self::status::StatusBoard;
use super::messages;
use crate::deps::AppDeps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub eta: EtaPolicy,
    /// Runs allowed per subject when failures are retryable; at least 1
    pub max_attempts: u32,
}

impl From<&AppConfig> for SchedulerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            eta: EtaPolicy::from(&config.queue),
            max_attempts: config.calculator.max_attempts,
        }
    }
}

/// An accepted request.
#[derive(Debug)]
pub struct Submission {
    pub subject_id: SubjectId,
    pub outcome: EnqueueOutcome,
    /// The drain task, when this request started one
    pub drain: Option<JoinHandle<()>>,
}

/// Owner of the request queue and driver of the calculator.
///
/// ## Behavior / 行为
/// - Same subject requested again merges into the existing entry
/// - Only one drain task runs at a time
/// - Messaging errors are logged and never stop the drain
pub struct Scheduler {
    queue: Mutex<RequestQueue>,
    job_runner: Arc<dyn JobRunnerPort>,
    messenger: Arc<dyn MessengerPort>,
    result_cache: Arc<dyn ResultCachePort>,
    max_attempts: u32,
}

impl Scheduler {
    pub fn new(deps: &AppDeps, config: SchedulerConfig) -> Self {
        Self {
            queue: Mutex::new(RequestQueue::new(config.eta)),
            job_runner: deps.job_runner.clone(),
            messenger: deps.messenger.clone(),
            result_cache: deps.result_cache.clone(),
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Handle one `calculate` command from `origin`.
    ///
    /// Invalid input is answered in the origin channel and returned as an
    /// error without touching the queue.
    pub async fn submit(
        self: &Arc<Self>,
        text: &str,
        origin: OriginRef,
    ) -> Result<Submission, CommandError> {
        let span = info_span!(
            "usecase.scheduler.submit",
            channel_id = %origin.channel_id,
            requester_id = %origin.requester_id
        );

        async {
            let subject_id = match parse_calculate_command(text) {
                Ok(subject_id) => subject_id,
                Err(err) => {
                    info!(error = %err, "Rejected calculate command");
                    self.reply(&origin, err.user_message()).await;
                    return Err(err);
                }
            };

            let outcome = self
                .queue
                .lock()
                .await
                .enqueue(subject_id.clone(), origin.clone());
            info!(subject_id = %subject_id, outcome = ?outcome, "Request enqueued");

            let drain = match messages::enqueued(&subject_id, &outcome) {
                Some(text) => {
                    self.reply(&origin, text).await;
                    None
                }
                None => {
                    let scheduler = Arc::clone(self);
                    Some(tokio::spawn(
                        scheduler
                            .drain()
                            .instrument(info_span!("usecase.scheduler.drain")),
                    ))
                }
            };

            Ok(Submission {
                subject_id,
                outcome,
                drain,
            })
        }
        .instrument(span)
        .await
    }

    /// Snapshot of the queue, head first.
    pub async fn pending(&self) -> Vec<QueueEntry> {
        self.queue.lock().await.entries().cloned().collect()
    }

    async fn drain(self: Arc<Self>) {
        loop {
            let Some(entry) = self.queue.lock().await.next_head() else {
                break;
            };
            let span = info_span!("usecase.scheduler.job", subject_id = %entry.subject_id);
            self.process(entry).instrument(span).await;
        }
        info!("Queue drained");
    }

    async fn process(&self, entry: QueueEntry) {
        let subject_id = entry.subject_id.clone();
        let mut board = StatusBoard::new(subject_id.clone());
        board.announce(self.messenger.as_ref(), &entry.origins).await;

        let outcome = self.run_with_retries(&subject_id, &mut board).await;

        let origins = self
            .queue
            .lock()
            .await
            .dequeue_head()
            .map(|finished| finished.origins)
            .unwrap_or(entry.origins);
        board.announce(self.messenger.as_ref(), &origins).await;

        match outcome {
            Ok(result) => {
                board.finish(self.messenger.as_ref(), messages::COMPLETE).await;
                self.deliver(Arc::new(result), &origins).await;
            }
            Err(failure) => {
                info!(subject_id = %subject_id, failure = %failure, "Job failed");
                board
                    .finish(self.messenger.as_ref(), &messages::failure(&subject_id, &failure))
                    .await;
            }
        }
    }

    async fn run_with_retries(
        &self,
        subject_id: &SubjectId,
        board: &mut StatusBoard,
    ) -> Result<ComputationResult, JobFailure> {
        let mut attempt = 1;
        loop {
            info!(subject_id = %subject_id, attempt, "Starting calculator run");
            match self.run_once(subject_id, board).await {
                Err(failure) if failure.is_retryable() && attempt < self.max_attempts => {
                    warn!(subject_id = %subject_id, attempt, failure = %failure, "Retrying calculator run");
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    async fn run_once(
        &self,
        subject_id: &SubjectId,
        board: &mut StatusBoard,
    ) -> Result<ComputationResult, JobFailure> {
        let mut events = self.job_runner.run(subject_id).await;
        while let Some(event) = events.recv().await {
            match event {
                JobEvent::Progress(progress) => {
                    debug!(chunks = progress.chunks_read, "Calculator progress");
                    let origins = self.origins_of(subject_id).await;
                    board.announce(self.messenger.as_ref(), &origins).await;
                    board
                        .progress(self.messenger.as_ref(), progress.percent_approx)
                        .await;
                }
                JobEvent::Completed(result) => return Ok(result),
                JobEvent::Failed(failure) => return Err(failure),
            }
        }
        warn!(subject_id = %subject_id, "Job events ended without an outcome");
        Err(JobFailure::ProcessFailure { exit_code: None })
    }

    async fn origins_of(&self, subject_id: &SubjectId) -> Vec<OriginRef> {
        self.queue
            .lock()
            .await
            .origins_of(subject_id)
            .map(<[OriginRef]>::to_vec)
            .unwrap_or_default()
    }

    /// Send page 0 to every origin and cache it under the delivered message.
    async fn deliver(&self, result: Arc<ComputationResult>, origins: &[OriginRef]) {
        for origin in origins {
            let page = render_page(&result, 0, &origin.requester_id);
            match self
                .messenger
                .send(&origin.channel_id, OutgoingMessage::Page(page))
                .await
            {
                Ok(handle) => {
                    debug!(handle = %handle, channel_id = %origin.channel_id, "Result delivered");
                    self.result_cache
                        .insert(
                            handle,
                            Arc::clone(&result),
                            origin.channel_id.clone(),
                            origin.requester_id.clone(),
                        )
                        .await;
                }
                Err(err) => {
                    warn!(channel_id = %origin.channel_id, error = %err, "Failed to deliver result");
                }
            }
        }
    }

    async fn reply(&self, origin: &OriginRef, text: String) {
        if let Err(err) = self
            .messenger
            .send(&origin.channel_id, OutgoingMessage::Text(text))
            .await
        {
            warn!(channel_id = %origin.channel_id, error = %err, "Failed to send reply");
        }
    }
}
