use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;

use rb_core::config::CalculatorConfig;
use rb_core::ports::{JobEvents, JobRunnerPort, ResultArtifactPort};
use rb_core::{JobEvent, JobFailure, SubjectId};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout};
use tokio::sync::mpsc;
use tracing::{debug, info, info_span, trace, warn, Instrument};

use super::invocation::CalculatorInvocation;
use super::stream_monitor::StreamMonitor;

const EVENT_BUFFER: usize = 32;

/// Runs the calculator as a child process, one `run` per job.
///
/// The runner only reports. Progress heartbeats come from stdout chunks, the
/// outcome from end-of-stream plus the exit status, and the result from the
/// artifact the calculator wrote.
///
/// 以子进程方式运行计算器，并通过事件流汇报进度与结果。
pub struct ProcessJobRunner {
    invocation: CalculatorInvocation,
    artifacts: Arc<dyn ResultArtifactPort>,
    progress_every: u64,
    read_chunk_bytes: usize,
    timeout_secs: u64,
}

impl ProcessJobRunner {
    pub fn new(
        invocation: CalculatorInvocation,
        artifacts: Arc<dyn ResultArtifactPort>,
        config: &CalculatorConfig,
    ) -> Self {
        Self {
            invocation,
            artifacts,
            progress_every: config.progress_every,
            read_chunk_bytes: config.read_chunk_bytes.max(1),
            timeout_secs: config.timeout_secs,
        }
    }
}

#[async_trait::async_trait]
impl JobRunnerPort for ProcessJobRunner {
    async fn run(&self, subject_id: &SubjectId) -> JobEvents {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let job = Job {
            subject_id: subject_id.clone(),
            invocation: self.invocation.clone(),
            artifacts: self.artifacts.clone(),
            progress_every: self.progress_every,
            read_chunk_bytes: self.read_chunk_bytes,
            timeout_secs: self.timeout_secs,
        };
        let span = info_span!("calculator.run", subject_id = %subject_id);

        tokio::spawn(
            async move {
                let outcome = job.execute(&tx).await;
                if tx.send(outcome).await.is_err() {
                    debug!("Job events receiver dropped before the outcome");
                }
            }
            .instrument(span),
        );
        rx
    }
}

struct Job {
    subject_id: SubjectId,
    invocation: CalculatorInvocation,
    artifacts: Arc<dyn ResultArtifactPort>,
    progress_every: u64,
    read_chunk_bytes: usize,
    timeout_secs: u64,
}

impl Job {
    /// Supervise one calculator process and return the terminal event.
    async fn execute(self, events: &mpsc::Sender<JobEvent>) -> JobEvent {
        let output_path = self.artifacts.artifact_path(&self.subject_id);
        let mut cmd = self.invocation.command(&self.subject_id, &output_path);

        info!(
            program = %self.invocation.program,
            output = %output_path.display(),
            "processing user with ID {}",
            self.subject_id
        );

        // a result from an earlier run must not pass for this one
        if let Err(err) = self.artifacts.discard(&self.subject_id).await {
            warn!(error = %err, "Failed to clear previous result artifact");
            return JobEvent::Failed(JobFailure::ProcessFailure { exit_code: None });
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                warn!(error = %err, program = %self.invocation.program, "Failed to spawn calculator");
                return JobEvent::Failed(JobFailure::Spawn(err.to_string()));
            }
        };

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(log_stderr(stderr).in_current_span());
        }
        let Some(stdout) = child.stdout.take() else {
            kill(&mut child).await;
            return JobEvent::Failed(JobFailure::Spawn("stdout was not captured".to_string()));
        };

        let mut monitor = StreamMonitor::new(self.progress_every);
        let deadline = Duration::from_secs(self.timeout_secs);
        let watched = tokio::time::timeout(
            deadline,
            watch_output(&mut child, stdout, &mut monitor, events, self.read_chunk_bytes),
        )
        .await;

        let status = match watched {
            Ok(Ok(status)) => status,
            Ok(Err(err)) => {
                warn!(error = %err, "Lost calculator output");
                kill(&mut child).await;
                return JobEvent::Failed(JobFailure::ProcessFailure { exit_code: None });
            }
            Err(_) => {
                warn!(timeout_secs = self.timeout_secs, "Calculator timed out, killing it");
                kill(&mut child).await;
                return JobEvent::Failed(JobFailure::Timeout {
                    timeout_secs: self.timeout_secs,
                });
            }
        };

        debug!(
            exit_code = ?status.code(),
            chunks = monitor.chunks_read(),
            marker_seen = monitor.marker_seen(),
            "Calculator exited"
        );

        if !status.success() && !monitor.marker_seen() {
            return JobEvent::Failed(JobFailure::ProcessFailure {
                exit_code: status.code(),
            });
        }

        match self.artifacts.load(&self.subject_id).await {
            Ok(result) => {
                info!(scores = result.scores.len(), "Proccessing complete, preparing embed.");
                JobEvent::Completed(result)
            }
            Err(err) => {
                info!(error = %err, "A wrong user Id was given, aborting task.");
                JobEvent::Failed(JobFailure::InvalidSubject)
            }
        }
    }
}

/// Read stdout to the end, then reap the child.
async fn watch_output(
    child: &mut Child,
    mut stdout: ChildStdout,
    monitor: &mut StreamMonitor,
    events: &mpsc::Sender<JobEvent>,
    read_chunk_bytes: usize,
) -> std::io::Result<ExitStatus> {
    let mut buf = vec![0u8; read_chunk_bytes];
    loop {
        let n = stdout.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        let chunk = &buf[..n];
        trace!(output = %String::from_utf8_lossy(chunk), "calculator stdout");

        if let Some(progress) = monitor.feed(chunk) {
            // keep reading even without a listener so the pipe never fills up
            let _ = events.send(JobEvent::Progress(progress)).await;
        }
    }
    child.wait().await
}

async fn log_stderr(stderr: ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => debug!(line = %line, "calculator stderr"),
            Ok(None) => break,
            Err(err) => {
                debug!(error = %err, "Stopped reading calculator stderr");
                break;
            }
        }
    }
}

async fn kill(child: &mut Child) {
    if let Err(err) = child.kill().await {
        warn!(error = %err, "Failed to kill calculator process");
    }
}
