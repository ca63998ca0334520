use std::io::Write;
use std::ops::ControlFlow;
use std::sync::Arc;

use rb_app::NavigateResultError;
use rb_core::ports::ResultCachePort;
use rb_core::{MessageId, NavAction};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::line::{parse_line, ConsoleCommand, Identity};
use crate::adapters::ConsoleMessenger;
use crate::bootstrap::AppRuntime;

const HELP: &str = "commands: !calculate <user id> | !next [handle] | !prev [handle] | !queue | !quit; \
prefix a line with <user>@<channel>[#guild]: to act as someone else";

/// Reads commands line by line and drives the use cases.
pub struct ConsoleSession<W> {
    runtime: AppRuntime,
    messenger: Arc<ConsoleMessenger<W>>,
    default_identity: Identity,
    drains: Vec<JoinHandle<()>>,
}

impl<W: Write + Send + 'static> ConsoleSession<W> {
    pub fn new(
        runtime: AppRuntime,
        messenger: Arc<ConsoleMessenger<W>>,
        default_identity: Identity,
    ) -> Self {
        Self {
            runtime,
            messenger,
            default_identity,
            drains: Vec::new(),
        }
    }

    /// Process `input` until `!quit` or end of input, then wait for queued
    /// work to be delivered.
    pub async fn run(mut self, input: impl AsyncBufRead + Unpin) -> anyhow::Result<()> {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if self.handle_line(&line).await.is_break() {
                break;
            }
        }
        self.finish().await;
        Ok(())
    }

    pub async fn handle_line(&mut self, line: &str) -> ControlFlow<()> {
        let Some(parsed) = parse_line(line) else {
            return ControlFlow::Continue(());
        };
        let identity = parsed
            .identity
            .unwrap_or_else(|| self.default_identity.clone());

        match parsed.command {
            ConsoleCommand::Calculate(text) => self.calculate(&text, &identity).await,
            ConsoleCommand::Next(handle) => self.navigate(handle, &identity, NavAction::Next).await,
            ConsoleCommand::Prev(handle) => {
                self.navigate(handle, &identity, NavAction::Previous).await
            }
            ConsoleCommand::Queue => self.show_queue(&identity).await,
            ConsoleCommand::Help => self.notice(&identity, HELP),
            ConsoleCommand::Quit => return ControlFlow::Break(()),
            ConsoleCommand::Unknown(text) => {
                debug!(text = %text, "Ignoring unknown console input");
                self.notice(&identity, "unknown command, try !help");
            }
        }
        ControlFlow::Continue(())
    }

    /// Wait for every drain task started by this session.
    pub async fn finish(&mut self) {
        for drain in self.drains.drain(..) {
            if let Err(err) = drain.await {
                warn!(error = %err, "Drain task ended abnormally");
            }
        }
    }

    async fn calculate(&mut self, text: &str, identity: &Identity) {
        match self.runtime.scheduler.submit(text, identity.origin()).await {
            Ok(submission) => {
                if let Some(drain) = submission.drain {
                    self.drains.retain(|handle| !handle.is_finished());
                    self.drains.push(drain);
                }
            }
            // already answered in the channel
            Err(err) => debug!(error = %err, "Calculate command rejected"),
        }
    }

    async fn navigate(&self, handle: Option<MessageId>, identity: &Identity, action: NavAction) {
        let Some(handle) = handle.or_else(|| self.messenger.last_page_in(&identity.channel)) else {
            self.notice(identity, "no result to navigate in this channel");
            return;
        };

        // edit the result where it was delivered
        let channel = self
            .runtime
            .result_cache
            .get(&handle)
            .await
            .map(|entry| entry.channel_id)
            .unwrap_or_else(|| identity.channel.clone());

        match self
            .runtime
            .navigate
            .execute(&handle, &channel, &identity.user, action)
            .await
        {
            Ok(page) => info!(handle = %handle, page = page.page, "Navigated result"),
            Err(NavigateResultError::Rejected(err)) => self.notice(identity, &err.to_string()),
            Err(NavigateResultError::Delivery(err)) => {
                warn!(handle = %handle, error = %err, "Failed to show navigated page");
            }
        }
    }

    async fn show_queue(&self, identity: &Identity) {
        let pending = self.runtime.scheduler.pending().await;
        if pending.is_empty() {
            self.notice(identity, "the queue is empty");
            return;
        }
        let listing: Vec<String> = pending
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                format!(
                    "#{} {} ({} waiting)",
                    index + 1,
                    entry.subject_id,
                    entry.origins.len()
                )
            })
            .collect();
        self.notice(identity, &listing.join(", "));
    }

    fn notice(&self, identity: &Identity, text: &str) {
        if let Err(err) = self.messenger.notice(&identity.channel, text) {
            warn!(error = %err, "Failed to print notice");
        }
    }
}
