use std::collections::VecDeque;

#[cfg(feature = "tracing")]
use tracing::debug;

use super::entry::{OriginRef, QueueEntry};
use super::outcome::{EnqueueOutcome, EtaPolicy};
use crate::ids::SubjectId;

/// FIFO of subjects waiting for (or undergoing) a calculator run.
///
/// While a drain is active the in-flight entry stays at the head, so requests
/// for a running subject merge into it like requests for a queued one. The
/// `processing` flag is only cleared by [`RequestQueue::next_head`] finding the
/// queue empty, which makes `Started` the single signal to begin a drain.
///
/// 正在处理的条目保留在队首，直到 `dequeue_head` 将其移除。
#[derive(Debug)]
pub struct RequestQueue {
    entries: VecDeque<QueueEntry>,
    processing: bool,
    eta: EtaPolicy,
}

impl RequestQueue {
    pub fn new(eta: EtaPolicy) -> Self {
        Self {
            entries: VecDeque::new(),
            processing: false,
            eta,
        }
    }

    /// Add a request, merging with an existing entry for the same subject.
    pub fn enqueue(&mut self, subject_id: SubjectId, origin: OriginRef) -> EnqueueOutcome {
        if let Some(index) = self.index_of(&subject_id) {
            let position = index + 1;
            let eta = self.eta.estimate(position);
            let entry = &mut self.entries[index];

            if entry.has_channel(&origin.channel_id) {
                #[cfg(feature = "tracing")]
                debug!(subject_id = %subject_id, position, "Subject already queued for this channel");
                return EnqueueOutcome::MergedSameOrigin { position, eta };
            }

            entry.origins.push(origin);
            #[cfg(feature = "tracing")]
            debug!(
                subject_id = %subject_id,
                position,
                origins = entry.origins.len(),
                "Merged new origin into queued subject"
            );
            return EnqueueOutcome::MergedNewOrigin { position, eta };
        }

        self.entries.push_back(QueueEntry::new(subject_id, origin));

        if !self.processing {
            debug_assert_eq!(self.entries.len(), 1, "idle queue must be empty");
            self.processing = true;
            return EnqueueOutcome::Started;
        }

        let position = self.entries.len();
        EnqueueOutcome::Queued {
            position,
            eta: self.eta.estimate(position),
        }
    }

    /// Snapshot of the entry the drain loop should run next.
    ///
    /// Returns `None` and ends the drain when nothing is left.
    pub fn next_head(&mut self) -> Option<QueueEntry> {
        match self.entries.front() {
            Some(entry) => Some(entry.clone()),
            None => {
                self.processing = false;
                None
            }
        }
    }

    /// Remove the head entry with every origin merged into it so far.
    pub fn dequeue_head(&mut self) -> Option<QueueEntry> {
        self.entries.pop_front()
    }

    /// Origins currently waiting on `subject_id`, in arrival order.
    pub fn origins_of(&self, subject_id: &SubjectId) -> Option<&[OriginRef]> {
        self.entries
            .iter()
            .find(|entry| &entry.subject_id == subject_id)
            .map(|entry| entry.origins.as_slice())
    }

    /// 1-based position of `subject_id`, if queued.
    pub fn position_of(&self, subject_id: &SubjectId) -> Option<usize> {
        self.index_of(subject_id).map(|index| index + 1)
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    fn index_of(&self, subject_id: &SubjectId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| &entry.subject_id == subject_id)
    }
}
