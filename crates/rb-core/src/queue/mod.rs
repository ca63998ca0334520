//! Request queue: pending subjects with multi-origin merge.
//! 请求队列：按主题去重并合并来源。

mod entry;
mod outcome;
mod request_queue;

pub use entry::{OriginRef, QueueEntry};
pub use outcome::{EnqueueOutcome, EtaEstimate, EtaPolicy};
pub use request_queue::RequestQueue;
