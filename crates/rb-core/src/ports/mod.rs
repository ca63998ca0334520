//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases and the infrastructure
//! implementations (calculator process, artifact files, cache, chat platform).
//! The core never talks to a process, a file or a socket directly.

mod artifact;
mod clock;
mod job_runner;
mod messenger;
mod result_cache;

pub use artifact::{ArtifactError, ResultArtifactPort};
pub use clock::ClockPort;
pub use job_runner::{JobEvents, JobRunnerPort};
pub use messenger::{MessengerError, MessengerPort, OutgoingMessage};
pub use result_cache::ResultCachePort;
