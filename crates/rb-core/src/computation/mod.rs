//! Output of the external calculator and the events of a single run.

mod job;
mod result;

pub use job::{JobEvent, JobFailure, ProgressEvent};
pub use result::{ComputationResult, ScoreRecord};
