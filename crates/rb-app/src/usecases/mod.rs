mod messages;
pub mod navigate_result;
pub mod scheduler;

pub use navigate_result::{NavigateResult, NavigateResultError};
pub use scheduler::{Scheduler, SchedulerConfig, Submission};
