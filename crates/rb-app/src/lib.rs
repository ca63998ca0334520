//! rework-bot application orchestration layer
//!
//! Use cases sit between the chat front end and the ports: the scheduler owns
//! the request queue and drives the calculator, navigation pages through
//! delivered results.

pub mod deps;
pub mod usecases;

pub use deps::AppDeps;
pub use usecases::{
    NavigateResult, NavigateResultError, Scheduler, SchedulerConfig, Submission,
};
