//! User-facing texts sent by the use cases.

use rb_core::{EnqueueOutcome, JobFailure, SubjectId, UserId};

pub(crate) fn processing(requester: &UserId, subject: &SubjectId) -> String {
    format!("<@{requester}> proccessing user with ID: {subject}")
}

pub(crate) fn progress(base: &str, percent: u8) -> String {
    format!("{base} (~{percent}%)")
}

pub(crate) const COMPLETE: &str = "Proccessing complete, preparing embed.";

pub(crate) fn failure(subject: &SubjectId, failure: &JobFailure) -> String {
    match failure {
        JobFailure::InvalidSubject => "A wrong user Id was given, aborting task.".to_string(),
        JobFailure::ProcessFailure { .. } => {
            format!("The calculator failed while processing user with ID {subject}, aborting task.")
        }
        JobFailure::Timeout { .. } => {
            format!("Processing user with ID {subject} took too long, aborting task.")
        }
        JobFailure::Spawn(_) => "The calculator could not be started, aborting task.".to_string(),
    }
}

/// Reply to a request that did not start a drain. `None` for `Started`.
pub(crate) fn enqueued(subject: &SubjectId, outcome: &EnqueueOutcome) -> Option<String> {
    match outcome {
        EnqueueOutcome::Started => None,
        EnqueueOutcome::MergedSameOrigin { position, eta } => Some(format!(
            "The player with ID {subject} is already in line for this channel. (#{position}, {eta})"
        )),
        EnqueueOutcome::MergedNewOrigin { position, eta } => Some(format!(
            "The player with ID {subject} is already in line for another channel, adding to queue. (#{position}, {eta})"
        )),
        EnqueueOutcome::Queued { position, eta } => Some(format!(
            "The player with ID {subject} was added to the queue. (#{position}, {eta})"
        )),
    }
}
