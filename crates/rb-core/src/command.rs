//! Parsing of the inbound `calculate` command.

use thiserror::Error;

use crate::ids::{InvalidSubjectId, SubjectId};

const GUIDE_HINT: &str =
    "Check the guide pinned in the support channel to see how to get your user id.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("missing subject id")]
    MissingSubject,

    #[error("`{0}` is not a valid user ID")]
    InvalidSubject(String),
}

impl CommandError {
    /// Text shown to the requester. No queue state is touched for these errors.
    pub fn user_message(&self) -> String {
        match self {
            CommandError::MissingSubject => {
                format!("You need an osu! user ID to use this command. {GUIDE_HINT}")
            }
            CommandError::InvalidSubject(raw) => {
                format!("`{raw}` is not a valid user ID. {GUIDE_HINT}")
            }
        }
    }
}

impl From<InvalidSubjectId> for CommandError {
    fn from(err: InvalidSubjectId) -> Self {
        CommandError::InvalidSubject(err.0)
    }
}

/// Extract the subject from `<command> <subject> ...`.
pub fn parse_calculate_command(text: &str) -> Result<SubjectId, CommandError> {
    let raw = text
        .split_whitespace()
        .nth(1)
        .ok_or(CommandError::MissingSubject)?;
    Ok(SubjectId::parse(raw)?)
}
