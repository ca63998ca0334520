use std::path::PathBuf;

use thiserror::Error;

use crate::computation::ComputationResult;
use crate::ids::SubjectId;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("result artifact not found: {0}")]
    Missing(PathBuf),

    #[error("result artifact {path} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("failed to read result artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Location and loading of the calculator's result file for a subject.
#[async_trait::async_trait]
pub trait ResultArtifactPort: Send + Sync {
    /// Where the calculator is told to write the result of `subject_id`.
    fn artifact_path(&self, subject_id: &SubjectId) -> PathBuf;

    async fn load(&self, subject_id: &SubjectId) -> Result<ComputationResult, ArtifactError>;

    /// Remove any result left behind for `subject_id`. Absent is not an error.
    async fn discard(&self, subject_id: &SubjectId) -> Result<(), ArtifactError>;
}
