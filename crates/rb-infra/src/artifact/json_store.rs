//! Result artifacts written by the calculator's `-o <path> -j` flags.
//! 计算器输出的 JSON 结果文件。

use std::io::ErrorKind;
use std::path::PathBuf;

use rb_core::ports::{ArtifactError, ResultArtifactPort};
use rb_core::{ComputationResult, SubjectId};
use tracing::debug;

/// Reads `<output_dir>/<subject>.json`.
pub struct JsonArtifactStore {
    output_dir: PathBuf,
}

impl JsonArtifactStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait::async_trait]
impl ResultArtifactPort for JsonArtifactStore {
    fn artifact_path(&self, subject_id: &SubjectId) -> PathBuf {
        self.output_dir.join(format!("{}.json", subject_id))
    }

    async fn load(&self, subject_id: &SubjectId) -> Result<ComputationResult, ArtifactError> {
        let path = self.artifact_path(subject_id);
        let bytes = tokio::fs::read(&path).await.map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                ArtifactError::Missing(path.clone())
            } else {
                ArtifactError::Io {
                    path: path.clone(),
                    source: err,
                }
            }
        })?;

        let result: ComputationResult =
            serde_json::from_slice(&bytes).map_err(|err| ArtifactError::Malformed {
                path: path.clone(),
                reason: err.to_string(),
            })?;

        debug!(
            subject_id = %subject_id,
            path = %path.display(),
            scores = result.scores.len(),
            "Loaded result artifact"
        );
        Ok(result)
    }

    async fn discard(&self, subject_id: &SubjectId) -> Result<(), ArtifactError> {
        let path = self.artifact_path(subject_id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Removed stale result artifact");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ArtifactError::Io { path, source: err }),
        }
    }
}
