use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration DTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub calculator: CalculatorConfig,
    pub queue: QueueConfig,
    pub cache: CacheConfig,
}

/// How the external performance calculator is invoked and watched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Executable to spawn
    pub program: String,

    /// Arguments placed before the `profile` action (e.g. `run --` for `dotnet`)
    pub args_prefix: Vec<String>,

    /// Working directory of the calculator process
    pub working_dir: PathBuf,

    /// Directory the calculator writes `<subject>.json` artifacts into.
    /// Relative paths are resolved against `working_dir` by the bootstrap.
    pub output_dir: PathBuf,

    /// Report progress on the first chunk and every N chunks after it
    pub progress_every: u64,

    /// Size of a single stdout read
    pub read_chunk_bytes: usize,

    /// Deadline for a single calculator run
    pub timeout_secs: u64,

    /// Total runs allowed for a subject when the failure is retryable
    pub max_attempts: u32,
}

/// ETA heuristic advertised to queued requesters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub eta_min_secs: u64,
    pub eta_max_secs: u64,
}

/// Bounds of the result cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub ttl_secs: u64,
}
