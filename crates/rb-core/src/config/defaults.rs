use std::path::PathBuf;

use super::model::*;

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            program: "dotnet".to_string(),
            args_prefix: vec!["run".to_string(), "--".to_string()],
            working_dir: PathBuf::from("./performanceCalculator/osu-tools/PerformanceCalculator"),
            output_dir: PathBuf::from("../../scores"),
            progress_every: 15,
            read_chunk_bytes: 4096,
            timeout_secs: 15 * 60,
            max_attempts: 2,
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            eta_min_secs: 36,
            eta_max_secs: 72,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            ttl_secs: 60 * 60 * 24, // 1 day
        }
    }
}
