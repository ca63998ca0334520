use serde::{Deserialize, Serialize};

/// Structured result of a `profile` run, as written to `<subject>.json`.
///
/// Field names follow the calculator's PascalCase JSON output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComputationResult {
    pub username: String,
    pub live_pp: f64,
    pub local_pp: f64,
    pub playcount_pp: f64,
    pub scores: Vec<ScoreRecord>,
}

/// One score recalculated under the rework, compared with its live value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScoreRecord {
    pub beatmap_name: String,
    pub beatmap_id: u64,
    pub local_pp: f64,
    pub live_pp: f64,
    #[serde(default)]
    pub mods: Vec<String>,
    pub combo: u64,
    pub accuracy: f64,
    pub miss_count: u64,
    pub position_change: i64,
}

impl ComputationResult {
    /// Local minus live total pp.
    pub fn pp_difference(&self) -> f64 {
        self.local_pp - self.live_pp
    }
}

impl ScoreRecord {
    pub fn pp_difference(&self) -> f64 {
        self.local_pp - self.live_pp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTIFACT: &str = r#"{
        "Username": "peppy",
        "LivePp": 1234.5,
        "LocalPp": 1250.25,
        "PlaycountPp": 416.8,
        "Scores": [
            {
                "BeatmapName": "xi - FREEDOM DiVE [FOUR DIMENSIONS]",
                "BeatmapId": 129891,
                "LocalPp": 512.3,
                "LivePp": 500.0,
                "Mods": ["HD", "DT"],
                "Combo": 2385,
                "Accuracy": 98.76,
                "MissCount": 1,
                "PositionChange": -2
            }
        ]
    }"#;

    #[test]
    fn deserializes_calculator_artifact() {
        let result: ComputationResult = serde_json::from_str(ARTIFACT).unwrap();

        assert_eq!(result.username, "peppy");
        assert_eq!(result.scores.len(), 1);
        let score = &result.scores[0];
        assert_eq!(score.beatmap_id, 129891);
        assert_eq!(score.mods, vec!["HD", "DT"]);
        assert_eq!(score.position_change, -2);
        assert!((result.pp_difference() - 15.75).abs() < 1e-9);
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let broken = r#"{ "Username": "peppy", "Scores": [] }"#;
        assert!(serde_json::from_str::<ComputationResult>(broken).is_err());
    }
}
