//! Runtime configuration, loaded from a JSON file with defaults for anything missing.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    /// Data directory (encrypted visit store, model state)
    pub data_dir: PathBuf,
    /// NDJSON inbox of visitor behavior records to import each cycle
    pub import_path: Option<PathBuf>,
    /// Score thresholds that assign training labels
    pub labeling: LabelingConfig,
    /// Batch retraining schedule and retention
    pub retrain: RetrainConfig,
    /// Logging
    pub log: LogConfig,
}

/// Minimum recruiter score for each training label; checked highest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelingConfig {
    pub job_recruiter_min: i32,
    pub tech_professional_min: i32,
    pub general_visitor_min: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrainConfig {
    /// Seconds between retraining passes; 0 runs a single pass and exits
    pub interval_secs: u64,
    /// Drop visits older than this many days before training; 0 keeps everything
    pub retention_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".visitor-intent"),
            import_path: None,
            labeling: LabelingConfig::default(),
            retrain: RetrainConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            job_recruiter_min: 15,
            tech_professional_min: 6,
            general_visitor_min: 3,
        }
    }
}

impl Default for RetrainConfig {
    fn default() -> Self {
        Self {
            interval_secs: 0,
            retention_days: 0,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl IntentConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<IntentConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("visits.db")
    }
}
