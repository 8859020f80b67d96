//! Batch retraining: relabel history with the score heuristic, fit a fresh model,
//! fill in missing intents, persist the model.

use crate::config::{LabelingConfig, RetrainConfig};
use crate::labeling::IntentLabeler;
use crate::model::{IntentClassifier, IntentLabel};
use crate::storage::{StoreError, VisitStore};
use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::info;

/// Outcome of one retraining pass
#[derive(Debug, Clone, Serialize)]
pub struct RetrainReport {
    pub pruned: u64,
    pub visits: usize,
    pub trained: u64,
    pub predicted: usize,
    /// Training samples per label, in label order
    pub label_counts: Vec<(IntentLabel, u64)>,
    #[serde(skip)]
    pub classifier: IntentClassifier,
}

pub struct Retrainer {
    labeler: IntentLabeler,
    config: RetrainConfig,
}

impl Retrainer {
    pub fn new(labeling: LabelingConfig, config: RetrainConfig) -> Self {
        Self {
            labeler: IntentLabeler::new(labeling),
            config,
        }
    }

    pub fn run(&self, store: &VisitStore) -> Result<RetrainReport, StoreError> {
        let pruned = if self.config.retention_days > 0 {
            let cutoff = Utc::now() - Duration::days(i64::from(self.config.retention_days));
            store.prune_before(cutoff.timestamp_millis())?
        } else {
            0
        };

        let visits = store.all_visits()?;
        let mut classifier = IntentClassifier::new();
        for v in &visits {
            classifier.train(&v.features(), self.labeler.label(v.recruiter_score));
        }

        let mut predicted = 0;
        for v in visits.iter().filter(|v| v.intent.is_none()) {
            let intent = classifier.predict(&v.features());
            if store.set_intent(&v.id, intent)? {
                predicted += 1;
            }
        }

        store.save_model(&classifier)?;

        let label_counts = IntentLabel::ALL
            .iter()
            .map(|&l| (l, classifier.class_stats(l).count))
            .collect();
        info!(
            visits = visits.len(),
            pruned,
            predicted,
            total_samples = classifier.total_samples(),
            "retraining pass complete"
        );
        Ok(RetrainReport {
            pruned,
            visits: visits.len(),
            trained: classifier.total_samples(),
            predicted,
            label_counts,
            classifier,
        })
    }
}
