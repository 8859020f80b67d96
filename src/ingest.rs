//! Visit ingestion: score incoming behavior, tag it with the current model's intent, store it.

use crate::features::{VisitorBehavior, VisitorFeatures};
use crate::model::{IntentLabel, SharedClassifier};
use crate::scoring::{score_behavior, RecruiterLabel};
use crate::storage::{StoreError, VisitStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A scored visit as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub id: String,
    pub ts: DateTime<Utc>,
    pub behavior: VisitorBehavior,
    pub recruiter_score: i32,
    pub recruiter_label: RecruiterLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentLabel>,
}

impl VisitRecord {
    /// New visit with a fresh id, scored from its behavior; intent left unset.
    pub fn new(behavior: VisitorBehavior) -> Self {
        let scored = score_behavior(&behavior);
        Self {
            id: Uuid::new_v4().to_string(),
            ts: Utc::now(),
            behavior,
            recruiter_score: scored.score,
            recruiter_label: scored.label,
            intent: None,
        }
    }

    pub fn features(&self) -> VisitorFeatures {
        VisitorFeatures::from_behavior(&self.behavior, self.recruiter_score)
    }
}

pub struct VisitRecorder {
    classifier: Arc<SharedClassifier>,
}

impl VisitRecorder {
    pub fn new(classifier: Arc<SharedClassifier>) -> Self {
        Self { classifier }
    }

    /// Score, classify (once the model has data) and store one visit.
    pub fn record(&self, store: &VisitStore, behavior: VisitorBehavior) -> Result<VisitRecord, StoreError> {
        let mut visit = VisitRecord::new(behavior);
        visit.intent = self.classifier.try_predict(&visit.features());
        store.insert_visit(&visit)?;
        debug!(
            visit_id = %visit.id,
            score = visit.recruiter_score,
            label = %visit.recruiter_label,
            intent = ?visit.intent,
            "visit recorded"
        );
        Ok(visit)
    }

    /// Record every visit waiting in an NDJSON inbox; see [`drain_inbox_with`].
    pub fn drain_inbox(&self, store: &VisitStore, inbox: &Path) -> Result<usize, BoxError> {
        drain_inbox_with(inbox, |behavior| {
            self.record(store, behavior)?;
            Ok(())
        })
    }
}

/// Claim file an inbox is moved to while it is being drained.
pub fn claim_path(inbox: &Path) -> PathBuf {
    let mut name = inbox.file_name().map(OsString::from).unwrap_or_default();
    name.push(".processing");
    inbox.with_file_name(name)
}

/// Feed every behavior object of an NDJSON inbox to `sink`, each line at most once.
///
/// The inbox is renamed to its claim file before reading, so lines appended later land
/// in a fresh inbox. If `sink` fails, the claim file is rewritten to hold the failed
/// line and everything after it, and it is resumed first on the next call. Unparsable
/// lines are skipped with a warning. Returns the number of lines handed to `sink`.
pub fn drain_inbox_with<F>(inbox: &Path, mut sink: F) -> Result<usize, BoxError>
where
    F: FnMut(VisitorBehavior) -> Result<(), BoxError>,
{
    let claim = claim_path(inbox);
    let mut imported = 0;
    if claim.exists() {
        imported += drain_claim(&claim, &mut sink)?;
    }
    if inbox.exists() {
        std::fs::rename(inbox, &claim)?;
        imported += drain_claim(&claim, &mut sink)?;
    }
    Ok(imported)
}

fn drain_claim<F>(claim: &Path, sink: &mut F) -> Result<usize, BoxError>
where
    F: FnMut(VisitorBehavior) -> Result<(), BoxError>,
{
    let data = std::fs::read_to_string(claim)?;
    let lines: Vec<&str> = data.lines().collect();
    let mut imported = 0;
    for (idx, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let behavior = match serde_json::from_str::<VisitorBehavior>(line) {
            Ok(b) => b,
            Err(e) => {
                warn!(path = %claim.display(), line = idx + 1, error = %e, "skipping malformed visit");
                continue;
            }
        };
        if let Err(e) = sink(behavior) {
            let rest = claim.with_extension("tmp");
            let mut remaining = lines[idx..].join("\n");
            remaining.push('\n');
            std::fs::write(&rest, remaining)?;
            std::fs::rename(&rest, claim)?;
            warn!(
                path = %claim.display(),
                imported,
                remaining = lines.len() - idx,
                error = %e,
                "inbox drain interrupted"
            );
            return Err(e);
        }
        imported += 1;
    }
    std::fs::remove_file(claim)?;
    Ok(imported)
}
