//! Visitor intent — recruiter scoring and intent classification for portfolio analytics.
//!
//! Modular structure:
//! - [`scoring`] — Additive recruiter-likelihood heuristic over raw visit behavior
//! - [`features`] — Fixed six-field feature vectors and their derivation from behavior
//! - [`model`] — Incremental Gaussian Naive Bayes intent classifier
//! - [`labeling`] — Score thresholds that assign training labels
//! - [`storage`] — Encrypted local visit store and model persistence
//! - [`ingest`] — Visit recording and NDJSON import
//! - [`retrain`] — Batch retraining pass
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod scoring;
pub mod features;
pub mod model;
pub mod labeling;
pub mod storage;
pub mod ingest;
pub mod retrain;
pub mod logging;

pub use config::IntentConfig;
pub use scoring::{calculate_recruiter_score, recruiter_label, RecruiterLabel};
pub use features::{Feature, VisitorBehavior, VisitorFeatures};
pub use model::{IntentClassifier, IntentLabel, SharedClassifier};
pub use labeling::IntentLabeler;
pub use storage::VisitStore;
pub use ingest::{VisitRecord, VisitRecorder};
pub use retrain::{RetrainReport, Retrainer};
pub use logging::StructuredLogger;
