//! Mutex-guarded classifier for processes that train and predict from several threads.

use super::{IntentClassifier, IntentLabel};
use crate::features::VisitorFeatures;
use std::sync::{Mutex, MutexGuard};

/// One classifier instance shared by reference (e.g. behind an `Arc`).
/// Each `train` holds the lock for the whole Welford update.
#[derive(Debug, Default)]
pub struct SharedClassifier {
    inner: Mutex<IntentClassifier>,
}

impl SharedClassifier {
    pub fn new(classifier: IntentClassifier) -> Self {
        Self {
            inner: Mutex::new(classifier),
        }
    }

    // `train` does no fallible work, so a poisoned lock still guards consistent statistics.
    fn lock(&self) -> MutexGuard<'_, IntentClassifier> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn train(&self, features: &VisitorFeatures, label: IntentLabel) {
        self.lock().train(features, label);
    }

    pub fn predict(&self, features: &VisitorFeatures) -> IntentLabel {
        self.lock().predict(features)
    }

    /// Prediction from a trained model, `None` before any training. One lock for both checks.
    pub fn try_predict(&self, features: &VisitorFeatures) -> Option<IntentLabel> {
        let model = self.lock();
        model.is_trained().then(|| model.predict(features))
    }

    pub fn is_trained(&self) -> bool {
        self.lock().is_trained()
    }

    pub fn total_samples(&self) -> u64 {
        self.lock().total_samples()
    }

    /// Copy of the current model, e.g. for persisting.
    pub fn snapshot(&self) -> IntentClassifier {
        self.lock().clone()
    }

    /// Swap in a freshly trained model.
    pub fn replace(&self, classifier: IntentClassifier) {
        *self.lock() = classifier;
    }
}
