//! Incremental Gaussian Naive Bayes over [`VisitorFeatures`].
//!
//! Per-class mean and variance are maintained with Welford's online update, so
//! training is a single pass and never revisits earlier samples. Prediction
//! sums log prior and per-feature log Gaussian densities and returns the
//! highest-scoring class that has seen at least one sample.

use crate::features::{Feature, FeatureStats, VisitorFeatures};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use thiserror::Error;

/// Floor for zero variances and for densities inside `ln`.
pub const EPSILON: f64 = 1e-9;

/// Feature values are clamped to `±FEATURE_LIMIT` before training and scoring,
/// keeping squared deviations summed over billions of samples finite.
pub const FEATURE_LIMIT: f64 = 1e12;

fn bounded(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(-FEATURE_LIMIT, FEATURE_LIMIT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentLabel {
    #[serde(rename = "Job Recruiter")]
    JobRecruiter,
    #[serde(rename = "General Visitor")]
    GeneralVisitor,
    #[serde(rename = "Tech Professional")]
    TechProfessional,
    #[serde(rename = "Casual Viewer")]
    CasualViewer,
}

impl IntentLabel {
    /// Enumeration order; ties in `predict` resolve to the earlier label.
    pub const ALL: [IntentLabel; 4] = [
        IntentLabel::JobRecruiter,
        IntentLabel::GeneralVisitor,
        IntentLabel::TechProfessional,
        IntentLabel::CasualViewer,
    ];

    /// Returned by `predict` before any training.
    pub const DEFAULT: IntentLabel = IntentLabel::CasualViewer;

    pub fn as_str(self) -> &'static str {
        match self {
            IntentLabel::JobRecruiter => "Job Recruiter",
            IntentLabel::GeneralVisitor => "General Visitor",
            IntentLabel::TechProfessional => "Tech Professional",
            IntentLabel::CasualViewer => "Casual Viewer",
        }
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentLabel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntentLabel::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| ModelError::UnknownLabel(s.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown intent label: {0}")]
    UnknownLabel(String),
    #[error("classifier state decode failed: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("classifier state inconsistent: total_samples {total} but class counts sum to {sum}")]
    InconsistentTotals { total: u64, sum: u64 },
    #[error("non-finite {stat} for {label}.{feature}")]
    NonFinite {
        label: IntentLabel,
        feature: &'static str,
        stat: &'static str,
    },
}

/// Running aggregate for one label.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStatistics {
    pub count: u64,
    pub feature_means: FeatureStats,
    /// Unbiased sample variance; zero while `count <= 1`
    pub feature_variances: FeatureStats,
    /// Sum of squared deviations from the running mean
    #[serde(rename = "featureM2")]
    pub feature_m2: FeatureStats,
}

impl ClassStatistics {
    fn check_finite(&self, label: IntentLabel) -> Result<(), ModelError> {
        for f in Feature::ALL {
            for (stat, value) in [
                ("mean", self.feature_means[f]),
                ("variance", self.feature_variances[f]),
                ("m2", self.feature_m2[f]),
            ] {
                if !value.is_finite() {
                    return Err(ModelError::NonFinite {
                        label,
                        feature: f.as_str(),
                        stat,
                    });
                }
            }
        }
        Ok(())
    }

    fn update(&mut self, features: &VisitorFeatures) {
        self.count += 1;
        let n = self.count as f64;
        for f in Feature::ALL {
            let x = bounded(features.value(f));
            let old_mean = self.feature_means[f];
            let new_mean = old_mean + (x - old_mean) / n;
            self.feature_means[f] = new_mean;
            self.feature_m2[f] += (x - old_mean) * (x - new_mean);
            self.feature_variances[f] = if self.count > 1 {
                self.feature_m2[f] / (n - 1.0)
            } else {
                0.0
            };
        }
    }

    fn log_likelihood(&self, features: &VisitorFeatures) -> f64 {
        Feature::ALL
            .iter()
            .map(|&f| {
                let v = self.feature_variances[f];
                let variance = if v > 0.0 { v } else { EPSILON };
                let diff = bounded(features.value(f)) - self.feature_means[f];
                let p = (1.0 / (2.0 * PI * variance).sqrt())
                    * (-(diff * diff) / (2.0 * variance)).exp();
                (p + EPSILON).ln()
            })
            .sum()
    }
}

/// Statistics for all four labels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IntentClasses {
    #[serde(rename = "Job Recruiter")]
    pub job_recruiter: ClassStatistics,
    #[serde(rename = "General Visitor")]
    pub general_visitor: ClassStatistics,
    #[serde(rename = "Tech Professional")]
    pub tech_professional: ClassStatistics,
    #[serde(rename = "Casual Viewer")]
    pub casual_viewer: ClassStatistics,
}

impl Index<IntentLabel> for IntentClasses {
    type Output = ClassStatistics;

    fn index(&self, label: IntentLabel) -> &ClassStatistics {
        match label {
            IntentLabel::JobRecruiter => &self.job_recruiter,
            IntentLabel::GeneralVisitor => &self.general_visitor,
            IntentLabel::TechProfessional => &self.tech_professional,
            IntentLabel::CasualViewer => &self.casual_viewer,
        }
    }
}

impl IndexMut<IntentLabel> for IntentClasses {
    fn index_mut(&mut self, label: IntentLabel) -> &mut ClassStatistics {
        match label {
            IntentLabel::JobRecruiter => &mut self.job_recruiter,
            IntentLabel::GeneralVisitor => &mut self.general_visitor,
            IntentLabel::TechProfessional => &mut self.tech_professional,
            IntentLabel::CasualViewer => &mut self.casual_viewer,
        }
    }
}

/// Full persisted model.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierState {
    pub classes: IntentClasses,
    pub total_samples: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntentClassifier {
    state: ClassifierState,
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted state. Rejects states whose total disagrees with the class counts.
    pub fn from_state(state: ClassifierState) -> Result<Self, ModelError> {
        let sum: u64 = IntentLabel::ALL.iter().map(|&l| state.classes[l].count).sum();
        if sum != state.total_samples {
            return Err(ModelError::InconsistentTotals {
                total: state.total_samples,
                sum,
            });
        }
        Ok(Self { state })
    }

    pub fn state(&self) -> &ClassifierState {
        &self.state
    }

    pub fn from_json(data: &str) -> Result<Self, ModelError> {
        let state: ClassifierState = serde_json::from_str(data)?;
        Self::from_state(state)
    }

    /// Fails rather than writing a state that could not be read back.
    pub fn to_json(&self) -> Result<String, ModelError> {
        for label in IntentLabel::ALL {
            self.state.classes[label].check_finite(label)?;
        }
        Ok(serde_json::to_string(&self.state)?)
    }

    pub fn class_stats(&self, label: IntentLabel) -> &ClassStatistics {
        &self.state.classes[label]
    }

    pub fn total_samples(&self) -> u64 {
        self.state.total_samples
    }

    pub fn is_trained(&self) -> bool {
        self.state.total_samples > 0
    }

    /// Fold one labeled sample into its class statistics.
    pub fn train(&mut self, features: &VisitorFeatures, label: IntentLabel) {
        self.state.classes[label].update(features);
        self.state.total_samples += 1;
    }

    /// Log-probability of each class that has seen at least one sample, in label order.
    pub fn log_scores(&self, features: &VisitorFeatures) -> Vec<(IntentLabel, f64)> {
        let total = self.state.total_samples as f64;
        IntentLabel::ALL
            .iter()
            .filter_map(|&label| {
                let stats = &self.state.classes[label];
                if stats.count == 0 {
                    return None;
                }
                let prior = (stats.count as f64 / total).ln();
                Some((label, prior + stats.log_likelihood(features)))
            })
            .collect()
    }

    /// Most probable label; [`IntentLabel::DEFAULT`] when nothing has been trained.
    pub fn predict(&self, features: &VisitorFeatures) -> IntentLabel {
        let mut best = IntentLabel::DEFAULT;
        let mut best_score = f64::NEG_INFINITY;
        for (label, score) in self.log_scores(features) {
            if score > best_score {
                best = label;
                best_score = score;
            }
        }
        best
    }
}
