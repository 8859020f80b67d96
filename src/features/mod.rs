//! Visitor feature vectors: the closed six-field shape the classifier consumes.

mod behavioral;

pub use behavioral::VisitorBehavior;

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of features in every [`VisitorFeatures`] vector.
pub const FEATURE_COUNT: usize = 6;

/// Names of the six features, in enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feature {
    TimeOnPage,
    PagesVisited,
    HasRecruiterSource,
    ScrollDepth,
    IsReturnVisitor,
    RecruiterScore,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::TimeOnPage,
        Feature::PagesVisited,
        Feature::HasRecruiterSource,
        Feature::ScrollDepth,
        Feature::IsReturnVisitor,
        Feature::RecruiterScore,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::TimeOnPage => "timeOnPage",
            Feature::PagesVisited => "pagesVisited",
            Feature::HasRecruiterSource => "hasRecruiterSource",
            Feature::ScrollDepth => "scrollDepth",
            Feature::IsReturnVisitor => "isReturnVisitor",
            Feature::RecruiterScore => "recruiterScore",
        }
    }
}

/// One visitor sample as seen by the intent classifier.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorFeatures {
    /// Seconds spent on the page
    pub time_on_page: f64,
    pub pages_visited: u32,
    pub has_recruiter_source: bool,
    /// Percent scrolled (0–100, not enforced)
    pub scroll_depth: f64,
    pub is_return_visitor: bool,
    pub recruiter_score: i32,
}

impl VisitorFeatures {
    /// Numeric value of a feature; booleans map to 0/1.
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::TimeOnPage => self.time_on_page,
            Feature::PagesVisited => f64::from(self.pages_visited),
            Feature::HasRecruiterSource => bool_value(self.has_recruiter_source),
            Feature::ScrollDepth => self.scroll_depth,
            Feature::IsReturnVisitor => bool_value(self.is_return_visitor),
            Feature::RecruiterScore => f64::from(self.recruiter_score),
        }
    }

    /// Values in [`Feature::ALL`] order.
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        Feature::ALL.map(|f| self.value(f))
    }

    /// Derive features from a raw behavior record and its recruiter score.
    pub fn from_behavior(behavior: &VisitorBehavior, recruiter_score: i32) -> Self {
        behavioral::derive_features(behavior, recruiter_score)
    }
}

fn bool_value(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// One `f64` per feature, keyed by feature name when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStats {
    pub time_on_page: f64,
    pub pages_visited: f64,
    pub has_recruiter_source: f64,
    pub scroll_depth: f64,
    pub is_return_visitor: f64,
    pub recruiter_score: f64,
}

impl Index<Feature> for FeatureStats {
    type Output = f64;

    fn index(&self, feature: Feature) -> &f64 {
        match feature {
            Feature::TimeOnPage => &self.time_on_page,
            Feature::PagesVisited => &self.pages_visited,
            Feature::HasRecruiterSource => &self.has_recruiter_source,
            Feature::ScrollDepth => &self.scroll_depth,
            Feature::IsReturnVisitor => &self.is_return_visitor,
            Feature::RecruiterScore => &self.recruiter_score,
        }
    }
}

impl IndexMut<Feature> for FeatureStats {
    fn index_mut(&mut self, feature: Feature) -> &mut f64 {
        match feature {
            Feature::TimeOnPage => &mut self.time_on_page,
            Feature::PagesVisited => &mut self.pages_visited,
            Feature::HasRecruiterSource => &mut self.has_recruiter_source,
            Feature::ScrollDepth => &mut self.scroll_depth,
            Feature::IsReturnVisitor => &mut self.is_return_visitor,
            Feature::RecruiterScore => &mut self.recruiter_score,
        }
    }
}
