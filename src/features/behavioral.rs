//! Raw visitor behavior as reported by the site, and its mapping onto features.

use super::VisitorFeatures;
use crate::scoring;
use serde::{Deserialize, Serialize};

/// Behavior observed for one visit. Only `path` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorBehavior {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_return_visitor: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrolled_to_bottom: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloaded_resume: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages_visited_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_rapid_bounce: Option<bool>,
    /// Measured scroll percentage, when the client reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_depth: Option<f64>,
}

impl VisitorBehavior {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

pub(super) fn derive_features(b: &VisitorBehavior, recruiter_score: i32) -> VisitorFeatures {
    let scrolled = b.scrolled_to_bottom.unwrap_or(false);
    let scroll_depth = match b.scroll_depth.filter(|d| d.is_finite()) {
        Some(d) => d,
        None if scrolled => 100.0,
        None => 0.0,
    };
    VisitorFeatures {
        time_on_page: b
            .duration_seconds
            .filter(|d| d.is_finite())
            .unwrap_or(0.0)
            .max(0.0),
        // the landing page itself counts as one
        pages_visited: b.pages_visited_count.unwrap_or(1),
        has_recruiter_source: scoring::has_recruiter_source(b.source.as_deref()),
        scroll_depth,
        is_return_visitor: b.is_return_visitor.unwrap_or(false),
        recruiter_score,
    }
}
