//! Additive rules over visit behavior; produces a recruiter score and label.

use crate::features::VisitorBehavior;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const RECRUITER_SOURCES: [&str; 4] = ["linkedin", "job", "recruiter", "application"];
const CAREER_PATHS: [&str; 4] = ["cv", "experience", "projects", "resume"];

const SOURCE_WEIGHT: i32 = 5;
const PATH_WEIGHT: i32 = 3;
const LONG_VISIT_WEIGHT: i32 = 2;
const RETURN_VISIT_WEIGHT: i32 = 2;
const SCROLL_WEIGHT: i32 = 1;
const RESUME_DOWNLOAD_WEIGHT: i32 = 10;
const DEEP_BROWSE_WEIGHT: i32 = 15;
const RAPID_BOUNCE_PENALTY: i32 = -3;

const LONG_VISIT_SECS: f64 = 90.0;
const DEEP_BROWSE_PAGES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecruiterLabel {
    #[serde(rename = "High-Intent Recruiter")]
    HighIntentRecruiter,
    #[serde(rename = "Likely Recruiter")]
    LikelyRecruiter,
    #[serde(rename = "Curious Professional")]
    CuriousProfessional,
    #[serde(rename = "Casual Visitor")]
    CasualVisitor,
}

impl RecruiterLabel {
    pub fn from_score(score: i32) -> Self {
        if score > 20 {
            RecruiterLabel::HighIntentRecruiter
        } else if score >= 13 {
            RecruiterLabel::LikelyRecruiter
        } else if score >= 6 {
            RecruiterLabel::CuriousProfessional
        } else {
            RecruiterLabel::CasualVisitor
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecruiterLabel::HighIntentRecruiter => "High-Intent Recruiter",
            RecruiterLabel::LikelyRecruiter => "Likely Recruiter",
            RecruiterLabel::CuriousProfessional => "Curious Professional",
            RecruiterLabel::CasualVisitor => "Casual Visitor",
        }
    }

    pub const ALL: [RecruiterLabel; 4] = [
        RecruiterLabel::HighIntentRecruiter,
        RecruiterLabel::LikelyRecruiter,
        RecruiterLabel::CuriousProfessional,
        RecruiterLabel::CasualVisitor,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown recruiter label: {0}")]
pub struct UnknownRecruiterLabel(pub String);

impl FromStr for RecruiterLabel {
    type Err = UnknownRecruiterLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecruiterLabel::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| UnknownRecruiterLabel(s.to_string()))
    }
}

impl fmt::Display for RecruiterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score and label for a single visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterScore {
    pub score: i32,
    pub label: RecruiterLabel,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    needles.iter().any(|n| lower.contains(n))
}

/// True when the referral source names a job board, recruiter or application flow.
pub fn has_recruiter_source(source: Option<&str>) -> bool {
    source.is_some_and(|s| contains_any(s, &RECRUITER_SOURCES))
}

/// Sum of every rule that fires for this behavior. Absent fields never fire.
pub fn calculate_recruiter_score(b: &VisitorBehavior) -> i32 {
    let mut score = 0;
    if has_recruiter_source(b.source.as_deref()) {
        score += SOURCE_WEIGHT;
    }
    if contains_any(&b.path, &CAREER_PATHS) {
        score += PATH_WEIGHT;
    }
    if b.duration_seconds.is_some_and(|d| d > LONG_VISIT_SECS) {
        score += LONG_VISIT_WEIGHT;
    }
    if b.is_return_visitor.unwrap_or(false) {
        score += RETURN_VISIT_WEIGHT;
    }
    if b.scrolled_to_bottom.unwrap_or(false) {
        score += SCROLL_WEIGHT;
    }
    if b.downloaded_resume.unwrap_or(false) {
        score += RESUME_DOWNLOAD_WEIGHT;
    }
    if b.pages_visited_count.is_some_and(|n| n > DEEP_BROWSE_PAGES) {
        score += DEEP_BROWSE_WEIGHT;
    }
    if b.is_rapid_bounce.unwrap_or(false) {
        score += RAPID_BOUNCE_PENALTY;
    }
    score
}

pub fn recruiter_label(score: i32) -> RecruiterLabel {
    RecruiterLabel::from_score(score)
}

pub fn score_behavior(b: &VisitorBehavior) -> RecruiterScore {
    let score = calculate_recruiter_score(b);
    RecruiterScore {
        score,
        label: recruiter_label(score),
    }
}
