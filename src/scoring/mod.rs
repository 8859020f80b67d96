//! Heuristic recruiter scoring of raw visitor behavior.

mod recruiter;

pub use recruiter::{
    calculate_recruiter_score, has_recruiter_source, recruiter_label, score_behavior,
    RecruiterLabel, RecruiterScore, UnknownRecruiterLabel,
};
