//! Assigns training labels to historical visits from their recruiter score.

use crate::config::LabelingConfig;
use crate::model::IntentLabel;

pub struct IntentLabeler {
    config: LabelingConfig,
}

impl IntentLabeler {
    pub fn new(config: LabelingConfig) -> Self {
        Self { config }
    }

    pub fn label(&self, recruiter_score: i32) -> IntentLabel {
        if recruiter_score >= self.config.job_recruiter_min {
            IntentLabel::JobRecruiter
        } else if recruiter_score >= self.config.tech_professional_min {
            IntentLabel::TechProfessional
        } else if recruiter_score >= self.config.general_visitor_min {
            IntentLabel::GeneralVisitor
        } else {
            IntentLabel::CasualViewer
        }
    }

    pub fn config(&self) -> &LabelingConfig {
        &self.config
    }
}
