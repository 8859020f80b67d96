//! Intent classification: incremental Gaussian Naive Bayes and a thread-shared wrapper.

mod naive_bayes;
mod shared;

pub use naive_bayes::{
    ClassStatistics, ClassifierState, IntentClasses, IntentClassifier, IntentLabel, ModelError,
    EPSILON, FEATURE_LIMIT,
};
pub use shared::SharedClassifier;
