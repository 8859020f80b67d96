//! Encrypted local storage for scored visits and the persisted classifier.

mod visits;

pub use visits::{StoreError, VisitStore};
