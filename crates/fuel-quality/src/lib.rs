//! Data quality scoring: completeness, validity, consistency and uniqueness
//! rolled into one overall score.

mod checker;
pub mod checks;
mod scoring;

pub use checker::QualityChecker;
pub use checks::completeness::completeness;
pub use checks::consistency::consistency;
pub use checks::uniqueness::uniqueness;
pub use checks::validity::validity;
pub use scoring::{
    COMPLETENESS_THRESHOLD, OVERALL_THRESHOLD, UNIQUENESS_THRESHOLD, VALIDITY_THRESHOLD, issues,
    overall_score, report, schema_check,
};
