//! Fuel price table transformations.
//!
//! - **clean**: dedupe, text standardization, price and date filtering
//! - **normalize**: controlled vocabularies for product, region and brand
//! - **enrich**: calendar fields, margins, classifications, ethanol viability
//! - **pipeline**: the three stages in order with quality snapshots

pub mod clean;
pub mod enrich;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod stage;

pub use clean::{CleanOptions, CleanReport, clean};
pub use enrich::{EnrichOptions, GasolineIndex, enrich};
pub use error::{Result, TransformError};
pub use normalize::{NormalizeOptions, NormalizeReport, normalize, vocabulary_rules};
pub use pipeline::{PipelineOutput, StageReport, TransformPipeline};
pub use stage::Stage;
