//! Synthetic CRM dataset generation engine.
//!
//! A single seeded generator is threaded through every entity generator in
//! dependency order, so a fixed configuration reproduces the same dataset
//! byte for byte.

pub mod checks;
pub mod dataset;
pub mod distributions;
pub mod engine;
pub mod errors;
pub mod faker;
pub mod generators;
pub mod ids;
pub mod model;
pub mod output;
pub mod records;
pub mod reference;

pub use checks::{VerificationReport, Violation, verify_dataset};
pub use dataset::{Collection, Dataset};
pub use engine::{GenerationEngine, GenerationResult};
pub use errors::GenerationError;
pub use model::{EntityCounts, GenerationConfig, GenerationIssue, GenerationReport};
pub use output::{OutputFormat, WrittenFile, write_dataset};
