//! Top-level module for the n-gram distribution.
//!
//! - Per-order tables and smoothing (`Level`, internal)
//! - The full model chain and its queries (`NGramDistribution`)
//! - Training and generation settings (`NGramConfig`, `Backoff`, `StartSeed`)
//! - Random sentence generation

/// Training configuration, backoff policy and generation start strategies.
pub mod config;

/// The order-N model: training, probability queries, scoring.
pub mod distribution;

/// Seeded random sentence generation.
mod generator;

/// One order of the model chain.
///
/// Holds the frequency table, discount and smoothed distribution of a
/// single order. Not exposed publicly.
mod level;

pub use level::{FrequencyTable, ProbabilityTable};
