//! Smoothed n-gram language models.
//!
//! This crate provides an n-gram distribution over words, characters or any
//! other token stream, including:
//! - Frequency counting for every order from 1 to N
//! - Absolute-discounting smoothing, recursively backed off to lower orders
//! - Probability, log-likelihood and perplexity queries
//! - Seeded, reproducible random sentence generation
//!
//! A trained model is immutable and can be shared across threads for
//! concurrent queries.

/// Error taxonomy shared by every operation.
pub mod error;

/// The n-gram distribution, its configuration and generation logic.
pub mod model;

/// Tokenized documents consumed by training and scoring.
pub mod document;

/// Tokenizers turning raw text into token streams and n-gram windows.
pub mod tokenizer;

/// I/O utilities (corpus loading, cache path helpers).
pub mod io;
