//! Bigram (first-order) Markov-chain text generation library.
//!
//! This crate provides a word-level Markov chain including:
//! - A word <-> token id repository
//! - A scanner turning raw text into token ids
//! - Per-token predecessor statistics
//! - A predictor that trains on a corpus and samples new text
//!
//! I/O around the core (reading prompts, printing results) is left
//! to the binaries.

/// Word-level Markov models and generation logic.
pub mod model;

/// Corpus loading helpers.
pub mod io;

/// Error type shared across the crate.
pub mod error;

pub use error::{GenError, Result};
pub use model::generation_input::GenerationInput;
pub use model::predictor::{ModelSummary, Predictor};
pub use model::token_repository::TokenId;
