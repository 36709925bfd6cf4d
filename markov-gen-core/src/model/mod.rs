//! Top-level module for the word-level Markov generation system.
//!
//! This module provides a bigram text generator, including:
//! - Word <-> id registration (`TokenRepository`)
//! - Text scanning (`scanner`)
//! - Predecessor statistics (`StatisticsTable`, `TransitionRecord`)
//! - Generation parameters (`GenerationInput`)
//! - Training and generation (`Predictor`)

/// Bidirectional word <-> token id mapping.
///
/// Ids are dense and assigned in first-seen order.
pub mod token_repository;

/// Splits raw text into word and punctuation tokens.
///
/// Registers every new word into a `TokenRepository` as it goes.
pub mod scanner;

/// Predecessor frequency tables, one record per observed token.
///
/// Exposes conditional weights used for weighted random sampling.
pub mod statistics;

/// Generation parameters: prompt, output length and optional RNG seed.
pub mod generation_input;

/// Training and generation on top of the components above.
pub mod predictor;
