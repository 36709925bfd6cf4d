//! Errors surfaced by the Markov generator.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::token_repository::TokenId;

/// Convenient result type used throughout the crate.
pub type Result<T, E = GenError> = std::result::Result<T, E>;

/// Failures raised by the repository, the predictor, or corpus loading.
///
/// Apart from `Io`, every variant is a broken precondition rather than
/// a transient failure: nothing here is worth retrying.
#[derive(Debug, Error)]
pub enum GenError {
	/// A word was looked up before being registered.
	#[error("unknown word: {0:?}")]
	UnknownWord(String),
	/// A token id was looked up that was never assigned.
	#[error("unknown token id: {0}")]
	UnknownId(TokenId),
	/// Requested generation length exceeds `MAX_LENGTH`.
	#[error("length {0} exceeds the maximum of {max}", max = crate::model::generation_input::MAX_LENGTH)]
	LengthTooLarge(usize),
	/// Generation was requested before any training.
	#[error("model is empty, train it before generating")]
	EmptyModel,
	/// Reading the corpus failed.
	#[error("io error while reading {path:?}: {source}")]
	Io {
		source: std::io::Error,
		path: PathBuf,
	},
}

impl GenError {
	/// Wraps an IO error with the path that caused it.
	pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
		Self::Io { source, path: path.into() }
	}
}
