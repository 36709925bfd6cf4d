use serde::{Deserialize, Serialize};

/// Number of tokens generated when no length is given.
pub const DEFAULT_LENGTH: usize = 100;

/// Largest accepted length. Bounds work and memory per generation.
pub const MAX_LENGTH: usize = 100_000;

fn default_length() -> usize {
	DEFAULT_LENGTH
}

/// Input parameters for one generation.
///
/// # Responsibilities
/// - Carry the prompt whose last token seeds the chain
/// - Bound the generated sequence (`length` tokens, seed included)
/// - Optionally pin the random source for reproducible output
///
/// Deserializable so binaries can build it straight from a query string;
/// missing fields fall back to their defaults.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GenerationInput {
	/// Text whose last token starts the chain. Kept verbatim in the output.
	#[serde(default)]
	pub prompt: String,

	/// Number of tokens in the generated sequence, seed included.
	/// 0 is treated like 1: the output is the prompt alone.
	#[serde(default = "default_length")]
	pub length: usize,

	/// Seed for a `StdRng`. `None` uses the thread-local generator.
	#[serde(default)]
	pub seed: Option<u64>,
}

impl GenerationInput {
	/// Creates an input for `prompt` with the default length and no seed.
	pub fn new(prompt: impl Into<String>) -> Self {
		Self { prompt: prompt.into(), length: DEFAULT_LENGTH, seed: None }
	}

	pub fn with_length(mut self, length: usize) -> Self {
		self.length = length;
		self
	}

	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self::new("")
	}
}
