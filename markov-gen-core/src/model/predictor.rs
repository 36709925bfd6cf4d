use std::path::Path;

use log::{debug, info};
use rand::prelude::IteratorRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{GenError, Result};
use crate::io;
use super::generation_input::{GenerationInput, MAX_LENGTH};
use super::scanner;
use super::statistics::StatisticsTable;
use super::token_repository::{TokenId, TokenRepository};

/// Words after which the next word is capitalized.
const END_OF_SENTENCE: [&str; 3] = [".", "?", "!"];

/// Words rendered without a space in front of them.
const NO_SPACE_BEFORE: [&str; 4] = [".", "?", "!", ","];

/// Size of a trained model.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelSummary {
	/// Distinct words registered, prompt words included.
	pub vocabulary_size: usize,
	/// Tokens that were observed with a predecessor.
	pub record_count: usize,
}

/// Word-level bigram Markov chain.
///
/// # Responsibilities
/// - Own the word repository and the predecessor statistics
/// - Accumulate statistics from any number of training texts
/// - Sample the next token given the previous one
/// - Generate and render a continuation of a prompt
///
/// Training and prompt scanning register words, so both need `&mut self`.
/// Sampling itself only reads.
#[derive(Clone, Debug, Default)]
pub struct Predictor {
	repository: TokenRepository,
	statistics: StatisticsTable,
}

impl Predictor {
	/// Creates an empty, untrained predictor.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a predictor trained on the corpus stored at `filepath`.
	///
	/// Lines are trimmed and joined with a space before training.
	///
	/// # Errors
	/// Returns `GenError::Io` if the file cannot be read.
	pub fn from_corpus_file<P: AsRef<Path>>(filepath: P) -> Result<Self> {
		let corpus = io::read_corpus(&filepath)?;
		let mut predictor = Self::new();
		predictor.train(&corpus);
		Ok(predictor)
	}

	pub fn repository(&self) -> &TokenRepository {
		&self.repository
	}

	pub fn statistics(&self) -> &StatisticsTable {
		&self.statistics
	}

	pub fn summary(&self) -> ModelSummary {
		ModelSummary {
			vocabulary_size: self.repository.len(),
			record_count: self.statistics.len(),
		}
	}

	/// Adds `text` to the model.
	///
	/// Every token but the first is recorded against the token right
	/// before it. Calling `train` again accumulates: counts from separate
	/// calls are summed, and no transition spans two calls.
	pub fn train(&mut self, text: &str) {
		let tokens = scanner::scan(&mut self.repository, text);
		for pair in tokens.windows(2) {
			self.statistics.observe(pair[0], pair[1]);
		}
		let summary = self.summary();
		info!(
			"trained on {} tokens: {} words, {} records",
			tokens.len(),
			summary.vocabulary_size,
			summary.record_count
		);
	}

	/// Samples the token following `token` with the thread-local generator.
	///
	/// See `get_next_with`.
	pub fn get_next(&self, token: TokenId) -> Result<TokenId> {
		self.get_next_with(token, &mut rand::rng())
	}

	/// Samples the token following `token`.
	///
	/// Every recorded token is a candidate, weighted by how often `token`
	/// preceded it relative to all its predecessors. When no candidate has
	/// a positive weight, one is picked uniformly instead.
	///
	/// This method performs:
	/// - an O(n) scan over the records
	/// - a cumulative subtraction to select a bucket
	///
	/// # Errors
	/// Returns `GenError::EmptyModel` if nothing was trained.
	pub fn get_next_with<R: Rng>(&self, token: TokenId, rng: &mut R) -> Result<TokenId> {
		if self.statistics.is_empty() {
			return Err(GenError::EmptyModel);
		}

		let weights = self.statistics.weights(token);
		let total: f64 = weights.iter().map(|(_, weight)| weight).sum();
		if total <= 0.0 {
			debug!("no record follows token {token}, picking uniformly");
			return self.statistics.tokens().choose(rng).ok_or(GenError::EmptyModel);
		}

		let mut r = rng.random_range(0.0..total);

		let mut fallback = None;
		for (candidate, weight) in weights {
			if weight <= 0.0 {
				continue;
			}
			if r < weight {
				return Ok(candidate);
			}
			r -= weight;
			fallback = Some(candidate);
		}

		// Rounding can leave `r` past the last bucket
		fallback.ok_or(GenError::EmptyModel)
	}

	/// Generates the token sequence continuing `prompt`.
	///
	/// The prompt is scanned (registering its new words), its last token
	/// becomes the seed, and `length - 1` tokens are sampled after it.
	/// The result always starts with the seed, so it holds `max(length, 1)`
	/// tokens.
	///
	/// # Errors
	/// - `GenError::LengthTooLarge` if `length` exceeds `MAX_LENGTH`.
	/// - `GenError::EmptyModel` if nothing was trained.
	///
	/// The repository is left untouched in both cases.
	pub fn generate_tokens_with<R: Rng>(&mut self, prompt: &str, length: usize, rng: &mut R) -> Result<Vec<TokenId>> {
		if length > MAX_LENGTH {
			return Err(GenError::LengthTooLarge(length));
		}
		if self.statistics.is_empty() {
			return Err(GenError::EmptyModel);
		}

		let prompt_tokens = scanner::scan(&mut self.repository, prompt);
		// Splitting always yields at least one field, even for ""
		let seed = *prompt_tokens
			.last()
			.ok_or_else(|| GenError::UnknownWord(prompt.to_owned()))?;

		let mut generated = Vec::new();
		generated.push(seed);
		let mut current = seed;
		for _ in 1..length {
			current = self.get_next_with(current, rng)?;
			generated.push(current);
		}
		debug!("generated {} tokens from seed {seed}", generated.len());
		Ok(generated)
	}

	/// Generates a continuation of `prompt` with the thread-local generator.
	pub fn generate_text(&mut self, prompt: &str, length: usize) -> Result<String> {
		self.generate_text_with(prompt, length, &mut rand::rng())
	}

	/// Generates a continuation of `prompt` and renders it after the prompt.
	pub fn generate_text_with<R: Rng>(&mut self, prompt: &str, length: usize, rng: &mut R) -> Result<String> {
		let tokens = self.generate_tokens_with(prompt, length, rng)?;
		self.tokens_to_text(prompt, &tokens)
	}

	/// Generates text from a `GenerationInput`.
	///
	/// A set `seed` makes the output reproducible for a given model.
	pub fn generate(&mut self, input: &GenerationInput) -> Result<String> {
		match input.seed {
			Some(seed) => self.generate_text_with(&input.prompt, input.length, &mut StdRng::seed_from_u64(seed)),
			None => self.generate_text(&input.prompt, input.length),
		}
	}

	/// Renders a generated sequence after the verbatim `prompt`.
	///
	/// The first token is the seed, already part of the prompt: it is not
	/// written again, only remembered as the previous word.
	/// For every following token:
	/// - the word is capitalized if the previous one ended a sentence
	/// - a space is written before it unless it is `.` `?` `!` or `,`
	///
	/// # Errors
	/// Returns `GenError::UnknownId` if a token was never assigned.
	pub fn tokens_to_text(&self, prompt: &str, tokens: &[TokenId]) -> Result<String> {
		let mut text = prompt.to_owned();
		let Some((seed, continuation)) = tokens.split_first() else {
			return Ok(text);
		};

		let mut previous = self.repository.get_word(*seed)?.to_owned();
		for token in continuation {
			let word = self.repository.get_word(*token)?;
			let word = if END_OF_SENTENCE.contains(&previous.as_str()) {
				capitalize(word)
			} else {
				word.to_owned()
			};

			if !NO_SPACE_BEFORE.contains(&word.as_str()) {
				text.push(' ');
			}
			text.push_str(&word);
			previous = word;
		}
		Ok(text)
	}
}

/// Upper-cases the first character of `word`.
fn capitalize(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	const CORPUS: &str = "the cat sat. the dog sat.";

	fn trained() -> Predictor {
		let mut predictor = Predictor::new();
		predictor.train(CORPUS);
		predictor
	}

	fn id(predictor: &Predictor, word: &str) -> TokenId {
		predictor.repository().get_id(word).unwrap()
	}

	#[test]
	fn training_records_predecessors() {
		let predictor = trained();
		let sat = predictor.statistics().get(id(&predictor, "sat")).unwrap();

		assert_eq!(sat.count(id(&predictor, "cat")), 1);
		assert_eq!(sat.count(id(&predictor, "dog")), 1);
		assert_eq!(sat.total(), 2);
		// the, cat, sat, ., dog and the trailing empty field
		assert_eq!(predictor.summary(), ModelSummary { vocabulary_size: 6, record_count: 6 });
		// The very first token has no predecessor
		let the = predictor.statistics().get(id(&predictor, "the")).unwrap();
		assert_eq!(the.total(), 1);
	}

	#[test]
	fn training_accumulates_across_calls() {
		let mut predictor = Predictor::new();
		predictor.train("a b");
		predictor.train("a b");

		let b = predictor.statistics().get(id(&predictor, "b")).unwrap();
		assert_eq!(b.count(id(&predictor, "a")), 2);
		// No transition from the end of one call to the start of the next
		assert!(predictor.statistics().get(id(&predictor, "a")).is_none());
	}

	#[test]
	fn single_candidate_is_always_chosen() {
		let predictor = trained();
		let mut rng = StdRng::seed_from_u64(1);
		let sat = id(&predictor, "sat");
		let dot = id(&predictor, ".");

		for _ in 0..100 {
			assert_eq!(predictor.get_next_with(sat, &mut rng).unwrap(), dot);
		}
	}

	#[test]
	fn sampling_follows_weights() {
		let mut predictor = Predictor::new();
		let a = predictor.repository.register("a");
		let b = predictor.repository.register("b");
		let c = predictor.repository.register("c");
		let d = predictor.repository.register("d");
		// Weights are normalized per candidate, so `d` dilutes a and c to 0.9 and 0.1 given b
		for _ in 0..9 {
			predictor.statistics.observe(b, a);
			predictor.statistics.observe(d, c);
		}
		predictor.statistics.observe(d, a);
		predictor.statistics.observe(b, c);

		let mut rng = StdRng::seed_from_u64(42);
		let trials = 10_000;
		let mut hits_a = 0;
		for _ in 0..trials {
			let next = predictor.get_next_with(b, &mut rng).unwrap();
			assert!(next == a || next == c);
			if next == a {
				hits_a += 1;
			}
		}
		let ratio = hits_a as f64 / trials as f64;
		assert!((0.87..=0.93).contains(&ratio), "ratio was {ratio}");
	}

	#[test]
	fn unknown_predecessor_falls_back_to_uniform() {
		let mut predictor = trained();
		let stranger = predictor.repository.register("zebra");
		let candidates: HashSet<TokenId> = predictor.statistics().tokens().collect();

		let mut rng = StdRng::seed_from_u64(3);
		let mut seen = HashSet::new();
		for _ in 0..1_000 {
			let next = predictor.get_next_with(stranger, &mut rng).unwrap();
			assert!(candidates.contains(&next));
			seen.insert(next);
		}
		assert_eq!(seen, candidates);
	}

	#[test]
	fn empty_model_is_reported() {
		let mut predictor = Predictor::new();

		assert!(matches!(predictor.get_next(0), Err(GenError::EmptyModel)));
		assert!(matches!(predictor.generate_text("hello", 10), Err(GenError::EmptyModel)));
		assert!(predictor.repository().is_empty());
	}

	#[test]
	fn generated_sequence_has_requested_length() {
		let mut predictor = trained();
		let mut rng = StdRng::seed_from_u64(9);

		for length in [1, 2, 5, 37] {
			let tokens = predictor.generate_tokens_with("the", length, &mut rng).unwrap();
			assert_eq!(tokens.len(), length);
			assert_eq!(tokens[0], id(&predictor, "the"));
		}
		let tokens = predictor.generate_tokens_with("the", 0, &mut rng).unwrap();
		assert_eq!(tokens, vec![id(&predictor, "the")]);
	}

	#[test]
	fn prompt_words_are_registered() {
		let mut predictor = trained();
		let before = predictor.repository().len();

		let text = predictor.generate_text("A Zebra", 3).unwrap();

		assert!(text.starts_with("A Zebra"));
		assert!(predictor.repository().contains("zebra"));
		assert_eq!(predictor.repository().len(), before + 2);
		assert_eq!(predictor.summary().record_count, 6);
	}

	#[test]
	fn oversized_length_is_rejected() {
		let mut predictor = trained();
		let before = predictor.repository().len();
		let mut rng = StdRng::seed_from_u64(1);

		let result = predictor.generate_tokens_with("a zebra", usize::MAX, &mut rng);
		assert!(matches!(result, Err(GenError::LengthTooLarge(usize::MAX))));
		assert!(matches!(
			predictor.generate_text("the", MAX_LENGTH + 1),
			Err(GenError::LengthTooLarge(_))
		));
		assert_eq!(predictor.repository().len(), before);

		let tokens = predictor.generate_tokens_with("the", MAX_LENGTH, &mut rng).unwrap();
		assert_eq!(tokens.len(), MAX_LENGTH);
	}

	#[test]
	fn zero_length_renders_the_prompt_alone() {
		let mut predictor = trained();
		assert_eq!(predictor.generate_text("The Cat", 0).unwrap(), "The Cat");
		assert_eq!(predictor.generate_text("The Cat", 1).unwrap(), "The Cat");
	}

	#[test]
	fn seeded_generation_is_reproducible() {
		let input = GenerationInput::new("the").with_length(20).with_seed(2024);
		let first = trained().generate(&input).unwrap();
		let second = trained().generate(&input).unwrap();

		assert_eq!(first, second);
		assert!(first.starts_with("the"));
	}

	#[test]
	fn rendering_capitalizes_after_sentence_end() {
		let mut predictor = Predictor::new();
		predictor.train("it ended. the cat, and? so! yes");
		let tokens: Vec<TokenId> = ["ended", ".", "the", "cat", ",", "and", "?", "so", "!", "yes"]
			.iter()
			.map(|w| id(&predictor, w))
			.collect();

		let text = predictor.tokens_to_text("It ended", &tokens).unwrap();

		assert_eq!(text, "It ended. The cat, and? So! Yes");
	}

	#[test]
	fn rendering_spaces_dashes_and_keeps_prompt_verbatim() {
		let mut predictor = Predictor::new();
		predictor.train("x-ray vision");
		let tokens: Vec<TokenId> = ["x", "-", "ray", "vision"].iter().map(|w| id(&predictor, w)).collect();

		let text = predictor.tokens_to_text("  Big X", &tokens).unwrap();

		assert_eq!(text, "  Big X - ray vision");
	}

	#[test]
	fn rendering_unknown_id_fails() {
		let predictor = trained();
		let result = predictor.tokens_to_text("the", &[0, 999]);
		assert!(matches!(result, Err(GenError::UnknownId(999))));
	}

	#[test]
	fn capitalize_handles_empty_and_unicode() {
		assert_eq!(capitalize(""), "");
		assert_eq!(capitalize("élan"), "Élan");
		assert_eq!(capitalize("ß"), "SS");
	}

	#[test]
	fn corpus_file_trains_a_predictor() {
		let workspace = tempfile::tempdir().expect("create tempdir");
		let path = workspace.path().join("corpus.txt");
		std::fs::write(&path, "the cat sat.\nthe dog sat.\n").unwrap();

		let predictor = Predictor::from_corpus_file(&path).unwrap();

		assert_eq!(predictor.summary(), trained().summary());
	}
}
