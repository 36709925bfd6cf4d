use std::collections::HashMap;

use crate::error::{GenError, Result};

/// Dense integer id of one distinct word or punctuation symbol.
pub type TokenId = usize;

/// Bidirectional mapping between words and token ids.
///
/// # Invariants
/// - Ids are contiguous and start at 0, in first-registration order
/// - A word keeps the same id for the lifetime of the repository
/// - Nothing is ever removed
#[derive(Clone, Debug, Default)]
pub struct TokenRepository {
	/// Word to id
	ids: HashMap<String, TokenId>,
	/// Id to word, indexed by id
	words: Vec<String>,
}

impl TokenRepository {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `word` and returns its id.
	///
	/// Registering a word that is already known is a no-op returning
	/// the existing id.
	pub fn register(&mut self, word: &str) -> TokenId {
		if let Some(id) = self.ids.get(word) {
			return *id;
		}
		let id = self.words.len();
		self.ids.insert(word.to_owned(), id);
		self.words.push(word.to_owned());
		id
	}

	/// Returns the id of a previously registered word.
	///
	/// # Errors
	/// Returns `GenError::UnknownWord` if `word` was never registered.
	pub fn get_id(&self, word: &str) -> Result<TokenId> {
		self.ids.get(word).copied().ok_or_else(|| GenError::UnknownWord(word.to_owned()))
	}

	/// Returns the word behind a previously assigned id.
	///
	/// # Errors
	/// Returns `GenError::UnknownId` if `id` was never assigned.
	pub fn get_word(&self, id: TokenId) -> Result<&str> {
		self.words.get(id).map(String::as_str).ok_or(GenError::UnknownId(id))
	}

	pub fn contains(&self, word: &str) -> bool {
		self.ids.contains_key(word)
	}

	/// Number of registered words.
	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}
}
