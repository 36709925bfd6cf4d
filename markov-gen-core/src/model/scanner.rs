//! Text scanner.
//!
//! Normalization is done on the whole input, in order:
//! 1. lower-case
//! 2. `\n` becomes a space
//! 3. `,` `.` `?` `-` get a space on both sides
//! 4. one left-to-right pass of `"  "` -> `" "`
//! 5. split on single spaces
//!
//! Step 4 only halves runs of spaces, so runs of three or more leave
//! empty fields behind after the split. Those empty strings are kept as
//! tokens of their own.

use log::debug;

use super::token_repository::{TokenId, TokenRepository};

/// Characters turned into standalone tokens.
const SPLIT_PUNCTUATION: [char; 4] = [',', '.', '?', '-'];

/// Applies the normalization steps and returns the raw fields.
pub fn normalize(text: &str) -> Vec<String> {
	let mut normalized = text.to_lowercase().replace('\n', " ");
	for punctuation in SPLIT_PUNCTUATION {
		normalized = normalized.replace(punctuation, &format!(" {punctuation} "));
	}
	normalized.replace("  ", " ").split(' ').map(str::to_owned).collect()
}

/// Scans `text` into token ids, registering unseen words in `repository`.
///
/// The output has one id per field produced by `normalize`.
pub fn scan(repository: &mut TokenRepository, text: &str) -> Vec<TokenId> {
	let tokens: Vec<TokenId> = normalize(text)
		.iter()
		.map(|word| repository.register(word))
		.collect();
	debug!("scanned {} tokens, vocabulary is now {}", tokens.len(), repository.len());
	tokens
}
