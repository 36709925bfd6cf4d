use std::collections::{BTreeMap, HashMap};

use super::token_repository::TokenId;

/// Predecessor statistics of a single token.
///
/// A `TransitionRecord` belongs to one "current" token and counts every
/// token observed immediately before it during training.
///
/// Conceptually, this is the set of incoming edges of a node in the
/// Markov chain, weighted by their number of observations.
///
/// ## Invariants
/// - `total` is the sum of all predecessor counts
/// - Each predecessor count is strictly positive
#[derive(Clone, Debug, Default)]
pub struct TransitionRecord {
	/// Occurrences of each predecessor.
	/// Example: { the => 42, a => 3 }
	predecessors: HashMap<TokenId, usize>,
	/// Cached sum of `predecessors`, avoids a scan on every weight query.
	total: usize,
}

impl TransitionRecord {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `predecessor` right before this token.
	///
	/// - If the predecessor is already known, its count is increased.
	/// - Otherwise, it is inserted with a count of 1.
	pub fn add(&mut self, predecessor: TokenId) {
		*self.predecessors.entry(predecessor).or_insert(0) += 1;
		self.total += 1;
	}

	/// Conditional weight of `predecessor`: `count(predecessor) / total`.
	///
	/// Returns 0.0 for a predecessor never recorded here.
	pub fn get_weight(&self, predecessor: TokenId) -> f64 {
		match self.predecessors.get(&predecessor) {
			// total > 0 whenever a predecessor exists
			Some(count) => *count as f64 / self.total as f64,
			None => 0.0,
		}
	}

	/// Occurrences of `predecessor`, 0 if never recorded.
	pub fn count(&self, predecessor: TokenId) -> usize {
		self.predecessors.get(&predecessor).copied().unwrap_or(0)
	}

	pub fn total(&self) -> usize {
		self.total
	}

	/// Iterates over `(predecessor, count)` pairs in no particular order.
	pub fn predecessors(&self) -> impl Iterator<Item = (TokenId, usize)> + '_ {
		self.predecessors.iter().map(|(token, count)| (*token, *count))
	}
}

/// Two-level statistics: current token -> predecessor record.
///
/// Records are kept ordered by token id so that iteration, and therefore
/// seeded sampling, is reproducible.
#[derive(Clone, Debug, Default)]
pub struct StatisticsTable {
	records: BTreeMap<TokenId, TransitionRecord>,
}

impl StatisticsTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records that `predecessor` was seen right before `current`.
	///
	/// Creates the record of `current` on first use.
	pub fn observe(&mut self, predecessor: TokenId, current: TokenId) {
		self.records.entry(current).or_default().add(predecessor);
	}

	pub fn get(&self, current: TokenId) -> Option<&TransitionRecord> {
		self.records.get(&current)
	}

	/// Every token owning a record, in ascending id order.
	pub fn tokens(&self) -> impl Iterator<Item = TokenId> + '_ {
		self.records.keys().copied()
	}

	/// Weight of every candidate token given `predecessor`, in ascending id order.
	pub fn weights(&self, predecessor: TokenId) -> Vec<(TokenId, f64)> {
		self.records
			.iter()
			.map(|(token, record)| (*token, record.get_weight(predecessor)))
			.collect()
	}

	/// Number of records.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}
