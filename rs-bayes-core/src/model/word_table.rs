use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Token occurrence counts observed under a single category.
///
/// A `WordTable` is one row of the model's word counts: it maps every token
/// seen while training a category to the number of times it was seen.
///
/// ## Responsibilities:
/// - Accumulate token occurrences during training
/// - Answer occurrence queries, including for unseen tokens (count 0)
/// - Merge with another table (ex. corpora trained separately)
///
/// ## Invariants
/// - Every stored count is strictly positive
/// - `total` is always the sum of all stored counts
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WordTable {
	/// Occurrences indexed by token.
	/// Example: { "buy" => 42, "lunch" => 3 }
	counts: HashMap<String, u64>,
	/// Sum of all occurrences, kept up to date on every increment.
	total: u64,
}

impl WordTable {
	/// Creates a new empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `word`.
	///
	/// - If the token already exists, its count is increased.
	/// - Otherwise, it is inserted with a count of 0 then increased to 1.
	pub fn add(&mut self, word: &str) {
		match self.counts.get_mut(word) {
			Some(count) => *count += 1,
			None => {
				self.counts.insert(word.to_owned(), 1);
			}
		}
		self.total += 1;
	}

	/// Returns how many times `word` was recorded, 0 if never.
	pub fn count(&self, word: &str) -> u64 {
		self.counts.get(word).copied().unwrap_or(0)
	}

	/// Returns the sum of all token occurrences.
	pub fn total(&self) -> u64 {
		self.total
	}

	/// Returns the number of distinct tokens.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Merges another table into this one.
	///
	/// Occurrence counts for matching tokens are summed.
	pub fn merge(&mut self, other: &Self) {
		for (word, occurrence) in &other.counts {
			*self.counts.entry(word.clone()).or_insert(0) += *occurrence;
		}
		self.total += other.total;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_add_and_count() {
		let mut table = WordTable::new();
		table.add("fly");
		table.add("fly");
		table.add("buy");

		assert_eq!(table.count("fly"), 2);
		assert_eq!(table.count("buy"), 1);
		assert_eq!(table.count("lunch"), 0);
		assert_eq!(table.total(), 3);
		assert_eq!(table.len(), 2);
	}

	#[test]
	fn test_merge_sums_counts() {
		let mut left = WordTable::new();
		left.add("fly");
		left.add("drug");

		let mut right = WordTable::new();
		right.add("fly");
		right.add("meet");

		left.merge(&right);

		assert_eq!(left.count("fly"), 2);
		assert_eq!(left.count("drug"), 1);
		assert_eq!(left.count("meet"), 1);
		assert_eq!(left.total(), 4);
	}

	#[test]
	fn test_empty_table() {
		let table = WordTable::new();
		assert!(table.is_empty());
		assert_eq!(table.total(), 0);
		assert_eq!(table.count("anything"), 0);
	}
}
