use std::collections::{BTreeMap, HashSet};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::prediction::Prediction;
use super::word_table::WordTable;
use crate::error::{BayesError, Result};
use crate::tokenizer::Tokenizer;

/// Multinomial Naive Bayes classifier over token sequences.
///
/// The model learns, for every category, how often each token appears, and
/// predicts the category maximizing `ln P(category) + Σ ln P(token | category)`.
///
/// # Responsibilities
/// - Count token occurrences per category (`train`)
/// - Estimate Laplace-smoothed word probabilities and category priors
/// - Score a token sequence against a category in the log domain
/// - Pick the best category for a token sequence (`predict`)
/// - Merge with another model trained on a different corpus
///
/// # Invariants
/// - `word_counts` and `category_counts` always have the same key set
/// - `vocabulary` contains every token of every `WordTable`
/// - No count is ever decremented
///
/// # Notes
/// - The category count is incremented once per *token*, not once per
///   document: categories trained with longer documents get a larger prior.
/// - Categories are stored in a `BTreeMap`, so they are always evaluated in
///   ascending lexicographic order. Ties in `predict` go to the smallest name.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct NaiveBayesModel {
	/// Every distinct token ever trained, regardless of category.
	vocabulary: HashSet<String>,

	/// Per-category token occurrence counts.
	word_counts: BTreeMap<String, WordTable>,

	/// Per-category training events (one per token processed).
	category_counts: BTreeMap<String, u64>,
}

impl NaiveBayesModel {
	/// Creates a new, untrained model.
	pub fn new() -> Self {
		Self::default()
	}

	/// Learns one labeled document.
	///
	/// For every token: its count under `category` is increased, it is added
	/// to the vocabulary and the category's training-event count is
	/// increased by one.
	///
	/// # Notes
	/// - An empty `tokens` slice is a no-op: a category only exists once it
	///   has at least one training event, so every prior is strictly positive.
	/// - Tokens are used as-is; normalization belongs to the tokenizer.
	pub fn train<S: AsRef<str>>(&mut self, tokens: &[S], category: &str) {
		if tokens.is_empty() {
			return;
		}

		let table = self.word_counts.entry(category.to_owned()).or_default();
		let category_count = self.category_counts.entry(category.to_owned()).or_insert(0);

		for token in tokens {
			let token = token.as_ref();
			table.add(token);
			if !self.vocabulary.contains(token) {
				self.vocabulary.insert(token.to_owned());
			}
			*category_count += 1;
		}

		debug!(
			"trained {} tokens under '{}' (vocabulary size {})",
			tokens.len(),
			category,
			self.vocabulary.len()
		);
	}

	/// Tokenizes `text` then learns it under `category`.
	///
	/// Returns the number of tokens learned.
	pub fn train_text<T: Tokenizer + ?Sized>(&mut self, text: &str, category: &str, tokenizer: &T) -> usize {
		let tokens = tokenizer.tokenize(text);
		self.train(&tokens, category);
		tokens.len()
	}

	/// Learns a whole labeled corpus of already tokenized documents.
	pub fn train_batch<I, S>(&mut self, documents: I)
	where
		I: IntoIterator<Item = (Vec<S>, String)>,
		S: AsRef<str>,
	{
		for (tokens, category) in documents {
			self.train(&tokens, &category);
		}
	}

	/// Laplace-smoothed probability of `word` given `category`.
	///
	/// `(count(word, category) + 1) / (total words of category + |vocabulary|)`
	///
	/// The result is always in `(0, 1]`, including for tokens never seen.
	///
	/// # Errors
	/// Returns `UntrainedCategory` if `category` was never trained.
	pub fn word_probability(&self, word: &str, category: &str) -> Result<f64> {
		let table = self
			.word_counts
			.get(category)
			.ok_or_else(|| BayesError::UntrainedCategory(category.to_owned()))?;

		let denominator = table.total() + self.vocabulary.len() as u64;
		let numerator = table.count(word) + 1;
		Ok(numerator as f64 / denominator as f64)
	}

	/// Prior probability of `category`, estimated from training-event volume.
	///
	/// The result is always in `(0, 1]`.
	///
	/// # Errors
	/// Returns `UntrainedCategory` if `category` was never trained.
	pub fn category_probability(&self, category: &str) -> Result<f64> {
		let count = *self
			.category_counts
			.get(category)
			.ok_or_else(|| BayesError::UntrainedCategory(category.to_owned()))?;

		let sum: u64 = self.category_counts.values().sum();
		Ok(count as f64 / sum as f64)
	}

	/// Log-domain score of `tokens` under `category`.
	///
	/// `ln P(category) + Σ ln P(token | category)`. Higher is more likely.
	/// Summing logarithms avoids the underflow of multiplying many small
	/// probabilities.
	///
	/// # Errors
	/// Same as `word_probability` and `category_probability`.
	pub fn score<S: AsRef<str>>(&self, tokens: &[S], category: &str) -> Result<f64> {
		let mut score = self.category_probability(category)?.ln();
		for token in tokens {
			score += self.word_probability(token.as_ref(), category)?.ln();
		}
		Ok(score)
	}

	/// Predicts the most likely category of `tokens`.
	///
	/// Every trained category is scored in ascending name order. The best
	/// category is the one with the strictly greatest score, so on a tie the
	/// first evaluated (lexicographically smallest) category wins.
	///
	/// # Errors
	/// - `EmptyModel` if no category has been trained.
	pub fn predict<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Prediction> {
		if self.category_counts.is_empty() {
			return Err(BayesError::EmptyModel);
		}

		let mut best_category: Option<&str> = None;
		let mut max_score = f64::NEG_INFINITY;
		let mut scores = Vec::with_capacity(self.category_counts.len());

		for category in self.category_counts.keys() {
			let score = self.score(tokens, category)?;
			trace!("score of '{}': {}", category, score);
			scores.push((category.clone(), score));
			if best_category.is_none() || score > max_score {
				max_score = score;
				best_category = Some(category.as_str());
			}
		}

		let category = best_category.ok_or(BayesError::EmptyModel)?.to_owned();
		Ok(Prediction { category, scores })
	}

	/// Tokenizes `text` then predicts its category.
	pub fn predict_text<T: Tokenizer + ?Sized>(&self, text: &str, tokenizer: &T) -> Result<Prediction> {
		self.predict(&tokenizer.tokenize(text))
	}

	/// Returns trained categories in ascending order.
	pub fn categories(&self) -> impl Iterator<Item = &str> {
		self.category_counts.keys().map(String::as_str)
	}

	/// Returns the number of distinct tokens ever trained.
	pub fn vocabulary_size(&self) -> usize {
		self.vocabulary.len()
	}

	/// Returns `true` if no category has been trained yet.
	pub fn is_empty(&self) -> bool {
		self.category_counts.is_empty()
	}

	/// Returns how many times `word` was trained under `category`.
	///
	/// Returns `None` if the category is unknown.
	pub fn word_count(&self, word: &str, category: &str) -> Option<u64> {
		self.word_counts.get(category).map(|table| table.count(word))
	}

	/// Returns the number of training events of `category`.
	pub fn category_count(&self, category: &str) -> Option<u64> {
		self.category_counts.get(category).copied()
	}

	/// Returns the number of token occurrences trained under `category`.
	pub fn total_words(&self, category: &str) -> Option<u64> {
		self.word_counts.get(category).map(WordTable::total)
	}

	/// Returns the word table of `category`.
	pub fn word_table(&self, category: &str) -> Option<&WordTable> {
		self.word_counts.get(category)
	}

	/// Merges another model into this one.
	///
	/// # Behavior
	/// - Word tables of matching categories are merged; new ones are cloned.
	/// - Category counts are summed.
	/// - Vocabularies are united.
	///
	/// The result is identical to a model trained on both corpora.
	pub fn merge(&mut self, other: &Self) {
		for (category, table) in &other.word_counts {
			if let Some(existing) = self.word_counts.get_mut(category) {
				existing.merge(table);
			} else {
				self.word_counts.insert(category.clone(), table.clone());
			}
		}

		for (category, count) in &other.category_counts {
			*self.category_counts.entry(category.clone()).or_insert(0) += *count;
		}

		self.vocabulary.extend(other.vocabulary.iter().cloned());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPSILON: f64 = 1e-12;

	fn spam_model() -> NaiveBayesModel {
		let mut model = NaiveBayesModel::new();
		model.train(&["fly", "drug", "buy"], "spam");
		model.train(&["meet", "lunch", "fly"], "not_spam");
		model
	}

	#[test]
	fn test_word_probability_laplace() {
		let model = spam_model();
		assert_eq!(model.vocabulary_size(), 5);
		// (1 + 1) / (3 + 5)
		let p = model.word_probability("fly", "spam").unwrap();
		assert!((p - 0.25).abs() < EPSILON);
		// (0 + 1) / (3 + 5)
		let p = model.word_probability("lunch", "spam").unwrap();
		assert!((p - 0.125).abs() < EPSILON);
	}

	#[test]
	fn test_unseen_word_is_positive() {
		let model = spam_model();
		for category in ["spam", "not_spam"] {
			let p = model.word_probability("never-seen", category).unwrap();
			assert!(p > 0.0 && p <= 1.0);
		}
	}

	#[test]
	fn test_category_counts_per_token() {
		let mut model = NaiveBayesModel::new();
		model.train(&["a", "b", "c", "d"], "long");
		model.train(&["a"], "short");

		assert_eq!(model.category_count("long"), Some(4));
		assert_eq!(model.category_count("short"), Some(1));
		let p = model.category_probability("long").unwrap();
		assert!((p - 0.8).abs() < EPSILON);
	}

	#[test]
	fn test_untrained_category() {
		let model = spam_model();
		assert!(matches!(
			model.word_probability("fly", "ham"),
			Err(BayesError::UntrainedCategory(c)) if c == "ham"
		));
		assert!(matches!(
			model.category_probability("ham"),
			Err(BayesError::UntrainedCategory(_))
		));
		assert!(matches!(model.score(&["fly"], "ham"), Err(BayesError::UntrainedCategory(_))));
	}

	#[test]
	fn test_predict_empty_model() {
		let model = NaiveBayesModel::new();
		let tokens: [&str; 0] = [];
		assert!(matches!(model.predict(&tokens), Err(BayesError::EmptyModel)));
	}

	#[test]
	fn test_empty_document_is_ignored() {
		let mut model = NaiveBayesModel::new();
		let tokens: [&str; 0] = [];
		model.train(&tokens, "spam");
		model.train(&["lunch"], "ham");

		assert_eq!(model.categories().collect::<Vec<_>>(), vec!["ham"]);
		assert_eq!(model.category_count("spam"), None);
		assert!(matches!(model.category_probability("spam"), Err(BayesError::UntrainedCategory(_))));

		let prediction = model.predict(&["lunch"]).unwrap();
		assert_eq!(prediction.scores.len(), 1);
		assert!(prediction.best_score().is_finite());
	}

	#[test]
	fn test_train_batch_matches_sequential_training() {
		let documents = vec![
			(vec!["fly", "drug", "buy"], "spam".to_owned()),
			(vec!["meet", "lunch", "fly"], "not_spam".to_owned()),
			(vec![], "ignored".to_owned()),
			(vec!["buy", "now"], "spam".to_owned()),
		];

		let mut sequential = NaiveBayesModel::new();
		for (tokens, category) in &documents {
			sequential.train(tokens, category);
		}

		let mut batch = NaiveBayesModel::new();
		batch.train_batch(documents);

		assert_eq!(batch, sequential);
		assert_eq!(batch.category_count("spam"), Some(5));
		assert_eq!(batch.category_count("ignored"), None);
	}

	#[test]
	fn test_tie_goes_to_smallest_category() {
		let mut model = NaiveBayesModel::new();
		model.train(&["same"], "zebra");
		model.train(&["same"], "alpha");

		let prediction = model.predict(&["same"]).unwrap();
		assert_eq!(prediction.category, "alpha");
		assert_eq!(prediction.scores[0].0, "alpha");
		assert_eq!(prediction.scores[1].0, "zebra");
		assert!((prediction.scores[0].1 - prediction.scores[1].1).abs() < EPSILON);
	}

	#[test]
	fn test_merge_matches_joint_training() {
		let mut left = NaiveBayesModel::new();
		left.train(&["fly", "drug", "buy"], "spam");

		let mut right = NaiveBayesModel::new();
		right.train(&["meet", "lunch", "fly"], "not_spam");

		left.merge(&right);
		assert_eq!(left, spam_model());
	}
}
