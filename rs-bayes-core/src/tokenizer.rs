use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

/// Turns raw text into the normalized tokens the model counts over.
///
/// The classifier never looks at raw text: anything able to produce a
/// sequence of tokens (whitespace splitting, a morphological analyzer,
/// a subword tokenizer...) can be plugged in here.
///
/// Implemented for any `Fn(&str) -> Vec<String>`.
pub trait Tokenizer {
	fn tokenize(&self, text: &str) -> Vec<String>;
}

impl<F> Tokenizer for F
where
	F: Fn(&str) -> Vec<String>,
{
	fn tokenize(&self, text: &str) -> Vec<String> {
		self(text)
	}
}

/// Default tokenizer based on Unicode word boundaries.
///
/// - Splits on word boundaries (punctuation never becomes a token)
/// - Lower-cases every word
/// - Drops words shorter than `min_length` characters
/// - Drops configured stop-words (compared after lower-casing)
#[derive(Clone, Debug)]
pub struct WordTokenizer {
	min_length: usize,
	stop_words: HashSet<String>,
}

impl Default for WordTokenizer {
	fn default() -> Self {
		Self { min_length: 1, stop_words: HashSet::new() }
	}
}

impl WordTokenizer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the minimum word length, in characters.
	pub fn with_min_length(mut self, min_length: usize) -> Self {
		self.min_length = min_length;
		self
	}

	/// Adds words that must never be emitted as tokens.
	pub fn with_stop_words<I, S>(mut self, stop_words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		self.stop_words
			.extend(stop_words.into_iter().map(|word| word.as_ref().to_lowercase()));
		self
	}
}

impl Tokenizer for WordTokenizer {
	fn tokenize(&self, text: &str) -> Vec<String> {
		text.unicode_words()
			.map(str::to_lowercase)
			.filter(|word| word.chars().count() >= self.min_length)
			.filter(|word| !self.stop_words.contains(word))
			.collect()
	}
}
