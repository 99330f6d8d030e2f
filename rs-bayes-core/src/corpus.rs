//! Labeled corpus helpers.
//!
//! A corpus file holds one document per line, as `category<TAB>text`.
//! Blank lines and lines starting with `#` are ignored.

use std::path::Path;

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{BayesError, Result};
use crate::io::read_file;
use crate::model::naive_bayes::NaiveBayesModel;
use crate::tokenizer::Tokenizer;

/// One raw training or evaluation document.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LabeledDocument {
	pub category: String,
	pub text: String,
}

impl LabeledDocument {
	pub fn new(category: &str, text: &str) -> Self {
		Self { category: category.to_owned(), text: text.to_owned() }
	}
}

/// Accuracy of a model over a set of labeled documents.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
	pub correct: usize,
	pub total: usize,
}

impl Evaluation {
	/// Fraction of correctly classified documents, in `[0, 1]`.
	pub fn accuracy(&self) -> f64 {
		self.correct as f64 / self.total as f64
	}
}

/// Parses a corpus held in memory.
///
/// # Errors
/// Returns `InvalidCorpusLine` (1-based line number) when a line has no tab
/// separator or an empty category.
pub fn parse_corpus(contents: &str) -> Result<Vec<LabeledDocument>> {
	let mut documents = Vec::new();

	for (index, line) in contents.lines().enumerate() {
		let trimmed = line.trim();
		if trimmed.is_empty() || trimmed.starts_with('#') {
			continue;
		}

		let (category, text) = line.split_once('\t').ok_or_else(|| BayesError::InvalidCorpusLine {
			line: index + 1,
			reason: "missing tab separator".to_owned(),
		})?;

		let category = category.trim();
		if category.is_empty() {
			return Err(BayesError::InvalidCorpusLine {
				line: index + 1,
				reason: "empty category".to_owned(),
			});
		}

		documents.push(LabeledDocument::new(category, text.trim()));
	}

	Ok(documents)
}

/// Reads and parses a corpus file.
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledDocument>> {
	let documents = parse_corpus(&read_file(&path)?)?;
	info!("loaded {} documents from {}", documents.len(), path.as_ref().display());
	Ok(documents)
}

/// Shuffles `documents` with a seeded generator, then splits them into
/// `(train, test)` where `test` holds `round(len * test_ratio)` documents.
///
/// The same seed always yields the same split.
///
/// # Errors
/// Returns `InvalidParameter` if `test_ratio` is outside `[0, 1]`.
pub fn split_corpus(
	mut documents: Vec<LabeledDocument>,
	test_ratio: f64,
	seed: u64,
) -> Result<(Vec<LabeledDocument>, Vec<LabeledDocument>)> {
	if !(0.0..=1.0).contains(&test_ratio) {
		return Err(BayesError::InvalidParameter(format!(
			"test ratio must be between 0.0 and 1.0, got {}",
			test_ratio
		)));
	}

	let mut rng = StdRng::seed_from_u64(seed);
	documents.shuffle(&mut rng);

	let test_len = (documents.len() as f64 * test_ratio).round() as usize;
	let test = documents.split_off(documents.len() - test_len);
	Ok((documents, test))
}

/// Trains `model` on every document and returns the number of tokens learned.
pub fn train_documents<T: Tokenizer + ?Sized>(
	model: &mut NaiveBayesModel,
	documents: &[LabeledDocument],
	tokenizer: &T,
) -> usize {
	let tokenized: Vec<(Vec<String>, String)> = documents
		.iter()
		.map(|document| (tokenizer.tokenize(&document.text), document.category.clone()))
		.collect();
	let learned = tokenized.iter().map(|(tokens, _)| tokens.len()).sum();

	model.train_batch(tokenized);
	learned
}

/// Classifies every document and counts correct predictions.
///
/// # Errors
/// - `InvalidParameter` if `documents` is empty.
/// - Any error raised by `predict` (ex. `EmptyModel`).
pub fn evaluate<T: Tokenizer + ?Sized>(
	model: &NaiveBayesModel,
	documents: &[LabeledDocument],
	tokenizer: &T,
) -> Result<Evaluation> {
	if documents.is_empty() {
		return Err(BayesError::InvalidParameter("evaluation set is empty".to_owned()));
	}

	let mut correct = 0;
	for document in documents {
		if model.predict_text(&document.text, tokenizer)?.category == document.category {
			correct += 1;
		}
	}

	Ok(Evaluation { correct, total: documents.len() })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tokenizer::WordTokenizer;

	const CORPUS: &str = "# category\ttext\n\
		spam\tBuy cheap pills now\n\
		\n\
		not_spam\tLunch meeting at noon\n\
		spam\tCheap flights, buy now\n\
		not_spam\tSee you at the meeting\n";

	#[test]
	fn test_parse_corpus() {
		let documents = parse_corpus(CORPUS).unwrap();
		assert_eq!(documents.len(), 4);
		assert_eq!(documents[0], LabeledDocument::new("spam", "Buy cheap pills now"));
		assert_eq!(documents[1].category, "not_spam");
	}

	#[test]
	fn test_parse_corpus_errors() {
		match parse_corpus("spam\tok\nno tab here\n") {
			Err(BayesError::InvalidCorpusLine { line, .. }) => assert_eq!(line, 2),
			other => panic!("unexpected result: {:?}", other),
		}
		assert!(matches!(
			parse_corpus("\tno category"),
			Err(BayesError::InvalidCorpusLine { line: 1, .. })
		));
	}

	#[test]
	fn test_split_is_reproducible() {
		let documents = parse_corpus(CORPUS).unwrap();
		let (train_a, test_a) = split_corpus(documents.clone(), 0.5, 42).unwrap();
		let (train_b, test_b) = split_corpus(documents, 0.5, 42).unwrap();

		assert_eq!(train_a.len(), 2);
		assert_eq!(test_a.len(), 2);
		assert_eq!(train_a, train_b);
		assert_eq!(test_a, test_b);
	}

	#[test]
	fn test_split_invalid_ratio() {
		assert!(matches!(split_corpus(Vec::new(), 1.5, 0), Err(BayesError::InvalidParameter(_))));
	}

	#[test]
	fn test_train_and_evaluate() {
		let tokenizer = WordTokenizer::new();
		let documents = parse_corpus(CORPUS).unwrap();

		let mut model = NaiveBayesModel::new();
		let learned = train_documents(&mut model, &documents, &tokenizer);
		assert_eq!(learned, 17);

		let evaluation = evaluate(&model, &documents, &tokenizer).unwrap();
		assert_eq!(evaluation.total, 4);
		assert_eq!(evaluation.correct, 4);
		assert!((evaluation.accuracy() - 1.0).abs() < 1e-12);
	}

	#[test]
	fn test_evaluate_empty_set() {
		let model = NaiveBayesModel::new();
		let result = evaluate(&model, &[], &WordTokenizer::new());
		assert!(matches!(result, Err(BayesError::InvalidParameter(_))));
	}
}
