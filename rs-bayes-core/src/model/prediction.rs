use serde::{Deserialize, Serialize};

/// Result of classifying one document.
///
/// `Prediction` holds the winning category together with the log-domain
/// score of every category that was evaluated.
///
/// # Invariants
/// - `scores` is never empty and lists categories in evaluation order
///   (ascending lexicographic order of category names)
/// - `category` is the first category of `scores` holding the maximum score
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Prediction {
	/// Best category.
	pub category: String,

	/// `(category, score)` pairs, scores being natural-log likelihoods.
	pub scores: Vec<(String, f64)>,
}

impl Prediction {
	/// Returns the score of a given category, if it was evaluated.
	pub fn score_of(&self, category: &str) -> Option<f64> {
		self.scores
			.iter()
			.find(|(name, _)| name == category)
			.map(|(_, score)| *score)
	}

	/// Returns the score of the winning category.
	pub fn best_score(&self) -> f64 {
		self.score_of(&self.category).unwrap_or(f64::NEG_INFINITY)
	}

	/// Converts the log scores into normalized posterior probabilities.
	///
	/// The maximum score is subtracted before exponentiation so that long
	/// documents (very negative scores) do not underflow to zero.
	/// The returned probabilities sum to 1.0 and keep the order of `scores`.
	pub fn probabilities(&self) -> Vec<(String, f64)> {
		let max_score = self
			.scores
			.iter()
			.map(|(_, score)| *score)
			.fold(f64::NEG_INFINITY, f64::max);

		let sum_exp: f64 = self.scores.iter().map(|(_, score)| (score - max_score).exp()).sum();

		self.scores
			.iter()
			.map(|(name, score)| (name.clone(), (score - max_score).exp() / sum_exp))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Prediction {
		Prediction {
			category: "spam".to_owned(),
			scores: vec![("not_spam".to_owned(), -12.0), ("spam".to_owned(), -10.0)],
		}
	}

	#[test]
	fn test_score_lookup() {
		let prediction = sample();
		assert_eq!(prediction.score_of("spam"), Some(-10.0));
		assert_eq!(prediction.score_of("unknown"), None);
		assert_eq!(prediction.best_score(), -10.0);
	}

	#[test]
	fn test_probabilities_sum_to_one() {
		let probabilities = sample().probabilities();
		let sum: f64 = probabilities.iter().map(|(_, p)| p).sum();
		assert!((sum - 1.0).abs() < 1e-12);
		assert!(probabilities[1].1 > probabilities[0].1);
	}

	#[test]
	fn test_probabilities_survive_tiny_scores() {
		let prediction = Prediction {
			category: "a".to_owned(),
			scores: vec![("a".to_owned(), -5000.0), ("b".to_owned(), -5000.0)],
		};
		for (_, p) in prediction.probabilities() {
			assert!((p - 0.5).abs() < 1e-12);
		}
	}
}
