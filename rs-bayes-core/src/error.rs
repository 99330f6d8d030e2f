use thiserror::Error;

/// Errors raised by the classifier and its corpus helpers.
///
/// Every failure is local to the call that produced it: model state is
/// never modified by an operation that returns an error.
#[derive(Error, Debug)]
pub enum BayesError {
	/// A probability or score was requested for a category never trained.
	#[error("category '{0}' has not been trained")]
	UntrainedCategory(String),

	/// Prediction was requested before any category was trained.
	#[error("model has no trained categories")]
	EmptyModel,

	/// A corpus line could not be parsed.
	#[error("invalid corpus line {line}: {reason}")]
	InvalidCorpusLine { line: usize, reason: String },

	/// Invalid argument passed to a helper.
	#[error("invalid parameter: {0}")]
	InvalidParameter(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BayesError>;
