//! Multinomial Naive Bayes text classification library.
//!
//! This crate provides a small supervised classifier including:
//! - Per-category token frequency tables with Laplace smoothing
//! - Log-domain scoring and best-category prediction
//! - A pluggable tokenizer seam with a Unicode word tokenizer
//! - Labeled corpus loading, seeded splitting and accuracy evaluation
//!
//! The model itself only ever sees token sequences. How raw text becomes
//! tokens is decided by the caller through the `Tokenizer` trait.

/// Naive Bayes model, per-category word tables and prediction results.
pub mod model;

/// Raw text to token conversion.
pub mod tokenizer;

/// Labeled corpus parsing, splitting and evaluation.
pub mod corpus;

/// Error type shared by the whole crate.
pub mod error;

/// I/O utilities (file loading, path helpers).
pub mod io;

pub use error::{BayesError, Result};
pub use model::naive_bayes::NaiveBayesModel;
pub use model::prediction::Prediction;
pub use tokenizer::{Tokenizer, WordTokenizer};
