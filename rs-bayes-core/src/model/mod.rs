//! Top-level module for the Naive Bayes classifier.
//!
//! This module contains:
//! - The classifier itself (`NaiveBayesModel`)
//! - Per-category token counting (`WordTable`)
//! - The result of a prediction (`Prediction`)

/// Multinomial Naive Bayes model.
///
/// Owns the vocabulary, the per-category word tables and the per-category
/// training-event counts. Exposes training, smoothed probability estimators,
/// log-domain scoring and prediction.
pub mod naive_bayes;

/// Token occurrence counts for a single category.
///
/// Tracks how many times each token was seen and keeps the running total
/// used as the Laplace denominator.
pub mod word_table;

/// Best category and per-category scores returned by `predict`.
pub mod prediction;
