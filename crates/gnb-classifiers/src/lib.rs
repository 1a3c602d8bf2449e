//! gnb-classifiers: Gaussian Naive Bayes classification.
//!
//! `GaussianNb::fit` estimates per-class per-attribute normal distributions
//! and returns an immutable `FittedGaussianNb`, which scores new rows by
//! summing log-densities across attributes and normalizing the result into
//! a posterior under a uniform class prior. Class codes are 0-based
//! everywhere: in training labels, predictions and scoring.
//!
//! The crate does no I/O; loading delimited files and mapping textual labels
//! to codes is left to callers (see `encoding::LabelEncoder`).
pub mod config;
pub mod data_handling;
pub mod encoding;
pub mod error;
pub mod math;
pub mod metrics;
pub mod models;
pub mod stats;

pub use error::ClassifierError;
