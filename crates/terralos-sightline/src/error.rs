//! Error types for sightline sampling.

use thiserror::Error;

/// Errors that can occur when sampling a sightline.
///
/// Invalid inputs fail fast; callers treat a failed check as obstructed
/// rather than coercing coordinates to defaults.
#[derive(Debug, Error)]
pub enum SightlineError {
    /// An endpoint or clearance value is not a finite number.
    #[error("non-finite sightline input: {context}")]
    InvalidCoordinate {
        /// Which input was rejected.
        context: String,
    },

    /// The sampling parameters cannot produce a profile.
    #[error("invalid sampling: {0}")]
    InvalidSampling(String),
}
