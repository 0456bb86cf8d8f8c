//! # terralos-sightline
//!
//! The core line-of-sight primitive of the terralos visibility engine.
//!
//! [`check_line_of_sight`] samples terrain along the straight segment
//! between two 3-D positions and reports clear/obstructed with an early
//! exit on the first obstruction. [`los_profile`] retains every sample
//! (endpoints included) and is the authoritative source for obstruction
//! fraction and distance.
//!
//! The required clearance is applied to the target side of the sightline
//! only: "the observed point must clear terrain by at least the clearance",
//! not the observer.

mod error;
mod profile;
mod sampler;
#[cfg(test)]
mod test_support;

pub use error::SightlineError;
pub use profile::{los_profile, LosProfile};
pub use sampler::{check_line_of_sight, DEFAULT_SAMPLE_SPACING_M};

// Profile point and station result types live in the shared data model.
pub use terralos_model::{LosProfilePoint, StationLosResult};

/// Result type for sightline operations.
pub type Result<T> = std::result::Result<T, SightlineError>;
