#![forbid(unsafe_code)]

//! Core: seeded randomness, candidate filtering, and overlay geometry.
//!
//! Everything in this crate is pure and synchronous. Each caller owns its
//! own [`rng::SeededGenerator`]; nothing is shared between invocations.

pub mod candidates;
pub mod geometry;
pub mod logging;
pub mod rng;
pub mod seed;

pub use candidates::{is_valid_reference, shuffle_in_place, shuffled_candidates, unique_candidates};
pub use geometry::{Point, Span, Zone};
pub use rng::SeededGenerator;
pub use seed::{ClockSeed, FixedSeed, SeedProvider};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, warn};
