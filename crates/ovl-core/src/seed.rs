#![forbid(unsafe_code)]

//! Seed providers.
//!
//! A host view picks one seed per display session. Routing that choice
//! through [`SeedProvider`] keeps the layout engine itself pure: tests and
//! replays use [`FixedSeed`], interactive hosts use [`ClockSeed`].

use std::time::{SystemTime, UNIX_EPOCH};

/// Exclusive upper bound for seeds produced by [`ClockSeed`].
pub const MAX_SESSION_SEED: u64 = 1_000_000_000;

/// Source of per-session seeds.
pub trait SeedProvider {
    /// Produce the seed for a new session.
    fn seed(&mut self) -> u64;
}

/// Always yields the same seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSeed(pub u64);

impl SeedProvider for FixedSeed {
    fn seed(&mut self) -> u64 {
        self.0
    }
}

/// Derives seeds from the wall clock, bounded by [`MAX_SESSION_SEED`].
///
/// Consecutive calls within the same nanosecond are separated by an
/// internal counter so reseeding always moves.
#[derive(Debug, Default)]
pub struct ClockSeed {
    calls: u64,
}

impl ClockSeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeedProvider for ClockSeed {
    fn seed(&mut self) -> u64 {
        // A clock before the epoch just contributes zero.
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        self.calls = self.calls.wrapping_add(1);
        let mut mixed = now.as_secs() ^ (u64::from(now.subsec_nanos()) << 20) ^ self.calls;
        // splitmix64 finalizer
        mixed = mixed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        mixed = (mixed ^ (mixed >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        mixed = (mixed ^ (mixed >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        mixed ^= mixed >> 31;
        mixed % MAX_SESSION_SEED
    }
}

impl<P: SeedProvider + ?Sized> SeedProvider for &mut P {
    fn seed(&mut self) -> u64 {
        (**self).seed()
    }
}

impl<P: SeedProvider + ?Sized> SeedProvider for Box<P> {
    fn seed(&mut self) -> u64 {
        (**self).seed()
    }
}
