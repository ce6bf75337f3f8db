#![forbid(unsafe_code)]

//! Seeded placement search.
//!
//! [`plan_placements`] fills a left column and a right column with avatar
//! positions. Every random value comes from generators seeded by the caller,
//! so the same `(unique_count, seed, config)` always yields the same plan.
//!
//! # Algorithm
//!
//! 1. A generator seeded with `seed + target_seed_offset` draws the target
//!    count from `[target_min, target_max]`.
//! 2. The plan is capped at the number of unique candidates and split
//!    `ceil(n/2)` left, the rest right.
//! 3. The generator that shuffled the candidates (seeded with `seed`, already
//!    advanced by `n - 1` draws) continues into the search. For each slot
//!    (left column first) up to `max_attempts` tries draw, in order: `x` from
//!    the column range, a band roll, `y` from the chosen band, and a size.
//! 4. A try is accepted when its center is outside every forbidden zone and
//!    at least `spacing_base + spacing_factor * size` away from every avatar
//!    already placed on either side. A slot that never succeeds is dropped.
//!
//! # Invariants
//!
//! 1. Accepted centers never fall inside a forbidden zone.
//! 2. Each accepted avatar respects its own spacing radius against all
//!    earlier ones.
//! 3. `placements.len() <= max_avatars <= min(target_count, unique_count)`.
//! 4. `image_index` is tied to the slot, not to acceptance order: dropped
//!    slots leave gaps rather than shifting later indices.

use ovl_core::{Point, SeededGenerator, Span};

use crate::config::LayoutConfig;

/// Column an avatar belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Left,
    Right,
}

/// One decorative avatar position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Placement {
    /// Horizontal center, percent of viewport width.
    pub x: f64,
    /// Vertical center, percent of viewport height.
    pub y: f64,
    /// Diameter in pixels.
    pub size: u32,
    /// Position in the shuffled candidate sequence.
    pub image_index: usize,
    pub side: Side,
}

impl Placement {
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Result of a planning pass, with the bookkeeping behind it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlanOutcome {
    pub placements: Vec<Placement>,
    /// Count drawn from the target range (0 when there were no candidates).
    pub target_count: usize,
    /// `min(target_count, unique_count)`.
    pub max_avatars: usize,
    pub left_slots: usize,
    pub right_slots: usize,
    /// Slots dropped after exhausting their attempts.
    pub skipped_slots: usize,
    /// Total tries across all slots.
    pub attempts: u64,
}

impl PlanOutcome {
    /// Placements in the given column, in acceptance order.
    pub fn side(&self, side: Side) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.side == side)
    }
}

/// Plan avatar positions for `unique_count` shuffled candidates.
///
/// Builds the session generator from `seed` and advances it past the
/// `unique_count - 1` draws a shuffle of that many candidates consumes, so
/// the result matches [`plan_placements_with`] after a real shuffle.
///
/// Never fails: an empty candidate set yields an empty outcome without
/// drawing, and crowded columns simply produce fewer placements.
#[must_use]
pub fn plan_placements(unique_count: usize, seed: u64, config: &LayoutConfig) -> PlanOutcome {
    let mut rng = SeededGenerator::new(seed);
    for _ in 1..unique_count {
        rng.next();
    }
    plan_placements_with(unique_count, seed, &mut rng, config)
}

/// Plan avatar positions, continuing the stream of `rng`.
///
/// `rng` is the generator that shuffled the candidates; `seed` only derives
/// the separate target-count generator.
#[must_use]
pub fn plan_placements_with(
    unique_count: usize,
    seed: u64,
    rng: &mut SeededGenerator,
    config: &LayoutConfig,
) -> PlanOutcome {
    if unique_count == 0 {
        return PlanOutcome::default();
    }

    let span = ovl_core::debug_span!("plan_placements", seed, unique_count);
    let _guard = span.enter();

    let target_count = draw_target_count(seed, config);
    let max_avatars = target_count.min(unique_count);
    let left_slots = max_avatars.div_ceil(2);
    let right_slots = max_avatars - left_slots;

    let mut planner = Planner {
        config,
        rng,
        placements: Vec::with_capacity(max_avatars),
        skipped_slots: 0,
        attempts: 0,
    };

    for slot in 0..left_slots {
        planner.fill_slot(Side::Left, slot % unique_count);
    }
    for slot in 0..right_slots {
        planner.fill_slot(Side::Right, (left_slots + slot) % unique_count);
    }

    ovl_core::debug!(
        seed,
        target_count,
        max_avatars,
        placed = planner.placements.len(),
        skipped = planner.skipped_slots,
        attempts = planner.attempts,
        "planned avatar overlay"
    );

    PlanOutcome {
        placements: planner.placements,
        target_count,
        max_avatars,
        left_slots,
        right_slots,
        skipped_slots: planner.skipped_slots,
        attempts: planner.attempts,
    }
}

fn draw_target_count(seed: u64, config: &LayoutConfig) -> usize {
    let mut rng = SeededGenerator::new(seed.wrapping_add(config.target_seed_offset));
    let drawn = rng.next_int(i64::from(config.target_min), i64::from(config.target_max));
    usize::try_from(drawn).unwrap_or(0)
}

struct Planner<'a> {
    config: &'a LayoutConfig,
    rng: &'a mut SeededGenerator,
    placements: Vec<Placement>,
    skipped_slots: usize,
    attempts: u64,
}

impl Planner<'_> {
    fn fill_slot(&mut self, side: Side, image_index: usize) {
        let columns = self.column(side);
        for _ in 0..self.config.max_attempts {
            self.attempts += 1;
            let x = self.rng.next_float(columns.min, columns.max);
            let roll = self.rng.next();
            let band = self.band(roll);
            let y = self.rng.next_float(band.min, band.max);
            let size = self.draw_size();

            let candidate = Placement {
                x,
                y,
                size,
                image_index,
                side,
            };
            if self.accepts(&candidate) {
                self.placements.push(candidate);
                return;
            }
        }

        self.skipped_slots += 1;
        ovl_core::debug!(
            ?side,
            image_index,
            attempts = self.config.max_attempts,
            "avatar slot skipped"
        );
    }

    fn column(&self, side: Side) -> Span {
        match side {
            Side::Left => self.config.left_x,
            Side::Right => self.config.right_x,
        }
    }

    fn band(&self, roll: f64) -> Span {
        if roll < self.config.top_band_threshold {
            self.config.top_band
        } else if roll < self.config.bottom_band_threshold {
            self.config.bottom_band
        } else {
            self.config.full_band
        }
    }

    fn draw_size(&mut self) -> u32 {
        let drawn = self
            .rng
            .next_int(i64::from(self.config.size_min), i64::from(self.config.size_max));
        u32::try_from(drawn).unwrap_or(self.config.size_min)
    }

    fn accepts(&self, candidate: &Placement) -> bool {
        let center = candidate.center();
        if self.config.forbidden_zones.iter().any(|z| z.contains(center)) {
            return false;
        }
        let min_distance = self.config.min_distance(candidate.size);
        self.placements
            .iter()
            .all(|placed| placed.center().distance(&center) >= min_distance)
    }
}
