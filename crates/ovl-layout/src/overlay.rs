#![forbid(unsafe_code)]

//! Full overlay composition.
//!
//! [`compose_overlay`] runs filter → de-duplicate → shuffle → plan and
//! resolves every placement to its image in the same pass. Renderers read
//! `placement.image` directly and never re-derive the shuffle.
//!
//! [`OverlaySession`] models one display session: the seed is taken once
//! from a [`SeedProvider`], and the layout is recomputed only when the
//! candidate list, the config, or the seed changes.

use ovl_core::{SeedProvider, SeededGenerator, shuffle_in_place, unique_candidates};

use crate::config::LayoutConfig;
use crate::planner::{Placement, plan_placements_with};

/// A placement paired with the image reference it shows.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResolvedPlacement {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub placement: Placement,
    pub image: String,
}

/// Everything a renderer needs for one overlay.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OverlayLayout {
    pub seed: u64,
    /// Unique candidates in shuffled order; `image_index` points here.
    pub images: Vec<String>,
    pub placements: Vec<ResolvedPlacement>,
    pub target_count: usize,
    pub max_avatars: usize,
    pub skipped_slots: usize,
    pub attempts: u64,
}

impl OverlayLayout {
    /// Image at a shuffled position, if any.
    #[must_use]
    pub fn image(&self, image_index: usize) -> Option<&str> {
        self.images.get(image_index).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Build a resolved overlay from raw candidate references.
///
/// Invalid references are dropped, duplicates collapse to their first
/// occurrence, and an empty result yields an empty layout. One generator
/// seeded with `seed` shuffles the candidates and then drives the placement
/// search.
pub fn compose_overlay<I, S>(candidates: I, seed: u64, config: &LayoutConfig) -> OverlayLayout
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut images = unique_candidates(candidates);
    let mut rng = SeededGenerator::new(seed);
    shuffle_in_place(&mut images, &mut rng);
    let outcome = plan_placements_with(images.len(), seed, &mut rng, config);

    let placements = outcome
        .placements
        .iter()
        .filter_map(|placement| {
            images.get(placement.image_index).map(|image| ResolvedPlacement {
                placement: *placement,
                image: image.clone(),
            })
        })
        .collect();

    OverlayLayout {
        seed,
        images,
        placements,
        target_count: outcome.target_count,
        max_avatars: outcome.max_avatars,
        skipped_slots: outcome.skipped_slots,
        attempts: outcome.attempts,
    }
}

#[derive(Debug)]
struct CachedLayout {
    candidates: Vec<String>,
    layout: OverlayLayout,
}

/// One display session: a fixed seed and a memoized layout.
#[derive(Debug)]
pub struct OverlaySession<P> {
    provider: P,
    seed: u64,
    config: LayoutConfig,
    cached: Option<CachedLayout>,
    computations: u64,
}

impl<P: SeedProvider> OverlaySession<P> {
    /// Start a session, drawing its seed from `provider`.
    pub fn new(mut provider: P, config: LayoutConfig) -> Self {
        let seed = provider.seed();
        ovl_core::debug!(seed, "overlay session started");
        Self {
            provider,
            seed,
            config,
            cached: None,
            computations: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// How many times a layout has actually been computed.
    #[inline]
    #[must_use]
    pub fn computations(&self) -> u64 {
        self.computations
    }

    /// Layout for `candidates`, reusing the last one when nothing changed.
    pub fn layout<S: AsRef<str>>(&mut self, candidates: &[S]) -> &OverlayLayout {
        let cached = match self.cached.take() {
            Some(cached)
                if cached
                    .candidates
                    .iter()
                    .map(String::as_str)
                    .eq(candidates.iter().map(|c| c.as_ref())) =>
            {
                cached
            }
            _ => {
                self.computations += 1;
                ovl_core::debug!(
                    seed = self.seed,
                    candidates = candidates.len(),
                    "recomputing overlay layout"
                );
                CachedLayout {
                    candidates: candidates.iter().map(|c| c.as_ref().to_owned()).collect(),
                    layout: compose_overlay(candidates, self.seed, &self.config),
                }
            }
        };
        &self.cached.insert(cached).layout
    }

    /// Draw a new seed and drop the cached layout.
    pub fn reseed(&mut self) -> u64 {
        self.seed = self.provider.seed();
        self.cached = None;
        self.seed
    }

    /// Replace the config and drop the cached layout.
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovl_core::{FixedSeed, shuffled_candidates};

    struct Sequence(Vec<u64>);

    impl SeedProvider for Sequence {
        fn seed(&mut self) -> u64 {
            if self.0.is_empty() { 0 } else { self.0.remove(0) }
        }
    }

    #[test]
    fn reference_example_resolves_images() {
        let layout = compose_overlay(
            ["/a.png", "/a.png", "/b.jpg", "not-a-url"],
            12345,
            &LayoutConfig::default(),
        );
        assert_eq!(layout.images, vec!["/b.jpg", "/a.png"]);
        assert_eq!(layout.target_count, 23);
        assert_eq!(layout.placements.len(), 2);
        assert_eq!(layout.placements[0].image, "/b.jpg");
        assert_eq!(layout.placements[1].image, "/a.png");
    }

    #[test]
    fn empty_candidates_give_empty_layout() {
        let layout = compose_overlay(Vec::<String>::new(), 1, &LayoutConfig::default());
        assert!(layout.is_empty());
        assert!(layout.images.is_empty());
        assert_eq!(layout.attempts, 0);

        let layout = compose_overlay(["", "nope", "//x"], 1, &LayoutConfig::default());
        assert!(layout.is_empty());
    }

    #[test]
    fn resolved_image_matches_rederived_shuffle() {
        let candidates: Vec<String> = (0..30).map(|i| format!("/team/{i}.webp")).collect();
        let layout = compose_overlay(&candidates, 4242, &LayoutConfig::default());
        let rederived = shuffled_candidates(&candidates, 4242);
        assert_eq!(layout.images, rederived);
        for resolved in &layout.placements {
            assert_eq!(resolved.image, rederived[resolved.placement.image_index]);
            assert_eq!(layout.image(resolved.placement.image_index), Some(resolved.image.as_str()));
        }
    }

    #[test]
    fn placement_search_follows_the_shuffle_on_one_stream() {
        let candidates = ["/a.png", "/b.jpg", "/c.gif", "/d.svg", "/e.webp"];
        let config = LayoutConfig::default();
        let layout = compose_overlay(candidates, 31337, &config);
        let planned = crate::plan_placements(layout.images.len(), 31337, &config);
        let from_layout: Vec<Placement> =
            layout.placements.iter().map(|r| r.placement).collect();
        assert_eq!(from_layout, planned.placements);
    }

    #[test]
    fn first_image_is_not_tied_to_first_column_half() {
        // The first shuffle swap and the first x come from different draws.
        let config = LayoutConfig::default();
        let mut agree = 0;
        for seed in 0..500 {
            let layout = compose_overlay(["/a.png", "/b.jpg"], seed, &config);
            let first = &layout.placements[0];
            if (first.placement.x < 16.5) == (first.image == "/b.jpg") {
                agree += 1;
            }
        }
        assert!((200..=300).contains(&agree), "agree = {agree}");
    }

    #[test]
    fn session_memoizes_until_candidates_change() {
        let mut session = OverlaySession::new(FixedSeed(12345), LayoutConfig::default());
        let first = session.layout(&["/a.png", "/b.jpg"]).clone();
        let again = session.layout(&["/a.png", "/b.jpg"]).clone();
        assert_eq!(first, again);
        assert_eq!(session.computations(), 1);

        session.layout(&["/a.png", "/b.jpg", "/c.gif"]);
        assert_eq!(session.computations(), 2);
    }

    #[test]
    fn session_reseed_invalidates() {
        let mut session = OverlaySession::new(Sequence(vec![1, 2]), LayoutConfig::default());
        assert_eq!(session.seed(), 1);
        let candidates = ["/a.png", "/b.png", "/c.png"];
        session.layout(&candidates);
        assert_eq!(session.reseed(), 2);
        let layout = session.layout(&candidates).clone();
        assert_eq!(layout.seed, 2);
        assert_eq!(session.computations(), 2);
    }

    #[test]
    fn session_config_change_invalidates() {
        let mut session = OverlaySession::new(FixedSeed(9), LayoutConfig::default());
        session.layout(&["/a.png"]);
        session.set_config(LayoutConfig {
            max_attempts: 1,
            ..LayoutConfig::default()
        });
        session.layout(&["/a.png"]);
        assert_eq!(session.computations(), 2);
        assert_eq!(session.config().max_attempts, 1);
    }
}
