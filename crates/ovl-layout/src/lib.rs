#![forbid(unsafe_code)]

//! Avatar overlay layout.
//!
//! This crate places decorative avatars around overlaid text:
//!
//! - [`plan_placements`] - seeded placement search over left/right columns
//! - [`LayoutConfig`] - ranges, spacing, attempts and forbidden zones
//! - [`compose_overlay`] - filter, shuffle, plan and resolve in one pass
//! - [`OverlaySession`] - per-session seed with memoized recomputation
//!
//! # Example
//!
//! ```
//! use ovl_layout::{LayoutConfig, compose_overlay};
//!
//! let layout = compose_overlay(
//!     ["/a.png", "/a.png", "/b.jpg", "not-a-url"],
//!     12345,
//!     &LayoutConfig::default(),
//! );
//! assert_eq!(layout.images, vec!["/b.jpg", "/a.png"]);
//! assert!(layout.placements.len() <= 2);
//! ```

pub mod config;
pub mod overlay;
pub mod planner;

pub use config::{LayoutConfig, LayoutConfigError, LayoutConfigParse};
pub use overlay::{OverlayLayout, OverlaySession, ResolvedPlacement, compose_overlay};
pub use planner::{Placement, PlanOutcome, Side, plan_placements, plan_placements_with};
