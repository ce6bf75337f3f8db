#![forbid(unsafe_code)]

//! Layout configuration.
//!
//! [`LayoutConfig::default`] reproduces the reference overlay: 20–24 target
//! avatars, columns at `x ∈ [3,30]` and `x ∈ [70,97]`, bands at
//! `y ∈ [5,40]` and `y ∈ [60,95]`, sizes 50–70 px, spacing `18 + 0.10·size`
//! and 200 attempts per slot. A handful of knobs can be overridden from the
//! environment; malformed values are reported and the default is kept.

use std::env;
use std::fmt;

use ovl_core::{Span, Zone};

/// Env var overriding [`LayoutConfig::max_attempts`].
pub const ENV_MAX_ATTEMPTS: &str = "OVL_LAYOUT_MAX_ATTEMPTS";
/// Env var overriding [`LayoutConfig::target_min`].
pub const ENV_TARGET_MIN: &str = "OVL_LAYOUT_TARGET_MIN";
/// Env var overriding [`LayoutConfig::target_max`].
pub const ENV_TARGET_MAX: &str = "OVL_LAYOUT_TARGET_MAX";
/// Env var overriding [`LayoutConfig::spacing_base`].
pub const ENV_SPACING_BASE: &str = "OVL_LAYOUT_SPACING_BASE";
/// Env var overriding [`LayoutConfig::spacing_factor`].
pub const ENV_SPACING_FACTOR: &str = "OVL_LAYOUT_SPACING_FACTOR";

/// Region reserved for the page heading.
pub const HEADING_ZONE: Zone = Zone::new(20.0, 35.0, 80.0, 50.0);
/// Region reserved for the subtitle under the heading.
pub const SUBTITLE_ZONE: Zone = Zone::new(25.0, 50.0, 75.0, 65.0);

/// Tunables for [`crate::plan_placements`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Smallest target avatar count (inclusive).
    pub target_min: u32,
    /// Largest target avatar count (inclusive).
    pub target_max: u32,
    /// Added to the session seed for the generator that picks the target count.
    pub target_seed_offset: u64,
    /// Horizontal range of the left column.
    pub left_x: Span,
    /// Horizontal range of the right column.
    pub right_x: Span,
    /// Vertical band above the text.
    pub top_band: Span,
    /// Vertical band below the text.
    pub bottom_band: Span,
    /// Full-height band used when the roll clears both thresholds.
    ///
    /// With the default thresholds (0.5 / 1.0) this branch cannot be taken
    /// because draws are always below 1.0.
    pub full_band: Span,
    /// Rolls below this pick [`Self::top_band`].
    pub top_band_threshold: f64,
    /// Rolls below this (and not below the top threshold) pick [`Self::bottom_band`].
    pub bottom_band_threshold: f64,
    /// Smallest avatar diameter in pixels (inclusive).
    pub size_min: u32,
    /// Largest avatar diameter in pixels (inclusive).
    pub size_max: u32,
    /// Constant part of the minimum center distance.
    pub spacing_base: f64,
    /// Per-pixel part of the minimum center distance.
    pub spacing_factor: f64,
    /// Tries per slot before the slot is dropped.
    pub max_attempts: u32,
    /// Regions where no avatar may be centered.
    pub forbidden_zones: Vec<Zone>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            target_min: 20,
            target_max: 24,
            target_seed_offset: 7,
            left_x: Span::new(3.0, 30.0),
            right_x: Span::new(70.0, 97.0),
            top_band: Span::new(5.0, 40.0),
            bottom_band: Span::new(60.0, 95.0),
            full_band: Span::new(5.0, 95.0),
            top_band_threshold: 0.5,
            bottom_band_threshold: 1.0,
            size_min: 50,
            size_max: 70,
            spacing_base: 18.0,
            spacing_factor: 0.10,
            max_attempts: 200,
            forbidden_zones: vec![HEADING_ZONE, SUBTITLE_ZONE],
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct LayoutConfigParse {
    pub config: LayoutConfig,
    pub errors: Vec<LayoutConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl LayoutConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LayoutConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for LayoutConfigError {}

impl LayoutConfig {
    /// Minimum center distance required around an avatar of `size` pixels.
    #[inline]
    #[must_use]
    pub fn min_distance(&self, size: u32) -> f64 {
        self.spacing_base + self.spacing_factor * f64::from(size)
    }

    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> LayoutConfig {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> LayoutConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Parse config through an arbitrary variable lookup.
    ///
    /// `get` receives names such as [`ENV_MAX_ATTEMPTS`]; hosts that keep
    /// their environment elsewhere (or tests) pass their own map.
    #[must_use]
    pub fn from_lookup<F>(get: F) -> LayoutConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        from_env_with(get)
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<LayoutConfigError>> {
        let mut errors = Vec::new();
        if self.max_attempts == 0 {
            errors.push(LayoutConfigError::new("max_attempts", "0", "must be >= 1"));
        }
        if self.target_min > self.target_max {
            errors.push(LayoutConfigError::new(
                "target_min",
                format!("{}..={}", self.target_min, self.target_max),
                "target_min must not exceed target_max",
            ));
        }
        if self.size_min > self.size_max {
            errors.push(LayoutConfigError::new(
                "size_min",
                format!("{}..={}", self.size_min, self.size_max),
                "size_min must not exceed size_max",
            ));
        }
        if self.spacing_base.is_nan() || self.spacing_base < 0.0 {
            errors.push(LayoutConfigError::new(
                "spacing_base",
                self.spacing_base.to_string(),
                "must be >= 0",
            ));
        }
        if self.spacing_factor.is_nan() || self.spacing_factor < 0.0 {
            errors.push(LayoutConfigError::new(
                "spacing_factor",
                self.spacing_factor.to_string(),
                "must be >= 0",
            ));
        }
        validate_span("left_x", self.left_x, &mut errors);
        validate_span("right_x", self.right_x, &mut errors);
        validate_span("top_band", self.top_band, &mut errors);
        validate_span("bottom_band", self.bottom_band, &mut errors);
        validate_span("full_band", self.full_band, &mut errors);
        if Span::new(self.top_band_threshold, self.bottom_band_threshold).is_inverted() {
            errors.push(LayoutConfigError::new(
                "top_band_threshold",
                format!("{}/{}", self.top_band_threshold, self.bottom_band_threshold),
                "top threshold must not exceed bottom threshold",
            ));
        }
        for zone in &self.forbidden_zones {
            validate_span("forbidden_zones.x", zone.horizontal(), &mut errors);
            validate_span("forbidden_zones.y", zone.vertical(), &mut errors);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Short human-readable summary for logs.
    #[must_use]
    pub fn summary_short(&self) -> String {
        format!(
            "targets {}..={} · sizes {}..={} · spacing {}+{}·size · {} attempts · {} zones",
            self.target_min,
            self.target_max,
            self.size_min,
            self.size_max,
            self.spacing_base,
            self.spacing_factor,
            self.max_attempts,
            self.forbidden_zones.len()
        )
    }
}

fn from_env_with<F>(mut get: F) -> LayoutConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = LayoutConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_MAX_ATTEMPTS) {
        match parse_u32(&value) {
            Some(parsed) => config.max_attempts = parsed,
            None => errors.push(LayoutConfigError::new(
                "max_attempts",
                value,
                "expected positive integer",
            )),
        }
    }

    if let Some(value) = get(ENV_TARGET_MIN) {
        match parse_u32(&value) {
            Some(parsed) => config.target_min = parsed,
            None => errors.push(LayoutConfigError::new(
                "target_min",
                value,
                "expected non-negative integer",
            )),
        }
    }

    if let Some(value) = get(ENV_TARGET_MAX) {
        match parse_u32(&value) {
            Some(parsed) => config.target_max = parsed,
            None => errors.push(LayoutConfigError::new(
                "target_max",
                value,
                "expected non-negative integer",
            )),
        }
    }

    if let Some(value) = get(ENV_SPACING_BASE) {
        match parse_f64(&value) {
            Some(parsed) => config.spacing_base = parsed,
            None => errors.push(LayoutConfigError::new(
                "spacing_base",
                value,
                "expected number",
            )),
        }
    }

    if let Some(value) = get(ENV_SPACING_FACTOR) {
        match parse_f64(&value) {
            Some(parsed) => config.spacing_factor = parsed,
            None => errors.push(LayoutConfigError::new(
                "spacing_factor",
                value,
                "expected number",
            )),
        }
    }

    if let Err(mut validation) = config.validate() {
        errors.append(&mut validation);
    }

    LayoutConfigParse { config, errors }
}

fn validate_span(field: &'static str, span: Span, errors: &mut Vec<LayoutConfigError>) {
    if span.is_inverted() {
        errors.push(LayoutConfigError::new(
            field,
            format!("[{}, {}]", span.min, span.max),
            "min must not exceed max",
        ));
    } else if span.min < 0.0 || span.max > 100.0 {
        errors.push(LayoutConfigError::new(
            field,
            format!("[{}, {}]", span.min, span.max),
            "must lie within [0, 100]",
        ));
    }
}

#[inline]
fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

#[inline]
fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_is_valid() {
        assert_eq!(LayoutConfig::default().validate(), Ok(()));
    }

    #[test]
    fn min_distance_scales_with_size() {
        let config = LayoutConfig::default();
        assert!((config.min_distance(50) - 23.0).abs() < 1e-9);
        assert!((config.min_distance(70) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn default_zones_stay_clear_of_columns() {
        let config = LayoutConfig::default();
        assert_eq!(config.forbidden_zones, vec![HEADING_ZONE, SUBTITLE_ZONE]);
        for zone in &config.forbidden_zones {
            assert!(zone.left > config.left_x.min);
            assert!(zone.right < config.right_x.max);
        }
    }

    #[test]
    fn env_overrides_apply() {
        let mut env = HashMap::new();
        env.insert(ENV_MAX_ATTEMPTS, "50");
        env.insert(ENV_TARGET_MIN, "4");
        env.insert(ENV_TARGET_MAX, " 6 ");
        env.insert(ENV_SPACING_BASE, "10.5");
        env.insert(ENV_SPACING_FACTOR, "0");

        let parsed = from_env_with(|key| env.get(key).map(|value| value.to_string()));
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        let config = parsed.config;
        assert_eq!(config.max_attempts, 50);
        assert_eq!(config.target_min, 4);
        assert_eq!(config.target_max, 6);
        assert_eq!(config.spacing_base, 10.5);
        assert_eq!(config.spacing_factor, 0.0);
    }

    #[test]
    fn env_invalid_values_reported() {
        let mut env = HashMap::new();
        env.insert(ENV_MAX_ATTEMPTS, "lots");
        env.insert(ENV_SPACING_BASE, "NaN");

        let parsed = from_env_with(|key| env.get(key).map(|value| value.to_string()));
        let fields: Vec<_> = parsed.errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["max_attempts", "spacing_base"]);
        assert_eq!(parsed.config.max_attempts, 200);
        assert_eq!(parsed.config.spacing_base, 18.0);
    }

    #[test]
    fn lookup_matches_env_parsing() {
        let parsed =
            LayoutConfig::from_lookup(|key| (key == ENV_TARGET_MAX).then(|| "21".to_string()));
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.config.target_max, 21);
    }

    #[test]
    fn env_zero_attempts_fails_validation() {
        let mut env = HashMap::new();
        env.insert(ENV_MAX_ATTEMPTS, "0");
        let parsed = from_env_with(|key| env.get(key).map(|value| value.to_string()));
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].field, "max_attempts");
    }

    #[test]
    fn validate_collects_all_violations() {
        let config = LayoutConfig {
            target_min: 9,
            target_max: 3,
            left_x: Span::new(40.0, 10.0),
            top_band: Span::new(-5.0, 40.0),
            ..LayoutConfig::default()
        };
        let errors = config.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["target_min", "left_x", "top_band"]);
    }

    #[test]
    fn error_display_includes_context() {
        let err = LayoutConfigError::new("max_attempts", "x", "expected positive integer");
        assert_eq!(err.to_string(), "max_attempts=x (expected positive integer)");
    }

    #[test]
    fn summary_mentions_attempts() {
        assert!(LayoutConfig::default().summary_short().contains("200 attempts"));
    }
}
