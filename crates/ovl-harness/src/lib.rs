#![forbid(unsafe_code)]

//! Command-line harness for avatar overlay layouts.
//!
//! Reads candidate image references, computes a layout for a seed, and
//! writes it as JSONL so runs can be diffed and replayed.
//!
//! # JSONL Schema
//!
//! ```json
//! {"event":"start","seed":12345,"candidates":4,"unique":2,"target_count":23,"max_avatars":2}
//! {"event":"placement","index":0,"x":3.37,"y":12.73,"size":55,"side":"left","image_index":0,"image":"/b.jpg"}
//! {"event":"complete","placed":2,"skipped":0,"attempts":2,"checksum":"fnv1a:..."}
//! ```
//!
//! # Seeds
//!
//! `--seed N` wins, then `OVL_SEED`, then a clock-derived seed.

pub mod golden;

use std::fmt;
use std::io::{self, BufRead, Write};

use ovl_core::SeedProvider;
use ovl_layout::{LayoutConfig, LayoutConfigError, OverlayLayout, Side, compose_overlay};
use serde::Serialize;
use tracing::{info, warn};

/// Env var holding a fixed seed.
pub const ENV_SEED: &str = "OVL_SEED";

/// Process exit code for any harness failure.
pub const FAILURE_EXIT_CODE: u8 = 2;

/// Errors surfaced by the harness.
#[derive(Debug)]
pub enum HarnessError {
    Io(io::Error),
    Json(serde_json::Error),
    InvalidSeed { origin: &'static str, value: String },
    MissingValue(&'static str),
    UnknownFlag(String),
    Config(Vec<LayoutConfigError>),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::InvalidSeed { origin, value } => {
                write!(f, "invalid seed from {origin}: {value:?} (expected unsigned integer)")
            }
            Self::MissingValue(flag) => write!(f, "{flag} requires a value"),
            Self::UnknownFlag(flag) => write!(f, "unknown flag: {flag}"),
            Self::Config(errors) => {
                write!(f, "invalid layout config:")?;
                for err in errors {
                    write!(f, " {err};")?;
                }
                Ok(())
            }
        }
    }
}

impl HarnessError {
    /// Exit code the binary reports for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        FAILURE_EXIT_CODE
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for HarnessError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One event per line.
    #[default]
    Jsonl,
    /// The whole layout as one pretty-printed document.
    Json,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HarnessOptions {
    pub seed: Option<u64>,
    pub candidates: Vec<String>,
    /// Read candidates from stdin, one per line.
    pub read_stdin: bool,
    pub format: OutputFormat,
    /// Fail instead of warning on config diagnostics.
    pub strict_config: bool,
}

/// Parse arguments (without the program name).
///
/// Positional arguments are candidates; `-` or no candidates at all means
/// stdin.
pub fn parse_args<I>(args: I) -> Result<HarnessOptions, HarnessError>
where
    I: IntoIterator<Item = String>,
{
    let mut options = HarnessOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().ok_or(HarnessError::MissingValue("--seed"))?;
                options.seed = Some(parse_seed("--seed", &value)?);
            }
            "--json" => options.format = OutputFormat::Json,
            "--strict-config" => options.strict_config = true,
            "-" => options.read_stdin = true,
            "--" => {
                options.candidates.extend(args.by_ref());
            }
            flag if flag.starts_with("--") => {
                return Err(HarnessError::UnknownFlag(flag.to_string()));
            }
            _ => options.candidates.push(arg),
        }
    }
    if options.candidates.is_empty() {
        options.read_stdin = true;
    }
    Ok(options)
}

fn parse_seed(origin: &'static str, value: &str) -> Result<u64, HarnessError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| HarnessError::InvalidSeed {
            origin,
            value: value.to_string(),
        })
}

/// Pick the session seed: explicit flag, then env value, then `provider`.
pub fn resolve_seed<P: SeedProvider>(
    flag: Option<u64>,
    env_value: Option<String>,
    mut provider: P,
) -> Result<u64, HarnessError> {
    if let Some(seed) = flag {
        return Ok(seed);
    }
    match env_value {
        Some(value) => parse_seed(ENV_SEED, &value),
        None => Ok(provider.seed()),
    }
}

/// Non-empty, trimmed lines of `input`.
pub fn read_candidates<R: BufRead>(input: R) -> Result<Vec<String>, HarnessError> {
    let mut candidates = Vec::new();
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            candidates.push(trimmed.to_string());
        }
    }
    Ok(candidates)
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum HarnessEvent<'a> {
    Start {
        seed: u64,
        candidates: usize,
        unique: usize,
        target_count: usize,
        max_avatars: usize,
    },
    Placement {
        index: usize,
        x: f64,
        y: f64,
        size: u32,
        side: Side,
        image_index: usize,
        image: &'a str,
    },
    Complete {
        placed: usize,
        skipped: usize,
        attempts: u64,
        checksum: String,
    },
}

/// Write `layout` as JSONL events.
pub fn write_jsonl<W: Write>(
    out: &mut W,
    layout: &OverlayLayout,
    raw_candidates: usize,
) -> Result<(), HarnessError> {
    let start = HarnessEvent::Start {
        seed: layout.seed,
        candidates: raw_candidates,
        unique: layout.images.len(),
        target_count: layout.target_count,
        max_avatars: layout.max_avatars,
    };
    serde_json::to_writer(&mut *out, &start)?;
    writeln!(out)?;

    for (index, resolved) in layout.placements.iter().enumerate() {
        let p = &resolved.placement;
        let event = HarnessEvent::Placement {
            index,
            x: p.x,
            y: p.y,
            size: p.size,
            side: p.side,
            image_index: p.image_index,
            image: &resolved.image,
        };
        serde_json::to_writer(&mut *out, &event)?;
        writeln!(out)?;
    }

    let complete = HarnessEvent::Complete {
        placed: layout.placements.len(),
        skipped: layout.skipped_slots,
        attempts: layout.attempts,
        checksum: golden::layout_checksum(layout),
    };
    serde_json::to_writer(&mut *out, &complete)?;
    writeln!(out)?;
    Ok(())
}

/// Run the harness end to end.
///
/// `args` excludes the program name. `get_env` looks up `OVL_SEED` and the
/// `OVL_LAYOUT_*` overrides; `input` is read only when stdin is requested;
/// `provider` supplies the seed when neither `--seed` nor `OVL_SEED` is set.
pub fn run_with<I, G, R, W, P>(
    args: I,
    mut get_env: G,
    input: R,
    out: &mut W,
    provider: P,
) -> Result<OverlayLayout, HarnessError>
where
    I: IntoIterator<Item = String>,
    G: FnMut(&str) -> Option<String>,
    R: BufRead,
    W: Write,
    P: SeedProvider,
{
    let options = parse_args(args)?;

    let parse = LayoutConfig::from_lookup(&mut get_env);
    if !parse.errors.is_empty() {
        if options.strict_config {
            return Err(HarnessError::Config(parse.errors));
        }
        for err in &parse.errors {
            warn!(field = err.field, value = %err.value, "{}", err.message);
        }
    }
    let config = parse.config;

    let mut candidates = options.candidates;
    if options.read_stdin {
        candidates.extend(read_candidates(input)?);
    }

    let seed = resolve_seed(options.seed, get_env(ENV_SEED), provider)?;
    info!(
        seed,
        candidates = candidates.len(),
        config = %config.summary_short(),
        "composing overlay"
    );

    let layout = compose_overlay(&candidates, seed, &config);
    match options.format {
        OutputFormat::Jsonl => write_jsonl(out, &layout, candidates.len())?,
        OutputFormat::Json => write_json(out, &layout)?,
    }
    out.flush()?;
    Ok(layout)
}

/// Write `layout` as a single pretty JSON document.
pub fn write_json<W: Write>(out: &mut W, layout: &OverlayLayout) -> Result<(), HarnessError> {
    serde_json::to_writer_pretty(&mut *out, layout)?;
    writeln!(out)?;
    Ok(())
}
