#![forbid(unsafe_code)]

//! Avatar overlay harness.
//!
//! Prints the layout for a set of candidate images so it can be inspected,
//! diffed between builds, or replayed with a fixed seed.
//!
//! # Running
//!
//! ```sh
//! cargo run -p ovl-harness -- --seed 12345 /a.png /a.png /b.jpg not-a-url
//! printf '/a.png\n/b.jpg\n' | OVL_SEED=7 cargo run -p ovl-harness -- --json
//! ```
//!
//! # Environment
//!
//! - `OVL_SEED`: seed when `--seed` is absent (otherwise clock-derived)
//! - `OVL_LAYOUT_*`: layout overrides, see `ovl_layout::config`
//! - `OVL_LOG` / `RUST_LOG`: log filter (default `warn`)
//! - `OVL_LOG_FORMAT=json`: structured log lines on stderr

use std::env;
use std::io::{self, BufWriter};
use std::process::ExitCode;

use ovl_core::ClockSeed;
use ovl_harness::run_with;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("OVL_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let json = env::var("OVL_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn main() -> ExitCode {
    init_tracing();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let result = run_with(
        env::args().skip(1),
        |key| env::var(key).ok(),
        io::stdin().lock(),
        &mut out,
        ClockSeed::new(),
    );
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ovl-harness: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
