//! `cipher-bench` binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured logging.
//! 3. Resolve the variant selection.
//! 4. Create the [`Runner`] and perform the warm-up pass.
//! 5. Run the configured mode against stdin/stdout.

mod config;
mod session;
mod telemetry;

use std::io;

use anyhow::Result;
use cipher_bench::Runner;
use tracing::info;

use crate::config::{Config, Mode};
use crate::session::Session;

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Logging is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = ?cfg.mode,
        seeded = cfg.seed.is_some(),
        "cipher-bench starting"
    );

    // -----------------------------------------------------------------------
    // 3. Variant selection
    // -----------------------------------------------------------------------
    let specs = cfg.variants()?;
    let sweep = cfg.sweep_variant()?;

    // -----------------------------------------------------------------------
    // 4. Runner and warm-up
    // -----------------------------------------------------------------------
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(
        Runner::new(cfg.seed),
        specs,
        sweep,
        cfg.benchmark(),
        cfg.report_format,
        stdin.lock(),
        stdout.lock(),
    );
    if cfg.warmup {
        session.warm_up();
    }

    // -----------------------------------------------------------------------
    // 5. Mode
    // -----------------------------------------------------------------------
    let report = match cfg.mode {
        Mode::Interactive => return session.run_interactive(),
        Mode::Suite => session.print_suite()?,
        Mode::Sweep => session.print_sweep()?,
    };

    let failed = report.results.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        anyhow::bail!("{failed} variant run(s) failed the round trip");
    }
    Ok(())
}
