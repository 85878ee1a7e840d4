//! Configuration loading and validation for the benchmark binary.
//!
//! All values are read from `CIPHERBENCH_*` environment variables at startup.
//! Every key has a default; the process exits with a clear error message if a
//! value is present but invalid.

use anyhow::{Context, Result};
use cipher_bench::registry::{self, VariantSpec};
use common::BenchmarkConfig;
use serde::Deserialize;

/// Environment variable prefix, e.g. `CIPHERBENCH_ITERATIONS`.
const ENV_PREFIX: &str = "CIPHERBENCH";

/// What the binary does after the warm-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Run the suite, then offer the R/C/S/Q menu.
    Interactive,
    /// Run the suite once and exit.
    Suite,
    /// Run the size sweep for `SWEEP_VARIANT` once and exit.
    Sweep,
}

/// How reports are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Table,
    Json,
}

/// Validated benchmark configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Plaintext length in bytes.
    #[serde(default = "default_payload_size")]
    pub payload_size: usize,

    /// AAD length in bytes; `0` sends no AAD.
    #[serde(default)]
    pub aad_size: usize,

    /// Encrypt/decrypt cycles per variant.
    #[serde(default = "default_iterations")]
    pub iterations: u64,

    /// Comma-separated selectors, e.g. `"aes128-cbc,aes256-gcm"`. Unset means
    /// the standard suite.
    #[serde(default)]
    pub variants: Option<String>,

    /// Selector used by the size sweep.
    #[serde(default = "default_sweep_variant")]
    pub sweep_variant: String,

    #[serde(default = "default_mode")]
    pub mode: Mode,

    #[serde(default = "default_report_format")]
    pub report_format: ReportFormat,

    /// Run a short throwaway pass before the first measured one.
    #[serde(default = "default_warmup")]
    pub warmup: bool,

    /// Seed for the input RNG; unset draws one from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Tracing log level (e.g. `"warn"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_payload_size() -> usize {
    10
}
fn default_iterations() -> u64 {
    100
}
fn default_sweep_variant() -> String {
    "aes256-gcm".into()
}
fn default_mode() -> Mode {
    Mode::Interactive
}
fn default_report_format() -> ReportFormat {
    ReportFormat::Table
}
fn default_warmup() -> bool {
    true
}
fn default_log_level() -> String {
    "warn".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env.try_parsing(true))
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            anyhow::bail!("{ENV_PREFIX}_ITERATIONS must be > 0");
        }
        self.variants()?;
        self.sweep_variant()?;
        Ok(())
    }

    /// Run parameters for the first benchmark.
    pub fn benchmark(&self) -> BenchmarkConfig {
        BenchmarkConfig {
            payload_size: self.payload_size,
            aad_size: self.aad_size,
            iterations: self.iterations,
        }
    }

    /// Selected variants, or the standard suite when none are configured.
    pub fn variants(&self) -> Result<Vec<VariantSpec>> {
        let specs = match self.variants.as_deref() {
            Some(list) => registry::parse_list(list)
                .with_context(|| format!("{ENV_PREFIX}_VARIANTS is invalid"))?,
            None => registry::standard_suite(),
        };
        if specs.is_empty() {
            anyhow::bail!("{ENV_PREFIX}_VARIANTS must name at least one variant");
        }
        Ok(specs)
    }

    pub fn sweep_variant(&self) -> Result<VariantSpec> {
        self.sweep_variant
            .parse()
            .with_context(|| format!("{ENV_PREFIX}_SWEEP_VARIANT is invalid"))
    }
}
