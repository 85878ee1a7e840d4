//! Benchmark inputs and outputs exchanged between the runner and the reporter.
//!
//! These types are serialised as JSON when the report is emitted in machine
//! readable form.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FailureKind;

// ---------------------------------------------------------------------------
// Run parameters
// ---------------------------------------------------------------------------

/// Sizes and repetition count for one benchmark run.
///
/// Only changed between runs; the runner treats it as immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Plaintext length in bytes.
    pub payload_size: usize,
    /// Additional authenticated data length in bytes.
    pub aad_size: usize,
    /// Encrypt/decrypt cycles per variant.
    pub iterations: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            payload_size: 10,
            aad_size: 0,
            iterations: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Why a run was marked as failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Failure classification.
    pub kind: FailureKind,
    /// Human-readable description safe to print.
    pub detail: String,
}

impl Failure {
    /// Construct a [`Failure`] from a kind and a description.
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Outcome of benchmarking one variant against one [`BenchmarkConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Variant display name, e.g. `"AES256-GCM"`.
    pub name: String,
    /// Plaintext length in bytes.
    pub plain_size: usize,
    /// AAD length in bytes.
    pub aad_size: usize,
    /// Length of the last encrypted message in bytes.
    pub encrypted_size: usize,
    /// `(encrypted - plain - aad) / (plain + aad)`; `None` when the input is empty.
    pub overhead_ratio: Option<f64>,
    /// Mean wall time of one iteration.
    pub avg_duration: Duration,
    /// `true` when every iteration round-tripped.
    pub passed: bool,
    /// First failure observed, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

impl BenchmarkResult {
    /// Average iteration time in fractional milliseconds.
    pub fn avg_millis(&self) -> f64 {
        self.avg_duration.as_secs_f64() * 1_000.0
    }
}

/// Compute the ciphertext overhead ratio for a message.
///
/// Returns `None` when `plain_size + aad_size` is zero.
pub fn overhead_ratio(plain_size: usize, aad_size: usize, encrypted_size: usize) -> Option<f64> {
    let input = plain_size + aad_size;
    if input == 0 {
        return None;
    }
    Some((encrypted_size as f64 - input as f64) / input as f64)
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything the reporter needs: the run parameters and the ordered results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Parameters the results were produced with.
    pub config: BenchmarkConfig,
    /// Results in execution order.
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    /// Returns `true` if any result failed.
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| !r.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(passed: bool) -> BenchmarkResult {
        BenchmarkResult {
            name: "AES256-GCM".into(),
            plain_size: 15,
            aad_size: 20,
            encrypted_size: 63,
            overhead_ratio: overhead_ratio(15, 20, 63),
            avg_duration: Duration::from_micros(1_500),
            passed,
            failure: (!passed).then(|| Failure::new(FailureKind::RoundTripMismatch, "differs")),
        }
    }

    #[test]
    fn overhead_ratio_matches_formula() {
        let ratio = overhead_ratio(15, 20, 63).unwrap();
        assert!((ratio - 28.0 / 35.0).abs() < 1e-9);
    }

    #[test]
    fn overhead_ratio_undefined_for_empty_input() {
        assert_eq!(overhead_ratio(0, 0, 32), None);
    }

    #[test]
    fn avg_millis_is_fractional() {
        assert!((sample(true).avg_millis() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn report_serde_round_trip() {
        let report = BenchmarkReport {
            config: BenchmarkConfig::default(),
            results: vec![sample(true), sample(false)],
        };
        let json = serde_json::to_string(&report).unwrap();
        let decoded: BenchmarkReport = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, report);
        assert!(decoded.has_failures());
    }

    #[test]
    fn passing_result_omits_failure_field() {
        let json = serde_json::to_value(sample(true)).unwrap();
        assert!(json.get("failure").is_none());
        assert_eq!(json["passed"], true);
    }

    #[test]
    fn config_defaults() {
        let cfg = BenchmarkConfig::default();
        assert_eq!(cfg.payload_size, 10);
        assert_eq!(cfg.aad_size, 0);
        assert_eq!(cfg.iterations, 100);
    }
}
