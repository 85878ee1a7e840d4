//! Payload-size sweep: one variant across a fixed ladder of sizes.
//!
//! The variant is keyed once per size, outside the timed loop, so the rows
//! show how cost scales with payload length alone.

use common::{BenchmarkConfig, BenchmarkReport};
use tracing::info;

use super::{run_with, KeySetup, Runner};
use crate::registry::{self, VariantSpec};

/// Payload sizes visited by a sweep, smallest first.
pub const SWEEP_SIZES: [usize; 7] = [1, 10, 100, 1_000, 10_000, 100_000, 1_000_000];

impl Runner {
    /// Run `spec` once per entry of [`SWEEP_SIZES`].
    ///
    /// `base` supplies the AAD size and iteration count; its payload size is
    /// ignored. The returned report carries `base` unchanged.
    pub fn run_sweep(&mut self, spec: &VariantSpec, base: &BenchmarkConfig) -> BenchmarkReport {
        info!(variant = %spec, iterations = base.iterations, "running size sweep");

        let results = SWEEP_SIZES
            .iter()
            .map(|&payload_size| {
                let cfg = BenchmarkConfig {
                    payload_size,
                    ..*base
                };
                let workload = self.prepare(&cfg);
                let mut variant = registry::build(spec);
                let inputs = workload.inputs(spec.key_size, variant.nonce_source());
                run_with(&mut variant, inputs, cfg.iterations, KeySetup::Once)
            })
            .collect();

        BenchmarkReport {
            config: *base,
            results,
        }
    }
}
