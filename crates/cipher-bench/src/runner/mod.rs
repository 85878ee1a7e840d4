//! Timed encrypt ⇒ decrypt loops over one variant at a time.
//!
//! # Run contract
//!
//! 1. A variant instance is bound for the whole run. With
//!    [`KeySetup::PerIteration`] `init` is repeated inside the timed loop, so
//!    key-schedule cost is part of the measurement; [`KeySetup::Once`] keys
//!    the variant before the clock starts.
//! 2. Every iteration encrypts, decrypts with the IV and AAD lengths actually
//!    used, and compares the result byte for byte. A decrypt error or mismatch
//!    marks the run failed; iteration continues.
//! 3. An `init` or `encrypt` error is a contract violation: the run stops at
//!    once and is reported as failed.
//! 4. Sizes and overhead come from the last produced message.
//!
//! All input material (keys, IV, AAD) comes from the [`Runner`]'s seeded RNG.

pub mod sweep;

use std::time::{Duration, Instant};

use common::{BenchmarkConfig, BenchmarkReport, BenchmarkResult, Failure, FailureKind};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use tracing::{debug, info, warn};

use crate::crypto::{CipherError, Encryptor, KeyMaterial, KeySize, NonceSource, BLOCK_LEN};
use crate::registry::{self, VariantSpec};

/// Detail text for a decrypt that succeeded but returned different bytes.
pub const MISMATCH_DETAIL: &str = "Decrypting encrypted data doesn't return original information!";

/// When `init` runs relative to the timed loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySetup {
    /// Re-key on every iteration (key schedule is timed).
    PerIteration,
    /// Key once before timing starts.
    Once,
}

/// Borrowed inputs for one run.
#[derive(Debug, Clone, Copy)]
pub struct RunInputs<'a> {
    pub key: &'a [u8],
    /// Caller IV; `None` for internal-nonce variants.
    pub iv: Option<&'a [u8]>,
    pub plaintext: &'a [u8],
    pub aad: Option<&'a [u8]>,
}

/// Input material shared by every variant in one suite run.
pub struct Workload {
    keys: Vec<KeyMaterial>,
    iv: [u8; BLOCK_LEN],
    plaintext: Vec<u8>,
    aad: Vec<u8>,
}

impl Workload {
    /// Key of the given width.
    pub fn key(&self, size: KeySize) -> &KeyMaterial {
        &self.keys[size as usize]
    }

    pub fn plaintext(&self) -> &[u8] {
        &self.plaintext
    }

    pub fn aad(&self) -> &[u8] {
        &self.aad
    }

    /// Inputs for a variant keyed at `size`, passing the IV only to
    /// variants that take it from the caller.
    pub fn inputs(&self, size: KeySize, nonce: NonceSource) -> RunInputs<'_> {
        RunInputs {
            key: self.key(size).as_bytes(),
            iv: match nonce {
                NonceSource::External => Some(self.iv.as_slice()),
                NonceSource::Internal => None,
            },
            plaintext: &self.plaintext,
            aad: (!self.aad.is_empty()).then_some(self.aad.as_slice()),
        }
    }
}

/// Plaintext whose byte `i` is `i mod 256`.
pub fn pattern_plaintext(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}

/// Owns the input RNG and drives variants through timed runs.
pub struct Runner {
    rng: StdRng,
}

impl Runner {
    /// Create a runner; a fixed `seed` makes the generated inputs reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Draw fresh keys, IV and AAD and build the plaintext for `cfg`.
    pub fn prepare(&mut self, cfg: &BenchmarkConfig) -> Workload {
        let keys = KeySize::ALL
            .iter()
            .map(|size| KeyMaterial::new(self.random_bytes(size.byte_len())))
            .collect();
        let mut iv = [0u8; BLOCK_LEN];
        self.rng.fill_bytes(&mut iv);

        Workload {
            keys,
            iv,
            plaintext: pattern_plaintext(cfg.payload_size),
            aad: self.random_bytes(cfg.aad_size),
        }
    }

    /// Run every selector in `specs` against one shared workload.
    ///
    /// A failing variant is recorded and the remaining variants still run.
    pub fn run_suite(&mut self, specs: &[VariantSpec], cfg: &BenchmarkConfig) -> BenchmarkReport {
        let workload = self.prepare(cfg);
        info!(
            variants = specs.len(),
            payload_size = cfg.payload_size,
            aad_size = cfg.aad_size,
            iterations = cfg.iterations,
            "running benchmark suite"
        );

        let results = specs
            .iter()
            .map(|spec| {
                let mut variant = registry::build(spec);
                let inputs = workload.inputs(spec.key_size, variant.nonce_source());
                run_with(&mut variant, inputs, cfg.iterations, KeySetup::PerIteration)
            })
            .collect();

        BenchmarkReport {
            config: *cfg,
            results,
        }
    }

    fn random_bytes(&mut self, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        self.rng.fill_bytes(&mut buf);
        buf
    }
}

/// Benchmark a fresh `E` (see [`run_with`]).
pub fn run<E: Encryptor + Default>(
    inputs: RunInputs<'_>,
    iterations: u64,
    setup: KeySetup,
) -> BenchmarkResult {
    let mut variant = E::default();
    run_with(&mut variant, inputs, iterations, setup)
}

/// Benchmark `variant` for `iterations` encrypt ⇒ decrypt cycles.
///
/// An iteration count of zero is raised to one.
pub fn run_with<E: Encryptor + ?Sized>(
    variant: &mut E,
    inputs: RunInputs<'_>,
    iterations: u64,
    setup: KeySetup,
) -> BenchmarkResult {
    let iterations = if iterations == 0 {
        warn!("iteration count of 0 raised to 1");
        1
    } else {
        iterations
    };
    let iv_len = inputs.iv.map_or(0, <[u8]>::len);
    let aad_len = inputs.aad.map_or(0, <[u8]>::len);

    let mut tally = Tally::default();
    let mut completed = 0u64;

    if setup == KeySetup::Once {
        if let Err(e) = variant.init(inputs.key) {
            tally.abort(&e);
            return tally.finish(variant.name(), inputs, aad_len, Duration::ZERO, 0);
        }
    }
    debug!(
        variant = %variant.name(),
        iterations,
        plain_size = inputs.plaintext.len(),
        aad_size = aad_len,
        "run started"
    );

    let start = Instant::now();
    for _ in 0..iterations {
        if setup == KeySetup::PerIteration {
            if let Err(e) = variant.init(inputs.key) {
                tally.abort(&e);
                break;
            }
        }

        let message = match variant.encrypt(inputs.plaintext, inputs.iv, inputs.aad) {
            Ok(message) => message,
            Err(e) => {
                tally.abort(&e);
                break;
            }
        };
        tally.encrypted_size = Some(message.len());

        match variant.decrypt(&message, iv_len, aad_len) {
            Ok(recovered) if recovered == inputs.plaintext => {}
            Ok(_) => tally.fail(Failure::new(FailureKind::RoundTripMismatch, MISMATCH_DETAIL)),
            Err(e) => tally.fail(Failure::new(e.kind(), e.to_string())),
        }
        completed += 1;
    }
    let elapsed = start.elapsed();

    tally.finish(variant.name(), inputs, aad_len, elapsed, completed)
}

/// Accumulates the outcome of one run.
#[derive(Default)]
struct Tally {
    encrypted_size: Option<usize>,
    failure: Option<Failure>,
}

impl Tally {
    /// Record a failure, keeping the first one seen.
    fn fail(&mut self, failure: Failure) {
        if self.failure.is_none() {
            self.failure = Some(failure);
        }
    }

    fn abort(&mut self, e: &CipherError) {
        self.fail(Failure::new(e.kind(), e.to_string()));
    }

    fn finish(
        self,
        name: String,
        inputs: RunInputs<'_>,
        aad_size: usize,
        elapsed: Duration,
        completed: u64,
    ) -> BenchmarkResult {
        let plain_size = inputs.plaintext.len();
        let avg_duration = if completed == 0 {
            Duration::ZERO
        } else {
            elapsed.div_f64(completed as f64)
        };
        let overhead_ratio = self
            .encrypted_size
            .and_then(|enc| common::protocol::overhead_ratio(plain_size, aad_size, enc));

        let passed = self.failure.is_none();
        match &self.failure {
            None => info!(
                variant = %name,
                avg_ms = avg_duration.as_secs_f64() * 1_000.0,
                "run passed"
            ),
            Some(f) => warn!(
                variant = %name,
                kind = f.kind.code(),
                retryable = f.kind.is_retryable(),
                "run failed"
            ),
        }

        BenchmarkResult {
            name,
            plain_size,
            aad_size,
            encrypted_size: self.encrypted_size.unwrap_or(0),
            overhead_ratio,
            avg_duration,
            passed,
            failure: self.failure,
        }
    }
}
