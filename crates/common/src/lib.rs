//! Shared benchmark data model and failure taxonomy for `cipher-bench` crates.

pub mod error;
pub mod protocol;

pub use error::FailureKind;
pub use protocol::{BenchmarkConfig, BenchmarkReport, BenchmarkResult, Failure};
