//! Encrypt ⇒ decrypt benchmark for AES-CBC, AES-CBC + HMAC-SHA256 and AES AEAD
//! constructions.
//!
//! - [`crypto`]: the variants behind the [`crypto::Encryptor`] contract.
//! - [`registry`]: `aes<bits>-<family>` selectors.
//! - [`runner`]: timed round-trip loops and size sweeps.
//! - [`report`]: table and JSON rendering.

pub mod crypto;
pub mod registry;
pub mod report;
pub mod runner;

pub use crypto::{CipherError, Encryptor, NonceSource};
pub use registry::{VariantFamily, VariantSpec};
pub use runner::{KeySetup, RunInputs, Runner};
