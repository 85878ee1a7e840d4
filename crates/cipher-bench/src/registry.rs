//! Name-based selection of encryption variants.
//!
//! Selectors have the form `aes<128|192|256>-<family>`, e.g. `aes256-gcm` or
//! `aes128-cbc-hmac`. Parsing is case-insensitive; [`fmt::Display`] renders the
//! canonical lower-case form.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::crypto::{
    AesCbc, AesCbcHmac, AesCbcRaw, AesGcm, AesGcmN128, AesGcmSiv, Encryptor, KeySize,
};

/// A construction independent of key width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantFamily {
    /// AES-CBC, internal IV, PKCS#7.
    Cbc,
    /// AES-CBC followed by HMAC-SHA256.
    CbcHmac,
    /// Raw AES in CBC mode with a caller IV and variant-layer padding.
    CbcRaw,
    /// AES-GCM, 96-bit nonce.
    Gcm,
    /// AES-GCM, 128-bit nonce.
    GcmN128,
    /// AES-GCM-SIV.
    GcmSiv,
}

impl VariantFamily {
    /// Every family, in suite order.
    pub const ALL: [VariantFamily; 6] = [
        VariantFamily::Cbc,
        VariantFamily::CbcHmac,
        VariantFamily::CbcRaw,
        VariantFamily::Gcm,
        VariantFamily::GcmN128,
        VariantFamily::GcmSiv,
    ];

    /// Selector suffix, e.g. `"cbc-hmac"`.
    pub fn id(self) -> &'static str {
        match self {
            VariantFamily::Cbc => "cbc",
            VariantFamily::CbcHmac => "cbc-hmac",
            VariantFamily::CbcRaw => "cbc-raw",
            VariantFamily::Gcm => "gcm",
            VariantFamily::GcmN128 => "gcm-n128",
            VariantFamily::GcmSiv => "gcm-siv",
        }
    }

    /// A fresh, uninitialised instance of this family.
    pub fn instantiate(self) -> Box<dyn Encryptor> {
        match self {
            VariantFamily::Cbc => Box::new(AesCbc::new()),
            VariantFamily::CbcHmac => Box::new(AesCbcHmac::new()),
            VariantFamily::CbcRaw => Box::new(AesCbcRaw::new()),
            VariantFamily::Gcm => Box::new(AesGcm::new()),
            VariantFamily::GcmN128 => Box::new(AesGcmN128::new()),
            VariantFamily::GcmSiv => Box::new(AesGcmSiv::new()),
        }
    }
}

impl FromStr for VariantFamily {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariantFamily::ALL
            .into_iter()
            .find(|f| f.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| SelectorError::UnknownFamily(s.to_owned()))
    }
}

/// A family at a specific key width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantSpec {
    pub family: VariantFamily,
    pub key_size: KeySize,
}

impl VariantSpec {
    pub fn new(family: VariantFamily, key_size: KeySize) -> Self {
        Self { family, key_size }
    }
}

impl fmt::Display for VariantSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aes{}-{}", self.key_size.bits(), self.family.id())
    }
}

impl FromStr for VariantSpec {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let selector = s.trim();
        let malformed = || SelectorError::Malformed(selector.to_owned());

        let rest = selector
            .get(..3)
            .filter(|p| p.eq_ignore_ascii_case("aes"))
            .map(|_| &selector[3..])
            .ok_or_else(malformed)?;
        let (bits, family) = rest.split_once('-').ok_or_else(malformed)?;

        let key_size = bits
            .parse::<u32>()
            .ok()
            .and_then(KeySize::from_bits)
            .ok_or_else(|| SelectorError::UnsupportedKeySize(bits.to_owned()))?;

        Ok(Self {
            family: family.parse()?,
            key_size,
        })
    }
}

/// Why a variant selector could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("variant selector `{0}` is not of the form aes<bits>-<family>")]
    Malformed(String),

    #[error("unsupported key size `{0}`; expected 128, 192 or 256")]
    UnsupportedKeySize(String),

    #[error("unknown variant family `{0}`")]
    UnknownFamily(String),
}

/// Build a fresh, uninitialised instance for `spec`.
///
/// The key width is bound later by [`Encryptor::init`]; the runner looks up a
/// key of `spec.key_size` for it.
pub fn build(spec: &VariantSpec) -> Box<dyn Encryptor> {
    spec.family.instantiate()
}

/// The default comparison set: 128- and 256-bit keys for every family except
/// the wide-nonce GCM, family by family.
pub fn standard_suite() -> Vec<VariantSpec> {
    VariantFamily::ALL
        .into_iter()
        .filter(|f| *f != VariantFamily::GcmN128)
        .flat_map(|family| {
            [KeySize::Aes128, KeySize::Aes256]
                .into_iter()
                .map(move |key_size| VariantSpec::new(family, key_size))
        })
        .collect()
}

/// Parse a comma-separated selector list, ignoring empty entries.
///
/// # Errors
///
/// Returns the first [`SelectorError`] encountered.
pub fn parse_list(list: &str) -> Result<Vec<VariantSpec>, SelectorError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_round_trips_through_display() {
        for family in VariantFamily::ALL {
            for key_size in KeySize::ALL {
                let spec = VariantSpec::new(family, key_size);
                assert_eq!(spec.to_string().parse::<VariantSpec>().unwrap(), spec);
            }
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        let spec: VariantSpec = " AES256-GCM-SIV ".parse().unwrap();
        assert_eq!(spec, VariantSpec::new(VariantFamily::GcmSiv, KeySize::Aes256));
    }

    #[test]
    fn rejects_bad_selectors() {
        assert!(matches!(
            "des-cbc".parse::<VariantSpec>(),
            Err(SelectorError::Malformed(_))
        ));
        assert!(matches!(
            "aes256".parse::<VariantSpec>(),
            Err(SelectorError::Malformed(_))
        ));
        assert_eq!(
            "aes512-gcm".parse::<VariantSpec>(),
            Err(SelectorError::UnsupportedKeySize("512".into()))
        );
        assert_eq!(
            "aes128-ctr".parse::<VariantSpec>(),
            Err(SelectorError::UnknownFamily("ctr".into()))
        );
    }

    #[test]
    fn built_variants_take_their_display_name_from_the_key() {
        let expected = [
            (VariantFamily::Cbc, "AES128-CBC"),
            (VariantFamily::CbcHmac, "AES128-CBC-HMACSHA256"),
            (VariantFamily::CbcRaw, "AES128-CBC-PKCS7"),
            (VariantFamily::Gcm, "AES128-GCM"),
            (VariantFamily::GcmN128, "AES128-GCM-N128"),
            (VariantFamily::GcmSiv, "AES128-GCM-SIV"),
        ];
        for (family, name) in expected {
            let mut v = build(&VariantSpec::new(family, KeySize::Aes128));
            v.init(&[0u8; 16]).unwrap();
            assert_eq!(v.name(), name);
        }
    }

    #[test]
    fn standard_suite_is_family_major() {
        let suite = standard_suite();
        assert_eq!(suite.len(), 10);
        assert_eq!(suite[0].to_string(), "aes128-cbc");
        assert_eq!(suite[1].to_string(), "aes256-cbc");
        assert_eq!(suite[9].to_string(), "aes256-gcm-siv");
        assert!(suite.iter().all(|s| s.family != VariantFamily::GcmN128));
    }

    #[test]
    fn parse_list_skips_blanks() {
        let specs = parse_list("aes128-cbc, ,aes256-gcm,").unwrap();
        assert_eq!(specs.len(), 2);
        assert!(parse_list("aes128-cbc,bogus").is_err());
    }
}
