//! Cross-variant properties exercised through the registry.

use std::collections::HashSet;

use cipher_bench::crypto::{CipherError, Encryptor, KeySize, NonceSource, BLOCK_LEN};
use cipher_bench::registry::{self, VariantFamily, VariantSpec};
use proptest::prelude::*;

const SIZES: [usize; 7] = [0, 1, 15, 16, 17, 1_000, 1_000_000];
const IV: [u8; BLOCK_LEN] = [0x0F; BLOCK_LEN];

fn keyed(family: VariantFamily, size: KeySize) -> Box<dyn Encryptor> {
    let mut v = registry::build(&VariantSpec::new(family, size));
    v.init(&vec![0xA5; size.byte_len()]).unwrap();
    v
}

/// IV argument and `iv_len` appropriate for the variant.
fn iv_for(v: &dyn Encryptor) -> (Option<&'static [u8]>, usize) {
    match v.nonce_source() {
        NonceSource::External => (Some(&IV[..]), BLOCK_LEN),
        NonceSource::Internal => (None, 0),
    }
}

fn authenticated(family: VariantFamily) -> bool {
    !matches!(family, VariantFamily::Cbc | VariantFamily::CbcRaw)
}

fn plaintext(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}

#[test]
fn every_variant_round_trips_every_size() {
    for family in VariantFamily::ALL {
        for size in KeySize::ALL {
            let v = keyed(family, size);
            let (iv, iv_len) = iv_for(&*v);
            for len in SIZES {
                let pt = plaintext(len);
                let msg = v.encrypt(&pt, iv, None).unwrap();
                assert_eq!(
                    v.decrypt(&msg, iv_len, 0).unwrap(),
                    pt,
                    "{} at {len} bytes",
                    v.name()
                );
            }
        }
    }
}

#[test]
fn overhead_identity_holds() {
    for family in VariantFamily::ALL {
        let v = keyed(family, KeySize::Aes256);
        let (iv, _) = iv_for(&*v);
        for (plain, aad) in [(1usize, 0usize), (100, 20), (1_000, 3)] {
            let aad_bytes = vec![0x42; aad];
            let msg = v
                .encrypt(&plaintext(plain), iv, (aad > 0).then_some(aad_bytes.as_slice()))
                .unwrap();
            let ratio = common::protocol::overhead_ratio(plain, aad, msg.len()).unwrap();
            let expected = (msg.len() - plain - aad) as f64 / (plain + aad) as f64;
            assert!((ratio - expected).abs() < 1e-6);
            assert!(msg.len() > plain + aad);
        }
    }
}

#[test]
fn aad_is_prepended_verbatim() {
    for family in VariantFamily::ALL {
        let v = keyed(family, KeySize::Aes128);
        let (iv, iv_len) = iv_for(&*v);
        let aad = [0xBE; 20];
        let msg = v.encrypt(b"payload", iv, Some(&aad)).unwrap();
        assert_eq!(&msg[..20], &aad);
        assert_eq!(v.decrypt(&msg, iv_len, 20).unwrap(), b"payload");
    }
}

#[test]
fn aad_binding_for_authenticated_variants() {
    for family in VariantFamily::ALL.into_iter().filter(|f| authenticated(*f)) {
        let v = keyed(family, KeySize::Aes256);
        let msg = v.encrypt(b"bound to header", None, Some(b"header-one")).unwrap();
        let mut swapped = b"header-two".to_vec();
        swapped.extend_from_slice(&msg[10..]);
        assert_eq!(
            v.decrypt(&swapped, 0, 10).unwrap_err(),
            CipherError::AuthenticationFailure,
            "{}",
            v.name()
        );
    }
}

#[test]
fn internal_nonces_do_not_repeat() {
    for family in VariantFamily::ALL {
        let v = keyed(family, KeySize::Aes128);
        if v.nonce_source() == NonceSource::External {
            continue;
        }
        let nonce_len = match family {
            VariantFamily::Gcm | VariantFamily::GcmSiv => 12,
            _ => 16,
        };
        let mut seen = HashSet::new();
        for _ in 0..1_000 {
            let msg = v.encrypt(b"same", None, None).unwrap();
            assert!(seen.insert(msg[..nonce_len].to_vec()), "{} repeated a nonce", v.name());
        }
    }
}

#[test]
fn wrong_iv_usage_is_invalid_argument() {
    for family in VariantFamily::ALL {
        let v = keyed(family, KeySize::Aes128);
        let wrong_iv = match v.nonce_source() {
            NonceSource::External => None,
            NonceSource::Internal => Some(&IV[..]),
        };
        assert!(matches!(
            v.encrypt(b"x", wrong_iv, None),
            Err(CipherError::InvalidArgument(_))
        ));
    }
}

#[test]
fn truncated_messages_are_corrupt_framing() {
    for family in VariantFamily::ALL {
        let v = keyed(family, KeySize::Aes128);
        let (iv, iv_len) = iv_for(&*v);
        let msg = v.encrypt(b"x", iv, Some(&[1; 8])).unwrap();
        assert!(
            matches!(v.decrypt(&msg[..10], iv_len, 8), Err(CipherError::CorruptFraming(_))),
            "{}",
            v.name()
        );
    }
}

#[test]
fn uninitialised_variants_refuse_work() {
    for family in VariantFamily::ALL {
        let v = family.instantiate();
        let (iv, _) = iv_for(&*v);
        assert_eq!(v.encrypt(b"x", iv, None).unwrap_err(), CipherError::NotInitialised);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_bit_flip_in_an_authenticated_message_is_rejected(
        family_idx in 0usize..4,
        len in 0usize..80,
        pos in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let family = [
            VariantFamily::CbcHmac,
            VariantFamily::Gcm,
            VariantFamily::GcmN128,
            VariantFamily::GcmSiv,
        ][family_idx];
        let v = keyed(family, KeySize::Aes128);
        let mut msg = v.encrypt(&plaintext(len), None, None).unwrap();
        let i = pos.index(msg.len());
        msg[i] ^= 1 << bit;
        prop_assert_eq!(v.decrypt(&msg, 0, 0), Err(CipherError::AuthenticationFailure));
    }
}
