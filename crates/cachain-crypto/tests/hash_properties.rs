use cachain_crypto::{
    automaton_hash, decode_hex, digest_bits, render_hex, CodecError, HashFunction, HashMethod,
    DIGEST_HEX_LEN, STATE_BITS,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_empty_input_has_full_width_digest() {
    init_logger();
    for rule in [30u8, 90, 110] {
        assert_eq!(automaton_hash(b"", rule, 128).len(), DIGEST_HEX_LEN);
    }
}

#[test]
fn test_independent_invocations_agree() {
    let a = HashMethod::automaton(30, 128).digest_hex(b"Bonjour le monde");
    let b = automaton_hash(b"Bonjour le monde", 30, 128);
    assert_eq!(a, b);
}

#[test]
fn test_rendered_digest_round_trips_through_bits() {
    let digest = automaton_hash(b"round trip", 30, 128);
    let bits = digest_bits(&digest).unwrap();
    assert_eq!(bits.iter().count(), STATE_BITS);
    assert_eq!(render_hex(bits.as_bytes()), digest);
    assert_eq!(render_hex(&decode_hex(&digest).unwrap()), digest);
}

#[test]
fn test_truncated_digest_is_rejected() {
    let digest = automaton_hash(b"x", 30, 128);
    let err = decode_hex(&digest[..63]).unwrap_err();
    assert_eq!(
        err,
        CodecError::InvalidLength {
            expected: DIGEST_HEX_LEN,
            found: 63
        }
    );
}

#[test]
fn test_avalanche_near_half_on_average() {
    // Average over many single-bit flips to smooth out per-input noise.
    let mut total = 0u32;
    let runs = 64u32;
    for i in 0..runs {
        let input = format!("avalanche sample {}", i);
        let report = cachain_crypto::avalanche(input.as_bytes(), 30, 128);
        total += report.differing_bits;
    }
    let mean = f64::from(total) / f64::from(runs) / STATE_BITS as f64;
    assert!(mean > 0.3 && mean < 0.7, "mean flip ratio {}", mean);
}
