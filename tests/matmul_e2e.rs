//! End-to-end correctness for the encrypted matrix product pipeline:
//! context → keys → encrypt → multiply → decrypt == (L @ R) mod t.

use hemat::{Error, KeyMaterial, Matrix, RingContext};

const DEGREE: usize = 256;
const PLAIN_MODULUS: u64 = 40961;

fn test_ctx() -> RingContext {
    RingContext::create(DEGREE, PLAIN_MODULUS).unwrap()
}

fn run_product(
    ctx: &RingContext,
    keys: &KeyMaterial,
    left: &Matrix,
    right: &Matrix,
) -> Matrix {
    let enc_left = ctx.encrypt_left(left, &keys.public_key).unwrap();
    let enc_right = ctx.encrypt_right(right, &keys.public_key).unwrap();
    let product = ctx
        .multiply(&enc_left, &enc_right, &keys.galois_keys, &keys.relin_keys)
        .unwrap();
    assert_eq!(product.shape(), (left.rows(), right.cols()));
    ctx.decrypt(&product, &keys.secret_key).unwrap()
}

#[test]
fn product_matches_reference() {
    let ctx = test_ctx();
    let keys = KeyMaterial::generate(&ctx).unwrap();
    let mut rng = rand::thread_rng();

    for (n, k, p) in [(4usize, 4usize, 2usize), (8, 16, 3), (7, 5, 2), (3, 1, 4)] {
        let left = Matrix::random(n, k, PLAIN_MODULUS as i64, &mut rng);
        let right = Matrix::random(k, p, PLAIN_MODULUS as i64, &mut rng);
        let got = run_product(&ctx, &keys, &left, &right);
        assert_eq!(
            got,
            left.matmul_mod(&right, PLAIN_MODULUS),
            "{n}x{k} @ {k}x{p}"
        );
    }
}

#[test]
fn product_handles_non_power_of_two_shared_dimension() {
    let ctx = test_ctx();
    let keys = KeyMaterial::generate(&ctx).unwrap();
    let mut rng = rand::thread_rng();
    for k in [3usize, 5, 6, 12] {
        let left = Matrix::random(4, k, PLAIN_MODULUS as i64, &mut rng);
        let right = Matrix::random(k, 2, PLAIN_MODULUS as i64, &mut rng);
        let got = run_product(&ctx, &keys, &left, &right);
        assert_eq!(got, left.matmul_mod(&right, PLAIN_MODULUS), "shared dim {k}");
    }
}

/// The reference scenario scaled down for unit runs: random bit
/// matrices, shapes proportional to 2048x512 @ 512x2.
#[test]
fn bit_matrix_scenario_small() {
    let ctx = test_ctx();
    let keys = KeyMaterial::generate(&ctx).unwrap();
    let mut rng = rand::thread_rng();
    let left = Matrix::random(64, 16, 2, &mut rng);
    let right = Matrix::random(16, 2, 2, &mut rng);
    let got = run_product(&ctx, &keys, &left, &right);
    let expected = left.matmul_mod(&right, PLAIN_MODULUS);
    for r in 0..64 {
        for c in 0..2 {
            assert_eq!(got.get(r, c), expected.get(r, c), "cell ({r}, {c})");
        }
    }
}

/// The full reference scenario: 2048x512 bit matrix times 512x2 at the
/// recommended parameters. Multi-minute; run with `--ignored`.
#[test]
#[ignore]
fn bit_matrix_scenario_full() {
    let ctx = RingContext::create(4096, 40961).unwrap();
    let keys = KeyMaterial::generate(&ctx).unwrap();
    let mut rng = rand::thread_rng();
    let left = Matrix::random(2048, 512, 2, &mut rng);
    let right = Matrix::random(512, 2, 2, &mut rng);
    let got = run_product(&ctx, &keys, &left, &right);
    assert_eq!(got, left.matmul_mod(&right, 40961));
}

#[test]
fn roundtrip_preserves_entries_mod_t() {
    let ctx = test_ctx();
    let keys = KeyMaterial::generate(&ctx).unwrap();
    let mut rng = rand::thread_rng();

    // negative entries reduce to their representatives
    let mut m = Matrix::random(6, 9, PLAIN_MODULUS as i64, &mut rng);
    m.set(0, 0, -1);
    m.set(5, 8, -(PLAIN_MODULUS as i64) - 7);
    let mut expected = Matrix::zeros(6, 9);
    for r in 0..6 {
        for c in 0..9 {
            expected.set(r, c, m.get(r, c).rem_euclid(PLAIN_MODULUS as i64));
        }
    }

    let enc = ctx.encrypt_left(&m, &keys.public_key).unwrap();
    assert_eq!(ctx.decrypt(&enc, &keys.secret_key).unwrap(), expected);

    let enc = ctx.encrypt_right(&m, &keys.public_key).unwrap();
    assert_eq!(ctx.decrypt(&enc, &keys.secret_key).unwrap(), expected);
}

#[test]
fn encryption_is_randomized() {
    let ctx = test_ctx();
    let keys = KeyMaterial::generate(&ctx).unwrap();
    let mut rng = rand::thread_rng();
    let m = Matrix::random(8, 8, 2, &mut rng);
    let a = ctx.encrypt_left(&m, &keys.public_key).unwrap();
    let b = ctx.encrypt_left(&m, &keys.public_key).unwrap();
    assert_ne!(
        a.to_bytes().unwrap(),
        b.to_bytes().unwrap(),
        "two encryptions of the same matrix must differ"
    );
    // and both decrypt to the same plaintext
    assert_eq!(
        ctx.decrypt(&a, &keys.secret_key).unwrap(),
        ctx.decrypt(&b, &keys.secret_key).unwrap()
    );
}

#[test]
fn create_succeeds_iff_congruence_holds() {
    // prime moduli ≡ 1 (mod 2·256)
    for t in [40961u64, 12289, 65537, 7681] {
        assert!(
            RingContext::create(DEGREE, t).is_ok(),
            "modulus {t} satisfies the congruence"
        );
    }
    for t in [40960u64, 40962, 65535, 17, 2] {
        assert!(
            matches!(
                RingContext::create(DEGREE, t),
                Err(Error::InvalidParameters(_))
            ),
            "modulus {t} violates the congruence"
        );
    }
}

#[test]
fn oversized_matrices_are_rejected() {
    let ctx = test_ctx();
    let keys = KeyMaterial::generate(&ctx).unwrap();
    let limit = ctx.max_dimension();
    assert_eq!(limit, DEGREE / 2);
    let mut rng = rand::thread_rng();

    let tall = Matrix::random(limit + 1, 1, 2, &mut rng);
    assert!(matches!(
        ctx.encrypt_left(&tall, &keys.public_key),
        Err(Error::DimensionTooLarge { axis: "rows", .. })
    ));

    let wide = Matrix::random(1, limit + 1, 2, &mut rng);
    assert!(matches!(
        ctx.encrypt_right(&wide, &keys.public_key),
        Err(Error::DimensionTooLarge { axis: "cols", .. })
    ));

    // at the limit is fine
    let edge = Matrix::random(limit, 2, 2, &mut rng);
    assert!(ctx.encrypt_left(&edge, &keys.public_key).is_ok());
}

#[test]
fn shape_mismatch_is_rejected() {
    let ctx = test_ctx();
    let keys = KeyMaterial::generate(&ctx).unwrap();
    let mut rng = rand::thread_rng();
    let left = Matrix::random(4, 5, 2, &mut rng);
    let right = Matrix::random(6, 2, 2, &mut rng);
    let enc_left = ctx.encrypt_left(&left, &keys.public_key).unwrap();
    let enc_right = ctx.encrypt_right(&right, &keys.public_key).unwrap();
    assert!(matches!(
        ctx.multiply(&enc_left, &enc_right, &keys.galois_keys, &keys.relin_keys),
        Err(Error::ShapeMismatch { left: (4, 5), right: (6, 2) })
    ));
}

#[test]
fn wrong_secret_key_is_detected() {
    let ctx = test_ctx();
    let keys = KeyMaterial::generate(&ctx).unwrap();
    let other_keys = KeyMaterial::generate(&ctx).unwrap();
    let mut rng = rand::thread_rng();
    let m = Matrix::random(4, 4, 2, &mut rng);
    let enc = ctx.encrypt_left(&m, &keys.public_key).unwrap();
    assert!(matches!(
        ctx.decrypt(&enc, &other_keys.secret_key),
        Err(Error::DecryptionKeyMismatch)
    ));
}

#[test]
fn foreign_context_is_detected() {
    let ctx = test_ctx();
    let other = test_ctx();
    let keys = KeyMaterial::generate(&ctx).unwrap();
    let mut rng = rand::thread_rng();
    let m = Matrix::random(4, 4, 2, &mut rng);
    let enc = ctx.encrypt_left(&m, &keys.public_key).unwrap();
    assert!(matches!(
        other.decrypt(&enc, &keys.secret_key),
        Err(Error::ContextMismatch { .. })
    ));
}

#[test]
fn key_buffers_survive_transport() {
    use hemat::KeyBuffer;
    let ctx = test_ctx();
    let keys = KeyMaterial::generate(&ctx).unwrap();
    let mut rng = rand::thread_rng();
    let m = Matrix::random(4, 4, 2, &mut rng);

    // ship the public key as raw bytes, as the binding layer would
    let wire = keys.public_key.as_bytes().to_vec();
    let received = KeyBuffer::from_bytes(wire);
    let enc = ctx.encrypt_left(&m, &received).unwrap();
    let out = ctx.decrypt(&enc, &keys.secret_key).unwrap();
    let mut expected = Matrix::zeros(4, 4);
    for r in 0..4 {
        for c in 0..4 {
            expected.set(r, c, m.get(r, c).rem_euclid(PLAIN_MODULUS as i64));
        }
    }
    assert_eq!(out, expected);
}

#[test]
fn swapped_key_roles_are_rejected() {
    let ctx = test_ctx();
    let keys = KeyMaterial::generate(&ctx).unwrap();
    let mut rng = rand::thread_rng();
    let m = Matrix::random(2, 2, 2, &mut rng);
    // secret key buffer where the public key belongs
    assert!(ctx.encrypt_left(&m, &keys.secret_key).is_err());
}

#[test]
fn shapes_are_queryable_without_decryption() {
    let ctx = test_ctx();
    let keys = KeyMaterial::generate(&ctx).unwrap();
    let mut rng = rand::thread_rng();
    let m = Matrix::random(5, 7, 2, &mut rng);
    let enc = ctx.encrypt_left(&m, &keys.public_key).unwrap();
    assert_eq!(enc.shape(), (5, 7));
    assert_eq!(enc.layout(), hemat::Layout::RowMajor);
    assert!(!enc.is_product());
}
