//! hemat-demo: run the encrypted matrix product pipeline end to end.
//!
//! Generates random bounded matrices, runs context creation, key
//! generation, encryption, homomorphic multiplication, and decryption
//! with per-stage timing, then verifies the result against the
//! plaintext reference product.

use std::time::Instant;

use clap::Parser;
use eyre::{eyre, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use hemat::{KeyMaterial, Matrix, RingContext};

#[derive(Parser)]
#[command(name = "hemat-demo")]
#[command(about = "Encrypted matrix multiplication demo")]
#[command(version)]
struct Args {
    /// Rows of the left matrix
    #[arg(long, default_value = "64")]
    left_rows: usize,

    /// Columns of the left matrix (= rows of the right matrix)
    #[arg(long, default_value = "32")]
    left_cols: usize,

    /// Columns of the right matrix
    #[arg(long, default_value = "2")]
    right_cols: usize,

    /// Entries are sampled from [0, maxval); 2 gives bit matrices
    #[arg(long, default_value = "2")]
    maxval: i64,

    /// Polynomial degree (power of two)
    #[arg(long, default_value = "2048")]
    degree: usize,

    /// Plaintext modulus, must be ≡ 1 (mod 2·degree)
    #[arg(long, default_value = "40961")]
    plain_modulus: u64,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    info!(
        "product: {}x{} @ {}x{}, degree {}, plaintext modulus {}",
        args.left_rows,
        args.left_cols,
        args.left_cols,
        args.right_cols,
        args.degree,
        args.plain_modulus
    );

    let start = Instant::now();
    let ctx = RingContext::create(args.degree, args.plain_modulus)?;
    info!("context created in {:.1?}", start.elapsed());

    let start = Instant::now();
    let keys = KeyMaterial::generate(&ctx)?;
    info!(
        "keys generated in {:.1?} (public {} B, galois {} B, relin {} B)",
        start.elapsed(),
        keys.public_key.len(),
        keys.galois_keys.len(),
        keys.relin_keys.len()
    );

    let mut rng = rand::thread_rng();
    let left = Matrix::random(args.left_rows, args.left_cols, args.maxval, &mut rng);
    let right = Matrix::random(args.left_cols, args.right_cols, args.maxval, &mut rng);

    let start = Instant::now();
    let enc_left = ctx.encrypt_left(&left, &keys.public_key)?;
    info!(
        "left matrix encrypted in {:.1?} ({} ciphertexts)",
        start.elapsed(),
        enc_left.ciphertext_count()
    );

    let start = Instant::now();
    let enc_right = ctx.encrypt_right(&right, &keys.public_key)?;
    info!(
        "right matrix encrypted in {:.1?} ({} ciphertexts)",
        start.elapsed(),
        enc_right.ciphertext_count()
    );

    let start = Instant::now();
    let enc_product = ctx.multiply(&enc_left, &enc_right, &keys.galois_keys, &keys.relin_keys)?;
    info!("encrypted product computed in {:.1?}", start.elapsed());

    let start = Instant::now();
    let product = ctx.decrypt(&enc_product, &keys.secret_key)?;
    info!("product decrypted in {:.1?}", start.elapsed());

    let expected = left.matmul_mod(&right, args.plain_modulus);
    if product == expected {
        info!("result verified against the plaintext reference");
        Ok(())
    } else {
        let mut bad = Vec::new();
        for r in 0..product.rows() {
            for c in 0..product.cols() {
                if product.get(r, c) != expected.get(r, c) {
                    bad.push((r, c));
                }
            }
        }
        Err(eyre!("result mismatch at cells {:?}", bad))
    }
}
