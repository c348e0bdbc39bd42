//! Decryption for every packing produced by the engine.

use crate::context::RingContext;
use crate::error::{Error, Result};
use crate::keys::{open_key, KeyBuffer, KeyRole};
use crate::matrix::{EncryptedMatrix, Matrix, Packing};
use crate::ring::RingProvider;

/// Decrypt `matrix` with the secret key buffer.
///
/// The output shape is the encrypted matrix's logical shape; entries
/// are the non-negative representatives modulo the plaintext modulus.
pub(crate) fn decrypt<P: RingProvider>(
    ctx: &RingContext<P>,
    matrix: &EncryptedMatrix<P>,
    secret: &KeyBuffer,
) -> Result<Matrix> {
    if !matrix.ctx.same_as(ctx) {
        return Err(Error::ContextMismatch { what: "encrypted matrix" });
    }
    let (header, sk) = open_key::<P, P::SecretKey>(secret, ctx, KeyRole::Secret)?;
    if header.key_id != matrix.key_id {
        return Err(Error::DecryptionKeyMismatch);
    }

    let provider = ctx.provider();
    let (rows, cols) = matrix.shape();
    let mut out = Matrix::zeros(rows, cols);

    match matrix.packing {
        Packing::Rows { stride, per_ct } => {
            for (b, ct) in matrix.cts.iter().enumerate() {
                let slots = provider.decrypt(ct, &sk)?;
                for local in 0..per_ct {
                    let r = b * per_ct + local;
                    if r >= rows {
                        break;
                    }
                    for c in 0..cols {
                        out.set(r, c, slots[local * stride + c] as i64);
                    }
                }
            }
        }
        Packing::Cols { .. } => {
            for (c, ct) in matrix.cts.iter().enumerate() {
                let slots = provider.decrypt(ct, &sk)?;
                for r in 0..rows {
                    out.set(r, c, slots[r] as i64);
                }
            }
        }
        Packing::Cells { stride, per_ct } => {
            for (idx, ct) in matrix.cts.iter().enumerate() {
                let b = idx / cols;
                let c = idx % cols;
                let slots = provider.decrypt(ct, &sk)?;
                for local in 0..per_ct {
                    let r = b * per_ct + local;
                    if r >= rows {
                        break;
                    }
                    out.set(r, c, slots[local * stride] as i64);
                }
            }
        }
    }
    Ok(out)
}
