//! Layout-aware matrix encryption.
//!
//! The shared dimension (left columns / right rows) is padded to the
//! next power of two — the packing `stride` — so the multiplication
//! step's rotate-and-accumulate tree sums an exact power-of-two block
//! regardless of the true shared dimension. Left operands pack
//! `slot_count / stride` rows per ciphertext at stride boundaries;
//! right operands use one ciphertext per column with the column
//! replicated at every stride boundary, so one slot-wise product
//! against any left row-block lines every row up with the column.

use tracing::debug;

use crate::context::RingContext;
use crate::error::{params_err, Error, Result};
use crate::keys::{open_key, KeyBuffer, KeyRole};
use crate::matrix::{EncryptedMatrix, Matrix, Packing};
use crate::ring::RingProvider;

fn check_dims<P: RingProvider>(ctx: &RingContext<P>, matrix: &Matrix) -> Result<()> {
    let (rows, cols) = matrix.shape();
    if rows == 0 || cols == 0 {
        return Err(params_err!("matrix dimensions must be positive"));
    }
    let limit = ctx.max_dimension();
    if rows > limit {
        return Err(Error::DimensionTooLarge {
            dim: rows,
            axis: "rows",
            limit,
        });
    }
    if cols > limit {
        return Err(Error::DimensionTooLarge {
            dim: cols,
            axis: "cols",
            limit,
        });
    }
    Ok(())
}

#[inline]
fn to_slot(value: i64, t: u64) -> u64 {
    value.rem_euclid(t as i64) as u64
}

/// Encrypt a left operand: row-major packing.
pub(crate) fn encrypt_left<P: RingProvider>(
    ctx: &RingContext<P>,
    matrix: &Matrix,
    public: &KeyBuffer,
) -> Result<EncryptedMatrix<P>> {
    check_dims(ctx, matrix)?;
    let (header, pk) = open_key::<P, P::PublicKey>(public, ctx, KeyRole::Public)?;

    let provider = ctx.provider();
    let t = provider.plain_modulus();
    let slot_count = provider.slot_count();
    let (rows, cols) = matrix.shape();
    let stride = cols.next_power_of_two();
    if stride > slot_count {
        return Err(Error::DimensionTooLarge {
            dim: cols,
            axis: "cols",
            limit: slot_count,
        });
    }
    let per_ct = slot_count / stride;

    let mut cts = Vec::with_capacity(rows.div_ceil(per_ct));
    for base in (0..rows).step_by(per_ct) {
        let mut slots = vec![0u64; slot_count];
        for (local, r) in (base..rows.min(base + per_ct)).enumerate() {
            for (i, &v) in matrix.row(r).iter().enumerate() {
                slots[local * stride + i] = to_slot(v, t);
            }
        }
        cts.push(provider.encrypt(&slots, &pk)?);
    }
    debug!(rows, cols, stride, ciphertexts = cts.len(), "encrypted left operand");

    Ok(EncryptedMatrix {
        ctx: ctx.clone(),
        rows,
        cols,
        packing: Packing::Rows { stride, per_ct },
        key_id: header.key_id,
        cts,
    })
}

/// Encrypt a right operand: column-major packing.
pub(crate) fn encrypt_right<P: RingProvider>(
    ctx: &RingContext<P>,
    matrix: &Matrix,
    public: &KeyBuffer,
) -> Result<EncryptedMatrix<P>> {
    check_dims(ctx, matrix)?;
    let (header, pk) = open_key::<P, P::PublicKey>(public, ctx, KeyRole::Public)?;

    let provider = ctx.provider();
    let t = provider.plain_modulus();
    let slot_count = provider.slot_count();
    let (rows, cols) = matrix.shape();
    let stride = rows.next_power_of_two();
    if stride > slot_count {
        return Err(Error::DimensionTooLarge {
            dim: rows,
            axis: "rows",
            limit: slot_count,
        });
    }
    let replicas = slot_count / stride;

    let mut cts = Vec::with_capacity(cols);
    for c in 0..cols {
        let mut slots = vec![0u64; slot_count];
        for block in 0..replicas {
            for j in 0..rows {
                slots[block * stride + j] = to_slot(matrix.get(j, c), t);
            }
        }
        cts.push(provider.encrypt(&slots, &pk)?);
    }
    debug!(rows, cols, stride, ciphertexts = cts.len(), "encrypted right operand");

    Ok(EncryptedMatrix {
        ctx: ctx.clone(),
        rows,
        cols,
        packing: Packing::Cols { stride },
        key_id: header.key_id,
        cts,
    })
}
