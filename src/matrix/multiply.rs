//! Homomorphic matrix multiplication.
//!
//! Per (left row-block × right column) pair: one slot-wise ciphertext
//! product (relinearized by the provider), then `log2(stride)`
//! rotate-and-add steps that fold each stride-aligned block down onto
//! its base slot, leaving the inner product of every packed row with
//! the column at the row's base position. Pairs are independent and run
//! in parallel.

use rayon::prelude::*;
use tracing::debug;

use crate::context::RingContext;
use crate::error::{Error, Result};
use crate::keys::{open_key, KeyBuffer, KeyRole};
use crate::matrix::{EncryptedMatrix, Layout, Packing};
use crate::ring::RingProvider;

/// Reject operands whose packing does not fit the requested side.
fn check_operand<P: RingProvider>(
    matrix: &EncryptedMatrix<P>,
    expected: Layout,
) -> Result<()> {
    if matrix.is_product() {
        return Err(Error::DepthExceeded);
    }
    let found = matrix.layout();
    if found != expected {
        return Err(Error::LayoutError { expected, found });
    }
    Ok(())
}

pub(crate) fn multiply<P: RingProvider>(
    ctx: &RingContext<P>,
    left: &EncryptedMatrix<P>,
    right: &EncryptedMatrix<P>,
    galois: &KeyBuffer,
    relin: &KeyBuffer,
) -> Result<EncryptedMatrix<P>> {
    if !left.ctx.same_as(ctx) {
        return Err(Error::ContextMismatch { what: "left operand" });
    }
    if !right.ctx.same_as(ctx) {
        return Err(Error::ContextMismatch { what: "right operand" });
    }
    check_operand(left, Layout::RowMajor)?;
    check_operand(right, Layout::ColumnMajor)?;
    if left.cols != right.rows {
        return Err(Error::ShapeMismatch {
            left: left.shape(),
            right: right.shape(),
        });
    }
    if left.key_id != right.key_id {
        return Err(Error::ContextMismatch { what: "operand key sets" });
    }

    let (gal_header, gal_keys) = open_key::<P, P::GaloisKeys>(galois, ctx, KeyRole::Galois)?;
    let (rl_header, rl_key) = open_key::<P, P::RelinKey>(relin, ctx, KeyRole::Relin)?;
    if gal_header.key_id != left.key_id {
        return Err(Error::ContextMismatch { what: "galois keys" });
    }
    if rl_header.key_id != left.key_id {
        return Err(Error::ContextMismatch { what: "relinearization keys" });
    }

    let (stride, per_ct) = match left.packing {
        Packing::Rows { stride, per_ct } => (stride, per_ct),
        // unreachable after check_operand
        _ => return Err(Error::DepthExceeded),
    };

    let provider = ctx.provider();
    let columns = right.cts.len();
    debug!(
        pairs = left.cts.len() * columns,
        stride, "running homomorphic matrix product"
    );

    // one relinearized product plus a halving rotation tree per pair
    let cts: Vec<P::Ciphertext> = (0..left.cts.len() * columns)
        .into_par_iter()
        .map(|idx| {
            let block = &left.cts[idx / columns];
            let column = &right.cts[idx % columns];
            let mut acc = provider.multiply(block, column, &rl_key)?;
            let mut step = stride / 2;
            while step >= 1 {
                let rotated = provider.rotate(&acc, step, &gal_keys)?;
                acc = provider.add(&acc, &rotated)?;
                step /= 2;
            }
            Ok(acc)
        })
        .collect::<Result<_>>()?;

    Ok(EncryptedMatrix {
        ctx: ctx.clone(),
        rows: left.rows,
        cols: right.cols,
        packing: Packing::Cells { stride, per_ct },
        key_id: left.key_id,
        cts,
    })
}
