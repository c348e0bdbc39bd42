//! Plaintext and encrypted matrix types.

pub(crate) mod decrypt;
pub(crate) mod encrypt;
pub(crate) mod multiply;

#[cfg(test)]
pub(crate) mod mock;

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::context::RingContext;
use crate::error::Result;
use crate::ring::{BfvRing, RingProvider};

/// Memory layout an encrypted operand was encoded with.
///
/// Left operands of a product are encoded row-major, right operands
/// column-major; the pairing is what turns the product into slot-wise
/// ring operations. The tag is checked at multiplication time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layout {
    /// Rows are contiguous (left operands, products).
    RowMajor,
    /// Columns are contiguous (right operands).
    ColumnMajor,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::RowMajor => write!(f, "row-major"),
            Layout::ColumnMajor => write!(f, "column-major"),
        }
    }
}

/// Dense row-major matrix of signed 64-bit integers.
///
/// Entries are reduced modulo the plaintext modulus at encryption time;
/// decrypted matrices hold the non-negative representatives in
/// `[0, plain_modulus)`.
///
/// # Example
///
/// ```
/// use hemat::Matrix;
///
/// let mut m = Matrix::zeros(2, 3);
/// m.set(1, 2, -5);
/// assert_eq!(m.get(1, 2), -5);
/// assert_eq!(m.shape(), (2, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<i64>,
}

impl Matrix {
    /// All-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Build from row-major data. `data.len()` must equal `rows * cols`.
    pub fn from_rows(rows: usize, cols: usize, data: Vec<i64>) -> Self {
        assert_eq!(data.len(), rows * cols, "data length must match shape");
        Self { rows, cols, data }
    }

    /// Uniformly random entries in `[0, maxval)`.
    pub fn random<R: Rng>(rows: usize, cols: usize, maxval: i64, rng: &mut R) -> Self {
        Self {
            rows,
            cols,
            data: (0..rows * cols).map(|_| rng.gen_range(0..maxval)).collect(),
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Entry at `(r, c)`.
    pub fn get(&self, r: usize, c: usize) -> i64 {
        self.data[r * self.cols + c]
    }

    /// Set entry at `(r, c)`.
    pub fn set(&mut self, r: usize, c: usize, value: i64) {
        self.data[r * self.cols + c] = value;
    }

    /// Row `r` as a slice.
    pub fn row(&self, r: usize) -> &[i64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Reference product `(self @ other) mod modulus`, for verification.
    pub fn matmul_mod(&self, other: &Matrix, modulus: u64) -> Matrix {
        assert_eq!(self.cols, other.rows, "inner dimensions must agree");
        let m = modulus as i128;
        let mut out = Matrix::zeros(self.rows, other.cols);
        for r in 0..self.rows {
            for c in 0..other.cols {
                let mut acc: i128 = 0;
                for i in 0..self.cols {
                    acc += self.get(r, i) as i128 * other.get(i, c) as i128;
                    acc %= m;
                }
                out.set(r, c, acc.rem_euclid(m) as i64);
            }
        }
        out
    }
}

/// How an encrypted matrix is spread across ciphertext slots.
///
/// `stride` is the shared dimension padded to the next power of two, so
/// the rotate-and-accumulate tree sums exactly the padded block and the
/// summation is exact for every shared dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Packing {
    /// Row-major left operand: `per_ct` rows per ciphertext, each row
    /// starting at a multiple of `stride`.
    Rows { stride: usize, per_ct: usize },
    /// Column-major right operand: one ciphertext per column, the
    /// column replicated at every multiple of `stride`.
    Cols { stride: usize },
    /// Product: one ciphertext per (row-block × column); each cell sits
    /// at its row's block-base slot.
    Cells { stride: usize, per_ct: usize },
}

impl Packing {
    pub(crate) fn layout(&self) -> Layout {
        match self {
            Packing::Rows { .. } | Packing::Cells { .. } => Layout::RowMajor,
            Packing::Cols { .. } => Layout::ColumnMajor,
        }
    }
}

/// An encrypted, shape-tagged matrix.
///
/// Holds a handle to its [`RingContext`], so a context outlives every
/// ciphertext derived from it. The logical shape is queryable without
/// decryption.
pub struct EncryptedMatrix<P: RingProvider = BfvRing> {
    pub(crate) ctx: RingContext<P>,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) packing: Packing,
    /// Key-set generation this matrix is bound to.
    pub(crate) key_id: u64,
    pub(crate) cts: Vec<P::Ciphertext>,
}

impl<P: RingProvider> std::fmt::Debug for EncryptedMatrix<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedMatrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("packing", &self.packing)
            .field("key_id", &self.key_id)
            .field("cts", &self.cts.len())
            .finish()
    }
}

impl<P: RingProvider> EncryptedMatrix<P> {
    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Logical shape `(rows, cols)`, available without decryption.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Layout this matrix was encoded with.
    pub fn layout(&self) -> Layout {
        self.packing.layout()
    }

    /// Whether this matrix is the output of a multiplication. Products
    /// carry all the noise budget spends and cannot be multiplied again.
    pub fn is_product(&self) -> bool {
        matches!(self.packing, Packing::Cells { .. })
    }

    /// Number of underlying ciphertexts.
    pub fn ciphertext_count(&self) -> usize {
        self.cts.len()
    }

    /// Serialized ciphertext bytes (keys and context excluded).
    ///
    /// Encryption is randomized, so two encryptions of the same
    /// plaintext yield different bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&self.cts)?)
    }
}

impl<P: RingProvider> Clone for EncryptedMatrix<P> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            rows: self.rows,
            cols: self.cols,
            packing: self.packing,
            key_id: self.key_id,
            cts: self.cts.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matmul_mod_reference() {
        let a = Matrix::from_rows(2, 3, vec![1, 2, 3, 4, 5, 6]);
        let b = Matrix::from_rows(3, 2, vec![7, 8, 9, 10, 11, 12]);
        let p = a.matmul_mod(&b, 1000);
        assert_eq!(p.get(0, 0), 58);
        assert_eq!(p.get(0, 1), 64);
        assert_eq!(p.get(1, 0), 139);
        assert_eq!(p.get(1, 1), 154);
    }

    #[test]
    fn matmul_mod_reduces_negatives() {
        let a = Matrix::from_rows(1, 1, vec![-3]);
        let b = Matrix::from_rows(1, 1, vec![5]);
        assert_eq!(a.matmul_mod(&b, 7).get(0, 0), 6); // -15 ≡ 6 (mod 7)
    }

    #[test]
    fn row_accessor() {
        let a = Matrix::from_rows(2, 2, vec![1, 2, 3, 4]);
        assert_eq!(a.row(1), &[3, 4]);
    }
}
