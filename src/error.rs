//! Error taxonomy for the engine.
//!
//! Every cheap validation (parameter congruence, shape compatibility,
//! dimension bounds, key binding) is performed at the engine layer and
//! reported through [`Error`] before any ring arithmetic runs. Provider
//! failures are reserved for genuine resource exhaustion.

use std::fmt;

use crate::matrix::Layout;

/// Engine error.
#[derive(Debug)]
pub enum Error {
    /// Ring parameters violate a construction-time constraint
    /// (congruence, size bound, or missing root of unity).
    InvalidParameters(String),

    /// A matrix dimension exceeds `degree / 2`.
    DimensionTooLarge {
        /// Offending dimension value.
        dim: usize,
        /// Which dimension: "rows" or "cols".
        axis: &'static str,
        /// Maximum supported by the context.
        limit: usize,
    },

    /// Operand shapes are incompatible for multiplication.
    ShapeMismatch {
        /// Shape of the left operand.
        left: (usize, usize),
        /// Shape of the right operand.
        right: (usize, usize),
    },

    /// An operand does not carry the layout the operation requires.
    LayoutError {
        /// Layout the operation requires.
        expected: Layout,
        /// Layout the operand carries.
        found: Layout,
    },

    /// A product ciphertext was passed where a fresh encryption is
    /// required; the engine supports a single multiplicative level.
    DepthExceeded,

    /// The underlying provider could not produce a complete key set.
    /// Not recoverable for the current context.
    KeyGenerationFailure(String),

    /// The secret key was not generated together with the public key
    /// that produced this ciphertext.
    DecryptionKeyMismatch,

    /// A key or ciphertext is bound to a different context or key
    /// generation than the one it was used with.
    ContextMismatch {
        /// What was mismatched: "galois keys", "relin keys", "operand", ...
        what: &'static str,
    },

    /// A key or ciphertext buffer could not be decoded.
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameters(msg) => write!(f, "invalid parameters: {msg}"),
            Error::DimensionTooLarge { dim, axis, limit } => {
                write!(f, "matrix {axis} = {dim} exceeds the context limit of {limit}")
            }
            Error::ShapeMismatch { left, right } => write!(
                f,
                "cannot multiply {}x{} by {}x{}: inner dimensions differ",
                left.0, left.1, right.0, right.1
            ),
            Error::LayoutError { expected, found } => {
                write!(f, "operand encoded {found} where {expected} is required")
            }
            Error::DepthExceeded => {
                write!(f, "product ciphertexts cannot be multiplied again")
            }
            Error::KeyGenerationFailure(msg) => write!(f, "key generation failed: {msg}"),
            Error::DecryptionKeyMismatch => {
                write!(f, "secret key does not match the key set that produced this ciphertext")
            }
            Error::ContextMismatch { what } => {
                write!(f, "{what} bound to a different context")
            }
            Error::Serialization(msg) => write!(f, "malformed buffer: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Create an `InvalidParameters` error with format-string support.
macro_rules! params_err {
    ($($arg:tt)*) => {
        $crate::error::Error::InvalidParameters(format!($($arg)*))
    };
}

pub(crate) use params_err;
