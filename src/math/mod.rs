//! Modular arithmetic, NTT, polynomials, samplers, and the exact
//! tensor basis backing ciphertext multiplication.

pub mod modular;
pub mod ntt;
pub mod poly;
pub mod sampler;
pub mod tensor;

pub use modular::{mod_add, mod_inv, mod_mul, mod_pow, mod_sub, primitive_root};
pub use ntt::NttTable;
pub use poly::Poly;
pub use sampler::ErrorSampler;
pub use tensor::TensorBasis;
