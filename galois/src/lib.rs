//! Binary extension fields GF(2^m) for 1 <= m <= 32.
//!
//! This crate provides the field element type, the field itself (fixed by an
//! irreducible modulus of degree m), polynomials with coefficients in the field,
//! Lagrange interpolation, and helpers for random sampling. Unless a custom modulus
//! is supplied, each exponent uses the low-weight irreducible polynomial listed in
//! the `moduli` module.
//!
//! # Example
//!
//! ```
//! use galois::BinaryField;
//!
//! let field = BinaryField::new(32).expect("supported exponent");
//! let a = field.element(0xDEAD_BEEF).expect("fits in 32 bits");
//! let inv = field.inv(a).expect("non-zero");
//! assert_eq!(field.mul(a, inv), field.one());
//! ```

mod element;
mod errors;
mod field;
mod moduli;
mod polynomial;
mod random;
mod ring;

pub use element::Element;
pub use errors::FieldError;
pub use field::BinaryField;
pub use moduli::{default_modulus, is_irreducible, MAX_EXPONENT};
pub use polynomial::Polynomial;
pub use random::RandomField;
