//! Error types for binary field arithmetic.

use thiserror::Error;

/// Errors raised by field construction, element conversion and interpolation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The exponent m is outside `1..=MAX_EXPONENT`.
    #[error("GF(2^{0}) is not supported, exponent must be in 1..=32")]
    UnsupportedExponent(u32),

    /// A value needs more than m bits to be written as an element of GF(2^m).
    ///
    /// Raised both when converting an integer into the field and when converting an
    /// element (or bit vector) whose length exceeds m back into an integer.
    #[error("value {value:#x} needs {bits} bits and cannot be encoded in GF(2^{exponent})")]
    ElementOverflow {
        /// The offending value.
        value: u64,
        /// Its bit length.
        bits: u32,
        /// The field exponent m.
        exponent: u32,
    },

    /// The zero element has no multiplicative inverse.
    #[error("the zero element has no multiplicative inverse")]
    ZeroInverse,

    /// A custom modulus is not an irreducible polynomial of degree m.
    #[error("modulus {modulus:#x} is not an irreducible polynomial of degree {exponent}")]
    ReducibleModulus {
        /// The rejected modulus, bit i being the coefficient of x^i.
        modulus: u64,
        /// The requested exponent.
        exponent: u32,
    },

    /// Two interpolation points share the same abscissa.
    #[error("interpolation points are not distinct (x = {0:#x} repeats)")]
    DuplicateAbscissa(u64),

    /// Interpolation was requested over an empty point set.
    #[error("cannot interpolate over an empty point set")]
    EmptyInterpolation,
}
