//! Arithmetic in GF(2)[x] on polynomials packed into `u64` words.
//!
//! Bit i of a word is the coefficient of x^i. Products of two operands of degree
//! below 32 have degree at most 62, so they always fit in one word.

/// Degree of a non-zero packed polynomial. `None` for zero.
#[inline]
pub(crate) const fn degree(p: u64) -> Option<u32> {
    if p == 0 {
        None
    } else {
        Some(63 - p.leading_zeros())
    }
}

/// Schoolbook carry-less product.
///
/// Both operands must have degree below 32.
#[inline]
pub(crate) const fn clmul(a: u64, b: u64) -> u64 {
    debug_assert!(a >> 32 == 0 && b >> 32 == 0);
    let mut product = 0u64;
    let mut shifted = a;
    let mut bits = b;
    while bits != 0 {
        if bits & 1 == 1 {
            product ^= shifted;
        }
        shifted <<= 1;
        bits >>= 1;
    }
    product
}

/// Remainder of `p` modulo `modulus`, where `modulus` has degree `m >= 1`.
#[inline]
pub(crate) const fn reduce(mut p: u64, modulus: u64, m: u32) -> u64 {
    while p >> m != 0 {
        let shift = (63 - p.leading_zeros()) - m;
        p ^= modulus << shift;
    }
    p
}

/// Greatest common divisor in GF(2)[x].
pub(crate) fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = match degree(b) {
            Some(db) => reduce(a, b, db),
            None => a,
        };
        a = b;
        b = r;
    }
    a
}
