//! Default and custom field moduli.
//!
//! Every supported exponent has a fixed low-weight irreducible polynomial. Custom
//! moduli are checked for degree and irreducibility before a field accepts them.

use crate::ring::{clmul, degree, gcd, reduce};

/// Largest supported field exponent.
pub const MAX_EXPONENT: u32 = 32;

// Low-weight irreducible polynomials over GF(2), indexed by degree. Bit i is the
// coefficient of x^i. Trinomials where one exists, pentanomials otherwise.
const IRREDUCIBLE: [u64; MAX_EXPONENT as usize + 1] = [
    0,              // unused
    0x3,            // x + 1
    0x7,            // x^2 + x + 1
    0xB,            // x^3 + x + 1
    0x13,           // x^4 + x + 1
    0x25,           // x^5 + x^2 + 1
    0x43,           // x^6 + x + 1
    0x83,           // x^7 + x + 1
    0x11B,          // x^8 + x^4 + x^3 + x + 1
    0x211,          // x^9 + x^4 + 1
    0x409,          // x^10 + x^3 + 1
    0x805,          // x^11 + x^2 + 1
    0x1009,         // x^12 + x^3 + 1
    0x201B,         // x^13 + x^4 + x^3 + x + 1
    0x4021,         // x^14 + x^5 + 1
    0x8003,         // x^15 + x + 1
    0x1_002B,       // x^16 + x^5 + x^3 + x + 1
    0x2_0009,       // x^17 + x^3 + 1
    0x4_0009,       // x^18 + x^3 + 1
    0x8_0027,       // x^19 + x^5 + x^2 + x + 1
    0x10_0009,      // x^20 + x^3 + 1
    0x20_0005,      // x^21 + x^2 + 1
    0x40_0003,      // x^22 + x + 1
    0x80_0021,      // x^23 + x^5 + 1
    0x100_001B,     // x^24 + x^4 + x^3 + x + 1
    0x200_0009,     // x^25 + x^3 + 1
    0x400_001B,     // x^26 + x^4 + x^3 + x + 1
    0x800_0027,     // x^27 + x^5 + x^2 + x + 1
    0x1000_0003,    // x^28 + x + 1
    0x2000_0005,    // x^29 + x^2 + 1
    0x4000_0003,    // x^30 + x + 1
    0x8000_0009,    // x^31 + x^3 + 1
    0x1_0000_008D,  // x^32 + x^7 + x^3 + x^2 + 1
];

/// The irreducible modulus used by [`crate::BinaryField::new`] for exponent `m`.
///
/// Returns `None` when `m` is outside `1..=MAX_EXPONENT`.
pub fn default_modulus(m: u32) -> Option<u64> {
    if (1..=MAX_EXPONENT).contains(&m) {
        Some(IRREDUCIBLE[m as usize])
    } else {
        None
    }
}

/// Rabin's irreducibility test for a packed polynomial of degree 1 to 32.
pub fn is_irreducible(poly: u64) -> bool {
    let n = match degree(poly) {
        Some(n) if (1..=MAX_EXPONENT).contains(&n) => n,
        _ => return false,
    };
    let x = reduce(0b10, poly, n);
    let frobenius = |k: u32| {
        let mut r = x;
        for _ in 0..k {
            r = reduce(clmul(r, r), poly, n);
        }
        r
    };

    if frobenius(n) != x {
        return false;
    }
    prime_factors(n)
        .into_iter()
        .all(|p| gcd(poly, frobenius(n / p) ^ x) == 1)
}

fn prime_factors(mut n: u32) -> Vec<u32> {
    let mut factors = Vec::new();
    let mut p = 2;
    while p * p <= n {
        if n % p == 0 {
            factors.push(p);
            while n % p == 0 {
                n /= p;
            }
        }
        p += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}
