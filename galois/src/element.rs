//! Field element as a packed bit vector.
//!
//! An element of GF(2^m) is a polynomial over GF(2) of degree below m. The
//! coefficients are stored in a `u64`, bit i holding the coefficient of x^i, so the
//! most significant set bit is the leading coefficient. The textual bit-vector form
//! (most significant bit first) is available through [`Element::to_bits`] and
//! [`Element::from_bits`].

use core::fmt::{self, Binary, Debug, Display, Formatter};
use core::ops::{Add, AddAssign, Sub, SubAssign};
use serde::{Deserialize, Serialize};

/// Element of a binary extension field.
///
/// Addition and subtraction do not depend on the modulus (both are XOR in
/// characteristic 2) and are available as operators. Multiplication and inversion
/// need the field and live on [`crate::BinaryField`].
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Element(pub(crate) u64);

impl Element {
    /// The additive identity.
    pub const ZERO: Self = Element(0);

    /// The multiplicative identity.
    pub const ONE: Self = Element(1);

    /// Wraps raw coefficient bits without checking them against any field.
    ///
    /// Prefer [`crate::BinaryField::element`], which rejects values wider than m.
    #[inline]
    pub const fn from_raw(bits: u64) -> Self {
        Element(bits)
    }

    /// Raw coefficient bits.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Number of significant bits, i.e. the degree plus one (0 for the zero element).
    #[inline]
    pub const fn bit_len(self) -> u32 {
        u64::BITS - self.0.leading_zeros()
    }

    /// Coefficients as a bit vector, most significant first, without leading zeros.
    ///
    /// The zero element maps to an empty vector.
    pub fn to_bits(self) -> Vec<bool> {
        (0..self.bit_len()).rev().map(|i| (self.0 >> i) & 1 == 1).collect()
    }

    /// Builds an element from a most-significant-first bit vector.
    ///
    /// Returns `None` when the vector has more than 64 significant positions.
    pub fn from_bits(bits: &[bool]) -> Option<Self> {
        let significant = bits.iter().skip_while(|b| !**b).count();
        if significant > u64::BITS as usize {
            return None;
        }
        let value = bits
            .iter()
            .skip(bits.len() - significant)
            .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit));
        Some(Element(value))
    }
}

impl Add for Element {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Element(self.0 ^ rhs.0)
    }
}

impl AddAssign for Element {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Sub for Element {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Element(self.0 ^ rhs.0)
    }
}

impl SubAssign for Element {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Debug for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Element({:#x})", self.0)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Binary for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Binary::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_are_msb_first() {
        let e = Element::from_raw(0b1011);
        assert_eq!(e.to_bits(), vec![true, false, true, true]);
        assert_eq!(e.bit_len(), 4);
    }

    #[test]
    fn test_from_bits_ignores_leading_zeros() {
        let bits = [false, false, true, false, true];
        assert_eq!(Element::from_bits(&bits), Some(Element::from_raw(0b101)));
        assert_eq!(Element::from_bits(&[]), Some(Element::ZERO));
    }

    #[test]
    fn test_from_bits_rejects_wide_vectors() {
        let bits = vec![true; 65];
        assert_eq!(Element::from_bits(&bits), None);
    }

    #[test]
    fn test_add_and_sub_coincide() {
        let a = Element::from_raw(0b1100);
        let b = Element::from_raw(0b1010);
        assert_eq!(a + b, a - b);
        assert_eq!(a + b, Element::from_raw(0b0110));
        assert_eq!(a + a, Element::ZERO);
    }
}
