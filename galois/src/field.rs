//! The field GF(2^m) = GF(2)[x] / (f), with f irreducible of degree m.
//!
//! Elements are reduced polynomials of degree below m. Multiplication is the
//! schoolbook product in GF(2)[x] followed by reduction modulo f. Inversion runs the
//! extended Euclidean algorithm on the polynomial ring.

use core::fmt::{self, Debug, Formatter};
use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::errors::FieldError;
use crate::moduli::{default_modulus, is_irreducible};
use crate::ring::{clmul, degree, reduce};

/// A binary extension field instance, identified by its exponent and modulus.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinaryField {
    m: u32,
    modulus: u64,
}

impl BinaryField {
    /// GF(2^m) with the default irreducible modulus for `m`.
    pub fn new(m: u32) -> Result<Self, FieldError> {
        let modulus = default_modulus(m).ok_or(FieldError::UnsupportedExponent(m))?;
        Ok(Self { m, modulus })
    }

    /// GF(2^m) with an explicit modulus, which must be irreducible of degree `m`.
    pub fn with_modulus(m: u32, modulus: u64) -> Result<Self, FieldError> {
        default_modulus(m).ok_or(FieldError::UnsupportedExponent(m))?;
        if degree(modulus) != Some(m) || !is_irreducible(modulus) {
            return Err(FieldError::ReducibleModulus {
                modulus,
                exponent: m,
            });
        }
        Ok(Self { m, modulus })
    }

    /// The exponent m.
    #[inline]
    pub fn exponent(&self) -> u32 {
        self.m
    }

    /// The modulus, bit i being the coefficient of x^i.
    #[inline]
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Number of elements, 2^m.
    #[inline]
    pub fn order(&self) -> u64 {
        1u64 << self.m
    }

    #[inline]
    pub fn zero(&self) -> Element {
        Element::ZERO
    }

    #[inline]
    pub fn one(&self) -> Element {
        Element::ONE
    }

    /// Converts an integer into a field element (its binary expansion).
    ///
    /// Fails when the integer needs more than m bits.
    pub fn element(&self, value: u64) -> Result<Element, FieldError> {
        let e = Element::from_raw(value);
        self.check(e)?;
        Ok(e)
    }

    /// Converts a most-significant-first bit vector into a field element.
    ///
    /// Fails when the vector has more than m significant positions.
    pub fn element_from_bits(&self, bits: &[bool]) -> Result<Element, FieldError> {
        let significant = bits.iter().skip_while(|b| !**b).count() as u32;
        match Element::from_bits(bits) {
            Some(e) if significant <= self.m => Ok(e),
            Some(e) => Err(self.overflow(e)),
            None => Err(FieldError::ElementOverflow {
                value: u64::MAX,
                bits: significant,
                exponent: self.m,
            }),
        }
    }

    /// Converts a field element back into its integer value.
    ///
    /// Fails when the element is wider than m bits, which only happens for elements
    /// built outside this field.
    pub fn to_int(&self, e: Element) -> Result<u64, FieldError> {
        self.check(e)?;
        Ok(e.raw())
    }

    /// Converts a slice of integers into field elements.
    pub fn elements(&self, values: &[u64]) -> Result<Vec<Element>, FieldError> {
        values.iter().map(|&v| self.element(v)).collect()
    }

    /// Converts a slice of field elements into integers.
    pub fn to_ints(&self, elements: &[Element]) -> Result<Vec<u64>, FieldError> {
        elements.iter().map(|&e| self.to_int(e)).collect()
    }

    #[inline]
    pub fn add(&self, a: Element, b: Element) -> Element {
        a + b
    }

    /// Identical to [`BinaryField::add`] in characteristic 2.
    #[inline]
    pub fn sub(&self, a: Element, b: Element) -> Element {
        a - b
    }

    /// Product of two reduced elements.
    #[inline]
    pub fn mul(&self, a: Element, b: Element) -> Element {
        Element::from_raw(reduce(clmul(a.raw(), b.raw()), self.modulus, self.m))
    }

    #[inline]
    pub fn square(&self, a: Element) -> Element {
        self.mul(a, a)
    }

    /// `a` raised to the power `e` by square-and-multiply.
    pub fn pow(&self, a: Element, mut e: u64) -> Element {
        let mut result = Element::ONE;
        let mut base = a;
        while e > 0 {
            if e & 1 == 1 {
                result = self.mul(result, base);
            }
            base = self.square(base);
            e >>= 1;
        }
        result
    }

    /// Multiplicative inverse of a non-zero element.
    pub fn inv(&self, a: Element) -> Result<Element, FieldError> {
        if a.is_zero() {
            return Err(FieldError::ZeroInverse);
        }
        self.check(a)?;

        // Invariants: g1 * a = u and g2 * a = v (mod f).
        let (mut u, mut v) = (a.raw(), self.modulus);
        let (mut g1, mut g2) = (1u64, 0u64);
        while u != 1 {
            let (du, dv) = match (degree(u), degree(v)) {
                (Some(du), Some(dv)) => (du, dv),
                _ => return Err(FieldError::ZeroInverse),
            };
            if du < dv {
                core::mem::swap(&mut u, &mut v);
                core::mem::swap(&mut g1, &mut g2);
                continue;
            }
            let shift = du - dv;
            u ^= v << shift;
            g1 ^= g2 << shift;
        }
        Ok(Element::from_raw(reduce(g1, self.modulus, self.m)))
    }

    /// Horner evaluation of a polynomial given as coefficients, highest degree first.
    pub fn eval_poly(&self, coefficients: &[Element], x: Element) -> Element {
        coefficients
            .iter()
            .fold(Element::ZERO, |acc, &c| self.mul(acc, x) + c)
    }

    fn check(&self, e: Element) -> Result<(), FieldError> {
        if e.bit_len() > self.m {
            Err(self.overflow(e))
        } else {
            Ok(())
        }
    }

    fn overflow(&self, e: Element) -> FieldError {
        FieldError::ElementOverflow {
            value: e.raw(),
            bits: e.bit_len(),
            exponent: self.m,
        }
    }
}

impl Debug for BinaryField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "GF(2^{}) mod {:#x}", self.m, self.modulus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aes_field_known_product() {
        // FIPS-197 example: {57} * {83} = {c1}
        let field = BinaryField::new(8).unwrap();
        let a = field.element(0x57).unwrap();
        let b = field.element(0x83).unwrap();
        assert_eq!(field.mul(a, b), Element::from_raw(0xC1));
    }

    #[test]
    fn test_aes_field_known_inverse() {
        // FIPS-197: {53}^-1 = {ca}
        let field = BinaryField::new(8).unwrap();
        let a = field.element(0x53).unwrap();
        assert_eq!(field.inv(a).unwrap(), Element::from_raw(0xCA));
    }

    #[test]
    fn test_inverse_for_every_element_of_small_fields() {
        for m in 1..=10 {
            let field = BinaryField::new(m).unwrap();
            for v in 1..field.order() {
                let a = field.element(v).unwrap();
                let inv = field.inv(a).unwrap();
                assert_eq!(field.mul(a, inv), Element::ONE, "m = {m}, a = {v:#x}");
            }
        }
    }

    #[test]
    fn test_inverse_in_gf_2_32() {
        let field = BinaryField::new(32).unwrap();
        for v in [1u64, 2, 0xDEAD_BEEF, 0xCAFE_BABE, 0xFFFF_FFFF, 0x8000_0000, 0x1234_5678] {
            let a = field.element(v).unwrap();
            let inv = field.inv(a).unwrap();
            assert_eq!(field.mul(a, inv), Element::ONE, "a = {v:#x}");
        }
    }

    #[test]
    fn test_inverse_matches_fermat() {
        let field = BinaryField::new(32).unwrap();
        let a = field.element(0x1234_5678).unwrap();
        let fermat = field.pow(a, field.order() - 2);
        assert_eq!(field.inv(a).unwrap(), fermat);
    }

    #[test]
    fn test_zero_has_no_inverse() {
        let field = BinaryField::new(16).unwrap();
        assert_eq!(field.inv(Element::ZERO), Err(FieldError::ZeroInverse));
    }

    #[test]
    fn test_element_overflow() {
        let field = BinaryField::new(4).unwrap();
        assert!(field.element(15).is_ok());
        assert_eq!(
            field.element(16),
            Err(FieldError::ElementOverflow {
                value: 16,
                bits: 5,
                exponent: 4
            })
        );
        assert!(field.to_int(Element::from_raw(0x10)).is_err());
    }

    #[test]
    fn test_element_from_bits() {
        let field = BinaryField::new(4).unwrap();
        let e = field
            .element_from_bits(&[false, true, false, true, true])
            .unwrap();
        assert_eq!(field.to_int(e).unwrap(), 0b1011);
        assert!(field.element_from_bits(&[true, false, false, false, false]).is_err());
    }

    #[test]
    fn test_custom_modulus() {
        // x^8 + x^4 + x^3 + x^2 + 1 is irreducible (the Reed-Solomon QR modulus)
        let field = BinaryField::with_modulus(8, 0x11D).unwrap();
        let a = field.element(0x02).unwrap();
        assert_eq!(field.pow(a, 8), Element::from_raw(0x1D));

        assert!(matches!(
            BinaryField::with_modulus(8, 0x101),
            Err(FieldError::ReducibleModulus { .. })
        ));
        assert!(matches!(
            BinaryField::with_modulus(8, 0x11),
            Err(FieldError::ReducibleModulus { .. })
        ));
    }

    #[test]
    fn test_unsupported_exponent() {
        assert_eq!(BinaryField::new(0), Err(FieldError::UnsupportedExponent(0)));
        assert_eq!(BinaryField::new(33), Err(FieldError::UnsupportedExponent(33)));
    }

    #[test]
    fn test_eval_poly_horner() {
        let field = BinaryField::new(8).unwrap();
        // p(x) = x^2 + 1, highest degree first
        let p = [Element::ONE, Element::ZERO, Element::ONE];
        let x = field.element(0x57).unwrap();
        let expected = field.mul(x, x) + Element::ONE;
        assert_eq!(field.eval_poly(&p, x), expected);
        assert_eq!(field.eval_poly(&[], x), Element::ZERO);
    }

    #[test]
    fn test_distributivity() {
        let field = BinaryField::new(32).unwrap();
        let a = field.element(0x0BAD_F00D).unwrap();
        let b = field.element(0x1357_9BDF).unwrap();
        let c = field.element(0x2468_ACE0).unwrap();
        assert_eq!(field.mul(a, b + c), field.mul(a, b) + field.mul(a, c));
    }
}
