//! Polynomials with coefficients in GF(2^m).
//!
//! Coefficients are stored highest degree first, matching the order in which
//! secret bits are laid out by the vault codec. Leading zero coefficients are
//! allowed; [`Polynomial::padded`] pads or trims to a fixed length.

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::errors::FieldError;
use crate::field::BinaryField;

/// Polynomial over a binary field, coefficients highest degree first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Polynomial {
    coefficients: Vec<Element>,
}

impl Polynomial {
    /// Wraps coefficients given highest degree first.
    pub fn new(coefficients: Vec<Element>) -> Self {
        Self { coefficients }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn constant(c: Element) -> Self {
        Self::new(vec![c])
    }

    /// The monic linear factor `X - root` (equal to `X + root`).
    pub fn linear(root: Element) -> Self {
        Self::new(vec![Element::ONE, root])
    }

    /// Coefficients highest degree first, leading zeros included.
    pub fn coefficients(&self) -> &[Element] {
        &self.coefficients
    }

    /// Degree of the polynomial, `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coefficients
            .iter()
            .position(|c| !c.is_zero())
            .map(|lead| self.coefficients.len() - 1 - lead)
    }

    pub fn is_zero(&self) -> bool {
        self.degree().is_none()
    }

    /// Sum of two polynomials; the shorter operand is right-aligned.
    pub fn add(&self, other: &Self) -> Self {
        let (long, short) = if self.coefficients.len() >= other.coefficients.len() {
            (&self.coefficients, &other.coefficients)
        } else {
            (&other.coefficients, &self.coefficients)
        };
        let offset = long.len() - short.len();
        let mut sum = long.clone();
        for (slot, &c) in sum[offset..].iter_mut().zip(short) {
            *slot += c;
        }
        Self::new(sum)
    }

    /// Identical to [`Polynomial::add`] in characteristic 2.
    pub fn sub(&self, other: &Self) -> Self {
        self.add(other)
    }

    /// Schoolbook product over `field`.
    pub fn mul(&self, other: &Self, field: &BinaryField) -> Self {
        if self.coefficients.is_empty() || other.coefficients.is_empty() {
            return Self::zero();
        }
        let mut product = vec![Element::ZERO; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, &a) in self.coefficients.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, &b) in other.coefficients.iter().enumerate() {
                product[i + j] += field.mul(a, b);
            }
        }
        Self::new(product)
    }

    /// Multiplies every coefficient by `c`.
    pub fn scale(&self, c: Element, field: &BinaryField) -> Self {
        Self::new(self.coefficients.iter().map(|&a| field.mul(a, c)).collect())
    }

    pub fn evaluate(&self, x: Element, field: &BinaryField) -> Element {
        field.eval_poly(&self.coefficients, x)
    }

    /// Returns exactly `len` coefficients: leading zeros are added, or the highest
    /// coefficients beyond `len` are dropped.
    pub fn padded(&self, len: usize) -> Vec<Element> {
        let n = self.coefficients.len();
        if n >= len {
            self.coefficients[n - len..].to_vec()
        } else {
            let mut out = vec![Element::ZERO; len - n];
            out.extend_from_slice(&self.coefficients);
            out
        }
    }

    /// Lagrange interpolation over `field`.
    ///
    /// For every point j the numerator `prod_{i != j} (X - x_i)` and the denominator
    /// `prod_{i != j} (x_j - x_i)` are formed, and `y_j / denominator * numerator`
    /// is accumulated. The result has exactly `points.len()` coefficients.
    pub fn interpolate(points: &[(Element, Element)], field: &BinaryField) -> Result<Self, FieldError> {
        if points.is_empty() {
            return Err(FieldError::EmptyInterpolation);
        }
        for (i, (xi, _)) in points.iter().enumerate() {
            if points[i + 1..].iter().any(|(xj, _)| xj == xi) {
                return Err(FieldError::DuplicateAbscissa(xi.raw()));
            }
        }

        let mut sum = Self::new(vec![Element::ZERO; points.len()]);
        for (j, &(xj, yj)) in points.iter().enumerate() {
            let mut numerator = Self::constant(Element::ONE);
            let mut denominator = Element::ONE;
            for (i, &(xi, _)) in points.iter().enumerate() {
                if i == j {
                    continue;
                }
                numerator = numerator.mul(&Self::linear(xi), field);
                denominator = field.mul(denominator, xj - xi);
            }
            let weight = field.mul(yj, field.inv(denominator)?);
            sum = sum.add(&numerator.scale(weight, field));
        }
        Ok(Self::new(sum.padded(points.len())))
    }
}

impl From<Vec<Element>> for Polynomial {
    fn from(coefficients: Vec<Element>) -> Self {
        Self::new(coefficients)
    }
}
