use rand::Rng;

use crate::{BinaryField, Element};

/// Helper trait for sampling random field elements.
pub trait RandomField {
    /// A uniformly random element, zero included.
    fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Element;

    /// A uniformly random non-zero element.
    fn random_nonzero<R: Rng + ?Sized>(&self, rng: &mut R) -> Element;
}

impl RandomField for BinaryField {
    #[inline]
    fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Element {
        Element::from_raw(rng.random_range(0..self.order()))
    }

    #[inline]
    fn random_nonzero<R: Rng + ?Sized>(&self, rng: &mut R) -> Element {
        Element::from_raw(rng.random_range(1..self.order()))
    }
}
