//! Geometric hashing.
//!
//! Each minutia can serve as a basis: every other minutia is translated by the
//! basis position and rotated by the basis orientation, giving coordinates that do
//! not depend on where the finger was placed. The enrollment index holds one such
//! frame per vault point. Verification frames are built on demand per probe basis.

use serde::{Deserialize, Serialize};

use crate::constants::THETA_RANGE;
use crate::errors::VaultError;
use crate::minutia::{CoordinateConvention, Minutia};
use crate::representation::PackingLayout;
use crate::vault::VaultElement;

/// Re-expresses `m` in the frame of `basis`.
///
/// Both minutiae are in the hashing convention. The result may lie outside the
/// convention bounds.
pub fn transform(basis: &Minutia, m: &Minutia) -> Minutia {
    let (sin, cos) = f64::from(basis.theta).to_radians().sin_cos();
    let dx = f64::from(m.x - basis.x);
    let dy = f64::from(m.y - basis.y);
    let x = (dx * cos + dy * sin).round_ties_even() as i32;
    let y = (-dx * sin + dy * cos).round_ties_even() as i32;
    let theta = (m.theta - basis.theta).rem_euclid(THETA_RANGE);
    Minutia::new(x, y, theta, m.quality)
}

/// Undoes [`transform`] up to rounding: rotates back by the basis orientation and
/// translates by the basis position.
pub fn inverse_transform(basis: &Minutia, t: &Minutia) -> Minutia {
    let (sin, cos) = f64::from(basis.theta).to_radians().sin_cos();
    let x = f64::from(t.x);
    let y = f64::from(t.y);
    Minutia::new(
        (x * cos - y * sin).round_ties_even() as i32 + basis.x,
        (x * sin + y * cos).round_ties_even() as i32 + basis.y,
        (t.theta + basis.theta).rem_euclid(THETA_RANGE),
        t.quality,
    )
}

pub fn transform_all(basis: &Minutia, minutiae: &[Minutia]) -> Vec<Minutia> {
    minutiae.iter().map(|m| transform(basis, m)).collect()
}

/// One enrollment frame.
///
/// `transformed[i]` and `values[i]` belong to the i-th vault element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentElement {
    pub basis: Minutia,
    pub transformed: Vec<Minutia>,
    pub values: Vec<u64>,
}

impl EnrollmentElement {
    /// Packs the frame in the hashing convention for storage.
    pub fn to_entry(&self, layout: &PackingLayout) -> Result<GeomTableEntry, VaultError> {
        let hashing = CoordinateConvention::HASHING;
        Ok(GeomTableEntry {
            geom_basis: layout.pack(&self.basis, &hashing)?,
            geom_x: self
                .transformed
                .iter()
                .map(|m| layout.pack(m, &hashing))
                .collect::<Result<_, _>>()?,
            geom_y: self.values.clone(),
        })
    }

    /// Rebuilds a frame from its stored form.
    pub fn from_entry(entry: &GeomTableEntry, layout: &PackingLayout) -> Result<Self, VaultError> {
        if entry.geom_x.len() != entry.geom_y.len() {
            return Err(VaultError::MalformedRecord(format!(
                "geometric entry has {} minutiae and {} values",
                entry.geom_x.len(),
                entry.geom_y.len()
            )));
        }
        let hashing = CoordinateConvention::HASHING;
        Ok(Self {
            basis: layout.unpack(entry.geom_basis, &hashing)?,
            transformed: entry
                .geom_x
                .iter()
                .map(|&rep| layout.unpack(rep, &hashing))
                .collect::<Result<_, _>>()?,
            values: entry.geom_y.clone(),
        })
    }
}

/// A probe frame. Carries no polynomial values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationElement {
    pub basis: Minutia,
    pub transformed: Vec<Minutia>,
}

impl VerificationElement {
    /// Transforms the probe minutiae (hashing convention) into the frame of `basis`.
    pub fn new(basis: Minutia, probe: &[Minutia]) -> Self {
        Self {
            basis,
            transformed: transform_all(&basis, probe),
        }
    }
}

/// Stored form of an [`EnrollmentElement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeomTableEntry {
    pub geom_basis: u64,
    pub geom_x: Vec<u64>,
    pub geom_y: Vec<u64>,
}

/// The enrollment index: one frame per vault element, in vault order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometricIndex {
    elements: Vec<EnrollmentElement>,
}

impl GeometricIndex {
    /// Builds a frame for every vault element, using each one as a basis in turn.
    pub fn build(pairs: &[VaultElement], layout: &PackingLayout) -> Result<Self, VaultError> {
        let minutiae = pairs
            .iter()
            .map(|p| {
                let m = layout.unpack(p.x_rep, &CoordinateConvention::SENSOR)?;
                Ok(CoordinateConvention::SENSOR.convert(&m, &CoordinateConvention::HASHING))
            })
            .collect::<Result<Vec<_>, VaultError>>()?;
        let values: Vec<u64> = pairs.iter().map(|p| p.y_rep).collect();

        let elements = minutiae
            .iter()
            .map(|basis| EnrollmentElement {
                basis: *basis,
                transformed: transform_all(basis, &minutiae),
                values: values.clone(),
            })
            .collect();
        Ok(Self { elements })
    }

    pub(crate) fn from_elements(elements: Vec<EnrollmentElement>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[EnrollmentElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
