//! Fingerprint minutiae and the coordinate conventions they are expressed in.
//!
//! Minutiae arrive in the sensor convention: origin in the image corner, every
//! component non-negative. Geometric hashing re-centres the origin on the image
//! middle. Rotating around an arbitrary basis can then move points up to a factor
//! of sqrt(2) further from the centre, so the hashing convention has wider bounds.

use serde::{Deserialize, Serialize};

use crate::constants::{QUALITY_MAX, SENSOR_X_MAX, SENSOR_Y_MAX, THETA_RANGE};
use crate::errors::VaultError;

/// A ridge ending or bifurcation: position, orientation in degrees and quality.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Minutia {
    pub x: i32,
    pub y: i32,
    pub theta: i32,
    pub quality: i32,
}

impl Minutia {
    /// Builds a minutia without range checks.
    pub const fn new(x: i32, y: i32, theta: i32, quality: i32) -> Self {
        Self {
            x,
            y,
            theta,
            quality,
        }
    }

    /// Builds a minutia in the sensor convention, rejecting out-of-range components.
    pub fn sensor(x: i32, y: i32, theta: i32, quality: i32) -> Result<Self, VaultError> {
        let m = Self::new(x, y, theta, quality);
        CoordinateConvention::SENSOR.check(&m)?;
        Ok(m)
    }

    /// Euclidean pixel distance, truncated to an integer.
    pub fn distance_to(&self, other: &Minutia) -> u32 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt() as u32
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0 && self.theta == 0
    }

    /// Same position and orientation. Quality is ignored.
    pub fn same_position(&self, other: &Minutia) -> bool {
        self.x == other.x && self.y == other.y && self.theta == other.theta
    }
}

/// Bounds and origin of a coordinate system.
///
/// `origin_x`/`origin_y` are the sensor coordinates of this convention's (0, 0).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CoordinateConvention {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
    pub origin_x: i32,
    pub origin_y: i32,
}

const HALF_X: i32 = SENSOR_X_MAX / 2;
const HALF_Y: i32 = SENSOR_Y_MAX / 2;
// int(sqrt(2) * 560)
const HASHING_X_EXTENT: i32 = 791;
const HASHING_Y_EXTENT: i32 = 791;

impl CoordinateConvention {
    /// Origin in the sensor corner, coordinates in `[0, 560]`.
    pub const SENSOR: Self = Self {
        x_min: 0,
        x_max: SENSOR_X_MAX,
        y_min: 0,
        y_max: SENSOR_Y_MAX,
        origin_x: 0,
        origin_y: 0,
    };

    /// Origin in the sensor centre, coordinates in `[-791, 791]`.
    pub const HASHING: Self = Self {
        x_min: -HASHING_X_EXTENT,
        x_max: HASHING_X_EXTENT,
        y_min: -HASHING_Y_EXTENT,
        y_max: HASHING_Y_EXTENT,
        origin_x: HALF_X,
        origin_y: HALF_Y,
    };

    /// Validates every component of `m` against this convention.
    pub fn check(&self, m: &Minutia) -> Result<(), VaultError> {
        in_range("x", m.x, self.x_min, self.x_max)?;
        in_range("y", m.y, self.y_min, self.y_max)?;
        in_range("theta", m.theta, 0, THETA_RANGE - 1)?;
        in_range("quality", m.quality, 0, QUALITY_MAX)
    }

    /// Re-expresses a minutia given in this convention in `target`.
    pub fn convert(&self, m: &Minutia, target: &CoordinateConvention) -> Minutia {
        Minutia {
            x: m.x + self.origin_x - target.origin_x,
            y: m.y + self.origin_y - target.origin_y,
            ..*m
        }
    }

    /// Offset added to x before packing so that the smallest x maps to 0.
    pub fn x_offset(&self) -> i32 {
        -self.x_min
    }

    pub fn y_offset(&self) -> i32 {
        -self.y_min
    }
}

/// Converts sensor minutiae into the hashing convention.
pub fn to_hashing(minutiae: &[Minutia]) -> Vec<Minutia> {
    minutiae
        .iter()
        .map(|m| CoordinateConvention::SENSOR.convert(m, &CoordinateConvention::HASHING))
        .collect()
}

pub(crate) fn in_range(field: &'static str, value: i32, min: i32, max: i32) -> Result<(), VaultError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(VaultError::RepresentationOutOfRange {
            field,
            value: i64::from(value),
            min: i64::from(min),
            max: i64::from(max),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashing_bounds() {
        let h = CoordinateConvention::HASHING;
        assert_eq!((h.x_min, h.x_max), (-791, 791));
        assert_eq!((h.origin_x, h.origin_y), (280, 280));
        assert_eq!(h.x_offset(), 791);
    }

    #[test]
    fn test_convert_round_trip() {
        let m = Minutia::sensor(10, 550, 359, 80).unwrap();
        let h = CoordinateConvention::SENSOR.convert(&m, &CoordinateConvention::HASHING);
        assert_eq!((h.x, h.y, h.theta, h.quality), (-270, 270, 359, 80));
        let back = CoordinateConvention::HASHING.convert(&h, &CoordinateConvention::SENSOR);
        assert_eq!(back, m);
    }

    #[test]
    fn test_sensor_rejects_out_of_range() {
        assert!(Minutia::sensor(561, 0, 0, 0).is_err());
        assert!(Minutia::sensor(0, -1, 0, 0).is_err());
        assert!(Minutia::sensor(0, 0, 360, 0).is_err());
        assert!(matches!(
            Minutia::sensor(0, 0, 0, 101),
            Err(VaultError::RepresentationOutOfRange { field: "quality", .. })
        ));
        assert!(Minutia::sensor(560, 560, 359, 100).is_ok());
    }

    #[test]
    fn test_distance_truncates() {
        let a = Minutia::new(0, 0, 0, 0);
        let b = Minutia::new(3, 4, 90, 0);
        let c = Minutia::new(7, 7, 0, 0);
        assert_eq!(a.distance_to(&b), 5);
        // sqrt(98) = 9.899...
        assert_eq!(a.distance_to(&c), 9);
    }
}
