//! Fixed-width bit packing of minutiae into unsigned integers.
//!
//! A packed minutia is `x ‖ y ‖ theta`, most significant field first. Coordinates of
//! a convention with negative bounds are shifted by the convention offset before
//! packing and shifted back when unpacking. Quality is not packed.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_THETA_BITS, DEFAULT_X_BITS, DEFAULT_Y_BITS};
use crate::errors::VaultError;
use crate::minutia::{CoordinateConvention, Minutia};

/// Bit widths of the packed fields.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackingLayout {
    pub x_bits: u32,
    pub y_bits: u32,
    pub theta_bits: u32,
}

impl Default for PackingLayout {
    fn default() -> Self {
        Self {
            x_bits: DEFAULT_X_BITS,
            y_bits: DEFAULT_Y_BITS,
            theta_bits: DEFAULT_THETA_BITS,
        }
    }
}

impl PackingLayout {
    pub fn total_bits(&self) -> u32 {
        self.x_bits + self.y_bits + self.theta_bits
    }

    /// Packs `m`, interpreted in `convention`, into an integer of `total_bits()` bits.
    pub fn pack(&self, m: &Minutia, convention: &CoordinateConvention) -> Result<u64, VaultError> {
        let x = field_value("x", i64::from(m.x) + i64::from(convention.x_offset()), self.x_bits)?;
        let y = field_value("y", i64::from(m.y) + i64::from(convention.y_offset()), self.y_bits)?;
        let theta = field_value("theta", i64::from(m.theta), self.theta_bits)?;
        Ok((x << (self.y_bits + self.theta_bits)) | (y << self.theta_bits) | theta)
    }

    /// Reverses [`PackingLayout::pack`]. The recovered minutia has quality 0.
    pub fn unpack(&self, rep: u64, convention: &CoordinateConvention) -> Result<Minutia, VaultError> {
        let total = self.total_bits();
        if total < 64 && rep >> total != 0 {
            return Err(VaultError::RepresentationOutOfRange {
                field: "representation",
                value: i64::try_from(rep).unwrap_or(i64::MAX),
                min: 0,
                max: i64::try_from(mask(total)).unwrap_or(i64::MAX),
            });
        }
        let theta = rep & mask(self.theta_bits);
        let y = (rep >> self.theta_bits) & mask(self.y_bits);
        let x = (rep >> (self.theta_bits + self.y_bits)) & mask(self.x_bits);
        // every field is at most 31 bits wide, see `validate`
        Ok(Minutia::new(
            x as i32 - convention.x_offset(),
            y as i32 - convention.y_offset(),
            theta as i32,
            0,
        ))
    }

    /// Checks that every field is non-empty, at most 31 bits, and that the whole
    /// representation fits `limit` bits.
    pub fn validate(&self, limit: u32) -> Result<(), VaultError> {
        for (name, bits) in [("x", self.x_bits), ("y", self.y_bits), ("theta", self.theta_bits)] {
            if bits == 0 || bits > 31 {
                return Err(VaultError::InvalidConfig(format!(
                    "packing width for {name} must be in 1..=31, got {bits}"
                )));
            }
        }
        if self.total_bits() > limit {
            return Err(VaultError::InvalidConfig(format!(
                "packed minutiae need {} bits, field holds {limit}",
                self.total_bits()
            )));
        }
        Ok(())
    }
}

fn mask(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

fn field_value(field: &'static str, value: i64, bits: u32) -> Result<u64, VaultError> {
    let max = mask(bits.min(62)) as i64;
    if (0..=max).contains(&value) {
        Ok(value as u64)
    } else {
        Err(VaultError::RepresentationOutOfRange {
            field,
            value,
            min: 0,
            max,
        })
    }
}
