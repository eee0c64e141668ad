//! The fuzzy vault.
//!
//! A [`VaultBuilder`] collects genuine and chaff pairs separately. Finalizing
//! shuffles them into a single list and drops the separation, which is all that is
//! ever persisted. A finalized [`Vault`] can then be indexed for verification. The
//! finalized pairs and the index never change afterwards, so any number of
//! verification attempts can share one vault.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::VaultConfig;
use crate::errors::VaultError;
use crate::geometric::{EnrollmentElement, GeometricIndex};
use crate::minutia::CoordinateConvention;
use crate::record::VaultRecord;

/// A vault point: a packed minutia and the value stored for it.
///
/// For genuine minutiae `y_rep` is the secret polynomial at `x_rep`; for chaff it
/// is a decoy that does not lie on the polynomial.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VaultElement {
    pub x_rep: u64,
    pub y_rep: u64,
}

impl VaultElement {
    pub const fn new(x_rep: u64, y_rep: u64) -> Self {
        Self { x_rep, y_rep }
    }
}

/// A vault under construction.
#[derive(Debug, Clone, Default)]
pub struct VaultBuilder {
    genuine: Vec<VaultElement>,
    chaff: Vec<VaultElement>,
}

impl VaultBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_genuine(&mut self, x_rep: u64, y_rep: u64) {
        self.genuine.push(VaultElement::new(x_rep, y_rep));
    }

    pub fn add_chaff(&mut self, x_rep: u64, y_rep: u64) {
        self.chaff.push(VaultElement::new(x_rep, y_rep));
    }

    pub fn genuine_len(&self) -> usize {
        self.genuine.len()
    }

    pub fn chaff_len(&self) -> usize {
        self.chaff.len()
    }

    /// Mixes genuine and chaff pairs in random order.
    pub fn finalize<R: Rng + ?Sized>(self, rng: &mut R) -> Vault {
        let mut elements = self.genuine;
        elements.extend(self.chaff);
        elements.shuffle(rng);
        Vault {
            elements,
            index: None,
        }
    }
}

/// A finalized vault, optionally carrying its geometric index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vault {
    elements: Vec<VaultElement>,
    index: Option<GeometricIndex>,
}

impl Vault {
    pub fn elements(&self) -> &[VaultElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn index(&self) -> Option<&GeometricIndex> {
        self.index.as_ref()
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// Builds the enrollment index, replacing any previous one.
    pub fn build_index(&mut self, config: &VaultConfig) -> Result<(), VaultError> {
        let index = GeometricIndex::build(&self.elements, &config.packing)?;
        info!(bases = index.len(), "geometric index built");
        self.index = Some(index);
        Ok(())
    }

    /// The persisted form. The index is included only if requested and present.
    pub fn to_record(
        &self,
        vault_id: u64,
        with_index: bool,
        config: &VaultConfig,
    ) -> Result<VaultRecord, VaultError> {
        let vault_geom_table = match (&self.index, with_index) {
            (Some(index), true) => Some(
                index
                    .elements()
                    .iter()
                    .map(|e| e.to_entry(&config.packing))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            _ => None,
        };
        Ok(VaultRecord {
            vault_id,
            vault_x: self.elements.iter().map(|e| e.x_rep).collect(),
            vault_y: self.elements.iter().map(|e| e.y_rep).collect(),
            vault_geom_table,
        })
    }

    /// Restores a vault from its persisted form.
    ///
    /// The record must hold equally many x and y values, pairwise distinct x values,
    /// x values that unpack to sensor minutiae, and y values inside the field. A
    /// stored geometric table must have one entry per pair, each aligned with the
    /// pairs.
    pub fn from_record(record: &VaultRecord, config: &VaultConfig) -> Result<Self, VaultError> {
        config.validate()?;
        if record.vault_x.len() != record.vault_y.len() {
            return Err(VaultError::MalformedRecord(format!(
                "{} x values and {} y values",
                record.vault_x.len(),
                record.vault_y.len()
            )));
        }
        let order = 1u64 << config.gf_exponent;
        let mut elements = Vec::with_capacity(record.vault_x.len());
        for (i, (&x_rep, &y_rep)) in record.vault_x.iter().zip(&record.vault_y).enumerate() {
            let m = config.packing.unpack(x_rep, &CoordinateConvention::SENSOR)?;
            CoordinateConvention::SENSOR.check(&m)?;
            if y_rep >= order {
                return Err(VaultError::MalformedRecord(format!(
                    "y value {y_rep} at {i} outside GF(2^{})",
                    config.gf_exponent
                )));
            }
            if elements.iter().any(|e: &VaultElement| e.x_rep == x_rep) {
                return Err(VaultError::MalformedRecord(format!("duplicate x value {x_rep}")));
            }
            elements.push(VaultElement::new(x_rep, y_rep));
        }

        let index = match &record.vault_geom_table {
            None => None,
            Some(table) => {
                if table.len() != elements.len() {
                    return Err(VaultError::MalformedRecord(format!(
                        "{} geometric entries for {} pairs",
                        table.len(),
                        elements.len()
                    )));
                }
                let frames = table
                    .iter()
                    .map(|entry| {
                        let frame = EnrollmentElement::from_entry(entry, &config.packing)?;
                        if frame.values != record.vault_y {
                            return Err(VaultError::MalformedRecord(
                                "geometric entry not aligned with vault pairs".to_string(),
                            ));
                        }
                        Ok(frame)
                    })
                    .collect::<Result<Vec<_>, VaultError>>()?;
                Some(GeometricIndex::from_elements(frames))
            }
        };
        debug!(
            vault_id = record.vault_id,
            pairs = elements.len(),
            indexed = index.is_some(),
            "vault restored"
        );
        Ok(Self { elements, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minutia::Minutia;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample_vault() -> Vault {
        let mut rng = StdRng::seed_from_u64(42);
        let config = VaultConfig::default();
        let mut builder = VaultBuilder::new();
        for i in 0..5 {
            let m = Minutia::new(20 + 50 * i, 30 + 40 * i, 15 * i, 0);
            let x = config.packing.pack(&m, &CoordinateConvention::SENSOR).unwrap();
            if i % 2 == 0 {
                builder.add_genuine(x, 100 + i as u64);
            } else {
                builder.add_chaff(x, 200 + i as u64);
            }
        }
        assert_eq!((builder.genuine_len(), builder.chaff_len()), (3, 2));
        builder.finalize(&mut rng)
    }

    #[test]
    fn test_finalize_keeps_every_pair() {
        let vault = sample_vault();
        assert_eq!(vault.len(), 5);
        assert!(!vault.is_indexed());
        let mut ys: Vec<u64> = vault.elements().iter().map(|e| e.y_rep).collect();
        ys.sort_unstable();
        assert_eq!(ys, vec![100, 102, 104, 201, 203]);
    }

    #[test]
    fn test_record_round_trip_with_index() {
        let config = VaultConfig::default();
        let mut vault = sample_vault();
        vault.build_index(&config).unwrap();

        let plain = vault.to_record(7, false, &config).unwrap();
        assert!(plain.vault_geom_table.is_none());
        let restored = Vault::from_record(&plain, &config).unwrap();
        assert_eq!(restored.elements(), vault.elements());
        assert!(!restored.is_indexed());

        let full = vault.to_record(7, true, &config).unwrap();
        let restored = Vault::from_record(&full, &config).unwrap();
        assert_eq!(restored, vault);
    }

    #[test]
    fn test_from_record_rejects_malformed() {
        let config = VaultConfig::default();
        let record = VaultRecord {
            vault_id: 1,
            vault_x: vec![1, 2],
            vault_y: vec![3],
            vault_geom_table: None,
        };
        assert!(matches!(
            Vault::from_record(&record, &config),
            Err(VaultError::MalformedRecord(_))
        ));

        let record = VaultRecord {
            vault_id: 1,
            vault_x: vec![1, 1],
            vault_y: vec![3, 4],
            vault_geom_table: None,
        };
        assert!(Vault::from_record(&record, &config).is_err());

        let record = VaultRecord {
            vault_id: 1,
            vault_x: vec![1],
            vault_y: vec![1 << 32],
            vault_geom_table: None,
        };
        assert!(Vault::from_record(&record, &config).is_err());

        // x = 2047 does not unpack to a sensor minutia
        let record = VaultRecord {
            vault_id: 1,
            vault_x: vec![2047 << 21],
            vault_y: vec![1],
            vault_geom_table: None,
        };
        assert!(matches!(
            Vault::from_record(&record, &config),
            Err(VaultError::RepresentationOutOfRange { field: "x", .. })
        ));
    }
}
