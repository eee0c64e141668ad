//! Persisted vault form, handed to and read back from external storage.

use serde::{Deserialize, Serialize};

use crate::errors::VaultError;
use crate::geometric::GeomTableEntry;

/// The stored vault: an identifier and index-aligned x and y values, optionally
/// with the packed geometric index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRecord {
    pub vault_id: u64,
    pub vault_x: Vec<u64>,
    pub vault_y: Vec<u64>,
    #[serde(default)]
    pub vault_geom_table: Option<Vec<GeomTableEntry>>,
}

impl VaultRecord {
    pub fn to_json(&self) -> Result<String, VaultError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, VaultError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, VaultError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VaultError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
