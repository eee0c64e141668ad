//! Error types for vault construction, persistence and verification.

use core::fmt;

use galois::FieldError;

/// Which minutiae list an error refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    /// The enrolled fingerprint.
    Gallery,
    /// The fingerprint presented for verification.
    Probe,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Gallery => f.write_str("gallery"),
            Side::Probe => f.write_str("probe"),
        }
    }
}

/// Errors that can occur while building, storing or unlocking a vault.
///
/// A failed unlock is not an error: exhausting every candidate subset or hitting the
/// iteration ceiling is reported through [`crate::UnlockReport`].
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Fewer minutiae were supplied than the configuration requires.
    #[error("{side} has {found} usable minutiae, {required} required")]
    InsufficientMinutiae {
        side: Side,
        found: usize,
        required: usize,
    },

    /// A value does not fit the configured field.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// A minutia component or packed value lies outside its declared range.
    #[error("{field} = {value} outside [{min}, {max}]")]
    RepresentationOutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A bounded sampling loop gave up.
    ///
    /// Raised when the configuration leaves too little room for the requested number
    /// of chaff points or decoy values.
    #[error("could not sample {what} after {attempts} attempts")]
    InfeasibleConfiguration { what: &'static str, attempts: u32 },

    /// The randomized subset search budget C(n, k) does not fit in 64 bits.
    #[error("subset budget C({candidates}, {subset_size}) overflows")]
    SubsetBudgetOverflow {
        candidates: usize,
        subset_size: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Polynomial evaluation produced a value beyond twice the field order.
    #[error("polynomial evaluation exceeded the field bound")]
    InconsistentEncoding,

    /// Verification was attempted on a vault without a geometric index.
    #[error("vault has no geometric index")]
    NotIndexed,

    #[error("malformed vault record: {0}")]
    MalformedRecord(String),

    /// A minutiae line could not be parsed.
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for VaultError {
    fn from(err: bincode::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}
