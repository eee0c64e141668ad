//! Constants used by the fuzzy vault.
//!
//! The `DEFAULT_*` values seed [`crate::VaultConfig::default`]. Sensor bounds
//! describe the minutiae produced by the extraction tooling and are not tunable.

/// Largest x coordinate reported by the sensor (inclusive).
pub const SENSOR_X_MAX: i32 = 560;

/// Largest y coordinate reported by the sensor (inclusive).
pub const SENSOR_Y_MAX: i32 = 560;

/// Orientation is measured in degrees in `[0, THETA_RANGE)`, 0 pointing right.
pub const THETA_RANGE: i32 = 360;

/// Largest minutia quality (inclusive).
pub const QUALITY_MAX: i32 = 100;

/// Default polynomial degree. `degree + 1` matching minutiae unlock the vault.
pub const DEFAULT_POLY_DEGREE: usize = 8;

/// Default number of genuine minutiae bound into the vault.
pub const DEFAULT_MINUTIAE_COUNT: usize = 30;

/// Default number of chaff points hiding the genuine minutiae.
pub const DEFAULT_CHAFF_COUNT: usize = 300;

/// Default checksum length in bits.
pub const DEFAULT_CRC_BITS: usize = 32;

/// Default field exponent m of GF(2^m).
pub const DEFAULT_GF_EXPONENT: u32 = 32;

/// Default lower bound on the secret size in bits.
pub const DEFAULT_MIN_SECRET_BITS: usize = 128;

/// Minimum pixel distance between any two vault points.
pub const DEFAULT_POINTS_DISTANCE: u32 = 10;

pub const DEFAULT_X_TOLERANCE: i32 = 12;
pub const DEFAULT_Y_TOLERANCE: i32 = 12;
pub const DEFAULT_THETA_TOLERANCE: i32 = 12;
pub const DEFAULT_TOTAL_TOLERANCE: i32 = 25;
pub const DEFAULT_BASIS_THETA_TOLERANCE: i32 = 10;

/// Candidate count up to which every subset is enumerated (unless randomized).
pub const DEFAULT_SUBSET_EVAL_THRESHOLD: usize = 25;

/// Upper bound on the exhaustive threshold: subsets are stored as `u64` bitmasks.
pub const MAX_EXHAUSTIVE_CANDIDATES: usize = 64;

/// Global ceiling on fuzzy comparisons during one unlock attempt.
pub const DEFAULT_MAX_ITERATIONS: u64 = 27_000_000;

/// Ceiling on rejected samples while drawing a single chaff point or decoy value.
pub const DEFAULT_CHAFF_RETRY_LIMIT: u32 = 100_000;

pub const DEFAULT_X_BITS: u32 = 11;
pub const DEFAULT_Y_BITS: u32 = 11;
pub const DEFAULT_THETA_BITS: u32 = 10;

/// Decimal digit range for decoy values when no genuine value is available.
pub(crate) const FALLBACK_DECOY_DIGITS: (u32, u32) = (9, 10);
