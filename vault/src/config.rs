//! Vault parameters.
//!
//! A [`VaultConfig`] is an immutable value handed to every operation. Parameter
//! sweeps derive a new value with [`VaultConfig::stepped`] instead of mutating one
//! in place.

use serde::{Deserialize, Serialize};

use crate::codec::smallest_secret_bits;
use crate::constants::*;
use crate::errors::VaultError;
use crate::representation::PackingLayout;
use crate::search::subset_budget;

/// Thresholds of the fuzzy minutiae comparator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchTolerances {
    pub x: i32,
    pub y: i32,
    pub theta: i32,
    /// Bound on `|dx| + |dy| + |dtheta|`.
    pub total: i32,
    /// Orientation tolerance used to pair probe and gallery bases.
    pub basis_theta: i32,
}

impl MatchTolerances {
    /// All tolerances zero: only identical minutiae match.
    pub const EXACT: Self = Self {
        x: 0,
        y: 0,
        theta: 0,
        total: 0,
        basis_theta: 0,
    };
}

impl Default for MatchTolerances {
    fn default() -> Self {
        Self {
            x: DEFAULT_X_TOLERANCE,
            y: DEFAULT_Y_TOLERANCE,
            theta: DEFAULT_THETA_TOLERANCE,
            total: DEFAULT_TOTAL_TOLERANCE,
            basis_theta: DEFAULT_BASIS_THETA_TOLERANCE,
        }
    }
}

/// How candidate subsets are searched.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubsetSearchConfig {
    /// Candidate count up to which all subsets are enumerated.
    pub threshold: usize,
    /// Always sample random subsets, regardless of `threshold`.
    pub randomized: bool,
}

impl Default for SubsetSearchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SUBSET_EVAL_THRESHOLD,
            randomized: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VaultConfig {
    pub poly_degree: usize,
    pub minutiae_count: usize,
    pub chaff_count: usize,
    pub crc_bits: usize,
    pub gf_exponent: u32,
    pub min_secret_bits: usize,
    pub points_distance: u32,
    pub tolerances: MatchTolerances,
    pub subset_search: SubsetSearchConfig,
    /// Ceiling on fuzzy comparisons per unlock attempt.
    pub max_iterations: u64,
    /// Ceiling on rejected samples per chaff point or decoy value.
    pub chaff_retry_limit: u32,
    pub packing: PackingLayout,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            poly_degree: DEFAULT_POLY_DEGREE,
            minutiae_count: DEFAULT_MINUTIAE_COUNT,
            chaff_count: DEFAULT_CHAFF_COUNT,
            crc_bits: DEFAULT_CRC_BITS,
            gf_exponent: DEFAULT_GF_EXPONENT,
            min_secret_bits: DEFAULT_MIN_SECRET_BITS,
            points_distance: DEFAULT_POINTS_DISTANCE,
            tolerances: MatchTolerances::default(),
            subset_search: SubsetSearchConfig::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            chaff_retry_limit: DEFAULT_CHAFF_RETRY_LIMIT,
            packing: PackingLayout::default(),
        }
    }
}

impl VaultConfig {
    /// Number of matching minutiae needed to interpolate: `poly_degree + 1`.
    pub fn match_threshold(&self) -> usize {
        self.poly_degree + 1
    }

    /// Size of the secret in bits, the smallest valid one above `min_secret_bits`.
    pub fn secret_bits(&self) -> Result<usize, VaultError> {
        smallest_secret_bits(self.poly_degree, self.crc_bits, self.min_secret_bits).ok_or_else(|| {
            VaultError::InvalidConfig(format!(
                "no byte-aligned secret splits into {} coefficients with a {}-bit crc",
                self.match_threshold(),
                self.crc_bits
            ))
        })
    }

    /// Width of one polynomial coefficient in bits.
    pub fn coefficient_bits(&self) -> Result<usize, VaultError> {
        Ok((self.secret_bits()? + self.crc_bits) / self.match_threshold())
    }

    /// Rejects parameter combinations the vault cannot work with.
    pub fn validate(&self) -> Result<(), VaultError> {
        let invalid = |msg: String| Err(VaultError::InvalidConfig(msg));

        if !(1..=galois::MAX_EXPONENT).contains(&self.gf_exponent) {
            return invalid(format!("field exponent {} outside 1..=32", self.gf_exponent));
        }
        if self.poly_degree == 0 {
            return invalid("polynomial degree must be positive".to_string());
        }
        if !(1..=32).contains(&self.crc_bits) {
            return invalid(format!("crc length {} outside 1..=32", self.crc_bits));
        }
        if self.minutiae_count < self.match_threshold() {
            return invalid(format!(
                "{} minutiae cannot reach the match threshold {}",
                self.minutiae_count,
                self.match_threshold()
            ));
        }
        // a trial never yields more candidates than probe minutiae
        subset_budget(self.minutiae_count, self.match_threshold())?;
        let coefficient_bits = self.coefficient_bits()?;
        if coefficient_bits > self.gf_exponent as usize {
            return invalid(format!(
                "coefficients of {coefficient_bits} bits do not fit GF(2^{})",
                self.gf_exponent
            ));
        }
        if self.subset_search.threshold > MAX_EXHAUSTIVE_CANDIDATES {
            return invalid(format!(
                "exhaustive subset threshold {} above {MAX_EXHAUSTIVE_CANDIDATES}",
                self.subset_search.threshold
            ));
        }
        let t = &self.tolerances;
        if [t.x, t.y, t.theta, t.total, t.basis_theta].iter().any(|&v| v < 0) {
            return invalid("tolerances must be non-negative".to_string());
        }
        if self.chaff_retry_limit == 0 {
            return invalid("chaff retry limit must be positive".to_string());
        }
        self.packing.validate(self.gf_exponent)
    }

    /// A new configuration with `step` added to the swept parameters.
    ///
    /// Counts saturate at zero rather than wrapping.
    pub fn stepped(&self, step: &ConfigStep) -> VaultConfig {
        let tolerances = MatchTolerances {
            x: self.tolerances.x.saturating_add(step.x_tolerance).max(0),
            y: self.tolerances.y.saturating_add(step.y_tolerance).max(0),
            theta: self.tolerances.theta.saturating_add(step.theta_tolerance).max(0),
            total: self.tolerances.total.saturating_add(step.total_tolerance).max(0),
            basis_theta: self
                .tolerances
                .basis_theta
                .saturating_add(step.basis_theta_tolerance)
                .max(0),
        };
        VaultConfig {
            poly_degree: self.poly_degree.saturating_add_signed(step.poly_degree),
            minutiae_count: self.minutiae_count.saturating_add_signed(step.minutiae_count),
            chaff_count: self.chaff_count.saturating_add_signed(step.chaff_count),
            points_distance: self.points_distance.saturating_add_signed(step.points_distance),
            tolerances,
            ..self.clone()
        }
    }
}

/// Per-run deltas of a parameter sweep.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigStep {
    pub poly_degree: isize,
    pub minutiae_count: isize,
    pub chaff_count: isize,
    pub points_distance: i32,
    pub x_tolerance: i32,
    pub y_tolerance: i32,
    pub theta_tolerance: i32,
    pub total_tolerance: i32,
    pub basis_theta_tolerance: i32,
}
