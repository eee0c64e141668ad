//! Search for a candidate subset whose interpolation passes the CRC check.
//!
//! Candidate sets are contaminated with chaff, so most `(degree + 1)`-subsets fail.
//! Small sets are searched exhaustively in shuffled order. Large sets (or any set,
//! when randomized mode is on) are sampled at random up to `C(n, degree + 1)` times.
//! Random sampling does not remember subsets it already tried.

use galois::BinaryField;
use num_bigint::BigUint;
use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec::{interpolate, validate};
use crate::config::SubsetSearchConfig;
use crate::constants::MAX_EXHAUSTIVE_CANDIDATES;
use crate::errors::VaultError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// Every subset enumerated up front, then shuffled.
    Exhaustive,
    /// Independent random samples.
    Randomized,
}

/// What a single subset search did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsetSearchMetrics {
    pub mode: SearchMode,
    pub candidates: usize,
    /// `C(candidates, degree + 1)`: subsets enumerated, or the sampling budget.
    pub total_subsets: u64,
    pub evaluated_subsets: u64,
}

/// A validated subset and the secret it encodes.
#[derive(Clone, PartialEq, Eq)]
pub struct RecoveredSecret {
    pub secret: Vec<u8>,
    /// The `(x_rep, y_rep)` points that interpolated to the secret polynomial.
    pub points: Vec<(u64, u64)>,
}

impl core::fmt::Debug for RecoveredSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecoveredSecret")
            .field("secret_len", &self.secret.len())
            .field("points", &self.points)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SubsetSearchResult {
    pub recovered: Option<RecoveredSecret>,
    pub metrics: SubsetSearchMetrics,
}

/// Parameters of the subset search for one vault.
#[derive(Debug, Copy, Clone)]
pub struct SubsetSearch {
    pub field: BinaryField,
    pub degree: usize,
    pub crc_bits: usize,
    pub secret_bits: usize,
    pub config: SubsetSearchConfig,
}

impl SubsetSearch {
    fn subset_size(&self) -> usize {
        self.degree + 1
    }

    /// Mode used for `n` distinct candidates.
    pub fn mode_for(&self, n: usize) -> SearchMode {
        if !self.config.randomized
            && n <= self.config.threshold
            && n <= MAX_EXHAUSTIVE_CANDIDATES
        {
            SearchMode::Exhaustive
        } else {
            SearchMode::Randomized
        }
    }

    /// Looks for a `(degree + 1)`-subset of `candidates` that validates.
    ///
    /// Candidates sharing an x value are collapsed onto the first occurrence.
    pub fn run<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        candidates: &[(u64, u64)],
    ) -> Result<SubsetSearchResult, VaultError> {
        let mut distinct: Vec<(u64, u64)> = Vec::with_capacity(candidates.len());
        for &(x, y) in candidates {
            if !distinct.iter().any(|&(seen, _)| seen == x) {
                distinct.push((x, y));
            }
        }
        let n = distinct.len();
        let k = self.subset_size();
        let mode = self.mode_for(n);
        let total_subsets = subset_budget(n, k)?;
        debug!(candidates = n, subset_size = k, total_subsets, ?mode, "subset search");

        let mut metrics = SubsetSearchMetrics {
            mode,
            candidates: n,
            total_subsets,
            evaluated_subsets: 0,
        };
        let mut subset = Vec::with_capacity(k);

        let recovered = match mode {
            SearchMode::Exhaustive => {
                let mut masks = combinations(n, k);
                masks.shuffle(rng);
                let mut found = None;
                for mask in masks {
                    subset.clear();
                    subset.extend((0..n).filter(|&i| (mask >> i) & 1 == 1).map(|i| distinct[i]));
                    metrics.evaluated_subsets += 1;
                    if let Some(secret) = self.try_subset(&subset)? {
                        found = Some(secret);
                        break;
                    }
                }
                found
            }
            SearchMode::Randomized => {
                let mut found = None;
                for _ in 0..total_subsets {
                    subset.clear();
                    subset.extend(index::sample(rng, n, k).into_iter().map(|i| distinct[i]));
                    metrics.evaluated_subsets += 1;
                    if let Some(secret) = self.try_subset(&subset)? {
                        found = Some(secret);
                        break;
                    }
                }
                found
            }
        };

        let recovered = recovered.map(|secret| RecoveredSecret {
            secret,
            points: subset,
        });
        debug!(
            evaluated = metrics.evaluated_subsets,
            found = recovered.is_some(),
            "subset search finished"
        );
        Ok(SubsetSearchResult { recovered, metrics })
    }

    fn try_subset(&self, subset: &[(u64, u64)]) -> Result<Option<Vec<u8>>, VaultError> {
        let coefficients = interpolate(subset, &self.field)?;
        Ok(validate(
            &coefficients,
            self.degree,
            self.crc_bits,
            self.secret_bits,
        ))
    }
}

/// `C(n, k)`, zero when `k` is zero or larger than `n`.
///
/// Fails when the binomial coefficient does not fit in 64 bits.
pub fn subset_budget(n: usize, k: usize) -> Result<u64, VaultError> {
    if k == 0 || k > n {
        return Ok(0);
    }
    let k_small = k.min(n - k);
    let mut acc = BigUint::from(1u32);
    for i in 0..k_small {
        acc = acc * BigUint::from(n - i) / BigUint::from(i + 1);
    }
    u64::try_from(&acc).map_err(|_| {
        warn!(candidates = n, subset_size = k, "subset budget overflows");
        VaultError::SubsetBudgetOverflow {
            candidates: n,
            subset_size: k,
        }
    })
}

/// All `k`-subsets of `0..n` as bitmasks, in lexicographic order of the masks.
fn combinations(n: usize, k: usize) -> Vec<u64> {
    debug_assert!(n <= 64);
    if k == 0 || k > n {
        return Vec::new();
    }
    let first = low_mask(k);
    let last = first << (n - k);
    let mut out = Vec::new();
    let mut v = first;
    loop {
        out.push(v);
        if v == last {
            break;
        }
        // Gosper's hack: next larger integer with the same popcount
        let c = v & v.wrapping_neg();
        let r = v + c;
        v = (((r ^ v) >> 2) / c) | r;
    }
    out
}

fn low_mask(bits: usize) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::SecretPolynomial;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn search(randomized: bool) -> SubsetSearch {
        SubsetSearch {
            field: BinaryField::new(32).unwrap(),
            degree: 4,
            crc_bits: 32,
            secret_bits: 48,
            config: SubsetSearchConfig {
                threshold: 25,
                randomized,
            },
        }
    }

    fn contaminated(rng: &mut StdRng, genuine: usize, chaff: usize) -> (Vec<u8>, Vec<(u64, u64)>) {
        let s = search(false);
        // 48 + 32 = 80 bits = 5 coefficients of 16 bits
        let secret = b"vault!".to_vec();
        let poly = SecretPolynomial::encode(&secret, s.degree, s.crc_bits, s.field).unwrap();
        let mut points = Vec::new();
        for i in 0..genuine as u64 {
            let x = 1000 + i * 37;
            points.push((x, poly.evaluate(x).unwrap()));
        }
        for i in 0..chaff as u64 {
            let x = 50_000 + i * 91;
            points.push((x, rng.random_range(1..1u64 << 32)));
        }
        points.shuffle(rng);
        (secret, points)
    }

    #[test]
    fn test_subset_budget() {
        assert_eq!(subset_budget(25, 9).unwrap(), 2_042_975);
        assert_eq!(subset_budget(9, 9).unwrap(), 1);
        assert_eq!(subset_budget(8, 9).unwrap(), 0);
        assert_eq!(subset_budget(330, 0).unwrap(), 0);
        assert!(matches!(
            subset_budget(330, 100),
            Err(VaultError::SubsetBudgetOverflow { candidates: 330, subset_size: 100 })
        ));
    }

    #[test]
    fn test_combinations() {
        let all = combinations(5, 2);
        assert_eq!(all.len(), 10);
        assert!(all.iter().all(|m| m.count_ones() == 2 && *m < 32));
        let mut sorted = all.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), 10);
        assert_eq!(combinations(64, 64), vec![u64::MAX]);
        assert_eq!(combinations(64, 1).len(), 64);
        assert!(combinations(3, 4).is_empty());
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(search(false).mode_for(25), SearchMode::Exhaustive);
        assert_eq!(search(false).mode_for(26), SearchMode::Randomized);
        assert_eq!(search(true).mode_for(5), SearchMode::Randomized);
    }

    #[test]
    fn test_exhaustive_finds_genuine_subset() {
        let mut rng = StdRng::seed_from_u64(42);
        let (secret, points) = contaminated(&mut rng, 5, 10);
        let result = search(false).run(&mut rng, &points).unwrap();
        assert_eq!(result.metrics.mode, SearchMode::Exhaustive);
        assert_eq!(result.metrics.total_subsets, 3003);
        let recovered = result.recovered.expect("genuine subset present");
        assert_eq!(recovered.secret, secret);
        assert_eq!(recovered.points.len(), 5);
        assert!(result.metrics.evaluated_subsets <= 3003);
    }

    #[test]
    fn test_randomized_finds_genuine_subset() {
        let mut rng = StdRng::seed_from_u64(7);
        let (secret, points) = contaminated(&mut rng, 8, 2);
        let result = search(true).run(&mut rng, &points).unwrap();
        assert_eq!(result.metrics.mode, SearchMode::Randomized);
        assert_eq!(result.recovered.map(|r| r.secret), Some(secret));
    }

    #[test]
    fn test_exhausted_without_genuine_subset() {
        let mut rng = StdRng::seed_from_u64(3);
        let (_, points) = contaminated(&mut rng, 4, 6);
        let result = search(false).run(&mut rng, &points).unwrap();
        assert!(result.recovered.is_none());
        assert_eq!(result.metrics.evaluated_subsets, 252);
    }

    #[test]
    fn test_too_few_candidates() {
        let mut rng = StdRng::seed_from_u64(1);
        let (_, points) = contaminated(&mut rng, 4, 0);
        let result = search(true).run(&mut rng, &points).unwrap();
        assert!(result.recovered.is_none());
        assert_eq!(result.metrics.total_subsets, 0);
        assert_eq!(result.metrics.evaluated_subsets, 0);
    }

    #[test]
    fn test_duplicate_abscissae_collapse() {
        let mut rng = StdRng::seed_from_u64(5);
        let (secret, mut points) = contaminated(&mut rng, 5, 0);
        let first = points[0];
        points.push((first.0, first.1 ^ 1));
        let result = search(false).run(&mut rng, &points).unwrap();
        assert_eq!(result.metrics.candidates, 5);
        assert_eq!(result.recovered.map(|r| r.secret), Some(secret));
    }
}
