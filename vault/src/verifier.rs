//! Unlocking a vault with a probe fingerprint.
//!
//! Every probe minutia is tried as a basis against every gallery basis of similar
//! orientation. For each pairing the gallery frame is matched greedily against the
//! probe frame. When enough vault points match, their pairs go to the subset
//! search, and a validated subset unlocks the vault.
//!
//! Matching is first-fit: each gallery minutia takes the first unconsumed probe
//! minutia within tolerance, so the result depends on iteration order and is not
//! an optimal assignment.

use std::time::{Duration, Instant};

use galois::BinaryField;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{MatchTolerances, VaultConfig};
use crate::errors::VaultError;
use crate::geometric::{EnrollmentElement, GeometricIndex, VerificationElement};
use crate::minutia::{CoordinateConvention, Minutia, to_hashing};
use crate::search::{SubsetSearch, SubsetSearchMetrics};
use crate::vault::Vault;

/// Position and orientation are identical. Quality is ignored.
pub fn exact_compare(a: &Minutia, b: &Minutia) -> bool {
    a.same_position(b)
}

/// Tolerance-based minutiae comparator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FuzzyMatcher {
    tolerances: MatchTolerances,
}

impl FuzzyMatcher {
    pub fn new(tolerances: MatchTolerances) -> Self {
        Self { tolerances }
    }

    /// Every per-axis difference is within its tolerance and their sum is within
    /// the total tolerance. Orientation differences do not wrap around.
    pub fn matches(&self, a: &Minutia, b: &Minutia) -> bool {
        let t = &self.tolerances;
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        let dtheta = (a.theta - b.theta).abs();
        dx <= t.x && dy <= t.y && dtheta <= t.theta && dx + dy + dtheta <= t.total
    }

    /// Whether any minutia of `list` matches `m`.
    pub fn contains(&self, m: &Minutia, list: &[Minutia]) -> bool {
        list.iter().any(|other| self.matches(m, other))
    }

    /// Whether two bases are close enough in orientation to be paired.
    pub fn basis_compatible(&self, a: &Minutia, b: &Minutia) -> bool {
        (a.theta - b.theta).abs() <= self.tolerances.basis_theta
    }
}

/// Why a vault stayed locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockReason {
    /// The probe had fewer minutiae than required. No search was run.
    InsufficientMinutiae { found: usize, required: usize },
    /// Every basis pairing was tried without a validated subset.
    InterpolationExhausted,
    /// The comparison ceiling was hit before the search finished.
    IterationBudgetExceeded,
}

/// A successful unlock.
#[derive(Clone, PartialEq, Eq)]
pub struct Unlocked {
    pub secret: Vec<u8>,
    /// Every candidate pair recorded in the winning trial.
    pub candidates: Vec<(u64, u64)>,
    /// The subset that validated.
    pub points: Vec<(u64, u64)>,
    pub probe_basis: Minutia,
    pub gallery_basis: Minutia,
}

impl core::fmt::Debug for Unlocked {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Unlocked")
            .field("secret_len", &self.secret.len())
            .field("candidates", &self.candidates.len())
            .field("probe_basis", &self.probe_basis)
            .field("gallery_basis", &self.gallery_basis)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockOutcome {
    Unlocked(Unlocked),
    Locked(LockReason),
}

/// Counters and timings of one unlock attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockMetrics {
    /// Fuzzy comparisons performed.
    pub iterations: u64,
    /// Comparisons that matched.
    pub single_matches: u64,
    /// Trials that reached the match threshold and ran a subset search.
    pub match_tries: u64,
    /// Gallery bases dropped because no probe orientation was close.
    pub pruned_bases: usize,
    /// Gallery bases paired with a probe basis.
    pub gallery_bases_visited: u64,
    /// Candidates of the last trial that ran a subset search.
    pub candidates: usize,
    /// Chaff candidates of that trial.
    pub chaff_candidates: usize,
    pub last_search: Option<SubsetSearchMetrics>,
    pub probe_basis: Option<Minutia>,
    pub gallery_basis: Option<Minutia>,
    pub geometric_time: Duration,
    pub interpolation_time: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockReport {
    pub outcome: UnlockOutcome,
    pub metrics: UnlockMetrics,
}

impl UnlockReport {
    pub fn is_unlocked(&self) -> bool {
        matches!(self.outcome, UnlockOutcome::Unlocked(_))
    }

    /// The recovered secret, if the vault was unlocked.
    pub fn secret(&self) -> Option<&[u8]> {
        match &self.outcome {
            UnlockOutcome::Unlocked(u) => Some(&u.secret),
            UnlockOutcome::Locked(_) => None,
        }
    }

    pub fn lock_reason(&self) -> Option<&LockReason> {
        match &self.outcome {
            UnlockOutcome::Locked(reason) => Some(reason),
            UnlockOutcome::Unlocked(_) => None,
        }
    }
}

/// Working state of one basis pairing, created fresh for every trial.
#[derive(Debug, Default)]
struct TrialState {
    candidates: Vec<(u64, u64)>,
    chaff: Vec<u64>,
}

impl TrialState {
    fn record_candidate(&mut self, x_rep: u64, y_rep: u64) -> bool {
        if self.candidates.iter().any(|&(x, _)| x == x_rep) {
            return false;
        }
        self.candidates.push((x_rep, y_rep));
        true
    }

    fn record_chaff(&mut self, x_rep: u64) {
        self.chaff.push(x_rep);
    }
}

enum TrialResult {
    Matched(usize),
    Aborted,
}

/// Verifies probes against one indexed vault.
///
/// The verifier only reads the vault, so one vault can serve any number of
/// verifiers.
#[derive(Debug)]
pub struct VaultVerifier<'a> {
    vault: &'a Vault,
    index: &'a GeometricIndex,
    config: &'a VaultConfig,
    matcher: FuzzyMatcher,
    search: SubsetSearch,
}

impl<'a> VaultVerifier<'a> {
    pub fn new(vault: &'a Vault, config: &'a VaultConfig) -> Result<Self, VaultError> {
        config.validate()?;
        let index = vault.index().ok_or(VaultError::NotIndexed)?;
        let search = SubsetSearch {
            field: BinaryField::new(config.gf_exponent)?,
            degree: config.poly_degree,
            crc_bits: config.crc_bits,
            secret_bits: config.secret_bits()?,
            config: config.subset_search,
        };
        Ok(Self {
            vault,
            index,
            config,
            matcher: FuzzyMatcher::new(config.tolerances),
            search,
        })
    }

    /// Tries to unlock the vault with `probe`.
    ///
    /// `probe` is in the sensor convention, sorted by quality (descending). Only the
    /// first `minutiae_count` minutiae are used, and each of them must lie on the
    /// sensor. A locked vault is a normal outcome; errors are reserved for
    /// out-of-range probe minutiae and inconsistent vault data.
    pub fn unlock<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        probe: &[Minutia],
    ) -> Result<UnlockReport, VaultError> {
        let mut metrics = UnlockMetrics::default();
        let required = self.config.minutiae_count;
        if probe.len() < required {
            info!(found = probe.len(), required, "probe has too few minutiae");
            return Ok(UnlockReport {
                outcome: UnlockOutcome::Locked(LockReason::InsufficientMinutiae {
                    found: probe.len(),
                    required,
                }),
                metrics,
            });
        }

        let probe = &probe[..required];
        for m in probe {
            CoordinateConvention::SENSOR.check(m)?;
        }

        let start = Instant::now();
        let mut probe = to_hashing(probe);
        probe.shuffle(rng);

        let bases: Vec<&EnrollmentElement> = self
            .index
            .elements()
            .iter()
            .filter(|e| probe.iter().any(|p| self.matcher.basis_compatible(&e.basis, p)))
            .collect();
        metrics.pruned_bases = self.index.len() - bases.len();
        debug!(
            bases = bases.len(),
            pruned = metrics.pruned_bases,
            "gallery bases after orientation pruning"
        );

        let threshold = self.config.match_threshold();
        for probe_basis in &probe {
            let verification = VerificationElement::new(*probe_basis, &probe);
            for element in bases
                .iter()
                .filter(|e| self.matcher.basis_compatible(&verification.basis, &e.basis))
            {
                metrics.gallery_bases_visited += 1;
                let mut state = TrialState::default();
                let matched = match self.run_trial(element, &verification, &mut state, &mut metrics) {
                    TrialResult::Matched(n) => n,
                    TrialResult::Aborted => {
                        warn!(
                            iterations = metrics.iterations,
                            ceiling = self.config.max_iterations,
                            "iteration ceiling reached"
                        );
                        metrics.geometric_time = start.elapsed();
                        return Ok(UnlockReport {
                            outcome: UnlockOutcome::Locked(LockReason::IterationBudgetExceeded),
                            metrics,
                        });
                    }
                };
                if matched < threshold {
                    continue;
                }

                metrics.match_tries += 1;
                metrics.candidates = state.candidates.len();
                metrics.chaff_candidates = state.chaff.len();
                metrics.probe_basis = Some(verification.basis);
                metrics.gallery_basis = Some(element.basis);
                debug!(candidates = state.candidates.len(), "match threshold reached");

                let search_start = Instant::now();
                let result = self.search.run(rng, &state.candidates)?;
                metrics.interpolation_time += search_start.elapsed();
                metrics.last_search = Some(result.metrics);

                if let Some(recovered) = result.recovered {
                    metrics.geometric_time = start.elapsed();
                    info!(
                        iterations = metrics.iterations,
                        match_tries = metrics.match_tries,
                        "vault unlocked"
                    );
                    return Ok(UnlockReport {
                        outcome: UnlockOutcome::Unlocked(Unlocked {
                            secret: recovered.secret,
                            candidates: state.candidates,
                            points: recovered.points,
                            probe_basis: verification.basis,
                            gallery_basis: element.basis,
                        }),
                        metrics,
                    });
                }
            }
        }

        metrics.geometric_time = start.elapsed();
        metrics.probe_basis = None;
        metrics.gallery_basis = None;
        info!(
            iterations = metrics.iterations,
            match_tries = metrics.match_tries,
            "vault stayed locked"
        );
        Ok(UnlockReport {
            outcome: UnlockOutcome::Locked(LockReason::InterpolationExhausted),
            metrics,
        })
    }

    /// Matches one gallery frame against one probe frame.
    fn run_trial(
        &self,
        element: &EnrollmentElement,
        verification: &VerificationElement,
        state: &mut TrialState,
        metrics: &mut UnlockMetrics,
    ) -> TrialResult {
        let pairs = self.vault.elements();
        let mut pool: Vec<Minutia> = verification.transformed.clone();
        let mut matched = 0;

        for (i, enrolled) in element.transformed.iter().enumerate() {
            if pool.is_empty() {
                break;
            }
            let mut hit = None;
            for (j, candidate) in pool.iter().enumerate() {
                metrics.iterations += 1;
                if metrics.iterations > self.config.max_iterations {
                    return TrialResult::Aborted;
                }
                if self.matcher.matches(enrolled, candidate) {
                    hit = Some(j);
                    break;
                }
            }
            match hit {
                Some(j) => {
                    pool.remove(j);
                    metrics.single_matches += 1;
                    if state.record_candidate(pairs[i].x_rep, element.values[i]) {
                        matched += 1;
                    }
                }
                None => state.record_chaff(pairs[i].x_rep),
            }
        }
        TrialResult::Matched(matched)
    }
}
