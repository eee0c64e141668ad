//! Matching experiments over named minutiae templates.
//!
//! [`run_single`] locks a fresh random secret with a gallery template and tries one
//! probe. [`run_against_probes`] enrolls once and tries many probes against the same
//! vault. Each attempt yields an [`ExperimentRecord`].

use std::fmt;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::codec::generate_secret;
use crate::config::VaultConfig;
use crate::enrollment::{EnrollmentMetrics, enroll};
use crate::errors::{Side, VaultError};
use crate::minutia::Minutia;
use crate::vault::Vault;
use crate::verifier::{LockReason, UnlockMetrics, VaultVerifier};

/// A named minutiae set, sorted by quality (descending).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub minutiae: Vec<Minutia>,
}

impl Template {
    pub fn new(name: impl Into<String>, minutiae: Vec<Minutia>) -> Self {
        Self {
            name: name.into(),
            minutiae,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Match,
    NoMatch,
    InvalidGallery,
    InvalidProbe,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchOutcome::Match => "match",
            MatchOutcome::NoMatch => "no match",
            MatchOutcome::InvalidGallery => "invalid gallery",
            MatchOutcome::InvalidProbe => "invalid probe",
        })
    }
}

/// Result of one gallery/probe attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    pub gallery: String,
    pub probe: String,
    pub outcome: MatchOutcome,
    /// Absent when the gallery was rejected.
    pub enrollment: Option<EnrollmentMetrics>,
    pub index_time: Duration,
    /// Absent when no unlock was attempted.
    pub unlock: Option<UnlockMetrics>,
}

pub fn run_single<R: Rng + ?Sized>(
    rng: &mut R,
    config: &VaultConfig,
    gallery: &Template,
    probe: &Template,
) -> Result<ExperimentRecord, VaultError> {
    Ok(run_against_probes(rng, config, gallery, std::slice::from_ref(probe))?
        .into_iter()
        .next()
        .unwrap_or_else(|| invalid_gallery(gallery, probe)))
}

/// Enrolls `gallery` once and verifies every probe against the same vault.
///
/// A gallery with too few minutiae yields an `InvalidGallery` record per probe.
pub fn run_against_probes<R: Rng + ?Sized>(
    rng: &mut R,
    config: &VaultConfig,
    gallery: &Template,
    probes: &[Template],
) -> Result<Vec<ExperimentRecord>, VaultError> {
    let secret = generate_secret(rng, config.secret_bits()?);
    let enrollment = match enroll(rng, &gallery.minutiae, &secret, config) {
        Ok(enrollment) => enrollment,
        Err(VaultError::InsufficientMinutiae {
            side: Side::Gallery,
            found,
            required,
        }) => {
            info!(gallery = %gallery.name, found, required, "gallery rejected");
            return Ok(probes.iter().map(|p| invalid_gallery(gallery, p)).collect());
        }
        Err(e) => return Err(e),
    };

    let index_start = Instant::now();
    let mut vault: Vault = enrollment.vault;
    vault.build_index(config)?;
    let index_time = index_start.elapsed();
    let verifier = VaultVerifier::new(&vault, config)?;

    probes
        .iter()
        .map(|probe| {
            let report = verifier.unlock(rng, &probe.minutiae)?;
            let outcome = match (report.secret(), report.lock_reason()) {
                (Some(recovered), _) if recovered == secret.as_slice() => MatchOutcome::Match,
                (_, Some(LockReason::InsufficientMinutiae { .. })) => MatchOutcome::InvalidProbe,
                _ => MatchOutcome::NoMatch,
            };
            info!(gallery = %gallery.name, probe = %probe.name, %outcome, "experiment finished");
            Ok(ExperimentRecord {
                gallery: gallery.name.clone(),
                probe: probe.name.clone(),
                outcome,
                enrollment: Some(enrollment.metrics.clone()),
                index_time,
                unlock: Some(report.metrics),
            })
        })
        .collect()
}

fn invalid_gallery(gallery: &Template, probe: &Template) -> ExperimentRecord {
    ExperimentRecord {
        gallery: gallery.name.clone(),
        probe: probe.name.clone(),
        outcome: MatchOutcome::InvalidGallery,
        enrollment: None,
        index_time: Duration::ZERO,
        unlock: None,
    }
}
