//! Locking a secret with a gallery fingerprint.

use std::time::{Duration, Instant};

use galois::BinaryField;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chaff::{decoy_values, generate_chaff};
use crate::codec::SecretPolynomial;
use crate::config::VaultConfig;
use crate::errors::{Side, VaultError};
use crate::minutia::{CoordinateConvention, Minutia};
use crate::vault::{Vault, VaultBuilder};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentMetrics {
    pub genuine_count: usize,
    pub chaff_count: usize,
    pub secret_bits: usize,
    /// Time spent building and finalizing the vault.
    pub encode_time: Duration,
}

#[derive(Debug, Clone)]
pub struct Enrollment {
    pub vault: Vault,
    pub metrics: EnrollmentMetrics,
}

/// Picks genuine minutiae from a quality-sorted list.
///
/// A minutia is kept only if it is farther than `distance` from every minutia kept
/// before it. Selection stops after `count` minutiae.
pub fn select_genuine(gallery: &[Minutia], count: usize, distance: u32) -> Vec<Minutia> {
    let mut kept: Vec<Minutia> = Vec::with_capacity(count);
    for candidate in gallery {
        if kept.len() == count {
            break;
        }
        if kept.iter().all(|m| candidate.distance_to(m) > distance) {
            kept.push(*candidate);
        }
    }
    kept
}

/// Locks `secret` with the gallery minutiae.
///
/// `gallery` must be in the sensor convention, sorted by quality (descending). The
/// secret must be exactly `config.secret_bits()` long. The returned vault is
/// finalized but not indexed.
pub fn enroll<R: Rng + ?Sized>(
    rng: &mut R,
    gallery: &[Minutia],
    secret: &[u8],
    config: &VaultConfig,
) -> Result<Enrollment, VaultError> {
    config.validate()?;
    let start = Instant::now();

    if gallery.len() < config.minutiae_count {
        return Err(VaultError::InsufficientMinutiae {
            side: Side::Gallery,
            found: gallery.len(),
            required: config.minutiae_count,
        });
    }
    let secret_bits = config.secret_bits()?;
    if secret.len() * 8 != secret_bits {
        return Err(VaultError::InvalidConfig(format!(
            "secret has {} bits, configuration expects {secret_bits}",
            secret.len() * 8
        )));
    }

    let sensor = CoordinateConvention::SENSOR;
    let genuine = select_genuine(gallery, config.minutiae_count, config.points_distance);
    for m in &genuine {
        sensor.check(m)?;
    }
    let genuine_reps = genuine
        .iter()
        .map(|m| config.packing.pack(m, &sensor))
        .collect::<Result<Vec<_>, _>>()?;
    let smallest = genuine_reps.iter().copied().min().unwrap_or(0);

    let field = BinaryField::new(config.gf_exponent)?;
    let poly = SecretPolynomial::encode(secret, config.poly_degree, config.crc_bits, field)?;
    let genuine_values = poly.evaluate_all(&genuine_reps)?;

    let chaff = generate_chaff(rng, config.chaff_count, &genuine, smallest, config)?;
    let chaff_reps = chaff
        .iter()
        .map(|m| config.packing.pack(m, &sensor))
        .collect::<Result<Vec<_>, _>>()?;
    let chaff_values = decoy_values(
        rng,
        &chaff_reps,
        &genuine_values,
        &poly,
        field.order(),
        config.chaff_retry_limit,
    )?;

    let mut builder = VaultBuilder::new();
    for (&x, &y) in genuine_reps.iter().zip(&genuine_values) {
        builder.add_genuine(x, y);
    }
    for (&x, &y) in chaff_reps.iter().zip(&chaff_values) {
        builder.add_chaff(x, y);
    }
    let (genuine_count, chaff_count) = (builder.genuine_len(), builder.chaff_len());
    let vault = builder.finalize(rng);
    let metrics = EnrollmentMetrics {
        genuine_count,
        chaff_count,
        secret_bits,
        encode_time: start.elapsed(),
    };
    info!(
        genuine = metrics.genuine_count,
        chaff = metrics.chaff_count,
        secret_bits,
        "vault enrolled"
    );
    Ok(Enrollment { vault, metrics })
}
