//! Chaff points and decoy values.
//!
//! Chaff points are random sensor minutiae kept apart from every genuine and
//! previously accepted chaff point, with a packed value no smaller than half the
//! smallest genuine one. Decoy values have the same decimal magnitude as genuine
//! polynomial values but never lie on the polynomial. Both samplers give up after a
//! bounded number of rejections.

use rand::Rng;

use crate::codec::SecretPolynomial;
use crate::config::VaultConfig;
use crate::constants::{FALLBACK_DECOY_DIGITS, QUALITY_MAX, SENSOR_X_MAX, SENSOR_Y_MAX, THETA_RANGE};
use crate::errors::VaultError;
use crate::minutia::{CoordinateConvention, Minutia};

/// Generates `amount` chaff minutiae.
///
/// `smallest_genuine_rep` is the smallest packed genuine minutia. Every accepted
/// chaff point is farther than `config.points_distance` from all of `genuine` and
/// from the chaff points accepted before it.
pub fn generate_chaff<R: Rng + ?Sized>(
    rng: &mut R,
    amount: usize,
    genuine: &[Minutia],
    smallest_genuine_rep: u64,
    config: &VaultConfig,
) -> Result<Vec<Minutia>, VaultError> {
    let mut occupied: Vec<Minutia> = genuine.to_vec();
    let mut chaff = Vec::with_capacity(amount);
    let floor = smallest_genuine_rep / 2;

    for _ in 0..amount {
        let point = sample_until(config.chaff_retry_limit, "chaff point", || {
            let candidate = Minutia::new(
                rng.random_range(0..SENSOR_X_MAX),
                rng.random_range(0..SENSOR_Y_MAX),
                rng.random_range(0..THETA_RANGE),
                rng.random_range(0..QUALITY_MAX),
            );
            let rep = config.packing.pack(&candidate, &CoordinateConvention::SENSOR)?;
            let isolated = occupied
                .iter()
                .all(|m| candidate.distance_to(m) > config.points_distance);
            Ok((rep >= floor && isolated).then_some(candidate))
        })?;
        occupied.push(point);
        chaff.push(point);
    }
    Ok(chaff)
}

/// Draws a decoy value for every chaff representation in `chaff_reps`.
///
/// Values are uniform over the integers whose decimal length lies between the
/// shortest and longest of `genuine_values`, capped below the field order. A value
/// is redrawn when it is zero or equals the polynomial at its chaff point.
pub fn decoy_values<R: Rng + ?Sized>(
    rng: &mut R,
    chaff_reps: &[u64],
    genuine_values: &[u64],
    poly: &SecretPolynomial,
    field_order: u64,
    retry_limit: u32,
) -> Result<Vec<u64>, VaultError> {
    let (min_digits, max_digits) = genuine_values
        .iter()
        .map(|&y| decimal_digits(y))
        .fold(None, |acc: Option<(u32, u32)>, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        })
        .unwrap_or(FALLBACK_DECOY_DIGITS);

    let low = 10u64.pow(min_digits - 1);
    let high = 10u64
        .checked_pow(max_digits)
        .map_or(u64::MAX, |p| p - 1)
        .min(field_order - 1);
    if low > high {
        return Err(VaultError::InfeasibleConfiguration {
            what: "decoy value",
            attempts: 0,
        });
    }

    chaff_reps
        .iter()
        .map(|&x| {
            let on_poly = poly.evaluate(x)?;
            sample_until(retry_limit, "decoy value", || {
                let y = rng.random_range(low..=high);
                Ok((y != 0 && y != on_poly).then_some(y))
            })
        })
        .collect()
}

fn decimal_digits(value: u64) -> u32 {
    value.checked_ilog10().map_or(1, |d| d + 1)
}

fn sample_until<T>(
    limit: u32,
    what: &'static str,
    mut draw: impl FnMut() -> Result<Option<T>, VaultError>,
) -> Result<T, VaultError> {
    for _ in 0..limit {
        if let Some(value) = draw()? {
            return Ok(value);
        }
    }
    Err(VaultError::InfeasibleConfiguration {
        what,
        attempts: limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use galois::BinaryField;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn genuine() -> Vec<Minutia> {
        (0..10)
            .map(|i| Minutia::new(40 + 45 * i, 60 + 40 * i, (i * 33) % 360, 90))
            .collect()
    }

    #[test]
    fn test_chaff_respects_distance_and_floor() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = VaultConfig::default();
        let genuine = genuine();
        let floor = 1 << 28;
        let chaff = generate_chaff(&mut rng, 150, &genuine, floor, &config).unwrap();
        assert_eq!(chaff.len(), 150);
        for (i, c) in chaff.iter().enumerate() {
            assert!(CoordinateConvention::SENSOR.check(c).is_ok());
            let rep = config.packing.pack(c, &CoordinateConvention::SENSOR).unwrap();
            assert!(rep >= floor / 2);
            for g in &genuine {
                assert!(c.distance_to(g) > config.points_distance);
            }
            for other in &chaff[..i] {
                assert!(c.distance_to(other) > config.points_distance);
            }
        }
    }

    #[test]
    fn test_chaff_gives_up_when_space_is_exhausted() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = VaultConfig {
            points_distance: 800,
            chaff_retry_limit: 50,
            ..VaultConfig::default()
        };
        let err = generate_chaff(&mut rng, 2, &genuine(), 0, &config).unwrap_err();
        assert!(matches!(
            err,
            VaultError::InfeasibleConfiguration { what: "chaff point", attempts: 50 }
        ));
    }

    #[test]
    fn test_decoys_share_magnitude_and_miss_polynomial() {
        let mut rng = StdRng::seed_from_u64(9);
        let field = BinaryField::new(32).unwrap();
        let poly = SecretPolynomial::encode(b"SECRET...", 12, 32, field).unwrap();
        let genuine_values = [1_234_567_890u64, 987_654_321];
        let chaff_reps: Vec<u64> = (1..200).map(|i| i * 4099).collect();
        let decoys =
            decoy_values(&mut rng, &chaff_reps, &genuine_values, &poly, field.order(), 1000).unwrap();
        assert_eq!(decoys.len(), chaff_reps.len());
        for (&x, &y) in chaff_reps.iter().zip(&decoys) {
            assert!((100_000_000..1u64 << 32).contains(&y));
            assert_ne!(y, poly.evaluate(x).unwrap());
        }
    }

    #[test]
    fn test_decoys_in_small_field() {
        let mut rng = StdRng::seed_from_u64(11);
        let field = BinaryField::new(8).unwrap();
        // 8 bit secret + 8 bit crc, 2 coefficients of 8 bits
        let poly = SecretPolynomial::encode(&[0x5A], 1, 8, field).unwrap();
        let decoys = decoy_values(&mut rng, &[1, 2, 3, 4], &[7, 200], &poly, field.order(), 1000).unwrap();
        for (x, y) in [1u64, 2, 3, 4].into_iter().zip(decoys) {
            assert!((1..256).contains(&y));
            assert_ne!(y, poly.evaluate(x).unwrap());
        }
    }

    #[test]
    fn test_decimal_digits() {
        assert_eq!(decimal_digits(0), 1);
        assert_eq!(decimal_digits(9), 1);
        assert_eq!(decimal_digits(10), 2);
        assert_eq!(decimal_digits(4_294_967_295), 10);
    }
}
