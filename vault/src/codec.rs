//! Secret polynomial codec.
//!
//! The secret bytes followed by a CRC are read as one big-endian bit string and
//! split into `degree + 1` equal-width slices. Each slice is a coefficient of the
//! secret polynomial, highest degree first. Unlocking interpolates candidate points
//! and accepts the polynomial only if the recomputed CRC matches.

use galois::{BinaryField, Element, Polynomial};
use num_bigint::BigUint;
use rand::Rng;

use crate::errors::VaultError;

/// Smallest secret size in bits that is byte aligned, at least `min_bits` and such
/// that `(size + crc_bits) % (degree + 1) == 0`.
///
/// Returns `None` when no byte-aligned size satisfies the divisibility condition.
pub fn smallest_secret_bits(degree: usize, crc_bits: usize, min_bits: usize) -> Option<usize> {
    let parts = degree + 1;
    let mut size = min_bits.div_ceil(8) * 8;
    // residues of size + crc_bits repeat after at most `parts` steps of 8
    for _ in 0..parts {
        if (size + crc_bits) % parts == 0 {
            return Some(size);
        }
        size += 8;
    }
    None
}

/// Draws a uniformly random secret of `bits / 8` bytes.
pub fn generate_secret<R: Rng + ?Sized>(rng: &mut R, bits: usize) -> Vec<u8> {
    let mut secret = vec![0u8; bits / 8];
    rng.fill(secret.as_mut_slice());
    secret
}

/// CRC-32 of `bytes`, truncated to its low `crc_bits` bits.
pub fn checksum(bytes: &[u8], crc_bits: usize) -> u64 {
    let crc = u64::from(crc32fast::hash(bytes));
    crc & low_mask(crc_bits)
}

fn low_mask(bits: usize) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}

/// The polynomial that hides a secret.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretPolynomial {
    coefficients: Vec<u64>,
    coefficient_bits: usize,
    field: BinaryField,
}

impl SecretPolynomial {
    /// Encodes `secret` with a `crc_bits` checksum into `degree + 1` coefficients.
    pub fn encode(
        secret: &[u8],
        degree: usize,
        crc_bits: usize,
        field: BinaryField,
    ) -> Result<Self, VaultError> {
        let parts = degree + 1;
        let total_bits = secret.len() * 8 + crc_bits;
        if total_bits % parts != 0 {
            return Err(VaultError::InvalidConfig(format!(
                "{total_bits} secret and crc bits do not split into {parts} coefficients"
            )));
        }
        let coefficient_bits = total_bits / parts;
        if coefficient_bits > field.exponent() as usize {
            return Err(VaultError::InvalidConfig(format!(
                "coefficients of {coefficient_bits} bits do not fit {field:?}"
            )));
        }

        let word = (BigUint::from_bytes_be(secret) << crc_bits) | BigUint::from(checksum(secret, crc_bits));
        let mask = BigUint::from(low_mask(coefficient_bits));
        let coefficients = (0..parts)
            .rev()
            .map(|i| {
                let slice = (&word >> (i * coefficient_bits)) & &mask;
                u64::try_from(&slice).map_err(|_| VaultError::InconsistentEncoding)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            coefficients,
            coefficient_bits,
            field,
        })
    }

    /// Coefficients, highest degree first.
    pub fn coefficients(&self) -> &[u64] {
        &self.coefficients
    }

    pub fn coefficient_bits(&self) -> usize {
        self.coefficient_bits
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Evaluates the polynomial at the packed minutia `x`.
    pub fn evaluate(&self, x: u64) -> Result<u64, VaultError> {
        let coefficients = self.field.elements(&self.coefficients)?;
        let x = self.field.element(x)?;
        let y = self.field.to_int(self.field.eval_poly(&coefficients, x))?;
        if y > 2 * self.field.order() {
            return Err(VaultError::InconsistentEncoding);
        }
        Ok(y)
    }

    /// Evaluates the polynomial at every point of `xs`.
    pub fn evaluate_all(&self, xs: &[u64]) -> Result<Vec<u64>, VaultError> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

impl core::fmt::Debug for SecretPolynomial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // coefficients carry the secret
        f.debug_struct("SecretPolynomial")
            .field("degree", &self.degree())
            .field("coefficient_bits", &self.coefficient_bits)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

/// Interpolates the unique polynomial through `points` and returns its coefficients
/// as integers, highest degree first.
pub fn interpolate(points: &[(u64, u64)], field: &BinaryField) -> Result<Vec<u64>, VaultError> {
    let points = points
        .iter()
        .map(|&(x, y)| Ok((field.element(x)?, field.element(y)?)))
        .collect::<Result<Vec<(Element, Element)>, VaultError>>()?;
    let poly = Polynomial::interpolate(&points, field)?;
    Ok(field.to_ints(poly.coefficients())?)
}

/// Checks the CRC embedded in interpolated coefficients.
///
/// Only the last `degree + 1` coefficients are considered. Returns the recovered
/// secret when the checksum matches.
pub fn validate(
    coefficients: &[u64],
    degree: usize,
    crc_bits: usize,
    secret_bits: usize,
) -> Option<Vec<u8>> {
    let parts = degree + 1;
    if coefficients.len() < parts || (secret_bits + crc_bits) % parts != 0 || secret_bits % 8 != 0 {
        return None;
    }
    let coefficient_bits = (secret_bits + crc_bits) / parts;

    let mut word = BigUint::default();
    for &c in &coefficients[coefficients.len() - parts..] {
        if 64 - c.leading_zeros() as usize > coefficient_bits {
            return None;
        }
        word = (word << coefficient_bits) | BigUint::from(c);
    }

    let extracted_crc = u64::try_from(&word & BigUint::from(low_mask(crc_bits))).ok()?;
    let secret_value = word >> crc_bits;
    let mut secret = secret_value.to_bytes_be();
    let len = secret_bits / 8;
    if secret_value.bits() == 0 {
        secret.clear();
    }
    if secret.len() > len {
        return None;
    }
    let mut padded = vec![0u8; len - secret.len()];
    padded.extend_from_slice(&secret);

    (checksum(&padded, crc_bits) == extracted_crc).then_some(padded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_smallest_secret_bits() {
        assert_eq!(smallest_secret_bits(8, 32, 128), Some(184));
        assert_eq!(smallest_secret_bits(12, 32, 0), Some(72));
        assert_eq!(smallest_secret_bits(0, 32, 5), Some(8));
        assert_eq!(smallest_secret_bits(15, 4, 128), None);
    }

    #[test]
    fn test_encode_splits_big_endian() {
        let field = BinaryField::new(32).unwrap();
        // 3 bytes + 8 bit crc = 32 bits = 4 coefficients of 8 bits
        let secret = [0xAB, 0xCD, 0xEF];
        let poly = SecretPolynomial::encode(&secret, 3, 8, field).unwrap();
        let crc = checksum(&secret, 8);
        assert_eq!(poly.coefficients(), &[0xAB, 0xCD, 0xEF, crc]);
        assert_eq!(poly.coefficient_bits(), 8);
        assert_eq!(poly.degree(), 3);
    }

    #[test]
    fn test_encode_rejects_uneven_split() {
        let field = BinaryField::new(32).unwrap();
        assert!(matches!(
            SecretPolynomial::encode(&[1, 2, 3], 4, 32, field),
            Err(VaultError::InvalidConfig(_))
        ));
        // 56 bits in one coefficient do not fit GF(2^32)
        assert!(SecretPolynomial::encode(&[1, 2, 3], 0, 32, field).is_err());
    }

    #[test]
    fn test_checksum_matches_crc32() {
        // standard check value of CRC-32/ISO-HDLC
        assert_eq!(checksum(b"123456789", 32), 0xCBF4_3926);
        assert_eq!(checksum(b"123456789", 8), 0x26);
    }

    #[test]
    fn test_validate_recovers_secret() {
        let field = BinaryField::new(32).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let secret = generate_secret(&mut rng, 184);
        assert_eq!(secret.len(), 23);
        let poly = SecretPolynomial::encode(&secret, 8, 32, field).unwrap();
        assert_eq!(
            validate(poly.coefficients(), 8, 32, 184),
            Some(secret.clone())
        );

        // leading zero bytes survive
        let zeros = vec![0u8; 23];
        let poly = SecretPolynomial::encode(&zeros, 8, 32, field).unwrap();
        assert_eq!(validate(poly.coefficients(), 8, 32, 184), Some(zeros));
    }

    #[test]
    fn test_validate_rejects_tampering() {
        let field = BinaryField::new(32).unwrap();
        let secret = b"SECRET...";
        let poly = SecretPolynomial::encode(secret, 12, 32, field).unwrap();
        let mut coefficients = poly.coefficients().to_vec();
        coefficients[3] ^= 1;
        assert_eq!(validate(&coefficients, 12, 32, 72), None);

        // a coefficient wider than 8 bits fails before the crc is computed
        let mut coefficients = poly.coefficients().to_vec();
        coefficients[0] = 0x100;
        assert_eq!(validate(&coefficients, 12, 32, 72), None);
    }

    #[test]
    fn test_validate_uses_last_coefficients() {
        let field = BinaryField::new(32).unwrap();
        let secret = b"SECRET...";
        let poly = SecretPolynomial::encode(secret, 12, 32, field).unwrap();
        let mut coefficients = vec![0xFFFF];
        coefficients.extend_from_slice(poly.coefficients());
        assert_eq!(
            validate(&coefficients, 12, 32, 72),
            Some(secret.to_vec())
        );
    }

    #[test]
    fn test_evaluate_and_interpolate() {
        let field = BinaryField::new(32).unwrap();
        let secret = b"SECRET...";
        let poly = SecretPolynomial::encode(secret, 12, 32, field).unwrap();
        let xs: Vec<u64> = (1..=13).map(|i| i * 0x1_0001).collect();
        let ys = poly.evaluate_all(&xs).unwrap();
        let points: Vec<_> = xs.into_iter().zip(ys).collect();
        let recovered = interpolate(&points, &field).unwrap();
        assert_eq!(recovered, poly.coefficients());
        assert_eq!(validate(&recovered, 12, 32, 72), Some(secret.to_vec()));
    }

    #[test]
    fn test_evaluate_rejects_wide_input() {
        let field = BinaryField::new(16).unwrap();
        let poly = SecretPolynomial::encode(&[1, 2], 1, 16, field).unwrap();
        assert!(matches!(poly.evaluate(1 << 16), Err(VaultError::Field(_))));
    }
}
