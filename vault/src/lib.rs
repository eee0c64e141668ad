//! Fuzzy vault for fingerprint minutiae over GF(2^m).
//!
//! A secret is encoded, together with a CRC, as the coefficients of a polynomial
//! over a binary field. The polynomial is evaluated at packed genuine minutiae and
//! the resulting points are hidden among chaff points with decoy values. Only the
//! point list is stored. A probe fingerprint that lines up with enough genuine
//! points (geometric hashing makes this independent of finger placement) yields a
//! subset that interpolates back to the polynomial, and the CRC confirms it.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use vault::{MatchTolerances, Minutia, VaultConfig, VaultVerifier, enroll, generate_secret};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let config = VaultConfig {
//!     minutiae_count: 12,
//!     chaff_count: 60,
//!     tolerances: MatchTolerances::EXACT,
//!     ..VaultConfig::default()
//! };
//!
//! // a quality-sorted, well separated gallery
//! let gallery: Vec<Minutia> = (0..12)
//!     .map(|i| Minutia::new(40 + 40 * i, 480 - 35 * i, (i * 29) % 360, 90 - i))
//!     .collect();
//!
//! let secret = generate_secret(&mut rng, config.secret_bits().expect("valid config"));
//! let mut vault = enroll(&mut rng, &gallery, &secret, &config).expect("enroll").vault;
//! vault.build_index(&config).expect("index");
//!
//! let verifier = VaultVerifier::new(&vault, &config).expect("verifier");
//! let report = verifier.unlock(&mut rng, &gallery).expect("unlock");
//! assert_eq!(report.secret(), Some(secret.as_slice()));
//! ```

mod chaff;
mod codec;
mod config;
mod constants;
mod enrollment;
mod errors;
mod experiment;
mod geometric;
mod minutia;
mod record;
mod representation;
mod search;
mod vault;
mod verifier;
mod xyt;


pub use chaff::{decoy_values, generate_chaff};
pub use codec::{
    SecretPolynomial, checksum, generate_secret, interpolate, smallest_secret_bits, validate,
};
pub use config::{ConfigStep, MatchTolerances, SubsetSearchConfig, VaultConfig};
pub use constants::*;
pub use enrollment::{Enrollment, EnrollmentMetrics, enroll, select_genuine};
pub use errors::{Side, VaultError};
pub use experiment::{
    ExperimentRecord, MatchOutcome, Template, run_against_probes, run_single,
};
pub use geometric::{
    EnrollmentElement, GeomTableEntry, GeometricIndex, VerificationElement, inverse_transform,
    transform, transform_all,
};
pub use minutia::{CoordinateConvention, Minutia, to_hashing};
pub use record::VaultRecord;
pub use representation::PackingLayout;
pub use search::{
    RecoveredSecret, SearchMode, SubsetSearch, SubsetSearchMetrics, SubsetSearchResult,
    subset_budget,
};
pub use vault::{Vault, VaultBuilder, VaultElement};
pub use verifier::{
    FuzzyMatcher, LockReason, UnlockMetrics, UnlockOutcome, UnlockReport, Unlocked,
    VaultVerifier, exact_compare,
};
pub use xyt::{parse_xyt, read_xyt};
