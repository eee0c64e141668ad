use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;
use vault::{
    MatchTolerances, Vault, VaultConfig, VaultRecord, VaultVerifier, enroll, generate_secret,
    parse_xyt,
};

const GALLERY: &str = "\
40 480 0 99
80 445 29 98
120 410 58 97
160 375 87 96
200 340 116 95
240 305 145 94
280 270 174 93
320 235 203 92
360 200 232 91
400 165 261 90
440 130 290 89
480 95 319 88
";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut rng = StdRng::seed_from_u64(42);
    let config = VaultConfig {
        minutiae_count: 12,
        chaff_count: 100,
        tolerances: MatchTolerances::EXACT,
        ..VaultConfig::default()
    };
    let gallery = parse_xyt(GALLERY).expect("parse gallery");

    let secret = generate_secret(&mut rng, config.secret_bits().expect("config"));
    let mut vault = enroll(&mut rng, &gallery, &secret, &config).expect("enroll").vault;
    vault.build_index(&config).expect("index");

    let record = vault.to_record(1, true, &config).expect("record");
    let bytes = record.to_bytes().expect("serialize record");
    let json = record.to_json().expect("serialize record");
    println!("stored {} points: {} bytes bincode, {} bytes json", vault.len(), bytes.len(), json.len());

    let stored = VaultRecord::from_bytes(&bytes).expect("deserialize record");
    let vault = Vault::from_record(&stored, &config).expect("load vault");
    let verifier = VaultVerifier::new(&vault, &config).expect("verifier");

    let report = verifier.unlock(&mut rng, &gallery).expect("unlock");
    assert_eq!(report.secret(), Some(secret.as_slice()));
    println!(
        "unlocked after {} comparisons and {} subset searches",
        report.metrics.iterations, report.metrics.match_tries
    );
}
