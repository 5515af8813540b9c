use super::*;
use std::path::Path;

fn parse(text: &str) -> Result<PhidbConfig, ConfigError> {
    PhidbConfig::from_toml(text, Path::new("phidb.toml"))
}

#[test]
fn empty_file_yields_defaults() {
    let config = parse("").expect("empty config should parse");

    assert_eq!(config, PhidbConfig::default());
    assert_eq!(config.engine.max_groups, DEFAULT_MAX_GROUPS);
    assert_eq!(config.output.dir, Path::new("outputs"));
    assert!(!config.output.stdout);
}

#[test]
fn sections_override_only_the_keys_they_name() {
    let config = parse("[engine]\nmax_groups = 25\n\n[output]\nstdout = true\n")
        .expect("config should parse");

    assert_eq!(config.engine.max_groups, 25);
    assert!(config.output.stdout);
    assert_eq!(config.output.dir, Path::new(DEFAULT_OUTPUT_DIR));
    assert_eq!(config.engine_config().max_groups(), 25);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = parse("[engine]\nmax_group = 5\n").expect_err("typo should be rejected");

    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn wrongly_typed_values_are_rejected() {
    let err = parse("[output]\nstdout = \"yes\"\n").expect_err("string bool should be rejected");

    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn zero_group_limit_is_rejected() {
    let err = parse("[engine]\nmax_groups = 0\n").expect_err("zero limit should be rejected");

    assert!(matches!(err, ConfigError::ZeroMaxGroups));
}

#[test]
fn explicit_missing_file_is_an_error() {
    let path = Path::new("definitely/not/here/phidb.toml");

    let err = PhidbConfig::load_or_default(Some(path)).expect_err("missing file should fail");

    assert!(matches!(err, ConfigError::NotFound { path: p } if p == path));
}

#[test]
fn missing_default_file_falls_back_to_defaults() {
    // Tests run from the crate directory, which carries no phidb.toml.
    let config = PhidbConfig::load_or_default(None).expect("defaults should load");

    assert_eq!(config, PhidbConfig::default());
}

#[test]
fn load_reads_a_file_from_disk() {
    let path = std::env::temp_dir().join(format!("phidb-config-{}.toml", std::process::id()));
    fs::write(&path, "[output]\ndir = \"tables\"\n").expect("temp config should be writable");

    let loaded = PhidbConfig::load(&path);
    fs::remove_file(&path).expect("temp config should be removable");

    let config = loaded.expect("config should load");
    assert_eq!(config.output.dir, Path::new("tables"));
}
