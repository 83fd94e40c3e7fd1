use clap::Parser;
use dupelink::cli::Cli;
use dupelink::config::{Config, ConfigError, ConfigOverrides};
use dupelink::links::LinkKind;
use dupelink::scanner::HashAlgorithm;
use figment::providers::Serialized;
use figment::Figment;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use crate::ENV_MUTEX;

fn clear_env() {
    for key in [
        "DUPELINK_DEST_DIR",
        "DUPELINK_LINK_KIND",
        "DUPELINK_ALGORITHM",
        "DUPELINK_CHUNK_SIZE",
        "DUPELINK_OVERWRITE",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_config_load_defaults() {
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.dest_dir, PathBuf::from("Duplicate_Shortcuts"));
    assert_eq!(config.algorithm, HashAlgorithm::Sha256);
}

#[test]
fn test_config_load_from_toml() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let dir = tempdir().unwrap();
    let path = dir.path().join("dupelink.toml");
    fs::write(
        &path,
        r#"
dest_dir = "/srv/dupes"
link_kind = "reference"
algorithm = "blake3"
chunk_size = 65536
skip_empty = true
"#,
    )
    .unwrap();

    let config = Config::load(Some(path.as_path()), &ConfigOverrides::default()).unwrap();

    assert_eq!(config.dest_dir, PathBuf::from("/srv/dupes"));
    assert_eq!(config.link_kind, LinkKind::Reference);
    assert_eq!(config.algorithm, HashAlgorithm::Blake3);
    assert_eq!(config.chunk_size, 65536);
    assert!(config.skip_empty);
    assert!(!config.follow_symlinks);
}

#[test]
fn test_env_overrides_file_and_cli_overrides_env() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let dir = tempdir().unwrap();
    let path = dir.path().join("dupelink.toml");
    fs::write(&path, "algorithm = \"blake3\"\ndest_dir = \"from-file\"\n").unwrap();

    std::env::set_var("DUPELINK_ALGORITHM", "sha256");
    std::env::set_var("DUPELINK_DEST_DIR", "from-env");

    let config = Config::load(Some(path.as_path()), &ConfigOverrides::default()).unwrap();
    assert_eq!(config.algorithm, HashAlgorithm::Sha256);
    assert_eq!(config.dest_dir, PathBuf::from("from-env"));

    let cli = Cli::try_parse_from(["dupelink", "--dest", "from-cli"]).unwrap();
    let config = Config::load(Some(path.as_path()), &cli.overrides()).unwrap();
    assert_eq!(config.dest_dir, PathBuf::from("from-cli"));
    assert_eq!(config.algorithm, HashAlgorithm::Sha256);

    clear_env();
}

#[test]
fn test_cli_switch_does_not_reset_file_setting() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let dir = tempdir().unwrap();
    let path = dir.path().join("dupelink.toml");
    fs::write(&path, "overwrite = true\n").unwrap();

    let cli = Cli::try_parse_from(["dupelink"]).unwrap();
    let config = Config::load(Some(path.as_path()), &cli.overrides()).unwrap();

    assert!(config.overwrite);
}

#[test]
fn test_invalid_chunk_size_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let overrides = ConfigOverrides {
        chunk_size: Some(0),
        ..Default::default()
    };
    assert!(matches!(
        Config::load(None, &overrides),
        Err(ConfigError::ChunkSize(0))
    ));

    std::env::set_var("DUPELINK_CHUNK_SIZE", "1000000");
    assert!(matches!(
        Config::load(None, &ConfigOverrides::default()),
        Err(ConfigError::ChunkSize(1_000_000))
    ));
    clear_env();
}

#[test]
fn test_malformed_value_is_an_error() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let dir = tempdir().unwrap();
    let path = dir.path().join("dupelink.toml");
    fs::write(&path, "link_kind = \"hardlink\"\n").unwrap();

    assert!(matches!(
        Config::load(Some(path.as_path()), &ConfigOverrides::default()),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let result = Config::load(Some(missing.as_path()), &ConfigOverrides::default());
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}
