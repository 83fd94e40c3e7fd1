use clap::Parser;
use dupelink::cli::Cli;
use dupelink::config::Config;
use dupelink::error::ExitCode;
use dupelink::links::LinkKind;
use dupelink::output::{ArtifactStatus, JsonReport};
use dupelink::scan_and_link;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

use crate::ENV_MUTEX;

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

fn reference_config(dest: &Path) -> Config {
    Config {
        dest_dir: dest.to_path_buf(),
        link_kind: LinkKind::Reference,
        ..Config::default()
    }
}

#[test]
fn test_duplicates_linked_exit_success() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_file(&root.path().join("a.txt"), b"twin");
    write_file(&root.path().join("b.txt"), b"twin");
    write_file(&root.path().join("c.txt"), b"single");

    let dest = out.path().join("links");
    let outcome = scan_and_link(root.path(), &reference_config(&dest), false, None).unwrap();

    assert_eq!(outcome.exit_code, ExitCode::Success);
    assert_eq!(outcome.groups.len(), 1);
    assert_eq!(outcome.created_count(), 2);
    assert!(dest.join("00001-001-a.txt.ref").is_file());
    assert!(dest.join("00001-002-b.txt.ref").is_file());
}

#[test]
fn test_no_duplicates_exit_code_and_no_destination() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_file(&root.path().join("a.txt"), b"one");
    write_file(&root.path().join("b.txt"), b"two");

    let dest = out.path().join("links");
    let outcome = scan_and_link(root.path(), &reference_config(&dest), false, None).unwrap();

    assert_eq!(outcome.exit_code, ExitCode::NoDuplicates);
    assert!(outcome.artifacts.is_empty());
    assert!(!dest.exists());
}

#[test]
fn test_dry_run_creates_nothing() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_file(&root.path().join("a.txt"), b"twin");
    write_file(&root.path().join("b.txt"), b"twin");

    let dest = out.path().join("links");
    let outcome = scan_and_link(root.path(), &reference_config(&dest), true, None).unwrap();

    assert_eq!(outcome.exit_code, ExitCode::Success);
    assert_eq!(outcome.artifacts.len(), 2);
    assert!(outcome
        .artifacts
        .iter()
        .all(|a| a.status == ArtifactStatus::Planned));
    assert!(!dest.exists());
}

#[test]
fn test_destination_inside_root_is_not_scanned() {
    let root = tempdir().unwrap();
    write_file(&root.path().join("a.txt"), b"twin");
    write_file(&root.path().join("b.txt"), b"twin");
    let dest = root.path().join("Duplicate_Shortcuts");

    let first = scan_and_link(root.path(), &reference_config(&dest), false, None).unwrap();
    assert_eq!(first.summary.total_files, 2);

    // The .ref files written by the first run are identical too, but must be ignored.
    let config = Config {
        overwrite: true,
        ..reference_config(&dest)
    };
    let second = scan_and_link(root.path(), &config, false, None).unwrap();

    assert_eq!(second.summary.total_files, 2);
    assert_eq!(second.groups, first.groups);
    assert_eq!(second.exit_code, ExitCode::Success);
}

#[test]
fn test_collisions_give_partial_success() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_file(&root.path().join("a.txt"), b"twin");
    write_file(&root.path().join("b.txt"), b"twin");
    let config = reference_config(out.path());

    scan_and_link(root.path(), &config, false, None).unwrap();
    let rerun = scan_and_link(root.path(), &config, false, None).unwrap();

    assert_eq!(rerun.exit_code, ExitCode::PartialSuccess);
    assert_eq!(rerun.failed_count(), 2);
}

#[test]
fn test_unusable_destination_still_reports_groups() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_file(&root.path().join("a.txt"), b"twin");
    write_file(&root.path().join("b.txt"), b"twin");
    let blocker = out.path().join("blocker");
    write_file(&blocker, b"a file, not a directory");

    let outcome = scan_and_link(root.path(), &reference_config(&blocker), false, None).unwrap();

    assert_eq!(outcome.exit_code, ExitCode::PartialSuccess);
    assert_eq!(outcome.groups.len(), 1);
    assert!(outcome.destination_error.is_some());
    assert!(outcome
        .artifacts
        .iter()
        .all(|a| a.status == ArtifactStatus::Skipped));

    let report = JsonReport::new(&outcome);
    assert_eq!(report.summary.exit_code, 3);
    assert_eq!(report.summary.artifacts_failed, 2);
}

#[test]
fn test_run_app_end_to_end() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_file(&root.path().join("x/data.bin"), &[1u8; 5000]);
    write_file(&root.path().join("y/data.bin"), &[1u8; 5000]);
    let dest = out.path().join("links");

    let args: Vec<OsString> = vec![
        "dupelink".into(),
        root.path().into(),
        "--dest".into(),
        dest.as_path().into(),
        "--link-kind".into(),
        "reference".into(),
        "--algorithm".into(),
        "blake3".into(),
        "--chunk-size".into(),
        "1KiB".into(),
        "--quiet".into(),
        "--output".into(),
        "json".into(),
    ];
    let cli = Cli::try_parse_from(args).unwrap();

    let code = dupelink::run_app(cli).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(dest.join("00001-001-data.bin.ref").is_file());
    assert!(dest.join("00001-002-data.bin.ref").is_file());
}

#[test]
fn test_run_app_rejects_invalid_path() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let root = tempdir().unwrap();
    let missing = root.path().join("missing");

    let args: Vec<OsString> = vec!["dupelink".into(), missing.as_path().into(), "--quiet".into()];
    let cli = Cli::try_parse_from(args).unwrap();

    let err = dupelink::run_app(cli).unwrap_err();
    assert!(format!("{err:#}").contains("not found"));
}
