use dupelink::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupelink::progress::ProgressCallback;
use dupelink::scanner::{HashAlgorithm, HashError, ScanError, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::tempdir;

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
    assert!(!summary.has_errors());
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"content a");
    write_file(&dir.path().join("b.txt"), b"content b");
    write_file(&dir.path().join("c.txt"), b"content c");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.hashed_files, 3);
}

#[test]
fn test_scan_one_duplicate_pair() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"duplicate");
    write_file(&dir.path().join("b.txt"), b"duplicate");
    write_file(&dir.path().join("c.txt"), b"unique");

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_space, 9);
}

#[test]
fn test_scan_nested_duplicates() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("top.txt"), b"same bytes");
    write_file(&dir.path().join("one/two/three/deep.txt"), b"same bytes");
    write_file(&dir.path().join("one/other.txt"), b"different");

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    let paths = groups[0].paths();
    assert!(paths.contains(&dir.path().join("top.txt")));
    assert!(paths.contains(&dir.path().join("one/two/three/deep.txt")));
}

#[test]
fn test_groups_in_first_seen_order() {
    let dir = tempdir().unwrap();
    // Sorted walk: a/ then b/ then c.txt
    write_file(&dir.path().join("a/1.txt"), b"first content");
    write_file(&dir.path().join("a/2.txt"), b"second content");
    write_file(&dir.path().join("b/1.txt"), b"second content");
    write_file(&dir.path().join("c.txt"), b"first content");

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(
        groups[0].paths(),
        vec![dir.path().join("a/1.txt"), dir.path().join("c.txt")]
    );
    assert_eq!(
        groups[1].paths(),
        vec![dir.path().join("a/2.txt"), dir.path().join("b/1.txt")]
    );
}

#[test]
fn test_both_algorithms_find_same_groups() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("x.bin"), &[7u8; 10_000]);
    write_file(&dir.path().join("y.bin"), &[7u8; 10_000]);
    write_file(&dir.path().join("z.bin"), &[8u8; 10_000]);

    for algorithm in [HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
        let finder = DuplicateFinder::new(
            FinderConfig::default()
                .with_algorithm(algorithm)
                .with_chunk_size(1000),
        );
        let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

        assert_eq!(groups.len(), 1, "{algorithm}");
        assert_eq!(groups[0].len(), 2, "{algorithm}");
    }
}

#[test]
fn test_empty_files_are_duplicates_by_default() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1.txt")).unwrap();
    File::create(dir.path().join("empty2.txt")).unwrap();

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(groups.len(), 1);

    let finder = DuplicateFinder::new(
        FinderConfig::default().with_walker_config(WalkerConfig::default().with_skip_empty(true)),
    );
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();
    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
}

#[test]
fn test_missing_root_is_not_found() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let err = DuplicateFinder::with_defaults()
        .find_duplicates(&missing)
        .unwrap_err();

    match err {
        FinderError::InvalidDirectory(scan) => {
            assert!(matches!(scan, ScanError::NotFound(_)));
            assert!(scan.is_invalid_directory());
        }
    }
}

#[test]
fn test_file_root_is_not_a_directory() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    write_file(&file, b"x");

    let err = DuplicateFinder::with_defaults()
        .find_duplicates(&file)
        .unwrap_err();

    assert!(matches!(
        err,
        FinderError::InvalidDirectory(ScanError::NotADirectory(_))
    ));
}

#[test]
fn test_repeated_scans_are_identical() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        write_file(&dir.path().join(format!("d{i}/copy.txt")), b"shared");
        write_file(&dir.path().join(format!("d{i}/own.txt")), format!("own {i}").as_bytes());
    }

    let finder = DuplicateFinder::with_defaults();
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].len(), 5);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"same");
    write_file(&dir.path().join("b.txt"), b"same");
    let locked = dir.path().join("locked.txt");
    write_file(&locked, b"same");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if File::open(&locked).is_ok() {
        // Running as root: permissions are not enforced.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(summary.failed_files, 1);
    assert_eq!(summary.total_files, 3);
    assert!(summary.has_errors());
}

/// Removes one file as soon as the finder announces it.
struct RemoveOnAnnounce(PathBuf);

impl ProgressCallback for RemoveOnAnnounce {
    fn on_phase_start(&self, _phase: &str, _total: usize) {}

    fn on_progress(&self, _current: usize, path: &str) {
        if Path::new(path) == self.0 {
            fs::remove_file(&self.0).unwrap();
        }
    }

    fn on_phase_end(&self, _phase: &str) {}
}

#[test]
fn test_file_removed_mid_scan_is_skipped() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"same");
    write_file(&dir.path().join("b.txt"), b"same");
    let gone = dir.path().join("nested/gone.txt");
    write_file(&gone, b"same");

    let finder = DuplicateFinder::new(
        FinderConfig::default().with_progress_callback(Arc::new(RemoveOnAnnounce(gone.clone()))),
    );
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert!(!groups[0].paths().contains(&gone));
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.failed_files, 1);
    assert!(matches!(&summary.hash_errors[0], HashError::NotFound(p) if *p == gone));
    assert!(summary.has_errors());
}
