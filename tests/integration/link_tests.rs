use dupelink::duplicates::DuplicateFinder;
use dupelink::links::{emit_links, plan_links, LinkError, LinkKind, ReferenceFileEmitter};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

fn sorted_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_reference_files_for_every_member() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_file(&root.path().join("a/Report (final).txt"), b"same");
    write_file(&root.path().join("b/report.txt"), b"same");
    write_file(&root.path().join("c/photo.jpg"), b"pixels");
    write_file(&root.path().join("d/photo.jpg"), b"pixels");
    write_file(&root.path().join("e/photo.jpg"), b"pixels");

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(root.path())
        .unwrap();
    let dest = out.path().join("Duplicate_Shortcuts");
    let summary = emit_links(&groups, &dest, &ReferenceFileEmitter::new(false), None).unwrap();

    assert!(summary.is_complete());
    assert_eq!(summary.created.len(), 5);
    assert_eq!(
        sorted_names(&dest),
        vec![
            "00001-001-Report final.txt.ref",
            "00001-002-report.txt.ref",
            "00002-001-photo.jpg.ref",
            "00002-002-photo.jpg.ref",
            "00002-003-photo.jpg.ref",
        ]
    );

    let content = fs::read_to_string(dest.join("00001-002-report.txt.ref")).unwrap();
    assert_eq!(
        Path::new(content.trim_end()),
        root.path().join("b/report.txt")
    );
}

#[cfg(unix)]
#[test]
fn test_symlinks_resolve_to_originals() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_file(&root.path().join("one.txt"), b"linked content");
    write_file(&root.path().join("sub/two.txt"), b"linked content");

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(root.path())
        .unwrap();
    let emitter = LinkKind::Symlink.emitter(false);
    let summary = emit_links(&groups, out.path(), emitter.as_ref(), None).unwrap();

    assert_eq!(summary.created.len(), 2);
    let first = out.path().join("00001-001-one.txt");
    let second = out.path().join("00001-002-two.txt");
    assert!(fs::symlink_metadata(&first).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_link(&second).unwrap(), root.path().join("sub/two.txt"));
    assert_eq!(fs::read(&first).unwrap(), b"linked content");
}

#[test]
fn test_rerun_without_overwrite_reports_collisions() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_file(&root.path().join("x.txt"), b"dup");
    write_file(&root.path().join("y.txt"), b"dup");

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(root.path())
        .unwrap();
    let emitter = ReferenceFileEmitter::new(false);
    emit_links(&groups, out.path(), &emitter, None).unwrap();

    let second = emit_links(&groups, out.path(), &emitter, None).unwrap();
    assert!(second.created.is_empty());
    assert_eq!(second.failures.len(), 2);
    assert!(second
        .failures
        .iter()
        .all(|f| matches!(f.error, LinkError::AlreadyExists(_))));

    let third = emit_links(&groups, out.path(), &ReferenceFileEmitter::new(true), None).unwrap();
    assert!(third.is_complete());
    assert_eq!(sorted_names(out.path()).len(), 2);
}

#[test]
fn test_one_collision_does_not_block_the_rest() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_file(&root.path().join("a.txt"), b"dup");
    write_file(&root.path().join("b.txt"), b"dup");
    write_file(&root.path().join("c.txt"), b"dup");
    // A directory where the second artifact should go cannot be replaced.
    fs::create_dir(out.path().join("00001-002-b.txt.ref")).unwrap();

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(root.path())
        .unwrap();
    let summary = emit_links(&groups, out.path(), &ReferenceFileEmitter::new(true), None).unwrap();

    assert_eq!(summary.created.len(), 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].plan.name, "00001-002-b.txt");
    assert!(out.path().join("00001-003-c.txt.ref").is_file());
}

#[test]
fn test_plan_matches_created_names() {
    let root = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_file(&root.path().join("@@@.txt"), b"odd");
    write_file(&root.path().join("###.txt"), b"odd");

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(root.path())
        .unwrap();
    let plans = plan_links(&groups);
    let summary = emit_links(&groups, out.path(), &ReferenceFileEmitter::new(false), None).unwrap();

    let planned: Vec<_> = plans.iter().map(|p| p.name.as_str()).collect();
    let created: Vec<_> = summary
        .created
        .iter()
        .map(|a| a.plan.name.as_str())
        .collect();
    assert_eq!(planned, created);
    assert_eq!(planned, vec!["00001-001-.txt", "00001-002-.txt"]);
}
