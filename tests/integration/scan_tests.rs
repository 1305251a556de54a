use dupsift::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupsift::scanner::WalkerConfig;
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (sets, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(sets.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();

    // Same length, different content
    fs::write(dir.path().join("a.txt"), b"content a").unwrap();
    fs::write(dir.path().join("b.txt"), b"content b").unwrap();
    fs::write(dir.path().join("c.txt"), b"content c").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (sets, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(sets.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.duplicate_groups, 0);
    assert_eq!(summary.eliminated_by_size, 0);
}

#[test]
fn test_scan_duplicate_files() {
    let dir = tempdir().unwrap();

    File::create(dir.path().join("a.txt"))
        .unwrap()
        .write_all(b"duplicate")
        .unwrap();
    File::create(dir.path().join("b.txt"))
        .unwrap()
        .write_all(b"duplicate")
        .unwrap();
    File::create(dir.path().join("c.txt"))
        .unwrap()
        .write_all(b"unique")
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (sets, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(
        sets[0].paths,
        vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
    );
    assert_eq!(sets[0].size, 9);
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_space, 9);
}

#[test]
fn test_scan_reports_sha256_digest() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello").unwrap();
    fs::write(dir.path().join("b.txt"), b"hello").unwrap();

    let sets = dupsift::find_duplicates(dir.path()).unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(
        sets[0].digest,
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    let deeper = sub.join("deeper");
    fs::create_dir_all(&deeper).unwrap();

    fs::write(dir.path().join("a.txt"), b"nested dup").unwrap();
    fs::write(sub.join("b.txt"), b"nested dup").unwrap();
    fs::write(deeper.join("c.txt"), b"nested dup").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (sets, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].len(), 3);
    assert_eq!(summary.duplicate_files, 2);
}

#[test]
fn test_scan_multiple_sets_sorted() {
    let dir = tempdir().unwrap();

    fs::write(dir.path().join("z1.txt"), b"first group").unwrap();
    fs::write(dir.path().join("z2.txt"), b"first group").unwrap();
    fs::write(dir.path().join("a1.txt"), b"second").unwrap();
    fs::write(dir.path().join("a2.txt"), b"second").unwrap();
    fs::write(dir.path().join("a3.txt"), b"second").unwrap();

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0].paths[0], dir.path().join("a1.txt"));
    assert_eq!(sets[1].paths[0], dir.path().join("z1.txt"));
    assert_eq!(summary.duplicate_files, 3);

    let digests: std::collections::HashSet<_> = sets.iter().map(|s| &s.digest).collect();
    assert_eq!(digests.len(), 2);
}

#[test]
fn test_scan_same_prefix_different_tail() {
    let dir = tempdir().unwrap();
    let prefix = vec![b'p'; 300 * 1024];

    let mut a = prefix.clone();
    a.extend_from_slice(b"tail-one");
    let mut b = prefix;
    b.extend_from_slice(b"tail-two");

    fs::write(dir.path().join("a.bin"), &a).unwrap();
    fs::write(dir.path().join("b.bin"), &b).unwrap();

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(sets.is_empty());
    assert_eq!(summary.eliminated_by_prehash, 0);
    assert_eq!(summary.eliminated_by_fullhash, 2);
}

#[test]
fn test_scan_is_deterministic() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        let content = format!("group-{}", i % 5);
        fs::write(dir.path().join(format!("f{:02}.txt", i)), content).unwrap();
    }

    let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(8));
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first.len(), 5);
    assert_eq!(first, second);
}

#[test]
fn test_scan_with_size_bounds() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("small1"), b"ab").unwrap();
    fs::write(dir.path().join("small2"), b"ab").unwrap();
    fs::write(dir.path().join("large1"), vec![b'x'; 2048]).unwrap();
    fs::write(dir.path().join("large2"), vec![b'x'; 2048]).unwrap();

    let walker_config = WalkerConfig::default().with_size_bounds(Some(1024), None);
    let finder = DuplicateFinder::new(FinderConfig::default().with_walker_config(walker_config));
    let (sets, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].size, 2048);
    assert_eq!(summary.total_files, 2);
}

#[test]
fn test_scan_with_ignore_patterns() {
    let dir = tempdir().unwrap();
    let build = dir.path().join("build");
    fs::create_dir(&build).unwrap();
    fs::write(dir.path().join("keep.txt"), b"same").unwrap();
    fs::write(build.join("out.txt"), b"same").unwrap();

    let walker_config = WalkerConfig::default().with_ignore_patterns(vec!["build/".to_string()]);
    let finder = DuplicateFinder::new(FinderConfig::default().with_walker_config(walker_config));
    let (sets, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(sets.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_scan_covers_gitignored_files_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".gitignore"), "*.bak\n").unwrap();
    fs::write(dir.path().join("a.bak"), b"hello").unwrap();
    fs::write(dir.path().join("b.bak"), b"hello").unwrap();

    let sets = dupsift::find_duplicates(dir.path()).unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(
        sets[0].paths,
        vec![dir.path().join("a.bak"), dir.path().join("b.bak")]
    );
}

#[test]
fn test_scan_respects_gitignore_when_enabled() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".gitignore"), "*.bak\n").unwrap();
    fs::write(dir.path().join("a.bak"), b"hello").unwrap();
    fs::write(dir.path().join("b.bak"), b"hello").unwrap();

    let walker_config = WalkerConfig::default().with_respect_gitignore(true);
    let finder = DuplicateFinder::new(FinderConfig::default().with_walker_config(walker_config));
    let (sets, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(sets.is_empty());
    // Only the .gitignore itself is walked
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_scan_hello_and_last_byte_scenarios() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello").unwrap();
    fs::write(dir.path().join("b.txt"), b"hello").unwrap();
    fs::write(dir.path().join("c.jpg"), [0xff, 0xd8, 0xff]).unwrap();

    let mut content = vec![b'z'; 1000];
    fs::write(dir.path().join("d.bin"), &content).unwrap();
    content[999] = b'y';
    fs::write(dir.path().join("e.bin"), &content).unwrap();

    let sets = dupsift::find_duplicates(dir.path()).unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(
        sets[0].paths,
        vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
    );
}

#[test]
fn test_scan_missing_root_is_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let result = DuplicateFinder::with_defaults().find_duplicates(&missing);

    assert!(matches!(result, Err(FinderError::PathNotFound(p)) if p == missing));
}

#[test]
fn test_scan_file_root_is_error() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, b"not a directory").unwrap();

    let result = dupsift::find_duplicates(&file);

    assert!(matches!(result, Err(FinderError::NotADirectory(_))));
}
