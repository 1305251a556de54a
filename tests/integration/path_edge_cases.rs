use dupsift::duplicates::DuplicateFinder;
use std::fs;
use tempfile::tempdir;

fn scan_one_set(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    let (sets, _) = DuplicateFinder::with_defaults().find_duplicates(dir).unwrap();
    assert_eq!(sets.len(), 1, "expected exactly one duplicate set");
    sets.into_iter().next().map(|s| s.paths).unwrap_or_default()
}

#[test]
fn test_paths_with_quotes() {
    let dir = tempdir().unwrap();

    // Windows does not allow double quotes in filenames.
    if cfg!(not(windows)) {
        fs::write(dir.path().join("file_with_\"quote\".txt"), b"content").unwrap();
        fs::write(dir.path().join("duplicate.txt"), b"content").unwrap();

        let paths = scan_one_set(dir.path());
        assert!(paths.iter().any(|p| p.to_string_lossy().contains('"')));
    }
}

#[test]
fn test_paths_with_newlines() {
    let dir = tempdir().unwrap();

    if cfg!(not(windows)) {
        fs::write(dir.path().join("file_with\nnewline.txt"), b"content").unwrap();
        fs::write(dir.path().join("plain.txt"), b"content").unwrap();

        let paths = scan_one_set(dir.path());
        assert!(paths.iter().any(|p| p.to_string_lossy().contains('\n')));
    }
}

#[test]
fn test_paths_with_spaces_and_unicode() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("my file.txt"), b"content").unwrap();
    fs::write(dir.path().join("日本語.txt"), b"content").unwrap();
    fs::write(dir.path().join("émoji 🎉.txt"), b"content").unwrap();

    let paths = scan_one_set(dir.path());

    assert_eq!(paths.len(), 3);
    assert!(paths.contains(&dir.path().join("my file.txt")));
    assert!(paths.contains(&dir.path().join("日本語.txt")));
}

#[test]
fn test_deeply_nested_path() {
    let dir = tempdir().unwrap();
    let mut deep = dir.path().to_path_buf();
    for i in 0..30 {
        deep.push(format!("level_{}", i));
    }
    fs::create_dir_all(&deep).unwrap();
    fs::write(deep.join("bottom.txt"), b"deep content").unwrap();
    fs::write(dir.path().join("top.txt"), b"deep content").unwrap();

    let paths = scan_one_set(dir.path());

    assert!(paths.contains(&deep.join("bottom.txt")));
}

#[test]
fn test_relative_root_yields_absolute_paths() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"abc").unwrap();
    fs::write(dir.path().join("b.txt"), b"abc").unwrap();

    let cwd = std::env::current_dir().unwrap();
    let relative = pathdiff(dir.path(), &cwd);

    let paths = scan_one_set(&relative);

    assert!(paths.iter().all(|p| p.is_absolute()));
}

/// Express `path` relative to `base` using `..` components.
fn pathdiff(path: &std::path::Path, base: &std::path::Path) -> std::path::PathBuf {
    let path: Vec<_> = path.components().collect();
    let base: Vec<_> = base.components().collect();
    let common = path
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = std::path::PathBuf::new();
    for _ in common..base.len() {
        result.push("..");
    }
    for component in &path[common..] {
        result.push(component);
    }
    result
}
