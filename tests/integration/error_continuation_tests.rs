use dupsift::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupsift::progress::ProgressCallback;
use dupsift::scanner::{FileEntry, HashError};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

/// Requests shutdown on the first progress event of one phase.
struct CancelDuring {
    target: &'static str,
    current: Mutex<String>,
    flag: Arc<AtomicBool>,
}

impl CancelDuring {
    fn new(target: &'static str, flag: Arc<AtomicBool>) -> Self {
        Self {
            target,
            current: Mutex::new(String::new()),
            flag,
        }
    }
}

impl ProgressCallback for CancelDuring {
    fn on_phase_start(&self, phase: &str, _total: usize) {
        *self.current.lock().unwrap() = phase.to_string();
    }

    fn on_progress(&self, _current: usize, _path: &str) {
        if *self.current.lock().unwrap() == self.target {
            self.flag.store(true, Ordering::SeqCst);
        }
    }

    fn on_phase_end(&self, _phase: &str) {}
}

fn cancel_during(phase: &'static str) -> Result<(), FinderError> {
    let dir = tempdir().unwrap();
    for i in 0..8 {
        fs::write(dir.path().join(format!("dup{}.txt", i)), b"same content").unwrap();
    }

    let flag = Arc::new(AtomicBool::new(false));
    let callback = Arc::new(CancelDuring::new(phase, flag.clone()));
    let config = FinderConfig::default()
        .with_io_threads(1)
        .with_shutdown_flag(flag.clone())
        .with_progress_callback(callback);

    let result = DuplicateFinder::new(config).find_duplicates(dir.path());
    assert!(flag.load(Ordering::SeqCst), "{} phase never reported progress", phase);
    result.map(|_| ())
}

#[test]
fn test_find_duplicates_from_files_continues_on_error() {
    let finder = DuplicateFinder::with_defaults();
    // Use files that don't exist to trigger hashing errors
    let file1 = FileEntry::new(PathBuf::from("nonexistent_1.txt"), 100);
    let file2 = FileEntry::new(PathBuf::from("nonexistent_2.txt"), 100);

    let (sets, summary) = finder
        .find_duplicates_from_files(vec![file1, file2])
        .unwrap();

    assert!(sets.is_empty());
    // Both fail during the prehash phase
    assert_eq!(summary.hash_errors.len(), 2);
    assert_eq!(summary.skipped_files(), 2);

    for err in &summary.hash_errors {
        match err {
            HashError::NotFound(_) => {}
            _ => panic!("Expected NotFound HashError, got: {:?}", err),
        }
    }
}

#[test]
fn test_vanished_file_does_not_hide_real_duplicates() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, b"same bytes").unwrap();
    fs::write(&b, b"same bytes").unwrap();

    let files = vec![
        FileEntry::new(a.clone(), 10),
        FileEntry::new(b.clone(), 10),
        FileEntry::new(dir.path().join("gone.txt"), 10),
    ];

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_from_files(files)
        .unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].paths, vec![a, b]);
    assert_eq!(summary.hash_errors.len(), 1);
    assert!(summary.has_errors());
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"readable").unwrap();
    fs::write(dir.path().join("b.txt"), b"readable").unwrap();
    let locked = dir.path().join("c.txt");
    fs::write(&locked, b"readable").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still read the file.
    if fs::File::open(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let (sets, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].len(), 2);
    assert!(matches!(
        summary.hash_errors.as_slice(),
        [HashError::PermissionDenied(p)] if *p == locked
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("inside.txt"), b"hidden").unwrap();
    fs::write(dir.path().join("a.txt"), b"visible").unwrap();
    fs::write(dir.path().join("b.txt"), b"visible").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = DuplicateFinder::with_defaults().find_duplicates(dir.path());

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let (sets, summary) = result.unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(summary.scan_errors.len(), 1);
    assert!(summary.has_errors());
}

#[test]
fn test_shutdown_before_scan_is_interrupted() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"x").unwrap();

    let flag = Arc::new(AtomicBool::new(true));
    let finder = DuplicateFinder::new(FinderConfig::default().with_shutdown_flag(flag));

    let result = finder.find_duplicates(dir.path());

    assert!(matches!(result, Err(FinderError::Interrupted)));
}

#[test]
fn test_shutdown_during_prehash_is_interrupted() {
    assert!(matches!(
        cancel_during("prehash"),
        Err(FinderError::Interrupted)
    ));
}

#[test]
fn test_shutdown_during_fullhash_is_interrupted() {
    assert!(matches!(
        cancel_during("fullhash"),
        Err(FinderError::Interrupted)
    ));
}
