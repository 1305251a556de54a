//! Directory identity tracking for symlink cycle detection.
//!
//! # Overview
//!
//! When symlinks are followed, a link can point back at one of its own
//! ancestors (or at a sibling tree already walked), and a naive walk would
//! never terminate or would list the same files twice. [`VisitedDirs`]
//! remembers every directory entered, keyed by its on-disk identity, and
//! reports re-entries so the walker can prune them.
//!
//! # Platform Support
//!
//! - **Unix**: `(device_id, inode)` pairs from file metadata
//! - **Other**: the canonicalized path is used as the identity
//!
//! # Example
//!
//! ```no_run
//! use dupsift::scanner::VisitedDirs;
//! use std::path::Path;
//!
//! let mut visited = VisitedDirs::new();
//! assert!(visited.first_visit(Path::new("/tmp")));
//! assert!(!visited.first_visit(Path::new("/tmp")));
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Set of directory identities already entered during one walk.
///
/// # Thread Safety
///
/// `VisitedDirs` is NOT thread-safe. Each walk owns its own tracker.
#[derive(Debug, Default)]
pub struct VisitedDirs {
    seen: HashSet<DirKey>,
}

impl VisitedDirs {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }

    /// Record a directory and report whether this is its first visit.
    ///
    /// Directories whose identity cannot be determined (e.g. removed
    /// mid-walk) are treated as first visits; the walker will fail to
    /// read them anyway and skip them.
    pub fn first_visit(&mut self, dir: &Path) -> bool {
        match DirKey::for_path(dir) {
            Some(key) => self.seen.insert(key),
            None => true,
        }
    }

    /// Number of distinct directories recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no directory has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DirKey {
    #[cfg_attr(not(unix), allow(dead_code))]
    Inode { dev: u64, ino: u64 },
    #[cfg_attr(unix, allow(dead_code))]
    Canonical(PathBuf),
}

impl DirKey {
    #[cfg(unix)]
    fn for_path(dir: &Path) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        // metadata() follows the link, so a symlinked directory resolves to
        // the same key as its target.
        let meta = std::fs::metadata(dir).ok()?;
        Some(Self::Inode {
            dev: meta.dev(),
            ino: meta.ino(),
        })
    }

    #[cfg(not(unix))]
    fn for_path(dir: &Path) -> Option<Self> {
        std::fs::canonicalize(dir).ok().map(Self::Canonical)
    }
}
