//! Duplicate grouping and size-based file organization.
//!
//! # Overview
//!
//! Every phase of duplicate detection has the same shape: extract a key
//! for each file, partition files by key, and drop partitions with fewer
//! than two members because a lone file cannot be a duplicate.
//! [`partition_by_key`] is that shared step; the phases differ only in
//! the key they extract.
//!
//! ## Size Grouping (Phase 1)
//!
//! Size grouping is the first phase. Files with different sizes cannot be
//! duplicates, so a file with a unique size is dropped here and its
//! content is never read.
//!
//! # Example
//!
//! ```
//! use dupsift::scanner::FileEntry;
//! use dupsift::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/file1.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file2.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(groups.len(), 1);
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::path::PathBuf;

use serde::Serialize;

use crate::scanner::FileEntry;

/// Result of partitioning files by a key.
#[derive(Debug)]
pub struct Partition<K> {
    /// Groups with two or more members
    pub groups: HashMap<K, Vec<FileEntry>>,
    /// Number of keys that had exactly one member
    pub singletons: usize,
    /// Number of distinct keys seen before pruning
    pub distinct_keys: usize,
}

impl<K> Partition<K> {
    /// Total number of files kept across all groups.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Partition keyed files and keep only keys shared by 2+ files.
///
/// Members keep their input order within a group.
///
/// # Example
///
/// ```
/// use dupsift::scanner::FileEntry;
/// use dupsift::duplicates::partition_by_key;
/// use std::path::PathBuf;
///
/// let keyed = vec![
///     ("a", FileEntry::new(PathBuf::from("/1"), 1)),
///     ("a", FileEntry::new(PathBuf::from("/2"), 1)),
///     ("b", FileEntry::new(PathBuf::from("/3"), 1)),
/// ];
/// let partition = partition_by_key(keyed);
/// assert_eq!(partition.groups.len(), 1);
/// assert_eq!(partition.singletons, 1);
/// ```
#[must_use]
pub fn partition_by_key<K, I>(keyed: I) -> Partition<K>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, FileEntry)>,
{
    let mut all: HashMap<K, Vec<FileEntry>> = HashMap::new();
    for (key, file) in keyed {
        all.entry(key).or_default().push(file);
    }

    let distinct_keys = all.len();
    let mut singletons = 0;
    all.retain(|_, files| {
        if files.len() < 2 {
            singletons += 1;
            log::trace!("Eliminated unique key: {}", files[0].path.display());
            false
        } else {
            true
        }
    });

    Partition {
        groups: all,
        singletons,
        distinct_keys,
    }
}

/// Statistics from size grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in groups of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton groups)
    pub eliminated_unique: usize,
    /// Number of zero-length files encountered
    pub empty_files: usize,
    /// Number of size groups with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size (Phase 1 of duplicate detection).
///
/// Returns only the size groups holding 2+ files. No file content is
/// read. Zero-length files form an ordinary size group: all empty files
/// are identical to each other.
///
/// # Example
///
/// ```
/// use dupsift::scanner::FileEntry;
/// use dupsift::duplicates::group_by_size;
/// use std::path::PathBuf;
///
/// let files = vec![
///     FileEntry::new(PathBuf::from("/a.txt"), 100),
///     FileEntry::new(PathBuf::from("/b.txt"), 100),
///     FileEntry::new(PathBuf::from("/c.txt"), 200),
/// ];
///
/// let (groups, stats) = group_by_size(files);
///
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[&100].len(), 2);
/// assert_eq!(stats.eliminated_unique, 1);
/// ```
#[must_use]
pub fn group_by_size(
    files: impl IntoIterator<Item = FileEntry>,
) -> (HashMap<u64, Vec<FileEntry>>, GroupingStats) {
    let mut stats = GroupingStats::default();

    let keyed = files.into_iter().map(|file| {
        stats.total_files += 1;
        stats.total_size += file.size;
        if file.size == 0 {
            stats.empty_files += 1;
        }
        (file.size, file)
    });
    let partition = partition_by_key(keyed);

    stats.unique_sizes = partition.distinct_keys;
    stats.eliminated_unique = partition.singletons;
    stats.duplicate_groups = partition.groups.len();
    stats.potential_duplicates = partition.member_count();

    for (size, files) in &partition.groups {
        log::debug!(
            "Size group {} bytes: {} potential duplicates",
            size,
            files.len()
        );
    }

    (partition.groups, stats)
}

/// A confirmed set of files with byte-identical content.
///
/// Paths are sorted, and a set always holds at least two of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateSet {
    /// Lowercase hex SHA-256 of the full content (64 characters)
    pub digest: String,
    /// Size in bytes shared by every file in the set
    pub size: u64,
    /// Paths of the identical files
    pub paths: Vec<PathBuf>,
}

impl DuplicateSet {
    /// Create a set, sorting its paths.
    #[must_use]
    pub fn new(digest: String, size: u64, mut paths: Vec<PathBuf>) -> Self {
        paths.sort();
        Self {
            digest,
            size,
            paths,
        }
    }

    /// Number of files in this set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of redundant copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Bytes that would be reclaimed by keeping a single copy.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// The first ten hex characters of the digest, for display.
    #[must_use]
    pub fn short_digest(&self) -> &str {
        &self.digest[..self.digest.len().min(10)]
    }
}
