//! Duplicate finder implementation with multi-phase detection.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Phase 1 - Size grouping**: Group files by size (see [`crate::duplicates::groups`] module)
//! 2. **Phase 2 - Prehash**: Hash the first 256 KiB of same-size files
//! 3. **Phase 3 - Full hash**: Hash entire content of prehash matches
//!
//! Each phase only ever narrows the candidate set, and only files that
//! survive a phase are read by the next one.
//!
//! # Example
//!
//! ```no_run
//! use dupsift::scanner::{Walker, WalkerConfig, FileEntry, Hasher};
//! use dupsift::duplicates::{group_by_size, phase2_prehash, HashPhaseConfig};
//! use std::path::Path;
//!
//! // Phase 1: Collect and group files by size
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! let files: Vec<FileEntry> = walker.walk().filter_map(Result::ok).collect();
//! let (size_groups, size_stats) = group_by_size(files);
//!
//! // Phase 2: Compute prehashes for potential duplicates
//! let hasher = Hasher::new();
//! let config = HashPhaseConfig::default();
//! let (prehash_groups, prehash_stats) = phase2_prehash(size_groups, &hasher, &config);
//!
//! println!("Phase 2: {} potential duplicates remain", prehash_stats.potential_duplicates);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;
use rayon::prelude::*;

use super::groups::{group_by_size, partition_by_key, DuplicateSet, GroupingStats};
use crate::progress::ProgressCallback;
use crate::scanner::{
    hash_to_hex, FileEntry, Hash, HashError, Hasher, ScanError, Walker, WalkerConfig,
};

/// Default number of I/O threads for the hashing phases.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Configuration shared by the two hashing phases.
#[derive(Clone)]
pub struct HashPhaseConfig {
    /// Number of I/O threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for HashPhaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashPhaseConfig")
            .field("io_threads", &self.io_threads)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for HashPhaseConfig {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl HashPhaseConfig {
    /// Set the I/O thread count (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Outcome of hashing a single file.
enum HashOutcome {
    Hashed(Hash),
    Failed(HashError),
    /// Not attempted because shutdown was requested.
    Skipped,
}

/// Hash every file on a pool bounded to `config.io_threads` threads.
///
/// Results come back in input order. The thread count bounds concurrent
/// open file handles as well as CPU use.
fn hash_files<F>(
    files: Vec<FileEntry>,
    phase: &str,
    config: &HashPhaseConfig,
    hash_fn: F,
) -> Vec<(FileEntry, HashOutcome)>
where
    F: Fn(&Path) -> Result<Hash, HashError> + Send + Sync,
{
    let completed = AtomicUsize::new(0);

    let job = || {
        files
            .into_par_iter()
            .map(|file| {
                if config.is_shutdown_requested() {
                    return (file, HashOutcome::Skipped);
                }

                let outcome = match hash_fn(&file.path) {
                    Ok(hash) => {
                        log::trace!("{} computed: {}", phase, file.path.display());
                        HashOutcome::Hashed(hash)
                    }
                    Err(e) => {
                        log::warn!("Failed to {} {}: {}", phase, file.path.display(), e);
                        HashOutcome::Failed(e)
                    }
                };

                if let Some(ref callback) = config.progress_callback {
                    let current = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    callback.on_progress(current, file.path.to_string_lossy().as_ref());
                    callback.on_item_completed(file.size);
                }

                (file, outcome)
            })
            .collect::<Vec<_>>()
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(config.io_threads.max(1))
        .build()
    {
        Ok(pool) => pool.install(job),
        Err(e) => {
            log::warn!(
                "Failed to create I/O thread pool ({}), using global pool with {} threads",
                e,
                rayon::current_num_threads()
            );
            job()
        }
    }
}

/// Statistics from prehash phase.
#[derive(Debug, Default)]
pub struct PrehashStats {
    /// Total files that entered Phase 2
    pub input_files: usize,
    /// Number of files successfully hashed
    pub hashed_files: usize,
    /// Number of files that failed to hash (I/O errors)
    pub failed_files: usize,
    /// Errors encountered during prehash
    pub errors: Vec<HashError>,
    /// Number of files eliminated by a unique prehash
    pub unique_prehashes: usize,
    /// Number of files that could still be duplicates
    pub potential_duplicates: usize,
    /// Number of prehash groups with 2+ files
    pub duplicate_groups: usize,
    /// Whether phase was interrupted by shutdown
    pub interrupted: bool,
}

impl PrehashStats {
    /// Percentage of files eliminated by prehash comparison.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.input_files == 0 {
            0.0
        } else {
            let eliminated = self.input_files - self.potential_duplicates;
            (eliminated as f64 / self.input_files as f64) * 100.0
        }
    }
}

/// Group same-size files by their prehash (Phase 2).
///
/// Each file in a size group has its first [`crate::scanner::PREHASH_SIZE`]
/// bytes digested. Files are regrouped by `(size, prehash)`, so two
/// files only share a group if they already shared a size. Groups with a
/// single member are dropped, as are files that could not be read.
///
/// # Returns
///
/// A tuple of:
/// - `HashMap<(u64, Hash), Vec<FileEntry>>` - Files grouped by size and prehash (only groups with 2+ files)
/// - `PrehashStats` - Statistics about the prehash operation
///
/// # Example
///
/// ```no_run
/// use dupsift::scanner::{FileEntry, Hasher};
/// use dupsift::duplicates::{group_by_size, phase2_prehash, HashPhaseConfig};
///
/// let files: Vec<FileEntry> = vec![];
/// let (size_groups, _) = group_by_size(files);
///
/// let config = HashPhaseConfig::default();
/// let (prehash_groups, stats) = phase2_prehash(size_groups, &Hasher::new(), &config);
///
/// println!("Phase 2: {:.1}% eliminated by prehash", stats.elimination_rate());
/// ```
#[must_use]
pub fn phase2_prehash(
    size_groups: HashMap<u64, Vec<FileEntry>>,
    hasher: &Hasher,
    config: &HashPhaseConfig,
) -> (HashMap<(u64, Hash), Vec<FileEntry>>, PrehashStats) {
    let all_files = flatten_groups(size_groups);
    let mut stats = PrehashStats {
        input_files: all_files.len(),
        ..Default::default()
    };

    if all_files.is_empty() {
        log::debug!("Phase 2: No files to process");
        return (HashMap::new(), stats);
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start("prehash", all_files.len());
    }

    log::info!("Phase 2: Computing prehashes for {} files", all_files.len());

    let results = hash_files(all_files, "prehash", config, |path| hasher.prehash(path));

    if config.is_shutdown_requested() {
        stats.interrupted = true;
        log::info!("Phase 2: Interrupted by shutdown signal");
    }

    let mut keyed = Vec::with_capacity(results.len());
    for (file, outcome) in results {
        match outcome {
            HashOutcome::Hashed(prehash) => {
                stats.hashed_files += 1;
                keyed.push(((file.size, prehash), file));
            }
            HashOutcome::Failed(e) => {
                stats.failed_files += 1;
                stats.errors.push(e);
            }
            HashOutcome::Skipped => {}
        }
    }

    let partition = partition_by_key(keyed);
    stats.unique_prehashes = partition.singletons;
    stats.duplicate_groups = partition.groups.len();
    stats.potential_duplicates = partition.member_count();

    for ((size, prehash), files) in &partition.groups {
        log::debug!(
            "Prehash group {} ({} bytes): {} potential duplicates",
            hash_to_hex(prehash),
            size,
            files.len()
        );
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end("prehash");
    }

    log::info!(
        "Phase 2 complete: {} files → {} potential duplicates ({:.1}% eliminated)",
        stats.input_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (partition.groups, stats)
}

/// Statistics from full hash phase.
#[derive(Debug, Default)]
pub struct FullhashStats {
    /// Total files that entered Phase 3
    pub input_files: usize,
    /// Number of files successfully hashed
    pub hashed_files: usize,
    /// Number of files that failed to hash (I/O errors)
    pub failed_files: usize,
    /// Errors encountered during full hashing
    pub errors: Vec<HashError>,
    /// Total bytes read while hashing
    pub bytes_hashed: u64,
    /// Files whose prehash matched another file but whose content did not
    pub unique_fullhashes: usize,
    /// Number of confirmed duplicate sets
    pub duplicate_groups: usize,
    /// Number of redundant copies across all sets
    pub duplicate_files: usize,
    /// Bytes reclaimable by keeping one copy per set
    pub wasted_space: u64,
    /// Whether phase was interrupted by shutdown
    pub interrupted: bool,
}

impl FullhashStats {
    /// Fill the set and space totals from the confirmed sets.
    pub fn calculate_wasted_space(&mut self, sets: &[DuplicateSet]) {
        self.duplicate_groups = sets.len();
        self.duplicate_files = sets.iter().map(DuplicateSet::duplicate_count).sum();
        self.wasted_space = sets.iter().map(DuplicateSet::wasted_space).sum();
    }
}

/// Confirm duplicates by full-content hash (Phase 3).
///
/// Every surviving candidate is hashed in full and grouped by digest.
/// The returned sets are deterministic: paths are sorted within each
/// set and sets are ordered by their first path. No two sets share a
/// digest.
///
/// # Example
///
/// ```no_run
/// use dupsift::scanner::{FileEntry, Hasher};
/// use dupsift::duplicates::{phase3_fullhash, HashPhaseConfig};
/// use std::collections::HashMap;
///
/// let groups: HashMap<u64, Vec<FileEntry>> = HashMap::new();
/// let (sets, stats) = phase3_fullhash(groups, &Hasher::new(), &HashPhaseConfig::default());
/// assert!(sets.is_empty());
/// assert_eq!(stats.input_files, 0);
/// ```
#[must_use]
pub fn phase3_fullhash<K>(
    prehash_groups: HashMap<K, Vec<FileEntry>>,
    hasher: &Hasher,
    config: &HashPhaseConfig,
) -> (Vec<DuplicateSet>, FullhashStats) {
    let all_files = flatten_groups(prehash_groups);
    let mut stats = FullhashStats {
        input_files: all_files.len(),
        ..Default::default()
    };

    if all_files.is_empty() {
        log::debug!("Phase 3: No files to process");
        return (Vec::new(), stats);
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start("fullhash", all_files.len());
    }

    log::info!(
        "Phase 3: Computing full hashes for {} files ({})",
        all_files.len(),
        ByteSize::b(all_files.iter().map(|f| f.size).sum())
    );

    let results = hash_files(all_files, "fullhash", config, |path| hasher.full_hash(path));

    if config.is_shutdown_requested() {
        stats.interrupted = true;
        log::info!("Phase 3: Interrupted by shutdown signal");
    }

    let mut keyed = Vec::with_capacity(results.len());
    for (file, outcome) in results {
        match outcome {
            HashOutcome::Hashed(hash) => {
                stats.hashed_files += 1;
                stats.bytes_hashed += file.size;
                keyed.push((hash, file));
            }
            HashOutcome::Failed(e) => {
                stats.failed_files += 1;
                stats.errors.push(e);
            }
            HashOutcome::Skipped => {}
        }
    }

    let partition = partition_by_key(keyed);
    stats.unique_fullhashes = partition.singletons;

    let mut sets: Vec<DuplicateSet> = partition
        .groups
        .into_iter()
        .map(|(hash, files)| {
            let size = files[0].size;
            let paths = files.into_iter().map(|f| f.path).collect();
            let set = DuplicateSet::new(hash_to_hex(&hash), size, paths);
            log::debug!(
                "Duplicate set {}: {} files of {} bytes",
                set.short_digest(),
                set.len(),
                set.size
            );
            set
        })
        .collect();
    sets.sort_by(|a, b| a.paths.cmp(&b.paths));

    stats.calculate_wasted_space(&sets);

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end("fullhash");
    }

    log::info!(
        "Phase 3 complete: {} duplicate sets, {} redundant files, {} reclaimable",
        stats.duplicate_groups,
        stats.duplicate_files,
        ByteSize::b(stats.wasted_space)
    );

    (sets, stats)
}

/// Flatten grouped files in a stable order (by key, then input order).
fn flatten_groups<K>(groups: HashMap<K, Vec<FileEntry>>) -> Vec<FileEntry> {
    let mut files: Vec<FileEntry> = groups.into_values().flatten().collect();
    files.sort_by(|a, b| a.size.cmp(&b.size).then_with(|| a.path.cmp(&b.path)));
    files
}

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of I/O threads for parallel hashing.
    pub io_threads: usize,
    /// Configuration for the directory walker.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            walker_config: WalkerConfig::default(),
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the I/O thread count (minimum 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn hash_phase_config(&self) -> HashPhaseConfig {
        HashPhaseConfig {
            io_threads: self.io_threads.max(1),
            shutdown_flag: self.shutdown_flag.clone(),
            progress_callback: self.progress_callback.clone(),
        }
    }
}

/// Summary statistics from a duplicate scan.
///
/// Provides metrics about the scan results including file counts,
/// sizes, and potential space savings.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Total number of files scanned
    pub total_files: usize,
    /// Total size of all scanned files in bytes
    pub total_size: u64,
    /// Number of zero-length files scanned
    pub empty_files: usize,
    /// Number of files eliminated by size grouping (unique sizes)
    pub eliminated_by_size: usize,
    /// Number of files eliminated by prehash (different first 256 KiB)
    pub eliminated_by_prehash: usize,
    /// Number of files eliminated by full hash (prehash collisions)
    pub eliminated_by_fullhash: usize,
    /// Number of confirmed duplicate sets
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Entries the walker could not read
    pub scan_errors: Vec<ScanError>,
    /// Files that could not be hashed
    pub hash_errors: Vec<HashError>,
}

impl ScanSummary {
    /// Number of entries skipped because of I/O errors.
    #[must_use]
    pub fn skipped_files(&self) -> usize {
        self.scan_errors.len() + self.hash_errors.len()
    }

    /// Whether any entry was skipped.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.skipped_files() > 0
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    fn record_grouping(&mut self, stats: &GroupingStats) {
        self.total_files = stats.total_files;
        self.total_size = stats.total_size;
        self.empty_files = stats.empty_files;
        self.eliminated_by_size = stats.eliminated_unique;
    }
}

/// Errors that can occur during duplicate finding.
///
/// Only problems with the root itself, or an interruption, surface here;
/// per-file failures are recorded in [`ScanSummary`] and skipped.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root exists but its metadata could not be read.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Duplicate finder that orchestrates the multi-phase detection pipeline.
///
/// The `DuplicateFinder` runs the complete duplicate detection pipeline:
/// 1. **Walk** - Collect all regular files under the target directory
/// 2. **Phase 1** - Group files by size
/// 3. **Phase 2** - Compare prehashes of same-size files
/// 4. **Phase 3** - Compute full hashes to confirm duplicates
///
/// # Example
///
/// ```no_run
/// use dupsift::duplicates::{DuplicateFinder, FinderConfig};
/// use std::path::Path;
///
/// let config = FinderConfig::default().with_io_threads(4);
/// let finder = DuplicateFinder::new(config);
///
/// let (sets, summary) = finder.find_duplicates(Path::new("/some/path")).unwrap();
///
/// println!("Found {} duplicate sets", summary.duplicate_groups);
/// println!("Reclaimable space: {}", summary.reclaimable_display());
/// ```
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files under the given directory.
    ///
    /// Runs the complete multi-phase duplicate detection pipeline and
    /// returns confirmed duplicate sets along with summary statistics.
    /// Unreadable entries are skipped and counted in the summary.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - The path does not exist
    /// - The path is not a directory
    /// - The scan is interrupted by shutdown signal
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupsift::duplicates::DuplicateFinder;
    /// use std::path::Path;
    ///
    /// let finder = DuplicateFinder::with_defaults();
    /// match finder.find_duplicates(Path::new(".")) {
    ///     Ok((sets, summary)) => {
    ///         println!("Found {} duplicate sets", sets.len());
    ///         println!("Can reclaim {} bytes", summary.reclaimable_space);
    ///     }
    ///     Err(e) => eprintln!("Scan failed: {}", e),
    /// }
    /// ```
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicateSet>, ScanSummary), FinderError> {
        let start_time = Instant::now();

        validate_root(path)?;

        log::info!("Starting duplicate scan of {}", path.display());

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("walking", 0);
            callback.on_message(&format!("Walking {}", path.display()));
        }

        let mut walker = Walker::new(path, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }

        let mut files = Vec::new();
        let mut scan_errors = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(file) => {
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(files.len() + 1, file.path.to_string_lossy().as_ref());
                    }
                    files.push(file);
                }
                Err(e) => scan_errors.push(e),
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("walking");
        }

        if self.config.is_shutdown_requested() {
            log::info!("Walk interrupted by shutdown signal");
            return Err(FinderError::Interrupted);
        }

        log::info!(
            "Walk complete: {} files found, {} entries skipped",
            files.len(),
            scan_errors.len()
        );

        let (sets, mut summary) = self.run_phases(files)?;
        summary.scan_errors = scan_errors;
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete in {:.2?}: {} duplicate sets, {} reclaimable",
            summary.scan_duration,
            summary.duplicate_groups,
            summary.reclaimable_display()
        );

        Ok((sets, summary))
    }

    /// Find duplicates among an already collected list of files.
    ///
    /// Runs phases 1-3 without walking. Useful when the file list comes
    /// from somewhere other than a directory walk.
    ///
    /// # Errors
    ///
    /// Returns `FinderError::Interrupted` if shutdown is requested.
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileEntry>,
    ) -> Result<(Vec<DuplicateSet>, ScanSummary), FinderError> {
        let start_time = Instant::now();
        let (sets, mut summary) = self.run_phases(files)?;
        summary.scan_duration = start_time.elapsed();
        Ok((sets, summary))
    }

    fn run_phases(
        &self,
        files: Vec<FileEntry>,
    ) -> Result<(Vec<DuplicateSet>, ScanSummary), FinderError> {
        let mut summary = ScanSummary::default();

        log::info!("Phase 1: Grouping by size...");
        let (size_groups, size_stats) = group_by_size(files);
        summary.record_grouping(&size_stats);

        log::info!(
            "Phase 1 complete: {} files → {} potential duplicates ({:.1}% eliminated)",
            size_stats.total_files,
            size_stats.potential_duplicates,
            size_stats.elimination_rate()
        );

        if size_groups.is_empty() {
            log::info!("No potential duplicates found after size grouping");
            return Ok((Vec::new(), summary));
        }

        let phase_config = self.config.hash_phase_config();

        log::info!("Phase 2: Computing prehashes...");
        let (prehash_groups, prehash_stats) =
            phase2_prehash(size_groups, &self.hasher, &phase_config);
        if prehash_stats.interrupted {
            return Err(FinderError::Interrupted);
        }
        summary.eliminated_by_prehash = prehash_stats.unique_prehashes;
        summary.hash_errors = prehash_stats.errors;

        if prehash_groups.is_empty() {
            log::info!("No potential duplicates found after prehash comparison");
            return Ok((Vec::new(), summary));
        }

        log::info!("Phase 3: Computing full hashes...");
        let (sets, fullhash_stats) = phase3_fullhash(prehash_groups, &self.hasher, &phase_config);
        if fullhash_stats.interrupted {
            return Err(FinderError::Interrupted);
        }
        summary.eliminated_by_fullhash = fullhash_stats.unique_fullhashes;
        summary.hash_errors.extend(fullhash_stats.errors);
        summary.duplicate_groups = fullhash_stats.duplicate_groups;
        summary.duplicate_files = fullhash_stats.duplicate_files;
        summary.reclaimable_space = fullhash_stats.wasted_space;

        Ok((sets, summary))
    }
}

/// Check that the scan root exists and is a directory.
fn validate_root(path: &Path) -> Result<(), FinderError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(FinderError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(FinderError::PathNotFound(path.to_path_buf()))
        }
        Err(source) => Err(FinderError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
