//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (Phase 1)
//! - Prehash comparison (Phase 2)
//! - Full hash comparison (Phase 3)
//! - Duplicate set reporting

pub mod finder;
pub mod groups;

pub use finder::{
    phase2_prehash, phase3_fullhash, DuplicateFinder, FinderConfig, FinderError, FullhashStats,
    HashPhaseConfig, PrehashStats, ScanSummary, DEFAULT_IO_THREADS,
};
pub use groups::{group_by_size, partition_by_key, DuplicateSet, GroupingStats, Partition};
