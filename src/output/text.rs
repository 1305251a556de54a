//! Plain-text report.
//!
//! One block per duplicate set: a `Hash <first 10 hex chars>...` header
//! followed by one indented line per path. An empty result prints
//! `No duplicates found.`
//!
//! ```text
//! Hash 2cf24dba5f...
//!   - /data/a.txt
//!   - /data/sub/b.txt
//!
//! 1 duplicate set, 1 redundant file, 5 B reclaimable
//! ```

use std::io::{self, Write};

use yansi::{Condition, Paint};

use crate::duplicates::{DuplicateSet, ScanSummary};

/// Text renderer for a finished scan.
#[derive(Debug)]
pub struct TextOutput<'a> {
    sets: &'a [DuplicateSet],
    summary: &'a ScanSummary,
    color: bool,
    show_summary: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a renderer. Colors and the summary line are off by default.
    #[must_use]
    pub fn new(sets: &'a [DuplicateSet], summary: &'a ScanSummary) -> Self {
        Self {
            sets,
            summary,
            color: false,
            show_summary: false,
        }
    }

    /// Enable ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Append a one-line summary after the sets.
    #[must_use]
    pub fn with_summary(mut self, show: bool) -> Self {
        self.show_summary = show;
        self
    }

    fn condition(&self) -> Condition {
        if self.color {
            Condition::ALWAYS
        } else {
            Condition::NEVER
        }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let when = self.condition();

        if self.sets.is_empty() {
            writeln!(writer, "No duplicates found.")?;
        }

        for (idx, set) in self.sets.iter().enumerate() {
            if idx > 0 {
                writeln!(writer)?;
            }
            writeln!(
                writer,
                "Hash {}...",
                set.short_digest().cyan().bold().whenever(when)
            )?;
            for path in &set.paths {
                writeln!(writer, "  - {}", path.display())?;
            }
        }

        if self.show_summary {
            writeln!(writer)?;
            writeln!(writer, "{}", self.summary_line().dim().whenever(when))?;
        }
        Ok(())
    }

    fn summary_line(&self) -> String {
        let sets = self.sets.len();
        let redundant = self.summary.duplicate_files;
        let mut line = format!(
            "{} duplicate {}, {} redundant {}, {} reclaimable",
            sets,
            plural(sets, "set", "sets"),
            redundant,
            plural(redundant, "file", "files"),
            self.summary.reclaimable_display()
        );
        let skipped = self.summary.skipped_files();
        if skipped > 0 {
            line.push_str(&format!(
                " ({} {} skipped)",
                skipped,
                plural(skipped, "entry", "entries")
            ));
        }
        line
    }

    /// Render the report into a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

fn plural<'s>(n: usize, one: &'s str, many: &'s str) -> &'s str {
    if n == 1 {
        one
    } else {
        many
    }
}
