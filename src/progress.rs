//! Progress reporting for the scan pipeline.
//!
//! The finder reports through the [`ProgressCallback`] trait; [`Progress`]
//! renders those events as `indicatif` bars on stderr. When stderr is not
//! a terminal indicatif draws nothing, so piping the report is unaffected.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress callback for duplicate finding phases.
///
/// Phases are reported by name: `"walking"`, `"prehash"`, `"fullhash"`.
/// Hashing phases call [`on_progress`](Self::on_progress) from worker
/// threads, hence the `Send + Sync` bound.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts. `total` is 0 when unknown (walking).
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed. `current` is 1-based.
    fn on_progress(&self, current: usize, path: &str);

    /// Called when an item has been processed, providing its size.
    fn on_item_completed(&self, _bytes: u64) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Terminal progress reporter using indicatif.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    prehash: Mutex<Option<ProgressBar>>,
    fullhash: Mutex<Option<ProgressBar>>,
    hidden: bool,
}

impl Progress {
    /// Create a reporter drawing to stderr, or drawing nothing if `hidden`.
    ///
    /// ```
    /// use dupsift::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// assert!(progress.is_hidden());
    /// ```
    #[must_use]
    pub fn new(hidden: bool) -> Self {
        let target = if hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };
        Self {
            multi: MultiProgress::with_draw_target(target),
            walking: Mutex::new(None),
            prehash: Mutex::new(None),
            fullhash: Mutex::new(None),
            hidden,
        }
    }

    /// Whether output is suppressed.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn slot(&self, phase: &str) -> Option<MutexGuard<'_, Option<ProgressBar>>> {
        let slot = match phase {
            "walking" => &self.walking,
            "prehash" => &self.prehash,
            "fullhash" => &self.fullhash,
            _ => return None,
        };
        Some(slot.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Run `f` on the most recently started bar that is still active.
    fn with_active_bar(&self, f: impl FnOnce(&ProgressBar)) {
        for phase in ["fullhash", "prehash", "walking"] {
            if let Some(guard) = self.slot(phase) {
                if let Some(ref pb) = *guard {
                    f(pb);
                    return;
                }
            }
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn hashing_style(color: &str) -> ProgressStyle {
        let template = format!(
            "[{{elapsed_precise}}] [{{bar:40.{color}/blue}}] {{pos}}/{{len}} ({{percent}}%) {{msg}} (ETA: {{eta}})"
        );
        ProgressStyle::with_template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█>-")
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        let pb = match phase {
            "walking" => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::walking_style());
                pb.set_message("Walking directory");
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            }
            "prehash" => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::hashing_style("cyan"));
                pb.set_message("Prehashing");
                pb
            }
            "fullhash" => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::hashing_style("green"));
                pb.set_message("Full hashing");
                pb
            }
            _ => return,
        };
        if let Some(mut slot) = self.slot(phase) {
            *slot = Some(pb);
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        let message = truncate_path(path, 30);
        self.with_active_bar(|pb| {
            pb.set_position(current as u64);
            pb.set_message(message);
        });
    }

    fn on_phase_end(&self, phase: &str) {
        let Some(mut slot) = self.slot(phase) else {
            return;
        };
        if let Some(pb) = slot.take() {
            let done = match phase {
                "walking" => "Walking complete",
                "prehash" => "Prehashing complete",
                _ => "Full hashing complete",
            };
            pb.finish_with_message(done);
        }
    }

    fn on_message(&self, message: &str) {
        let message = message.to_string();
        self.with_active_bar(|pb| pb.set_message(message));
    }
}

/// Shorten a path to its file name when it is longer than `max_len` bytes.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.len() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let chars: Vec<char> = file_name.chars().collect();
    if chars.len() + 4 > max_len {
        let keep = max_len.saturating_sub(3);
        let tail: String = chars[chars.len().saturating_sub(keep)..].iter().collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
