//! UI/Progress presentation layer
//!
//! All progress reporting goes through the [`ProgressReporter`] trait so the
//! pipeline does not care whether a bar is drawn (`--quiet` and tests use
//! [`SilentProgressReporter`]).

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Stage;

/// Progress reporter for an ingestion run
pub trait ProgressReporter {
    /// An entry starts; `current` is 1-based
    fn start_entry(&mut self, id: &str, current: usize, total: usize);

    /// The current entry moved to another stage
    fn stage(&mut self, id: &str, stage: Stage);

    /// The current entry reached a final state
    fn finish_entry(&mut self);

    /// The run is over
    fn finish(&mut self);
}

/// Progress bar on stderr, one tick per entry
pub struct InteractiveProgressReporter {
    entry_pb: ProgressBar,
    current: String,
}

impl InteractiveProgressReporter {
    /// Create a new interactive progress reporter with total entry count
    pub fn new(total_entries: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let entry_pb = ProgressBar::new(total_entries);
        entry_pb.set_style(style);

        Self {
            entry_pb,
            current: String::new(),
        }
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn start_entry(&mut self, id: &str, current: usize, total: usize) {
        self.current = format!("({}/{}) {}", current, total, id);
        self.entry_pb.set_message(self.current.clone());
    }

    fn stage(&mut self, _id: &str, stage: Stage) {
        self.entry_pb
            .set_message(format!("{} [{}]", self.current, stage));
    }

    fn finish_entry(&mut self) {
        self.entry_pb.inc(1);
    }

    fn finish(&mut self) {
        self.entry_pb.finish_and_clear();
    }
}

/// No-op reporter for quiet mode and tests
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start_entry(&mut self, _id: &str, _current: usize, _total: usize) {}

    fn stage(&mut self, _id: &str, _stage: Stage) {}

    fn finish_entry(&mut self) {}

    fn finish(&mut self) {}
}
