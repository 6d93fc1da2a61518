// src/commands/progress.rs
//! Terminal progress bars for bootstrap downloads

use indicatif::{ProgressBar, ProgressStyle};
use metronotes_setup::progress::ProgressTracker;
use std::time::Duration;

/// Download bar backed by indicatif
///
/// Shows a byte bar when the size is known and a byte counter with a
/// spinner when it is not.
pub struct BarProgress {
    bar: ProgressBar,
}

fn sized_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("  {msg} [{bar:30.cyan/dim}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
        .expect("Invalid progress bar template")
        .progress_chars("#>-")
}

fn unsized_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("  {spinner:.green} {msg} {bytes} ({bytes_per_sec})")
        .expect("Invalid spinner template")
}

impl BarProgress {
    pub fn new(name: &str) -> Self {
        let bar = ProgressBar::no_length();
        bar.set_style(unsized_style());
        bar.set_message(name.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }
}

impl ProgressTracker for BarProgress {
    fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn set_length(&self, length: Option<u64>) {
        if let Some(length) = length {
            self.bar.set_style(sized_style());
            self.bar.set_length(length);
        }
    }

    fn set_position(&self, position: u64) {
        self.bar.set_position(position);
    }

    fn position(&self) -> u64 {
        self.bar.position()
    }

    fn length(&self) -> Option<u64> {
        self.bar.length()
    }

    fn finish_with_message(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    fn finish_with_error(&self, message: &str) {
        self.bar.abandon_with_message(format!("FAILED: {}", message));
    }

    fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}
