// src/progress.rs

//! Progress reporting for long transfers
//!
//! Bootstrap downloads are large and their size is not always announced by
//! the server, so the total is an `Option`. Reporting is feedback only:
//! nothing in the download path reads progress back.
//!
//! Implementations:
//! - `SilentProgress`: no-op for scripted/quiet modes
//! - `LogProgress`: logs roughly every tenth of the transfer to tracing
//! - `CallbackProgress`: forwards [`ProgressEvent`]s to a closure
//!
//! The binary adds an indicatif-backed tracker for terminals.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::info;

/// Unknown-size transfers are logged every this many bytes
const LOG_INTERVAL_UNKNOWN: u64 = 16 * 1024 * 1024;

/// Sentinel stored for "no total known"
const NO_TOTAL: u64 = u64::MAX;

/// Percentage of `current` over a known, non-zero `total`
pub fn percent(current: u64, total: Option<u64>) -> Option<f64> {
    match total {
        Some(total) if total > 0 => Some(current as f64 * 100.0 / total as f64),
        _ => None,
    }
}

/// Core trait for progress tracking
pub trait ProgressTracker {
    /// Set the current status message
    fn set_message(&self, message: &str);

    /// Set the expected total, if known
    fn set_length(&self, length: Option<u64>);

    /// Set progress to a specific position
    fn set_position(&self, position: u64);

    /// Advance progress by the given amount
    fn increment(&self, amount: u64) {
        self.set_position(self.position() + amount);
    }

    /// Get current position
    fn position(&self) -> u64;

    /// Get total length, if known
    fn length(&self) -> Option<u64>;

    /// Finish progress successfully with a message
    fn finish_with_message(&self, message: &str);

    /// Finish progress with an error/abandonment message
    fn finish_with_error(&self, message: &str);

    /// Check if progress is finished
    fn is_finished(&self) -> bool;
}

fn load_length(length: &AtomicU64) -> Option<u64> {
    match length.load(Ordering::Relaxed) {
        NO_TOTAL => None,
        n => Some(n),
    }
}

fn store_length(length: &AtomicU64, value: Option<u64>) {
    length.store(value.unwrap_or(NO_TOTAL), Ordering::Relaxed);
}

/// Silent progress tracker (no-op)
#[derive(Debug)]
pub struct SilentProgress {
    position: AtomicU64,
    length: AtomicU64,
    finished: AtomicBool,
}

impl SilentProgress {
    pub fn new() -> Self {
        Self {
            position: AtomicU64::new(0),
            length: AtomicU64::new(NO_TOTAL),
            finished: AtomicBool::new(false),
        }
    }
}

impl Default for SilentProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker for SilentProgress {
    fn set_message(&self, _message: &str) {}

    fn set_length(&self, length: Option<u64>) {
        store_length(&self.length, length);
    }

    fn set_position(&self, position: u64) {
        self.position.store(position, Ordering::Relaxed);
    }

    fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    fn length(&self) -> Option<u64> {
        load_length(&self.length)
    }

    fn finish_with_message(&self, _message: &str) {
        self.finished.store(true, Ordering::Relaxed);
    }

    fn finish_with_error(&self, _message: &str) {
        self.finished.store(true, Ordering::Relaxed);
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }
}

/// Logging progress tracker
///
/// Logs at info level about ten times per known-size transfer, or every
/// 16 MiB when the size is unknown.
#[derive(Debug)]
pub struct LogProgress {
    name: Mutex<String>,
    position: AtomicU64,
    length: AtomicU64,
    finished: AtomicBool,
}

impl LogProgress {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Mutex::new(name.into()),
            position: AtomicU64::new(0),
            length: AtomicU64::new(NO_TOTAL),
            finished: AtomicBool::new(false),
        }
    }

    fn name(&self) -> String {
        self.name.lock().map(|n| n.clone()).unwrap_or_default()
    }

    fn interval(&self) -> u64 {
        match load_length(&self.length) {
            Some(total) => std::cmp::max(1, total / 10),
            None => LOG_INTERVAL_UNKNOWN,
        }
    }
}

impl ProgressTracker for LogProgress {
    fn set_message(&self, message: &str) {
        if let Ok(mut name) = self.name.lock() {
            *name = message.to_string();
        }
        info!("{}", message);
    }

    fn set_length(&self, length: Option<u64>) {
        store_length(&self.length, length);
    }

    fn set_position(&self, position: u64) {
        let old = self.position.swap(position, Ordering::Relaxed);
        let interval = self.interval();
        if position / interval > old / interval {
            let total = load_length(&self.length);
            match percent(position, total) {
                Some(pct) => info!(
                    "{}: {:5.1}% ({}/{})",
                    self.name(),
                    pct,
                    position,
                    total.unwrap_or_default()
                ),
                None => info!("{}: read {} bytes", self.name(), position),
            }
        }
    }

    fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    fn length(&self) -> Option<u64> {
        load_length(&self.length)
    }

    fn finish_with_message(&self, message: &str) {
        self.finished.store(true, Ordering::Relaxed);
        info!("{}: {}", self.name(), message);
    }

    fn finish_with_error(&self, message: &str) {
        self.finished.store(true, Ordering::Relaxed);
        info!("{}: ERROR - {}", self.name(), message);
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }
}

/// Events emitted by callback progress tracker
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Message updated
    Message(String),
    /// Position changed
    Position { current: u64, total: Option<u64> },
    /// Progress finished successfully
    Finished(String),
    /// Progress finished with error
    Error(String),
}

/// Callback-based progress tracker
pub struct CallbackProgress<F>
where
    F: Fn(ProgressEvent),
{
    callback: F,
    position: AtomicU64,
    length: AtomicU64,
    finished: AtomicBool,
}

impl<F> CallbackProgress<F>
where
    F: Fn(ProgressEvent),
{
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            position: AtomicU64::new(0),
            length: AtomicU64::new(NO_TOTAL),
            finished: AtomicBool::new(false),
        }
    }
}

impl<F> ProgressTracker for CallbackProgress<F>
where
    F: Fn(ProgressEvent),
{
    fn set_message(&self, message: &str) {
        (self.callback)(ProgressEvent::Message(message.to_string()));
    }

    fn set_length(&self, length: Option<u64>) {
        store_length(&self.length, length);
    }

    fn set_position(&self, position: u64) {
        self.position.store(position, Ordering::Relaxed);
        (self.callback)(ProgressEvent::Position {
            current: position,
            total: load_length(&self.length),
        });
    }

    fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    fn length(&self) -> Option<u64> {
        load_length(&self.length)
    }

    fn finish_with_message(&self, message: &str) {
        self.finished.store(true, Ordering::Relaxed);
        (self.callback)(ProgressEvent::Finished(message.to_string()));
    }

    fn finish_with_error(&self, message: &str) {
        self.finished.store(true, Ordering::Relaxed);
        (self.callback)(ProgressEvent::Error(message.to_string()));
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_percent() {
        assert_eq!(percent(50, Some(200)), Some(25.0));
        assert_eq!(percent(50, Some(0)), None);
        assert_eq!(percent(50, None), None);
    }

    #[test]
    fn test_silent_progress() {
        let progress = SilentProgress::new();
        assert_eq!(progress.length(), None);

        progress.set_length(Some(100));
        progress.increment(10);
        assert_eq!(progress.position(), 10);
        assert_eq!(progress.length(), Some(100));

        progress.set_position(50);
        assert_eq!(progress.position(), 50);

        assert!(!progress.is_finished());
        progress.finish_with_message("done");
        assert!(progress.is_finished());
    }

    #[test]
    fn test_log_progress() {
        let progress = LogProgress::new("mainnet");
        progress.set_length(Some(100));

        progress.increment(25);
        progress.increment(25);
        assert_eq!(progress.position(), 50);

        progress.set_length(None);
        progress.set_position(LOG_INTERVAL_UNKNOWN * 2);
        progress.finish_with_message("complete");
        assert!(progress.is_finished());
    }

    #[test]
    fn test_callback_progress() {
        let events = RefCell::new(Vec::new());

        let progress = CallbackProgress::new(|event| events.borrow_mut().push(event));
        progress.set_message("starting");
        progress.set_length(Some(100));
        progress.increment(50);
        progress.set_length(None);
        progress.increment(10);
        progress.finish_with_message("done");
        drop(progress);

        let captured = events.into_inner();
        assert_eq!(
            captured,
            vec![
                ProgressEvent::Message("starting".into()),
                ProgressEvent::Position {
                    current: 50,
                    total: Some(100)
                },
                ProgressEvent::Position {
                    current: 60,
                    total: None
                },
                ProgressEvent::Finished("done".into()),
            ]
        );
    }
}
