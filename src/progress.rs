use crate::stats::format_running_time;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Shared progress state for one word-length iteration.
///
/// Created fresh for every length, written by the search workers and read by
/// the progress monitor, then torn down when the length completes. The
/// counter is advisory: workers flush local counts in batches, so it may lag
/// the true position but never affects the search outcome.
pub struct ProgressState {
    word_length: usize,
    total: u128,
    completed: AtomicU64,
    found: Mutex<Option<String>>,
    done: AtomicBool,
}

impl ProgressState {
    pub fn new(word_length: usize, total: u128) -> Self {
        Self {
            word_length,
            total,
            completed: AtomicU64::new(0),
            found: Mutex::new(None),
            done: AtomicBool::new(false),
        }
    }

    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// Total combinations for this word length.
    pub fn total(&self) -> u128 {
        self.total
    }

    /// Add a batch of completed candidates to the shared counter.
    #[inline]
    pub fn add_completed(&self, n: u64) {
        if n > 0 {
            self.completed.fetch_add(n, Ordering::Relaxed);
        }
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Completion percentage in `[0, 100]`.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.completed() as f64 / self.total as f64 * 100.0).min(100.0)
    }

    /// Record a match and signal every other worker to stop.
    ///
    /// The first writer wins; later calls for the same length are ignored.
    pub fn record_found(&self, word: String) {
        let mut slot = self.found.lock().expect("found slot poisoned");
        if slot.is_none() {
            *slot = Some(word);
        }
        drop(slot);
        self.done.store(true, Ordering::SeqCst);
    }

    pub fn found(&self) -> Option<String> {
        self.found.lock().expect("found slot poisoned").clone()
    }

    /// Mark the iteration finished (found, exhausted, or interrupted).
    /// Doubles as the per-length cancellation signal polled by workers.
    pub fn finish(&self) {
        self.done.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }
}

/// Background thread that periodically renders the progress line.
///
/// Runs independently of the search workers and never blocks them; it only
/// reads the shared counters. Stops when the state is marked done, flushing
/// a final status line and newline so output is not left mid-line.
pub struct ProgressMonitor {
    handle: JoinHandle<()>,
    state: Arc<ProgressState>,
}

/// Refresh interval for the status line.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(200);

impl ProgressMonitor {
    /// Spawn a monitor over the given per-length state. `session_start` is
    /// the wall-clock start of the whole search, not of this length.
    pub fn spawn(state: Arc<ProgressState>, session_start: Instant) -> Self {
        let thread_state = state.clone();
        let handle = thread::spawn(move || {
            while !thread_state.is_done() {
                print_status(&thread_state, session_start);
                thread::sleep(REFRESH_INTERVAL);
            }
            // Final refresh so the closing percentage is visible
            print_status(&thread_state, session_start);
            println!();
        });
        Self { handle, state }
    }

    /// Stop the monitor and wait for its final line to be flushed.
    pub fn stop(self) {
        self.state.finish();
        let _ = self.handle.join();
    }
}

fn print_status(state: &ProgressState, session_start: Instant) {
    print!(
        "\rTime: {} | Progress: {:.2}%",
        format_running_time(session_start.elapsed()),
        state.percent()
    );
    let _ = std::io::stdout().flush();
}
