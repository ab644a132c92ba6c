use crate::digest::{sha1, Sha1Digest};
use crate::error::Result;
use crate::keyspace;
use crate::partition::{partition, WorkRange};
use crate::progress::{ProgressMonitor, ProgressState};
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Longest word length attempted before the search gives up.
pub const DEFAULT_MAX_LENGTH: usize = 15;

/// How often a worker polls the cancellation flags, in candidates.
const CANCEL_CHECK_INTERVAL: u64 = 512;

/// How often a worker flushes its local count into the shared progress
/// counter, in candidates.
const PROGRESS_FLUSH_INTERVAL: u64 = 4096;

/// Configuration for one search session
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// The digest the search is trying to invert.
    pub target: Sha1Digest,
    /// First word length attempted (the reference tool starts at 1).
    pub min_length: usize,
    /// Last word length attempted before reporting exhaustion.
    pub max_length: usize,
    /// Worker pool size.
    pub num_threads: usize,
    /// Render the in-place progress line while searching.
    pub show_progress: bool,
}

impl SearchConfig {
    pub fn new(target: Sha1Digest) -> Self {
        Self {
            target,
            min_length: 1,
            max_length: DEFAULT_MAX_LENGTH,
            num_threads: num_cpus::get(),
            show_progress: false,
        }
    }
}

/// Terminal value of one search session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A preimage of the target digest was found.
    Found { word: String, elapsed: Duration },
    /// Every length up to the configured maximum was searched without a match.
    Exhausted { elapsed: Duration },
    /// The caller requested cancellation mid-search.
    Interrupted { elapsed: Duration },
}

/// Orchestrates the search across increasing word lengths.
///
/// Owns a fixed-size rayon pool for the whole session. Per length: the
/// keyspace is partitioned into one contiguous range per worker, every range
/// is scanned concurrently, and the first discovered match stops the rest of
/// the pool cooperatively. Lengths are strictly increasing, so the shortest
/// preimage in the searched space always wins.
pub struct Searcher {
    config: SearchConfig,
    pool: rayon::ThreadPool,
}

impl Searcher {
    /// Build the worker pool. Pool construction failure is fatal to the
    /// session and surfaced immediately.
    pub fn new(config: SearchConfig) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .build()?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run the search to completion, exhaustion, or interruption.
    pub fn run(&self, interrupt: &Arc<AtomicBool>) -> SearchOutcome {
        self.run_with_observer(interrupt, |_, _| {})
    }

    /// Like [`run`](Self::run), with a callback invoked at the start of every
    /// word length with `(length, total_combinations)`. The CLI uses it to
    /// print the per-length banner; tests use it to assert which lengths were
    /// attempted.
    pub fn run_with_observer<F>(&self, interrupt: &Arc<AtomicBool>, mut on_length: F) -> SearchOutcome
    where
        F: FnMut(usize, u128),
    {
        let session_start = Instant::now();

        for length in self.config.min_length..=self.config.max_length {
            if interrupt.load(Ordering::SeqCst) {
                return SearchOutcome::Interrupted {
                    elapsed: session_start.elapsed(),
                };
            }

            let total = keyspace::combinations(length);
            on_length(length, total);

            let state = Arc::new(ProgressState::new(length, total));
            let monitor = self
                .config
                .show_progress
                .then(|| ProgressMonitor::spawn(state.clone(), session_start));

            let ranges = partition(total, self.config.num_threads, length);
            let target = self.config.target;

            // install() blocks until every worker for this length has exited,
            // so the per-length state is never torn down under a live worker.
            let scheduled = self.pool.install(|| {
                ranges
                    .into_par_iter()
                    .find_map_any(|range| search_range(&target, range, &state, interrupt))
            });

            state.finish();
            if let Some(monitor) = monitor {
                monitor.stop();
            }

            // The found slot holds the first *discovered* match; fall back to
            // whatever rayon surfaced in case a worker exited before writing.
            if let Some(word) = state.found().or(scheduled) {
                return SearchOutcome::Found {
                    word,
                    elapsed: session_start.elapsed(),
                };
            }
            if interrupt.load(Ordering::SeqCst) {
                return SearchOutcome::Interrupted {
                    elapsed: session_start.elapsed(),
                };
            }
        }

        SearchOutcome::Exhausted {
            elapsed: session_start.elapsed(),
        }
    }
}

/// Scan one range, containing any panic at the worker boundary.
///
/// A faulting worker is treated as "this range produced no result"; sibling
/// ranges keep running.
fn search_range(
    target: &Sha1Digest,
    range: WorkRange,
    state: &ProgressState,
    interrupt: &Arc<AtomicBool>,
) -> Option<String> {
    match catch_unwind(AssertUnwindSafe(|| scan_range(target, range, state, interrupt))) {
        Ok(found) => found,
        Err(_) => {
            eprintln!(
                "worker failed while scanning indices {}..{} at length {}",
                range.start,
                range.end(),
                range.word_length
            );
            None
        }
    }
}

/// The innermost loop: enumerate the range, digest every candidate, compare
/// against the target. Polls both cancellation flags every
/// `CANCEL_CHECK_INTERVAL` candidates and batches progress updates so the
/// shared counter is not contended per candidate.
fn scan_range(
    target: &Sha1Digest,
    range: WorkRange,
    state: &ProgressState,
    interrupt: &Arc<AtomicBool>,
) -> Option<String> {
    if range.is_empty() {
        return None;
    }

    let mut word = vec![0u8; range.word_length];
    let mut pending: u64 = 0;
    let end = range.end();
    let mut index = range.start;

    while index < end {
        if pending % CANCEL_CHECK_INTERVAL == 0
            && (state.is_done() || interrupt.load(Ordering::Relaxed))
        {
            state.add_completed(pending);
            return None;
        }

        keyspace::nth_into(&mut word, index);
        if sha1(&word) == *target {
            state.add_completed(pending + 1);
            let found = String::from_utf8(word).expect("alphabet is ASCII");
            state.record_found(found.clone());
            return Some(found);
        }

        pending += 1;
        if pending == PROGRESS_FLUSH_INTERVAL {
            state.add_completed(pending);
            pending = 0;
        }
        index += 1;
    }

    state.add_completed(pending);
    None
}
