//! Parallel SHA-1 brute-force preimage search.
//!
//! Searches the keyspace of lowercase-alphabetic strings of increasing
//! length for one whose SHA-1 digest equals a caller-supplied target,
//! partitioning each length's keyspace across a fixed pool of workers
//! (CPU threads, or Metal GPU work-items with the `gpu` feature).

pub mod digest;
pub mod error;
pub mod keyspace;
pub mod partition;
pub mod progress;
pub mod search;
pub mod stats;

#[cfg(feature = "gpu")]
pub mod gpu;

pub use digest::{sha1, Sha1Digest, DIGEST_LEN};
pub use error::CrackError;
pub use keyspace::{combinations, index_of, nth, ALPHABET};
pub use partition::{partition, WorkRange};
pub use progress::{ProgressMonitor, ProgressState};
pub use search::{SearchConfig, SearchOutcome, Searcher, DEFAULT_MAX_LENGTH};
pub use stats::{estimate_time, format_duration, format_number, format_running_time, format_speed};

#[cfg(feature = "gpu")]
pub use gpu::{is_gpu_available, run_search_gpu, GpuError, MetalContext, Sha1Kernel};
