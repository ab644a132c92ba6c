//! SHA-1 search kernel: compilation, buffer management, and the GPU
//! counterpart of the CPU scheduler loop.

use super::{GpuError, MetalContext};
use crate::digest::Sha1Digest;
use crate::keyspace::{self, ALPHABET};
use crate::progress::{ProgressMonitor, ProgressState};
use crate::search::{SearchConfig, SearchOutcome};
use metal::{Buffer, ComputePipelineState, MTLResourceOptions, MTLSize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Candidates per kernel dispatch. Bounds how long the device runs between
/// found-flag checks and interrupt polls on the host.
const DISPATCH_CHUNK: u64 = 1 << 22;

/// Longest word length the GPU backend supports: the kernel indexes the
/// keyspace with 64-bit device registers, and 26^14 already exceeds
/// `u64::MAX`.
pub const MAX_GPU_WORD_LENGTH: usize = 13;

/// Per-dispatch parameters, laid out to match the `SearchParams` struct in
/// `sha1.metal`.
#[repr(C)]
#[derive(Clone, Copy)]
struct SearchParams {
    base_index: u64,
    end_index: u64,
    word_length: u32,
    _pad: u32,
}

/// Compiled SHA-1 search kernel with its persistent device buffers.
pub struct Sha1Kernel {
    context: Arc<MetalContext>,
    pipeline_state: ComputePipelineState,
    charset_buffer: Buffer,
    result_buffer: Buffer,
    found_buffer: Buffer,
}

impl Sha1Kernel {
    /// Compile the shader and build the compute pipeline.
    pub fn new(context: Arc<MetalContext>) -> Result<Self, GpuError> {
        let shader_source = include_str!("sha1.metal");

        let library = context
            .device
            .new_library_with_source(shader_source, &metal::CompileOptions::new())
            .map_err(|e| GpuError::ShaderCompilationFailed(e.to_string()))?;

        let kernel_function = library.get_function("sha1_search", None).map_err(|e| {
            GpuError::ShaderCompilationFailed(format!("failed to find kernel function: {}", e))
        })?;

        let pipeline_state = context
            .device
            .new_compute_pipeline_state_with_function(&kernel_function)
            .map_err(|e| GpuError::PipelineCreationFailed(e.to_string()))?;

        let charset_buffer = context.device.new_buffer_with_data(
            ALPHABET.as_ptr() as *const _,
            ALPHABET.len() as u64,
            MTLResourceOptions::StorageModeShared,
        );
        // 16 bytes matches the fixed word buffer in the shader
        let result_buffer = context
            .device
            .new_buffer(16, MTLResourceOptions::StorageModeShared);
        let found_buffer = context
            .device
            .new_buffer(4, MTLResourceOptions::StorageModeShared);

        Ok(Self {
            context,
            pipeline_state,
            charset_buffer,
            result_buffer,
            found_buffer,
        })
    }

    pub fn device_name(&self) -> String {
        self.context.device_name()
    }

    /// Scan every candidate of one word length for the target digest.
    ///
    /// The keyspace is walked in `DISPATCH_CHUNK`-sized dispatches; between
    /// dispatches the host polls the interrupt flag, flushes progress, and
    /// checks the found flag, giving the same bounded-latency cancellation
    /// as the CPU workers. Returns `Ok(None)` on exhaustion or interrupt.
    pub fn search_length(
        &self,
        word_length: usize,
        target: &Sha1Digest,
        interrupt: &AtomicBool,
        state: &ProgressState,
    ) -> Result<Option<String>, GpuError> {
        if word_length > MAX_GPU_WORD_LENGTH {
            return Err(GpuError::KeyspaceTooLarge(word_length));
        }
        let total = keyspace::combinations(word_length) as u64;

        // Target digest as the five big-endian words the kernel compares
        let mut target_words = [0u32; 5];
        for (i, word) in target_words.iter_mut().enumerate() {
            *word = u32::from_be_bytes(target.0[i * 4..i * 4 + 4].try_into().unwrap());
        }
        let target_buffer = self.context.device.new_buffer_with_data(
            target_words.as_ptr() as *const _,
            (target_words.len() * 4) as u64,
            MTLResourceOptions::StorageModeShared,
        );

        self.clear_found_flag();

        let mut base = 0u64;
        while base < total {
            if interrupt.load(Ordering::Relaxed) || state.is_done() {
                return Ok(None);
            }

            let count = DISPATCH_CHUNK.min(total - base);
            self.dispatch(base, count, word_length, &target_buffer);
            state.add_completed(count);

            if self.found_flag() {
                let word = self.read_result(word_length);
                state.record_found(word.clone());
                return Ok(Some(word));
            }
            base += count;
        }

        Ok(None)
    }

    /// Encode and run one dispatch covering `[base, base + count)`.
    fn dispatch(&self, base: u64, count: u64, word_length: usize, target_buffer: &Buffer) {
        let params = SearchParams {
            base_index: base,
            end_index: base + count,
            word_length: word_length as u32,
            _pad: 0,
        };
        let params_buffer = self.context.device.new_buffer_with_data(
            &params as *const SearchParams as *const _,
            std::mem::size_of::<SearchParams>() as u64,
            MTLResourceOptions::StorageModeShared,
        );

        let command_buffer = self.context.command_queue.new_command_buffer();
        let encoder = command_buffer.new_compute_command_encoder();

        encoder.set_compute_pipeline_state(&self.pipeline_state);
        encoder.set_buffer(0, Some(&self.charset_buffer), 0);
        encoder.set_buffer(1, Some(&params_buffer), 0);
        encoder.set_buffer(2, Some(target_buffer), 0);
        encoder.set_buffer(3, Some(&self.result_buffer), 0);
        encoder.set_buffer(4, Some(&self.found_buffer), 0);

        let thread_execution_width = self.pipeline_state.thread_execution_width();
        let max_total_threads = self.pipeline_state.max_total_threads_per_threadgroup();
        let threadgroup_size = thread_execution_width.min(max_total_threads).min(256);
        let threadgroups = count.div_ceil(threadgroup_size);

        encoder.dispatch_thread_groups(
            MTLSize {
                width: threadgroups,
                height: 1,
                depth: 1,
            },
            MTLSize {
                width: threadgroup_size,
                height: 1,
                depth: 1,
            },
        );
        encoder.end_encoding();

        command_buffer.commit();
        command_buffer.wait_until_completed();
    }

    fn clear_found_flag(&self) {
        unsafe {
            *(self.found_buffer.contents() as *mut u32) = 0;
        }
    }

    fn found_flag(&self) -> bool {
        unsafe { *(self.found_buffer.contents() as *const u32) != 0 }
    }

    fn read_result(&self, word_length: usize) -> String {
        let mut bytes = vec![0u8; word_length];
        unsafe {
            std::ptr::copy_nonoverlapping(
                self.result_buffer.contents() as *const u8,
                bytes.as_mut_ptr(),
                word_length,
            );
        }
        String::from_utf8(bytes).expect("kernel result is ASCII")
    }
}

/// GPU counterpart of [`crate::search::Searcher::run_with_observer`]: the
/// same strictly-increasing length loop and outcome semantics, with the
/// kernel standing in for the CPU worker pool.
pub fn run_search_gpu<F>(
    config: &SearchConfig,
    interrupt: &Arc<AtomicBool>,
    mut on_length: F,
) -> Result<SearchOutcome, GpuError>
where
    F: FnMut(usize, u128),
{
    // Reject an unreachable configuration before any device work starts
    if config.max_length > MAX_GPU_WORD_LENGTH {
        return Err(GpuError::KeyspaceTooLarge(config.max_length));
    }

    let context = super::initialize()?;
    let kernel = Sha1Kernel::new(context)?;
    let session_start = Instant::now();

    for length in config.min_length..=config.max_length {
        if interrupt.load(Ordering::SeqCst) {
            return Ok(SearchOutcome::Interrupted {
                elapsed: session_start.elapsed(),
            });
        }

        let total = keyspace::combinations(length);
        on_length(length, total);

        let state = Arc::new(ProgressState::new(length, total));
        let monitor = config
            .show_progress
            .then(|| ProgressMonitor::spawn(state.clone(), session_start));

        let result = kernel.search_length(length, &config.target, interrupt, &state);

        state.finish();
        if let Some(monitor) = monitor {
            monitor.stop();
        }

        if let Some(word) = result? {
            return Ok(SearchOutcome::Found {
                word,
                elapsed: session_start.elapsed(),
            });
        }
        if interrupt.load(Ordering::SeqCst) {
            return Ok(SearchOutcome::Interrupted {
                elapsed: session_start.elapsed(),
            });
        }
    }

    Ok(SearchOutcome::Exhausted {
        elapsed: session_start.elapsed(),
    })
}
