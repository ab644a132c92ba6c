//! Metal-accelerated search backend (cargo feature `gpu`, macOS only).
//!
//! The GPU runs the same enumeration and SHA-1 logic as the CPU workers,
//! one candidate per work-item. The kernel is an independent implementation
//! of the digest algorithm and must be validated against the CPU engine
//! (see `tests/gpu_cpu_consistency.rs`) before its results are trusted.

pub mod kernel;

use metal::{CommandQueue, Device};
use std::sync::Arc;
use thiserror::Error;

/// Metal GPU context holding device and command queue
pub struct MetalContext {
    pub device: Device,
    pub command_queue: CommandQueue,
}

/// Error types for GPU operations
#[derive(Error, Debug)]
pub enum GpuError {
    #[error("Metal is not available on this system")]
    MetalNotAvailable,

    #[error("shader compilation failed: {0}")]
    ShaderCompilationFailed(String),

    #[error("pipeline creation failed: {0}")]
    PipelineCreationFailed(String),

    #[error("keyspace for word length {0} exceeds the GPU index range")]
    KeyspaceTooLarge(usize),
}

impl MetalContext {
    /// Create a new Metal context with the default device
    pub fn new() -> Result<Self, GpuError> {
        let device = Device::system_default().ok_or(GpuError::MetalNotAvailable)?;
        let command_queue = device.new_command_queue();

        Ok(MetalContext {
            device,
            command_queue,
        })
    }

    /// Check if Metal is available on this system
    pub fn is_available() -> bool {
        Device::system_default().is_some()
    }

    /// Get device name for logging
    pub fn device_name(&self) -> String {
        self.device.name().to_string()
    }
}

/// Check if GPU acceleration is available
pub fn is_gpu_available() -> bool {
    MetalContext::is_available()
}

/// Initialize GPU context (convenience function)
pub fn initialize() -> Result<Arc<MetalContext>, GpuError> {
    MetalContext::new().map(Arc::new)
}

pub use kernel::{run_search_gpu, Sha1Kernel, MAX_GPU_WORD_LENGTH};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metal_availability() {
        // Passes on macOS with Metal; reports absence elsewhere
        let available = is_gpu_available();
        println!("Metal available: {}", available);

        if available {
            let context = MetalContext::new();
            assert!(context.is_ok());

            if let Ok(ctx) = context {
                println!("Metal device: {}", ctx.device_name());
            }
        }
    }
}
