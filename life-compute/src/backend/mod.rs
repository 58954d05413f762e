//! # Compute Backends
//!
//! Implementations of the ComputeBackend trait: a sequential reference,
//! Rayon on the CPU, and wgpu on the GPU.

mod cpu;
mod gpu;
mod sequential;

pub use cpu::CpuBackend;
pub use gpu::GpuBackend;
pub use sequential::SequentialBackend;

use std::any::Any;

/// Best-effort text of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
