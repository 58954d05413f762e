//! # Life Compute
//!
//! Execution backends for the Life stepper.
//!
//! This crate provides three backends:
//! - **Sequential**: Single-threaded reference implementation
//! - **CPU**: Uses Rayon to compute rows in parallel
//! - **GPU**: Uses wgpu with one shader invocation per cell
//!
//! All three produce byte-identical generations.
//!
//! ## Backend Selection
//!
//! Set `compute.backend` in [`LifeConfig`] (or `LIFE_BACKEND`):
//! - `sequential` - Reference backend
//! - `cpu` - Force CPU backend
//! - `gpu` - Force GPU backend
//! - `auto` (default) - GPU for large boards when available, else CPU

pub mod backend;
pub mod shaders;

pub use backend::{CpuBackend, GpuBackend, SequentialBackend};

use life_core::config::{ComputeBackendType, LifeConfig};
use life_core::error::LifeResult;
use life_core::traits::ComputeBackend;

/// Create the appropriate compute backend based on configuration
pub fn create_backend(config: &LifeConfig) -> LifeResult<Box<dyn ComputeBackend>> {
    match config.compute.backend {
        ComputeBackendType::Auto => {
            let cells = config.cell_count();

            if cells >= config.compute.gpu_min_cells && gpu_available() {
                match GpuBackend::new(config) {
                    Ok(gpu) => {
                        tracing::info!("Using GPU backend (wgpu) for {} cells", cells);
                        return Ok(Box::new(gpu));
                    }
                    Err(e) => {
                        tracing::warn!("GPU not available ({}), falling back to CPU", e);
                    }
                }
            }

            match CpuBackend::new(config) {
                Ok(cpu) => {
                    tracing::info!("Using CPU backend (Rayon)");
                    Ok(Box::new(cpu))
                }
                Err(e) => {
                    tracing::warn!("CPU pool unavailable ({}), falling back to sequential", e);
                    Ok(Box::new(SequentialBackend::new()))
                }
            }
        }
        ComputeBackendType::Sequential => {
            tracing::info!("Using sequential backend");
            Ok(Box::new(SequentialBackend::new()))
        }
        ComputeBackendType::Cpu => {
            tracing::info!("Using CPU backend (Rayon)");
            Ok(Box::new(CpuBackend::new(config)?))
        }
        ComputeBackendType::Gpu => {
            tracing::info!("Using GPU backend (wgpu)");
            Ok(Box::new(GpuBackend::new(config)?))
        }
    }
}

/// Check if GPU is available on this system
pub fn gpu_available() -> bool {
    if std::env::var("LIFE_FORCE_CPU").is_ok() {
        return false;
    }

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapters = pollster::block_on(instance.enumerate_adapters(wgpu::Backends::all()));
    !adapters.is_empty()
}

/// Get information about available compute devices
pub fn device_info() -> Vec<DeviceInfo> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapters = pollster::block_on(instance.enumerate_adapters(wgpu::Backends::all()));

    adapters
        .into_iter()
        .map(|adapter| {
            let info = adapter.get_info();
            DeviceInfo {
                name: info.name,
                vendor: info.vendor.to_string(),
                device_type: format!("{:?}", info.device_type),
                backend: format!("{:?}", info.backend),
            }
        })
        .collect()
}

/// Information about a compute device
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub name: String,
    pub vendor: String,
    pub device_type: String,
    pub backend: String,
}
