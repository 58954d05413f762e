//! # GPU Backend
//!
//! Massive parallel computation using wgpu 28.
//!
//! One shader invocation per cell, arranged as a 2D thread grid of
//! `side × side` workgroups (`side` from `compute.gpu_workgroup_size`).
//! The dispatch covers `ceil(width / side) × ceil(height / side)`
//! workgroups and out-of-range invocations return immediately.
//!
//! ## Ping-Pong Buffers
//!
//! Two device storage buffers alternate between the read and write role,
//! each with a pre-built bind group. After a step the fresh generation
//! stays resident on the device, and a host mirror of it is kept. When the
//! next step's read grid matches the mirror (the normal case, since the
//! driver just swapped it in) the upload is skipped entirely. Only the
//! download of each new generation crosses the bus.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use bytemuck::{Pod, Zeroable};

use life_core::cell::Cell;
use life_core::config::LifeConfig;
use life_core::error::{LifeError, LifeResult};
use life_core::grid::{Boundary, Grid};
use life_core::traits::{BackendStats, ComputeBackend};

use super::panic_message;
use crate::shaders::{self, LIFE_STEP_TEMPLATE};

/// GPU-compatible params (matches shader struct)
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
#[repr(C)]
struct GpuParams {
    width: u32,
    height: u32,
    boundary: u32,
    _pad: u32,
}

/// Device resources sized for one grid shape
struct GridResources {
    width: usize,
    height: usize,
    boundary: Boundary,
    /// Ping-pong cell buffers (one `u32` per cell)
    cells: [wgpu::Buffer; 2],
    /// `bind_groups[i]` reads `cells[i]` and writes `cells[1 - i]`
    bind_groups: [wgpu::BindGroup; 2],
    /// Params uniform (kept alive for the bind groups)
    _params: wgpu::Buffer,
    /// Staging buffer for readback
    staging: wgpu::Buffer,
    /// Which of `cells` holds the newest generation
    front: usize,
    /// Host copy of `cells[front]`, None when unknown
    mirror: Option<Vec<Cell>>,
}

impl GridResources {
    fn matches(&self, grid: &Grid) -> bool {
        self.width == grid.width() && self.height == grid.height() && self.boundary == grid.boundary()
    }

    fn byte_len(&self) -> u64 {
        (self.width * self.height * std::mem::size_of::<u32>()) as u64
    }
}

/// GPU compute backend using wgpu
pub struct GpuBackend {
    /// wgpu device
    device: Arc<wgpu::Device>,
    /// Command queue
    queue: Arc<wgpu::Queue>,
    /// Adapter name (for logging)
    adapter_name: String,
    /// Workgroup side length
    workgroup_size: u32,
    /// Statistics
    stats: BackendStats,

    /// Bind group layout
    bind_group_layout: wgpu::BindGroupLayout,
    /// Life step pipeline
    pipeline: wgpu::ComputePipeline,
    /// Buffers for the current grid shape
    resources: Option<GridResources>,
}

impl GpuBackend {
    /// Create a new GPU backend
    pub fn new(config: &LifeConfig) -> LifeResult<Self> {
        // Initialize wgpu
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Find a suitable adapter
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| LifeError::gpu(format!("No suitable GPU adapter found: {}", e)))?;

        // Log adapter info
        let info = adapter.get_info();
        tracing::info!(
            "🎮 GPU: {} ({:?}, {:?})",
            info.name,
            info.device_type,
            info.backend
        );

        // Ask for everything the adapter offers so large boards fit
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Life GPU"),
                required_features: wgpu::Features::empty(),
                required_limits: adapter.limits(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: Default::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
            },
        ))
        .map_err(|e| LifeError::gpu(format!("Failed to create device: {}", e)))?;

        let workgroup_size = config.compute.gpu_workgroup_size;
        Self::check_workgroup(&device.limits(), workgroup_size)?;

        let bind_group_layout = Self::create_bind_group_layout(&device);
        let pipeline = Self::create_pipeline(&device, &bind_group_layout, workgroup_size);

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter_name: info.name,
            workgroup_size,
            stats: BackendStats::default(),
            bind_group_layout,
            pipeline,
            resources: None,
        })
    }

    /// Name of the adapter this backend runs on
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    fn check_workgroup(limits: &wgpu::Limits, side: u32) -> LifeResult<()> {
        let invocations = side.checked_mul(side).unwrap_or(u32::MAX);
        if side == 0
            || side > limits.max_compute_workgroup_size_x
            || side > limits.max_compute_workgroup_size_y
            || invocations > limits.max_compute_invocations_per_workgroup
        {
            return Err(LifeError::gpu(format!(
                "workgroup {}x{} exceeds device limits ({} invocations max)",
                side, side, limits.max_compute_invocations_per_workgroup
            )));
        }
        Ok(())
    }

    fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Life Bind Group Layout"),
            entries: &[
                // Current generation (read-only storage)
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Next generation (read-write storage)
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Params (uniform)
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        })
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        workgroup_size: u32,
    ) -> wgpu::ComputePipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Life Step Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::render(LIFE_STEP_TEMPLATE, workgroup_size).into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Life Pipeline Layout"),
            bind_group_layouts: &[layout],
            immediate_size: 0,
        });

        tracing::debug!("🎮 Life pipeline created ({0}x{0} workgroups)", workgroup_size);

        device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Life Step Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        })
    }

    /// Workgroups needed along each axis
    fn workgroups(&self, width: usize, height: usize) -> (u32, u32) {
        let side = self.workgroup_size as usize;
        (width.div_ceil(side) as u32, height.div_ceil(side) as u32)
    }

    /// Reject shapes the device cannot hold or dispatch
    fn check_shape(&self, grid: &Grid) -> LifeResult<()> {
        let limits = self.device.limits();
        let (width, height) = grid.dimensions();
        let bytes = (grid.cell_count() as u64).saturating_mul(std::mem::size_of::<u32>() as u64);

        if width > i32::MAX as usize || height > i32::MAX as usize || grid.cell_count() > u32::MAX as usize {
            return Err(LifeError::gpu(format!("grid {}x{} too large for 32-bit indexing", width, height)));
        }
        if bytes > limits.max_storage_buffer_binding_size as u64 || bytes > limits.max_buffer_size {
            return Err(LifeError::gpu(format!(
                "grid needs {} bytes, device allows {} per binding",
                bytes, limits.max_storage_buffer_binding_size
            )));
        }
        let (gx, gy) = self.workgroups(width, height);
        if gx > limits.max_compute_workgroups_per_dimension || gy > limits.max_compute_workgroups_per_dimension {
            return Err(LifeError::gpu(format!(
                "dispatch {}x{} exceeds {} workgroups per dimension",
                gx, gy, limits.max_compute_workgroups_per_dimension
            )));
        }
        Ok(())
    }

    /// Allocate buffers and bind groups for the grid's shape
    fn init_buffers(&mut self, grid: &Grid) -> LifeResult<()> {
        self.check_shape(grid)?;

        let (width, height) = grid.dimensions();
        let bytes = (grid.cell_count() * std::mem::size_of::<u32>()) as u64;

        tracing::info!(
            "🎮 GPU: Allocating {} KB for a {}x{} {:?} grid",
            (bytes * 2) / 1024,
            width,
            height,
            grid.boundary()
        );

        let make_cells = |label: &'static str| {
            self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: bytes,
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_DST
                    | wgpu::BufferUsages::COPY_SRC,
                mapped_at_creation: false,
            })
        };
        let cells = [make_cells("Cells A"), make_cells("Cells B")];

        let params = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Params"),
            size: std::mem::size_of::<GpuParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let gpu_params = GpuParams {
            width: width as u32,
            height: height as u32,
            boundary: grid.boundary().to_u32(),
            _pad: 0,
        };
        self.queue.write_buffer(&params, 0, bytemuck::bytes_of(&gpu_params));

        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Staging"),
            size: bytes,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let make_bind_group = |label: &'static str, src: &wgpu::Buffer, dst: &wgpu::Buffer| {
            self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: src.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: dst.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: params.as_entire_binding(),
                    },
                ],
            })
        };
        let bind_groups = [
            make_bind_group("Life A->B", &cells[0], &cells[1]),
            make_bind_group("Life B->A", &cells[1], &cells[0]),
        ];

        self.resources = Some(GridResources {
            width,
            height,
            boundary: grid.boundary(),
            cells,
            bind_groups,
            _params: params,
            staging,
            front: 0,
            mirror: None,
        });
        Ok(())
    }

    /// Make sure the front buffer holds `read`, uploading only if needed
    fn ensure_resident(&mut self, read: &Grid) -> LifeResult<()> {
        let resources = self
            .resources
            .as_mut()
            .ok_or_else(|| LifeError::gpu("Cell buffers not initialized"))?;

        if resources.mirror.as_deref() == Some(read.cells()) {
            return Ok(());
        }

        let words: Vec<u32> = read.cells().iter().map(|c| c.to_u32()).collect();
        self.queue
            .write_buffer(&resources.cells[resources.front], 0, bytemuck::cast_slice(&words));
        resources.mirror = Some(read.cells().to_vec());
        self.stats.bytes_uploaded += resources.byte_len();
        Ok(())
    }

    /// Dispatch one generation and copy the result into the staging buffer
    fn run_step(&self) -> LifeResult<()> {
        let resources = self
            .resources
            .as_ref()
            .ok_or_else(|| LifeError::gpu("Cell buffers not initialized"))?;
        let (gx, gy) = self.workgroups(resources.width, resources.height);
        let back = 1 - resources.front;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Life Step Encoder"),
            });

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Life Step Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &resources.bind_groups[resources.front], &[]);
            pass.dispatch_workgroups(gx, gy, 1);
        }

        encoder.copy_buffer_to_buffer(
            &resources.cells[back],
            0,
            &resources.staging,
            0,
            resources.byte_len(),
        );
        self.queue.submit(Some(encoder.finish()));
        Ok(())
    }

    /// Wait for the step, then read the staging buffer into `write`
    fn download(&self, write: &mut Grid) -> LifeResult<()> {
        let resources = self
            .resources
            .as_ref()
            .ok_or_else(|| LifeError::gpu("Cell buffers not initialized"))?;

        let buffer_slice = resources.staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None, // Wait for most recent submission
                timeout: None,          // Wait indefinitely
            })
            .map_err(|e| LifeError::gpu(format!("Device poll failed: {:?}", e)))?;

        rx.recv()
            .map_err(|e| LifeError::gpu(format!("Failed to receive map result: {}", e)))?
            .map_err(|e| LifeError::gpu(format!("Failed to map buffer: {:?}", e)))?;

        {
            let data = buffer_slice.get_mapped_range();
            let words: &[u32] = bytemuck::cast_slice(&data);
            for (cell, &word) in write.cells_mut().iter_mut().zip(words) {
                *cell = Cell::from_u32(word);
            }
        }

        resources.staging.unmap();
        Ok(())
    }

    fn step_inner(&mut self, read: &Grid, write: &mut Grid) -> LifeResult<()> {
        read.check_same_shape(write)?;

        let reshape = self.resources.as_ref().map_or(true, |r| !r.matches(read));
        if reshape {
            self.init_buffers(read)?;
        }

        self.ensure_resident(read)?;
        self.run_step()?;
        self.download(write)?;

        if let Some(resources) = self.resources.as_mut() {
            resources.front = 1 - resources.front;
            resources.mirror = Some(write.cells().to_vec());
            self.stats.bytes_downloaded += resources.byte_len();
        }
        Ok(())
    }
}

impl ComputeBackend for GpuBackend {
    fn init(&mut self, config: &LifeConfig) -> LifeResult<()> {
        let side = config.compute.gpu_workgroup_size;
        if side != self.workgroup_size {
            Self::check_workgroup(&self.device.limits(), side)?;
            self.pipeline = Self::create_pipeline(&self.device, &self.bind_group_layout, side);
            self.workgroup_size = side;
            // Dispatch shape changed; rebuild buffers on the next step
            self.resources = None;
        }
        Ok(())
    }

    fn step(&mut self, read: &Grid, write: &mut Grid) -> LifeResult<()> {
        let start = Instant::now();

        // wgpu reports uncaptured device errors by panicking
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.step_inner(read, write)));
        let result = match outcome {
            Ok(result) => result,
            Err(payload) => Err(LifeError::gpu(format!(
                "device fault: {}",
                panic_message(payload.as_ref())
            ))),
        };

        match result {
            Ok(()) => {
                self.stats.steps += 1;
                self.stats.cells_processed += read.cell_count() as u64;
                self.stats.compute_time_us = start.elapsed().as_micros() as u64;
                Ok(())
            }
            Err(LifeError::Gpu(msg)) => {
                // Device contents are unknown now; force a fresh upload next time
                if let Some(resources) = self.resources.as_mut() {
                    resources.mirror = None;
                }
                tracing::error!("🎮 GPU step aborted: {}", msg);
                Err(LifeError::backend(format!("GPU step failed: {}", msg)))
            }
            Err(other) => Err(other),
        }
    }

    fn stats(&self) -> BackendStats {
        self.stats.clone()
    }

    fn sync(&mut self) -> LifeResult<()> {
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .map_err(|e| LifeError::gpu(format!("Device poll failed: {:?}", e)))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "GPU (wgpu)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SequentialBackend;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gpu() -> Option<GpuBackend> {
        match GpuBackend::new(&LifeConfig::default()) {
            Ok(backend) => Some(backend),
            Err(e) => {
                println!("GPU not available: {}", e);
                None
            }
        }
    }

    #[test]
    fn test_gpu_params_size() {
        assert_eq!(std::mem::size_of::<GpuParams>(), 16);
    }

    #[test]
    fn test_gpu_backend_creation() {
        let config = LifeConfig::default();
        let result = GpuBackend::new(&config);
        if result.is_err() {
            println!("GPU not available: {:?}", result.err());
        }
    }

    #[test]
    fn test_gpu_matches_sequential() {
        let Some(mut gpu) = gpu() else { return };
        let mut seq = SequentialBackend::new();

        for boundary in [Boundary::Bounded, Boundary::Toroidal] {
            // Not a multiple of the workgroup side, to exercise the edge guard
            let mut read = Grid::new(45, 19, boundary).unwrap();
            read.fill_random(&mut StdRng::seed_from_u64(3), 0.35).unwrap();

            let mut expected = Grid::new(45, 19, boundary).unwrap();
            let mut actual = Grid::new(45, 19, boundary).unwrap();
            seq.step(&read, &mut expected).unwrap();
            gpu.step(&read, &mut actual).unwrap();
            assert_eq!(expected.as_bytes(), actual.as_bytes());
        }
    }

    #[test]
    fn test_resident_generation_skips_upload() {
        let Some(mut gpu) = gpu() else { return };

        let mut a = Grid::with_live_cells(16, 16, Boundary::Bounded, &[(5, 4), (5, 5), (5, 6)]).unwrap();
        let mut b = Grid::new(16, 16, Boundary::Bounded).unwrap();

        gpu.step(&a, &mut b).unwrap();
        let uploaded = gpu.stats().bytes_uploaded;
        gpu.step(&b, &mut a).unwrap();
        assert_eq!(gpu.stats().bytes_uploaded, uploaded);

        // Blinker is back where it started
        assert_eq!(a.live_cells().collect::<Vec<_>>(), vec![(5, 4), (5, 5), (5, 6)]);
    }
}
