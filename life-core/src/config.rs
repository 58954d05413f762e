//! # Configuration
//!
//! Board dimensions, generation count, seeding and compute backend
//! preference for one simulation run. Defaults follow the classic
//! 20x20 board advanced for 700 generations.

use serde::{Deserialize, Serialize};

use crate::error::{LifeError, LifeResult};
use crate::grid::{Boundary, Grid};

/// Master configuration for a Life run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LifeConfig {
    /// Board shape and run length
    #[serde(default)]
    pub board: BoardConfig,

    /// Initial pattern settings
    #[serde(default)]
    pub seeding: SeedConfig,

    /// Compute backend preference
    #[serde(default)]
    pub compute: ComputeConfig,
}

/// Board shape and run length
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Columns
    pub width: usize,

    /// Rows
    pub height: usize,

    /// Generations advanced by `play()`
    pub generations: u64,

    /// Edge policy for neighbour counting
    #[serde(default)]
    pub boundary: Boundary,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            generations: 700,
            boundary: Boundary::Bounded,
        }
    }
}

/// Random seeding settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Fixed RNG seed for reproducible boards (None = thread RNG)
    pub rng_seed: Option<u64>,

    /// Probability of a cell starting alive
    pub density: f64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            density: 0.5,
        }
    }
}

/// Compute backend configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComputeConfig {
    /// Preferred backend
    pub backend: ComputeBackendType,

    /// Rayon worker threads (0 = Rayon default, one per core)
    pub cpu_threads: usize,

    /// Boards at least this many cells prefer the GPU under `Auto`
    pub gpu_min_cells: u64,

    /// Side of the square GPU workgroup (threads per block = side²)
    pub gpu_workgroup_size: u32,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            backend: ComputeBackendType::Auto,
            cpu_threads: 0,
            gpu_min_cells: 65_536,
            gpu_workgroup_size: 16,
        }
    }
}

/// Available compute backends
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputeBackendType {
    /// Pick GPU for large boards, CPU otherwise
    Auto,
    /// Single-threaded reference
    Sequential,
    /// CPU with Rayon parallelism
    Cpu,
    /// GPU with wgpu
    Gpu,
}

impl std::str::FromStr for ComputeBackendType {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "sequential" | "seq" => Ok(Self::Sequential),
            "cpu" | "rayon" => Ok(Self::Cpu),
            "gpu" | "wgpu" => Ok(Self::Gpu),
            other => Err(LifeError::config(format!("unknown backend '{}'", other))),
        }
    }
}

impl LifeConfig {
    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> LifeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> LifeResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values no simulation can be built from
    pub fn validate(&self) -> LifeResult<()> {
        Grid::check_dimensions(self.board.width, self.board.height, self.board.boundary)?;

        if !(0.0..=1.0).contains(&self.seeding.density) {
            return Err(LifeError::config(format!(
                "seed density must be within [0, 1], got {}",
                self.seeding.density
            )));
        }
        if self.compute.gpu_workgroup_size == 0 {
            return Err(LifeError::config("gpu_workgroup_size must be positive"));
        }
        Ok(())
    }

    /// Total cells on the configured board
    pub fn cell_count(&self) -> u64 {
        (self.board.width as u64).saturating_mul(self.board.height as u64)
    }

    /// Square board for the GPU backend
    pub fn gpu_optimized(board_size: usize) -> Self {
        let mut config = Self::default();
        config.board.width = board_size;
        config.board.height = board_size;
        config.compute.backend = ComputeBackendType::Gpu;
        config
    }

    /// Small reproducible board on the sequential backend
    pub fn cpu_dev() -> Self {
        let mut config = Self::default();
        config.compute.backend = ComputeBackendType::Sequential;
        config.seeding.rng_seed = Some(0);
        config
    }

    /// Create config from environment variables
    ///
    /// Reads:
    /// - LIFE_BOARD_SIZE: square board side (default: 20)
    /// - LIFE_WIDTH / LIFE_HEIGHT: override either side
    /// - LIFE_GENERATIONS: generations to play (default: 700)
    /// - LIFE_BOUNDARY: "bounded" or "toroidal" (default: bounded)
    /// - LIFE_BACKEND: "auto", "sequential", "cpu" or "gpu" (default: auto)
    /// - LIFE_SEED: fixed RNG seed (default: unseeded)
    /// - LIFE_THREADS: Rayon worker threads (default: 0, one per core)
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(size) = env_parse::<usize>("LIFE_BOARD_SIZE") {
            config.board.width = size;
            config.board.height = size;
        }
        if let Some(width) = env_parse("LIFE_WIDTH") {
            config.board.width = width;
        }
        if let Some(height) = env_parse("LIFE_HEIGHT") {
            config.board.height = height;
        }
        if let Some(generations) = env_parse("LIFE_GENERATIONS") {
            config.board.generations = generations;
        }
        if let Some(boundary) = env_parse("LIFE_BOUNDARY") {
            config.board.boundary = boundary;
        }
        if let Some(backend) = env_parse("LIFE_BACKEND") {
            config.compute.backend = backend;
        }
        if let Some(seed) = env_parse("LIFE_SEED") {
            config.seeding.rng_seed = Some(seed);
        }
        if let Some(threads) = env_parse("LIFE_THREADS") {
            config.compute.cpu_threads = threads;
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
