//! # Simulation - Double-Buffered Generation Driver
//!
//! Owns the two grids and advances them one generation at a time through
//! a [`ComputeBackend`].
//!
//! ## Buffer Roles
//!
//! ```text
//!   generation N          generation N+1
//!  ┌────────────┐  step  ┌────────────┐
//!  │ buffers[c] │ ─────► │ buffers[1-c]│   then c = 1 - c
//!  └────────────┘        └────────────┘
//! ```
//!
//! The role swap is an index toggle; cell data is never copied between
//! the buffers.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──seed──► Seeded ──step──► Running ──last step──► Complete
//!                                  │            │
//!                                  └────────────┴──backend error──► Faulted
//! ```
//!
//! `reset` returns any phase to `Seeded` with a fresh seed.

use life_compute::{create_backend, SequentialBackend};
use life_core::config::LifeConfig;
use life_core::error::{LifeError, LifeResult};
use life_core::grid::{Boundary, Grid};
use life_core::traits::{BackendStats, ComputeBackend, GenerationObserver};

use crate::seed::Seed;

/// Default probability of a live cell for random seeds
pub const DEFAULT_DENSITY: f64 = 0.5;

/// Generations between progress lines in the debug log
const LOG_INTERVAL: u64 = 100;

/// Where a simulation is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Grids allocated, no seed yet
    Uninitialized,
    /// Generation 0 written, no step taken
    Seeded,
    /// At least one step taken, more remain
    Running,
    /// All requested generations computed
    Complete,
    /// A backend step failed; only `reset` leaves this phase
    Faulted,
}

/// Snapshot of simulation progress
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationStats {
    pub generation: u64,
    pub generations: u64,
    pub population: usize,
    pub phase: Phase,
    pub backend: String,
    pub backend_stats: BackendStats,
}

type BoxedObserver = Box<dyn GenerationObserver + Send>;

/// Double-buffered Game of Life run
pub struct Simulation {
    /// The two grids; `buffers[current]` holds the current generation
    buffers: [Grid; 2],
    current: usize,

    /// Completed steps since the last seed
    generation: u64,
    generations: u64,
    phase: Phase,

    /// Live probability used by random seeds
    density: f64,

    backend: Box<dyn ComputeBackend>,
    observers: Vec<BoxedObserver>,
}

impl Simulation {
    /// Allocate both grids for a bounded board on the sequential backend
    pub fn new(width: usize, height: usize, generations: u64) -> LifeResult<Self> {
        Self::allocate(width, height, Boundary::Bounded, generations)
    }

    /// Build, back and seed a simulation from configuration
    ///
    /// The board is seeded with `Seed::Rng` when `seeding.rng_seed` is set
    /// and `Seed::Random` otherwise, so the result is ready to `play()`.
    pub fn from_config(config: &LifeConfig) -> LifeResult<Self> {
        config.validate()?;

        let board = &config.board;
        let mut backend = create_backend(config)?;
        backend.init(config)?;

        let mut sim = Self::allocate(board.width, board.height, board.boundary, board.generations)?
            .with_backend(backend);
        sim.density = config.seeding.density;

        let seed = match config.seeding.rng_seed {
            Some(seed) => Seed::Rng(seed),
            None => Seed::Random,
        };
        sim.seed(seed)?;
        Ok(sim)
    }

    fn allocate(
        width: usize,
        height: usize,
        boundary: Boundary,
        generations: u64,
    ) -> LifeResult<Self> {
        let front = Grid::new(width, height, boundary)?;
        let back = front.clone();

        tracing::info!(
            "Simulation created: {}x{} {:?}, {} generations",
            width,
            height,
            boundary,
            generations
        );

        Ok(Self {
            buffers: [front, back],
            current: 0,
            generation: 0,
            generations,
            phase: Phase::Uninitialized,
            density: DEFAULT_DENSITY,
            backend: Box::new(SequentialBackend::new()),
            observers: Vec::new(),
        })
    }

    /// Replace the compute backend
    pub fn with_backend(mut self, backend: Box<dyn ComputeBackend>) -> Self {
        tracing::debug!("Simulation backend: {}", backend.name());
        self.backend = backend;
        self
    }

    /// Change the boundary policy; only valid before seeding
    pub fn with_boundary(self, boundary: Boundary) -> LifeResult<Self> {
        if self.phase != Phase::Uninitialized {
            return Err(LifeError::state("boundary can only be changed before seeding"));
        }
        if boundary == self.boundary() {
            return Ok(self);
        }

        let (width, height) = self.buffers[0].dimensions();
        let front = Grid::new(width, height, boundary)?;
        let back = front.clone();
        Ok(Self {
            buffers: [front, back],
            ..self
        })
    }

    /// Live probability for random seeds, within `[0, 1]`
    pub fn with_density(mut self, density: f64) -> LifeResult<Self> {
        if !(0.0..=1.0).contains(&density) {
            return Err(LifeError::config(format!(
                "seed density must be within [0, 1], got {}",
                density
            )));
        }
        self.density = density;
        Ok(self)
    }

    /// Register a callback run after every completed generation
    pub fn on_generation<F>(&mut self, observer: F)
    where
        F: FnMut(u64, &Grid) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Write generation 0
    ///
    /// Allowed before the first step. On `Err` the phase and grid are
    /// unchanged.
    pub fn seed(&mut self, seed: Seed) -> LifeResult<()> {
        match self.phase {
            Phase::Uninitialized | Phase::Seeded => self.apply_seed(&seed),
            phase => Err(LifeError::state(format!(
                "cannot seed a {:?} simulation, use reset",
                phase
            ))),
        }
    }

    /// Re-seed from any phase and rewind the generation counter
    pub fn reset(&mut self, seed: Seed) -> LifeResult<()> {
        self.apply_seed(&seed)
    }

    fn apply_seed(&mut self, seed: &Seed) -> LifeResult<()> {
        seed.apply(&mut self.buffers[self.current], self.density)?;

        self.generation = 0;
        self.phase = Phase::Seeded;
        tracing::debug!(
            "Seeded {:?}: population {}",
            seed_kind(seed),
            self.buffers[self.current].population()
        );
        Ok(())
    }

    /// Advance one generation, returning the new generation index
    pub fn step(&mut self) -> LifeResult<u64> {
        self.check_runnable("step")?;
        if self.generation >= self.generations {
            return Err(LifeError::state(format!(
                "all {} generations already computed",
                self.generations
            )));
        }
        self.advance(None)
    }

    /// Run every remaining generation and return the final grid
    ///
    /// With `generations == 0` the seed itself is the final state.
    pub fn play(&mut self) -> LifeResult<&Grid> {
        self.run(None)
    }

    /// Like [`play`](Self::play), also reporting each generation to `observer`
    pub fn play_with(&mut self, observer: &mut dyn GenerationObserver) -> LifeResult<&Grid> {
        self.run(Some(observer))
    }

    fn run(&mut self, mut observer: Option<&mut dyn GenerationObserver>) -> LifeResult<&Grid> {
        self.check_runnable("play")?;

        let (width, height) = self.buffers[self.current].dimensions();
        tracing::debug!(
            "Playing generations {}..{} on {}x{} with {}",
            self.generation,
            self.generations,
            width,
            height,
            self.backend.name()
        );

        while self.generation < self.generations {
            let generation = self.advance(observer.as_deref_mut())?;
            if generation % LOG_INTERVAL == 0 {
                tracing::debug!(
                    "Generation {}/{}: population {}",
                    generation,
                    self.generations,
                    self.buffers[self.current].population()
                );
            }
        }

        if let Err(e) = self.backend.sync() {
            tracing::error!("{} failed to sync after generation {}: {}", self.backend.name(), self.generation, e);
            self.phase = Phase::Faulted;
            return Err(e);
        }
        self.phase = Phase::Complete;
        tracing::info!(
            "Simulation complete after {} generations, population {}",
            self.generation,
            self.buffers[self.current].population()
        );
        Ok(&self.buffers[self.current])
    }

    fn check_runnable(&self, action: &str) -> LifeResult<()> {
        match self.phase {
            Phase::Seeded | Phase::Running => Ok(()),
            Phase::Uninitialized => Err(LifeError::state(format!(
                "cannot {} before the board is seeded",
                action
            ))),
            Phase::Complete => Err(LifeError::state(format!(
                "cannot {} a completed simulation, reset it first",
                action
            ))),
            Phase::Faulted => Err(LifeError::state(format!(
                "cannot {} a faulted simulation, reset it first",
                action
            ))),
        }
    }

    /// One backend step, role swap and observer round
    fn advance(&mut self, observer: Option<&mut (dyn GenerationObserver + '_)>) -> LifeResult<u64> {
        let (read, write) = split_roles(&mut self.buffers, self.current);
        if let Err(e) = self.backend.step(read, write) {
            tracing::error!(
                "{} failed computing generation {}: {}",
                self.backend.name(),
                self.generation + 1,
                e
            );
            self.phase = Phase::Faulted;
            return Err(e);
        }

        self.current = 1 - self.current;
        self.generation += 1;
        self.phase = if self.generation >= self.generations {
            Phase::Complete
        } else {
            Phase::Running
        };

        let grid = &self.buffers[self.current];
        for registered in self.observers.iter_mut() {
            registered.on_generation(self.generation, grid);
        }
        if let Some(observer) = observer {
            observer.on_generation(self.generation, grid);
        }

        Ok(self.generation)
    }

    /// The grid holding the current generation
    pub fn current_state(&self) -> &Grid {
        &self.buffers[self.current]
    }

    /// Owned copy of the current generation
    pub fn snapshot(&self) -> Grid {
        self.buffers[self.current].clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn generations(&self) -> u64 {
        self.generations
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn boundary(&self) -> Boundary {
        self.buffers[self.current].boundary()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn stats(&self) -> SimulationStats {
        let backend_stats = self.backend.stats();
        SimulationStats {
            generation: self.generation,
            generations: self.generations,
            population: self.buffers[self.current].population(),
            phase: self.phase,
            backend: self.backend.name().to_string(),
            backend_stats,
        }
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("dimensions", &self.buffers[self.current].dimensions())
            .field("boundary", &self.boundary())
            .field("generation", &self.generation)
            .field("generations", &self.generations)
            .field("phase", &self.phase)
            .field("backend", &self.backend.name())
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Borrow `buffers[current]` as the read grid and the other as the write grid
fn split_roles(buffers: &mut [Grid; 2], current: usize) -> (&Grid, &mut Grid) {
    let (first, second) = buffers.split_at_mut(1);
    if current == 0 {
        (&first[0], &mut second[0])
    } else {
        (&second[0], &mut first[0])
    }
}

fn seed_kind(seed: &Seed) -> &str {
    match seed {
        Seed::Random => "random",
        Seed::Rng(_) => "seeded random",
        Seed::Pattern(_) => "pattern",
        Seed::Named { name, .. } => name,
    }
}
