//! # Life Engine
//!
//! The simulation driver: owns the double buffer, seeds generation 0 and
//! advances the board through a compute backend from `life-compute`.
//!
//! ```no_run
//! use life_engine::{Seed, Simulation};
//!
//! let mut sim = Simulation::new(20, 20, 700)?;
//! sim.seed(Seed::named("r-pentomino", 9, 9))?;
//! let last = sim.play()?;
//! println!("population after 700 generations: {}", last.population());
//! # Ok::<(), life_core::LifeError>(())
//! ```
//!
//! Rendering, argument parsing and interactive control live outside this
//! crate; they read [`Simulation::current_state`] or register an
//! observer with [`Simulation::on_generation`].

pub mod seed;
pub mod simulation;

pub use seed::Seed;
pub use simulation::{Phase, Simulation, SimulationStats, DEFAULT_DENSITY};
