//! # Life Core
//!
//! Core types and traits for a double-buffered Conway's Game of Life.
//!
//! This crate provides the fundamental building blocks:
//! - **Cell**: Alive or dead, nothing more
//! - **Grid**: Fixed-size cell buffer with a boundary policy
//! - **Rule**: The B3/S23 transition table
//! - **Stepper**: One generation from a read buffer into a write buffer
//!
//! Execution strategies implement [`ComputeBackend`]; see `life-compute`.

pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod patterns;
pub mod rule;
pub mod stepper;
pub mod traits;

// Re-export main types at crate root
pub use cell::Cell;
pub use config::{ComputeBackendType, LifeConfig};
pub use error::{LifeError, LifeResult};
pub use grid::{Boundary, Grid};
pub use patterns::Pattern;
pub use traits::*;
