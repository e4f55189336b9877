//! A discrete-time simulation of an infection spreading through a population.
//!
//! The population is a fixed sequence of people laid out row by row on an implicit grid. Each
//! person is either healthy or infected. On every tick, each person who was already infected
//! may infect a random number (between 1 and the spread factor) of their healthy neighbors on the
//! grid. Infection is permanent, so every simulation eventually either stalls or reaches the
//! terminal state where nobody is left healthy.
//!
//! The crate is organized around a small set of services:
//! * [`topology`] computes which grid cells neighbor each other.
//! * [`engine`] owns the population and implements `tick` and manual `infect`.
//! * [`shared`] serializes access to an engine that several threads drive at once.
//! * [`scheduler`] calls `tick` on a fixed cadence until the simulation is done.
//! * [`config`], [`random`], [`log`] and [`error`] provide the configuration, seeded
//!   randomness, logging and error types used by the rest.
//! * [`runner`] is the command line front end built on top of all of the above.
pub mod config;
pub mod engine;
pub mod error;
pub mod hashing;
pub mod log;
pub mod random;
pub mod runner;
pub mod scheduler;
pub mod shared;
pub mod topology;

pub use config::SimulationConfig;
pub use engine::{Counts, InfectReport, InfectionEngine, SimulationState, TickReport};
pub use error::ContagionError;
pub use shared::SharedEngine;

// Re-exports so users seed and stub the engine with the same `rand` version.
pub use rand;
