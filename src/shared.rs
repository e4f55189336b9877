//! A handle for driving one engine from several threads.
//!
//! Every operation takes the engine's lock for its whole duration, so a `tick` computes against
//! its snapshot and publishes the result before any other caller can observe or change the
//! population. Readers therefore only ever see whole ticks.
use std::sync::{Arc, Mutex, MutexGuard};

use crate::engine::{Counts, InfectReport, InfectionEngine, SimulationState, TickReport};
use crate::error::ContagionError;
use crate::rand::rngs::SmallRng;
use crate::rand::Rng;

#[derive(Debug)]
pub struct SharedEngine<R = SmallRng> {
    inner: Arc<Mutex<InfectionEngine<R>>>,
}

impl<R> Clone for SharedEngine<R> {
    fn clone(&self) -> Self {
        SharedEngine {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> From<InfectionEngine<R>> for SharedEngine<R> {
    fn from(engine: InfectionEngine<R>) -> Self {
        SharedEngine::new(engine)
    }
}

impl<R> SharedEngine<R> {
    pub fn new(engine: InfectionEngine<R>) -> Self {
        SharedEngine {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, InfectionEngine<R>> {
        self.inner.lock().expect("Mutex poisoned")
    }

    #[must_use]
    pub fn counts(&self) -> Counts {
        self.lock().counts()
    }

    #[must_use]
    pub fn state(&self) -> SimulationState {
        self.lock().state()
    }

    /// # Errors
    /// Returns `ContagionError::OutOfRange` if `index` is not a member of the population.
    pub fn is_infected(&self, index: usize) -> Result<bool, ContagionError> {
        self.lock().is_infected(index)
    }

    /// Runs `f` with exclusive access to the engine, for reads that need a consistent view of
    /// more than one value.
    pub fn with_engine<T>(&self, f: impl FnOnce(&InfectionEngine<R>) -> T) -> T {
        f(&self.lock())
    }
}

impl<R: Rng> SharedEngine<R> {
    pub fn tick(&self) -> TickReport {
        self.lock().tick()
    }

    pub fn infect(&self, index: usize) -> InfectReport {
        self.lock().infect(index)
    }

    /// # Errors
    /// Returns `ContagionError::OutOfRange` if `index` is not a member of the population.
    pub fn try_infect(&self, index: usize) -> Result<InfectReport, ContagionError> {
        self.lock().try_infect(index)
    }
}
