//! The infection engine owns the population and advances it one generation per `tick`.
//!
//! Each member is either healthy or infected, and an infected member never recovers. On every
//! tick, each member that was infected *before* the tick began (a "source") looks at its healthy
//! grid neighbors, draws how many of them to infect (uniform in `[1, spread_factor]`, capped by
//! how many are available) and picks that many at random. All picks are merged into the
//! population at once, so a member infected during a tick only becomes a source on the next one.
//!
//! ```
//! use contagion::engine::{InfectionEngine, SimulationState};
//! use contagion::rand::rngs::StdRng;
//! use contagion::rand::SeedableRng;
//!
//! let mut engine = InfectionEngine::new(6, 1, 6, StdRng::seed_from_u64(7)).unwrap();
//! engine.infect(0);
//! let report = engine.tick();
//! assert_eq!(report.newly_infected, vec![1]);
//! assert_eq!(report.state, SimulationState::Active);
//! ```
use log::{debug, info, trace, warn};

use crate::config::SimulationConfig;
use crate::error::ContagionError;
use crate::rand::rngs::SmallRng;
use crate::rand::Rng;
use crate::random::{sample_distinct, sample_spread_count, seeded_rng, INFECTION_RNG};
use crate::topology::GridTopology;

/// Whether the simulation can still make progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationState {
    /// At least one member is still healthy.
    Active,
    /// Every member is infected; ticks have no further effect.
    Terminal,
}

impl SimulationState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == SimulationState::Terminal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub infected: usize,
    pub healthy: usize,
}

impl Counts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.infected + self.healthy
    }
}

/// What a single `tick` changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// The generation this report describes; 0 means no tick has run yet.
    pub tick: u64,
    /// Members infected by this tick, in ascending order, each listed once.
    pub newly_infected: Vec<usize>,
    pub counts: Counts,
    pub state: SimulationState,
}

/// What a manual `infect` changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfectReport {
    pub changed: bool,
    pub counts: Counts,
    pub state: SimulationState,
}

/// The simulation state: one health flag per member, the spread factor and the grid layout.
///
/// The engine is generic over its source of randomness. Use [`InfectionEngine::from_config`]
/// for a seeded `SmallRng`, or [`InfectionEngine::new`] to supply any `Rng`.
#[derive(Debug)]
pub struct InfectionEngine<R = SmallRng> {
    population: Vec<bool>,
    spread_factor: usize,
    topology: GridTopology,
    infected_count: usize,
    tick_count: u64,
    rng: R,
}

impl InfectionEngine<SmallRng> {
    /// Builds an engine from a validated configuration, seeding its generator from
    /// `config.random_seed` and applying `config.initial_infections`.
    ///
    /// # Errors
    /// Returns `ContagionError::InvalidConfiguration` if the configuration does not validate.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ContagionError> {
        config.validate()?;
        let mut engine = InfectionEngine::new(
            config.population_size,
            config.spread_factor,
            config.row_width,
            seeded_rng(config.random_seed, INFECTION_RNG),
        )?;
        for &index in &config.initial_infections {
            engine.try_infect(index)?;
        }
        Ok(engine)
    }
}

impl<R: Rng> InfectionEngine<R> {
    /// Creates an engine in which every member is healthy.
    ///
    /// # Errors
    /// Returns `ContagionError::InvalidConfiguration` if `spread_factor` or `row_width` is 0.
    pub fn new(
        population_size: usize,
        spread_factor: usize,
        row_width: usize,
        rng: R,
    ) -> Result<Self, ContagionError> {
        if spread_factor < 1 {
            return Err(ContagionError::InvalidConfiguration(
                "spread factor must be at least 1".to_string(),
            ));
        }
        if row_width < 1 {
            return Err(ContagionError::InvalidConfiguration(
                "row width must be at least 1".to_string(),
            ));
        }
        trace!(
            "creating engine: population={} spread_factor={} row_width={}",
            population_size,
            spread_factor,
            row_width
        );
        Ok(InfectionEngine {
            population: vec![false; population_size],
            spread_factor,
            topology: GridTopology::new(population_size, row_width),
            infected_count: 0,
            tick_count: 0,
            rng,
        })
    }

    /// Advances the simulation by one generation.
    ///
    /// Only members infected before this call act as sources. Targets picked by several sources
    /// are infected and reported once. Once the engine is terminal this is a no-op that reports
    /// the current counts.
    pub fn tick(&mut self) -> TickReport {
        if self.state().is_terminal() {
            return self.report(Vec::new());
        }

        let (next, newly_infected) = self.spread();
        self.population = next;
        self.infected_count += newly_infected.len();
        self.tick_count += 1;

        let report = self.report(newly_infected);
        trace!(
            "tick {}: {} newly infected, infected={} healthy={}",
            report.tick,
            report.newly_infected.len(),
            report.counts.infected,
            report.counts.healthy
        );
        if report.state.is_terminal() {
            info!(
                "every member is infected after {} ticks (population {})",
                self.tick_count,
                self.population_size()
            );
        }
        report
    }

    /// Computes the post-tick population from the current one without modifying it.
    fn spread(&mut self) -> (Vec<bool>, Vec<usize>) {
        let snapshot = &self.population;
        let mut next = snapshot.clone();
        let mut newly_infected = Vec::new();

        for source in (0..snapshot.len()).filter(|&index| snapshot[index]) {
            let healthy: Vec<usize> = self
                .topology
                .neighbors(source)
                .iter()
                .copied()
                .filter(|&neighbor| !snapshot[neighbor])
                .collect();
            if healthy.is_empty() {
                continue;
            }
            let count = sample_spread_count(&mut self.rng, self.spread_factor, healthy.len());
            for target in sample_distinct(&mut self.rng, &healthy, count) {
                if !next[target] {
                    next[target] = true;
                    newly_infected.push(target);
                }
            }
        }

        newly_infected.sort_unstable();
        (next, newly_infected)
    }

    /// Marks member `index` infected. Already-infected and out-of-range members are left
    /// alone and reported with `changed == false`.
    pub fn infect(&mut self, index: usize) -> InfectReport {
        match self.try_infect(index) {
            Ok(report) => report,
            Err(error) => {
                warn!("ignoring manual infection: {error}");
                self.infect_report(false)
            }
        }
    }

    /// Like [`InfectionEngine::infect`], but reports an out-of-range `index` as an error.
    ///
    /// # Errors
    /// Returns `ContagionError::OutOfRange` if `index` is not a member of the population.
    pub fn try_infect(&mut self, index: usize) -> Result<InfectReport, ContagionError> {
        let population_size = self.population_size();
        let member = self
            .population
            .get_mut(index)
            .ok_or(ContagionError::OutOfRange {
                index,
                population_size,
            })?;
        if *member {
            return Ok(self.infect_report(false));
        }
        *member = true;
        self.infected_count += 1;
        debug!("manually infected member {index}");

        let report = self.infect_report(true);
        if report.state.is_terminal() {
            info!("every member is infected (population {population_size})");
        }
        Ok(report)
    }
}

impl<R> InfectionEngine<R> {
    /// # Errors
    /// Returns `ContagionError::OutOfRange` if `index` is not a member of the population.
    pub fn is_infected(&self, index: usize) -> Result<bool, ContagionError> {
        self.population
            .get(index)
            .copied()
            .ok_or(ContagionError::OutOfRange {
                index,
                population_size: self.population_size(),
            })
    }

    #[must_use]
    pub fn counts(&self) -> Counts {
        Counts {
            infected: self.infected_count,
            healthy: self.population.len() - self.infected_count,
        }
    }

    #[must_use]
    pub fn state(&self) -> SimulationState {
        if self.infected_count == self.population.len() {
            SimulationState::Terminal
        } else {
            SimulationState::Active
        }
    }

    #[must_use]
    pub fn population_size(&self) -> usize {
        self.population.len()
    }

    #[must_use]
    pub fn spread_factor(&self) -> usize {
        self.spread_factor
    }

    #[must_use]
    pub fn row_width(&self) -> usize {
        self.topology.row_width()
    }

    #[must_use]
    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    /// Number of ticks that have changed (or could have changed) the population.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Indices of infected members in ascending order.
    pub fn infected(&self) -> impl Iterator<Item = usize> + '_ {
        self.population
            .iter()
            .enumerate()
            .filter_map(|(index, &infected)| infected.then_some(index))
    }

    /// A read-only view of every member's health, `true` meaning infected.
    #[must_use]
    pub fn population(&self) -> &[bool] {
        &self.population
    }

    fn report(&self, newly_infected: Vec<usize>) -> TickReport {
        TickReport {
            tick: self.tick_count,
            newly_infected,
            counts: self.counts(),
            state: self.state(),
        }
    }

    fn infect_report(&self, changed: bool) -> InfectReport {
        InfectReport {
            changed,
            counts: self.counts(),
            state: self.state(),
        }
    }
}
