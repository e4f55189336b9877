//! Drives an engine at a fixed cadence.
//!
//! The engine has no notion of time; something has to call `tick` repeatedly until the
//! population is fully infected or the caller loses interest. `TickScheduler` is that something:
//! it sleeps for one interval, ticks, hands the report to a callback, and repeats. The first
//! tick happens one interval after `run` starts.
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, trace};

use crate::engine::{Counts, SimulationState, TickReport};
use crate::rand::Rng;
use crate::shared::SharedEngine;

/// Why a scheduler run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every member is infected.
    Terminal,
    /// The configured tick cap was reached.
    TickLimit,
    /// A `StopHandle` was triggered.
    Stopped,
    /// No member is infected and none can become infected without outside help.
    NoSources,
}

impl Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            StopReason::Terminal => "terminal",
            StopReason::TickLimit => "tick-limit",
            StopReason::Stopped => "stopped",
            StopReason::NoSources => "no-sources",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks performed during this run.
    pub ticks: u64,
    pub counts: Counts,
    pub state: SimulationState,
    pub stop_reason: StopReason,
}

/// Cooperative cancellation for a running scheduler. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct TickScheduler {
    interval: Duration,
    max_ticks: Option<u64>,
    stop: StopHandle,
}

impl TickScheduler {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        TickScheduler {
            interval,
            max_ticks: None,
            stop: StopHandle::default(),
        }
    }

    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = Some(max_ticks);
        self
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// A handle that ends `run` before its next tick when triggered from any thread.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Ticks `engine` until it is terminal, the tick cap is reached, or the stop handle fires.
    /// `on_tick` sees every report in order.
    pub fn run<R, F>(&self, engine: &SharedEngine<R>, mut on_tick: F) -> RunSummary
    where
        R: Rng,
        F: FnMut(&TickReport),
    {
        debug!(
            "starting scheduler: interval={:?} max_ticks={:?}",
            self.interval, self.max_ticks
        );
        let mut ticks = 0;
        let stop_reason = loop {
            if engine.state().is_terminal() {
                break StopReason::Terminal;
            }
            if self.max_ticks.is_some_and(|max_ticks| ticks >= max_ticks) {
                break StopReason::TickLimit;
            }
            if !self.interval.is_zero() {
                thread::sleep(self.interval);
            }
            // Checked after sleeping so a stop requested mid-interval skips the pending tick.
            if self.stop.is_stopped() {
                break StopReason::Stopped;
            }
            let report = engine.tick();
            ticks += 1;
            trace!("scheduler delivered tick {}", report.tick);
            on_tick(&report);
        };

        let (counts, state) = engine.with_engine(|engine| (engine.counts(), engine.state()));
        debug!("scheduler stopped ({stop_reason}) after {ticks} ticks");
        RunSummary {
            ticks,
            counts,
            state,
            stop_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::engine::InfectionEngine;

    fn shared(population: usize, spread_factor: usize, row_width: usize) -> SharedEngine<StdRng> {
        InfectionEngine::new(
            population,
            spread_factor,
            row_width,
            StdRng::seed_from_u64(11),
        )
        .unwrap()
        .into()
    }

    #[test]
    fn runs_until_terminal() {
        let engine = shared(30, 2, 5);
        engine.infect(12);
        let mut reports = Vec::new();
        let summary = TickScheduler::new(Duration::ZERO).run(&engine, |report| {
            reports.push(report.clone());
        });
        assert_eq!(summary.stop_reason, StopReason::Terminal);
        assert_eq!(summary.state, SimulationState::Terminal);
        assert_eq!(summary.counts.healthy, 0);
        assert_eq!(summary.ticks, reports.len() as u64);
        assert_eq!(reports.last().unwrap().state, SimulationState::Terminal);
        let new_total: usize = reports.iter().map(|r| r.newly_infected.len()).sum();
        assert_eq!(new_total, 29);
    }

    #[test]
    fn respects_tick_limit() {
        let engine = shared(100, 1, 10);
        engine.infect(0);
        let summary = TickScheduler::new(Duration::ZERO)
            .with_max_ticks(3)
            .run(&engine, |_| {});
        assert_eq!(summary.stop_reason, StopReason::TickLimit);
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.state, SimulationState::Active);
    }

    #[test]
    fn already_terminal_does_not_tick() {
        let engine = shared(1, 1, 1);
        engine.infect(0);
        let summary = TickScheduler::new(Duration::ZERO).run(&engine, |_| panic!("ticked"));
        assert_eq!(summary.stop_reason, StopReason::Terminal);
        assert_eq!(summary.ticks, 0);
    }

    #[test]
    fn stop_handle_ends_run() {
        let engine = shared(100, 1, 10);
        engine.infect(0);
        let scheduler = TickScheduler::new(Duration::ZERO);
        let stop = scheduler.stop_handle();
        let summary = scheduler.run(&engine, |report| {
            if report.tick == 2 {
                stop.stop();
            }
        });
        assert_eq!(summary.stop_reason, StopReason::Stopped);
        assert_eq!(summary.ticks, 2);
    }

    #[test]
    fn stop_from_another_thread() {
        let engine = shared(10_000, 1, 100);
        engine.infect(0);
        let scheduler = TickScheduler::new(Duration::from_millis(5));
        let stop = scheduler.stop_handle();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            stop.stop();
        });
        let summary = scheduler.run(&engine, |_| {});
        stopper.join().unwrap();
        assert_eq!(summary.stop_reason, StopReason::Stopped);
        assert_eq!(summary.state, SimulationState::Active);
    }

    #[test]
    fn stop_reason_display() {
        assert_eq!(StopReason::NoSources.to_string(), "no-sources");
        assert_eq!(StopReason::TickLimit.to_string(), "tick-limit");
    }
}
