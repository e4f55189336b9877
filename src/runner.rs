use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::engine::{InfectionEngine, SimulationState};
use crate::error::ContagionError;
use crate::log::{apply_log_spec, LogSpec};
use crate::rand::Rng;
use crate::scheduler::{RunSummary, StopHandle, StopReason, TickScheduler};
use crate::shared::SharedEngine;

/// Command line arguments for the simulation runner. Flags override values from `--config`.
#[derive(Parser, Debug, Default)]
#[command(name = "contagion", version, about)]
pub struct SimulationArgs {
    /// Optional path to a JSON simulation config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of people in the population
    #[arg(short = 'n', long)]
    pub population_size: Option<usize>,

    /// Maximum number of people a single infected person infects per tick
    #[arg(short, long)]
    pub spread_factor: Option<usize>,

    /// Number of people per grid row
    #[arg(short = 'w', long)]
    pub row_width: Option<usize>,

    /// Time between ticks, e.g. "500ms" or "2s"
    #[arg(short, long, value_parser = humantime::parse_duration)]
    pub period: Option<Duration>,

    /// Random seed
    #[arg(short, long)]
    pub random_seed: Option<u64>,

    /// Infect this person before the first tick. May be repeated
    #[arg(short, long = "infect", value_name = "INDEX")]
    pub infect: Vec<usize>,

    /// Stop after this many ticks even if healthy people remain
    #[arg(long)]
    pub max_ticks: Option<u64>,

    /// Read indices of people to infect from stdin, one per line, while the simulation runs
    #[arg(long)]
    pub interactive: bool,

    /// Log level, optionally per module, e.g. "info" or "warn,contagion::engine=trace"
    #[arg(long)]
    pub log_level: Option<LogSpec>,
}

/// Builds the configuration described by `args`: the config file (or defaults), then each flag
/// that was given. `--infect` indices are added to the file's initial infections.
///
/// # Errors
/// Returns an error if the config file cannot be loaded or the result does not validate.
pub fn build_config(args: &SimulationArgs) -> Result<SimulationConfig, ContagionError> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading simulation config from: {}", path.display());
            SimulationConfig::load(path)?
        }
        None => SimulationConfig::default(),
    };
    if let Some(population_size) = args.population_size {
        config.population_size = population_size;
    }
    if let Some(spread_factor) = args.spread_factor {
        config.spread_factor = spread_factor;
    }
    if let Some(row_width) = args.row_width {
        config.row_width = row_width;
    }
    if let Some(period) = args.period {
        config.tick_interval = period;
    }
    if let Some(random_seed) = args.random_seed {
        config.random_seed = random_seed;
    }
    config.initial_infections.extend(args.infect.iter().copied());
    config.validate()?;
    Ok(config)
}

/// Parses the command line and runs a simulation, printing one line per tick to stdout and
/// reading manual infections from stdin when `--interactive` is given.
///
/// # Errors
/// Returns an error if the configuration is invalid or output cannot be written.
pub fn run_with_args() -> Result<RunSummary, Box<dyn std::error::Error>> {
    let args = SimulationArgs::parse();
    let input: Option<Box<dyn BufRead + Send>> = if args.interactive {
        Some(Box::new(BufReader::new(std::io::stdin())))
    } else {
        None
    };
    let stdout = std::io::stdout();
    run_with_args_internal(args, &mut stdout.lock(), input)
}

fn run_with_args_internal<W: Write>(
    args: SimulationArgs,
    out: &mut W,
    input: Option<Box<dyn BufRead + Send>>,
) -> Result<RunSummary, Box<dyn std::error::Error>> {
    if let Some(spec) = &args.log_level {
        apply_log_spec(spec);
    }

    let config = build_config(&args)?;
    debug!("running with {:?}", config);
    let engine = SharedEngine::new(InfectionEngine::from_config(&config)?);

    let mut scheduler = TickScheduler::new(config.tick_interval);
    if let Some(max_ticks) = args.max_ticks {
        scheduler = scheduler.with_max_ticks(max_ticks);
    }

    let summary = if input.is_none() && no_sources(&engine) {
        warn!("nobody is infected and --interactive is off; nothing can spread");
        RunSummary {
            ticks: 0,
            counts: engine.counts(),
            state: engine.state(),
            stop_reason: StopReason::NoSources,
        }
    } else {
        if let Some(input) = input {
            spawn_input_reader(input, engine.clone(), scheduler.stop_handle());
        }
        let mut write_result = Ok(());
        let summary = scheduler.run(&engine, |report| {
            if write_result.is_ok() {
                write_result = writeln!(
                    out,
                    "tick {}: infected={} healthy={} new={:?}",
                    report.tick,
                    report.counts.infected,
                    report.counts.healthy,
                    report.newly_infected
                );
            }
        });
        write_result?;
        summary
    };

    writeln!(
        out,
        "finished after {} ticks ({}): infected={} healthy={}",
        summary.ticks, summary.stop_reason, summary.counts.infected, summary.counts.healthy
    )?;
    Ok(summary)
}

fn no_sources<R>(engine: &SharedEngine<R>) -> bool {
    let counts = engine.counts();
    counts.infected == 0 && counts.healthy > 0
}

/// Applies manual infections from `input` until it is exhausted. If the input ends while
/// nobody is infected, the simulation can never progress, so the scheduler is stopped.
fn spawn_input_reader<R>(input: Box<dyn BufRead + Send>, engine: SharedEngine<R>, stop: StopHandle)
where
    R: Rng + Send + 'static,
{
    thread::spawn(move || {
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("stopped reading input: {e}");
                    break;
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<usize>() {
                Ok(index) => match engine.try_infect(index) {
                    Ok(report) if report.changed => info!("infected member {index}"),
                    Ok(_) => info!("member {index} is already infected"),
                    Err(e) => eprintln!("cannot infect: {e}"),
                },
                Err(_) => eprintln!("not a member index: {line}"),
            }
            if engine.state() == SimulationState::Terminal {
                break;
            }
        }
        if no_sources(&engine) {
            stop.stop();
        }
    });
}
