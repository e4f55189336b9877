//! The `log` module configures where the crate's log messages go. Logging describes what the
//! engine and the runner are doing internally; the per-tick counts the runner prints are
//! program output, not log messages.
//!
//! This module (re)exports the five logging macros: `error!`, `warn!`, `info!`, `debug!` and
//! `trace!` where `error!` represents the highest-priority log messages and `trace!` the lowest.
//!
//! Logging is _disabled_ by default. The runner enables it with `--log-level <spec>`. From code,
//! use:
//!
//!  - `enable_logging()`: turns on all log messages
//!  - `disable_logging()`: turns off all log messages
//!  - `set_log_level(level: LevelFilter)`: enables only log messages with priority at least `level`
//!
//! Per-module filtering is configured with `set_module_filter()` / `set_module_filters()` and
//! `remove_module_filter()`:
//!
//! ```rust
//! use contagion::log::{set_module_filter, set_log_level, LevelFilter};
//!
//! pub fn setup_logging() {
//!     // Enable `info` log messages globally.
//!     set_log_level(LevelFilter::Info);
//!     // Follow every tick of the engine.
//!     set_module_filter("contagion::engine", LevelFilter::Trace);
//! }
//! ```
#[cfg(feature = "logging")]
mod standard_logger;

#[cfg(not(feature = "logging"))]
mod null_logger;

pub use log::{debug, error, info, trace, warn, LevelFilter};
use std::collections::hash_map::Entry;
use std::str::FromStr;

use crate::error::ContagionError;
use crate::hashing::HashMap;
#[cfg(feature = "logging")]
use log4rs::Handle;
use std::sync::LazyLock;
use std::sync::{Mutex, MutexGuard};

// Logging disabled
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Off;

/// A global instance of the logging configuration.
static LOG_CONFIGURATION: LazyLock<Mutex<LogConfiguration>> = LazyLock::new(Mutex::default);

/// Different log level filters can be applied to the log messages emitted from different modules
/// according to the module path (e.g. `"contagion::engine"`).
#[derive(Debug, PartialEq)]
struct ModuleLogConfiguration {
    /// The module path this configuration applies to
    module: String,
    /// The maximum log level for this module path
    level: LevelFilter,
}

impl From<(&str, LevelFilter)> for ModuleLogConfiguration {
    fn from((module, level): (&str, LevelFilter)) -> Self {
        Self {
            module: module.to_string(),
            level,
        }
    }
}

/// Keeps track of the global and per-module filter levels and holds a handle to the global
/// logger. Only the singleton in `LOG_CONFIGURATION` should exist; the public API is free
/// functions operating on it.
#[derive(Debug)]
pub(in crate::log) struct LogConfiguration {
    /// The level filter for modules without an explicitly set filter. `LevelFilter::Off`
    /// disables logging.
    pub(in crate::log) global_log_level: LevelFilter,
    pub(in crate::log) module_configurations: HashMap<String, ModuleLogConfiguration>,

    #[cfg(feature = "logging")]
    /// Handle to the `log4rs` logger.
    root_handle: Option<Handle>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        Self {
            global_log_level: DEFAULT_LOG_LEVEL,
            module_configurations: HashMap::default(),

            #[cfg(feature = "logging")]
            root_handle: None,
        }
    }
}

impl LogConfiguration {
    pub(in crate::log) fn set_log_level(&mut self, level: LevelFilter) {
        self.global_log_level = level;
        self.set_config();
    }

    /// Returns true if the configuration was mutated, false otherwise.
    fn insert_module_filter(&mut self, module: &str, level: LevelFilter) -> bool {
        match self.module_configurations.entry(module.to_string()) {
            Entry::Occupied(mut entry) => {
                let module_config = entry.get_mut();
                if module_config.level == level {
                    return false;
                }
                module_config.level = level;
            }

            Entry::Vacant(entry) => {
                entry.insert((module, level).into());
            }
        }
        true
    }

    pub(in crate::log) fn set_module_filters(&mut self, module_filters: &[(&str, LevelFilter)]) {
        let mut mutated = false;
        for (module, level) in module_filters {
            mutated |= self.insert_module_filter(module, *level);
        }
        if mutated {
            self.set_config();
        }
    }

    pub(in crate::log) fn remove_module_filter(&mut self, module: &str) {
        if self.module_configurations.remove(module).is_some() {
            self.set_config();
        }
    }
}

/// A parsed `--log-level` argument: an optional global level plus per-module levels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogSpec {
    pub global: Option<LevelFilter>,
    pub modules: Vec<(String, LevelFilter)>,
}

impl FromStr for LogSpec {
    type Err = ContagionError;

    /// Parses `"info"`, `"contagion::engine=trace"`, or a comma-separated mix of both, for
    /// example `"warn,contagion::scheduler=debug"`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let parse_level = |level: &str| {
            LevelFilter::from_str(level.trim()).map_err(|_| {
                ContagionError::InvalidConfiguration(format!("unknown log level `{level}`"))
            })
        };
        let mut spec = LogSpec::default();
        for part in text.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            match part.split_once('=') {
                Some((module, level)) => {
                    spec.modules
                        .push((module.trim().to_string(), parse_level(level)?));
                }
                None => spec.global = Some(parse_level(part)?),
            }
        }
        Ok(spec)
    }
}

// The public API

/// Enables the logger with no global level filter / full logging. Equivalent to
/// `set_log_level(LevelFilter::Trace)`.
pub fn enable_logging() {
    set_log_level(LevelFilter::Trace);
}

/// Disables logging completely. Equivalent to `set_log_level(LevelFilter::Off)`.
pub fn disable_logging() {
    set_log_level(LevelFilter::Off);
}

/// Sets the global log level. A global filter level of `LevelFilter::Off` disables logging.
pub fn set_log_level(level: LevelFilter) {
    get_log_configuration().set_log_level(level);
}

/// Sets a level filter for the given module path.
pub fn set_module_filter(module_path: &str, level_filter: LevelFilter) {
    get_log_configuration().set_module_filters(&[(module_path, level_filter)]);
}

/// Removes a module-specific level filter for the given module path. The global level filter will
/// apply to the module.
pub fn remove_module_filter(module_path: &str) {
    get_log_configuration().remove_module_filter(module_path);
}

/// Sets the level filters for a set of modules. Use this instead of `set_module_filter()` to set
/// filters in bulk.
pub fn set_module_filters(module_filters: &[(&str, LevelFilter)]) {
    get_log_configuration().set_module_filters(module_filters);
}

/// Applies a parsed `--log-level` argument. Module filters without a global level turn on the
/// named modules only.
pub fn apply_log_spec(spec: &LogSpec) {
    let filters: Vec<(&str, LevelFilter)> = spec
        .modules
        .iter()
        .map(|(module, level)| (module.as_str(), *level))
        .collect();
    let mut log_configuration = get_log_configuration();
    log_configuration.set_module_filters(&filters);
    if let Some(level) = spec.global {
        log_configuration.set_log_level(level);
    }
}

/// Fetches a mutable reference to the global `LogConfiguration`.
fn get_log_configuration() -> MutexGuard<'static, LogConfiguration> {
    LOG_CONFIGURATION.lock().expect("Mutex poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{error, trace, LevelFilter};
    use std::sync::{LazyLock, Mutex};

    // Force logging tests to run serially for consistent behavior.
    static TEST_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

    #[test]
    fn test_set_log_level() {
        let _guard = TEST_MUTEX.lock().expect("Mutex poisoned");
        set_log_level(LevelFilter::Trace);
        set_log_level(LevelFilter::Error);
        {
            let config = get_log_configuration();
            assert_eq!(config.global_log_level, LevelFilter::Error);
            error!("test_set_log_level: global set to error");
            trace!("test_set_log_level: NOT EMITTED");
        }
        set_log_level(LevelFilter::Trace);
        {
            let config = get_log_configuration();
            assert_eq!(config.global_log_level, LevelFilter::Trace);
            trace!("test_set_log_level: global set to trace");
        }
        disable_logging();
        assert_eq!(get_log_configuration().global_log_level, LevelFilter::Off);
    }

    #[test]
    fn test_set_remove_module_filters() {
        let _guard = TEST_MUTEX.lock().expect("Mutex poisoned");
        set_log_level(LevelFilter::Trace);
        let filters = [
            ("contagion::engine", LevelFilter::Error),
            ("contagion::scheduler", LevelFilter::Debug),
        ];
        set_module_filters(&filters);
        {
            let config = get_log_configuration();
            for (module_path, level) in &filters {
                assert_eq!(
                    config.module_configurations.get(*module_path),
                    Some(&((*module_path, *level).into()))
                );
            }
        }

        remove_module_filter("contagion::engine");
        {
            let config = get_log_configuration();
            assert!(!config.module_configurations.contains_key("contagion::engine"));
            assert_eq!(
                config.module_configurations.get("contagion::scheduler"),
                Some(&("contagion::scheduler", LevelFilter::Debug).into())
            );
        }
        remove_module_filter("contagion::scheduler");
        disable_logging();
    }

    #[test]
    fn test_apply_log_spec() {
        let _guard = TEST_MUTEX.lock().expect("Mutex poisoned");
        disable_logging();
        let spec: LogSpec = "contagion::runner=info".parse().unwrap();
        apply_log_spec(&spec);
        {
            let config = get_log_configuration();
            assert_eq!(config.global_log_level, LevelFilter::Off);
            assert_eq!(
                config.module_configurations.get("contagion::runner"),
                Some(&("contagion::runner", LevelFilter::Info).into())
            );
        }
        remove_module_filter("contagion::runner");
        disable_logging();
    }

    #[test]
    fn parses_log_specs() {
        assert_eq!(
            "info".parse::<LogSpec>().unwrap(),
            LogSpec {
                global: Some(LevelFilter::Info),
                modules: vec![],
            }
        );
        assert_eq!(
            "warn, contagion::engine=TRACE".parse::<LogSpec>().unwrap(),
            LogSpec {
                global: Some(LevelFilter::Warn),
                modules: vec![("contagion::engine".to_string(), LevelFilter::Trace)],
            }
        );
        assert!("loud".parse::<LogSpec>().is_err());
        assert!("contagion=sometimes".parse::<LogSpec>().is_err());
    }
}
