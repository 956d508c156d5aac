//! Runtime configuration.
//!
//! Compiled programs own `argv`, so the runtime is configured through
//! environment variables, read once per process on first use.

use std::sync::OnceLock;

use crate::error::{RuntimeError, RuntimeResult};

/// Initial payload capacity of the line reader, in bytes.
pub const DEFAULT_LINE_CAPACITY: usize = 100;

pub const LINE_CAPACITY_VAR: &str = "COMODOT_LINE_CAPACITY";
pub const ECHO_FLOAT_VAR: &str = "COMODOT_ECHO_FLOAT";
pub const LOG_VAR: &str = "COMODOT_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Starting capacity of each `readLine` buffer. Never zero.
    pub initial_line_capacity: usize,
    /// Echo the value parsed by `readFloat` to stdout, as older runtimes did.
    pub echo_read_float: bool,
    /// `EnvFilter` directives; no subscriber is installed when unset.
    pub log_filter: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            initial_line_capacity: DEFAULT_LINE_CAPACITY,
            echo_read_float: false,
            log_filter: None,
        }
    }
}

/// A configuration together with the problems found while loading it.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: RuntimeConfig,
    pub problems: Vec<RuntimeError>,
}

impl RuntimeConfig {
    pub fn from_env() -> LoadedConfig {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from `lookup`, falling back to the default for
    /// every value that fails to parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LoadedConfig {
        let mut config = RuntimeConfig::default();
        let mut problems = Vec::new();

        if let Some(raw) = lookup(LINE_CAPACITY_VAR) {
            match parse_capacity(&raw) {
                Ok(capacity) => config.initial_line_capacity = capacity,
                Err(problem) => problems.push(problem),
            }
        }

        if let Some(raw) = lookup(ECHO_FLOAT_VAR) {
            match parse_flag(ECHO_FLOAT_VAR, &raw) {
                Ok(flag) => config.echo_read_float = flag,
                Err(problem) => problems.push(problem),
            }
        }

        config.log_filter = lookup(LOG_VAR).filter(|filter| !filter.trim().is_empty());

        LoadedConfig { config, problems }
    }
}

fn parse_capacity(raw: &str) -> RuntimeResult<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(RuntimeError::config(LINE_CAPACITY_VAR, "capacity must be at least 1")),
        Ok(capacity) => Ok(capacity),
        Err(e) => Err(RuntimeError::config(LINE_CAPACITY_VAR, e)),
    }
}

fn parse_flag(key: &'static str, raw: &str) -> RuntimeResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(RuntimeError::config(key, format!("expected a boolean, got `{other}`"))),
    }
}

static LOADED: OnceLock<LoadedConfig> = OnceLock::new();

pub(crate) fn loaded() -> &'static LoadedConfig {
    LOADED.get_or_init(RuntimeConfig::from_env)
}

/// Process-wide configuration, loaded from the environment on first call.
///
/// Load problems are not reported from here; the exported primitives
/// install logging and report them on their first call.
pub fn runtime_config() -> &'static RuntimeConfig {
    &loaded().config
}
