//! Mesh run configuration: error-handling strategy, limits, verbosity.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::MeshError;

/// Default number of cycles a run may take before it is stopped.
pub const DEFAULT_CYCLES_LIMIT: usize = 1000;

/// Cycles-limit value meaning "no limit".
pub const UNLIMITED_CYCLES: usize = 0;

/// What terminates a run when a cycle contains failed activations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorHandlingStrategy {
  /// Stop at the end of a cycle containing any returned error or panic.
  #[default]
  StopOnFirstErrorOrPanic,
  /// Stop at the end of a cycle containing any panic; errors are tolerated.
  StopOnFirstPanic,
  /// Never stop for errors or panics; only limits or quiescence end the run.
  IgnoreAll,
}

impl FromStr for ErrorHandlingStrategy {
  type Err = MeshError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "stop_on_first_error_or_panic" => Ok(Self::StopOnFirstErrorOrPanic),
      "stop_on_first_panic" => Ok(Self::StopOnFirstPanic),
      "ignore_all" => Ok(Self::IgnoreAll),
      other => Err(MeshError::UnsupportedErrorHandlingStrategy {
        strategy: other.to_string(),
      }),
    }
  }
}

impl std::fmt::Display for ErrorHandlingStrategy {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      Self::StopOnFirstErrorOrPanic => "stop_on_first_error_or_panic",
      Self::StopOnFirstPanic => "stop_on_first_panic",
      Self::IgnoreAll => "ignore_all",
    };
    write!(f, "{s}")
  }
}

/// Run configuration. Every field has a default, so a config can be built
/// from partial JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Strategy applied at the end of each cycle.
  pub error_handling_strategy: ErrorHandlingStrategy,
  /// Maximum number of cycles; [UNLIMITED_CYCLES] disables the check.
  pub cycles_limit: usize,
  /// Wall-clock bound for the whole run, checked at cycle boundaries only.
  pub time_limit: Option<Duration>,
  /// Enables the verbose per-phase events.
  pub debug: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      error_handling_strategy: ErrorHandlingStrategy::default(),
      cycles_limit: DEFAULT_CYCLES_LIMIT,
      time_limit: None,
      debug: false,
    }
  }
}

impl Config {
  /// Parses a config from JSON; absent fields keep their defaults.
  pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(json)
  }
}
