//! Runtime information collected over one mesh run.

use chrono::{DateTime, Utc};

use super::cycle_group::CycleGroup;

/// What happened during a run: every cycle, plus wall-clock bounds. Reset at
/// the start of each run; readable mid-flight from hooks and afterwards from
/// the mesh.
#[derive(Debug, Default)]
pub struct RuntimeInfo {
  cycles: CycleGroup,
  started_at: Option<DateTime<Utc>>,
  stopped_at: Option<DateTime<Utc>>,
}

impl RuntimeInfo {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cycles(&self) -> &CycleGroup {
    &self.cycles
  }

  pub(crate) fn cycles_mut(&mut self) -> &mut CycleGroup {
    &mut self.cycles
  }

  pub fn started_at(&self) -> Option<DateTime<Utc>> {
    self.started_at
  }

  pub fn stopped_at(&self) -> Option<DateTime<Utc>> {
    self.stopped_at
  }

  pub(crate) fn mark_started(&mut self) {
    self.started_at = Some(Utc::now());
    self.stopped_at = None;
  }

  pub(crate) fn mark_stopped(&mut self) {
    self.stopped_at = Some(Utc::now());
  }

  /// Elapsed wall time: start to stop, or start to now while running.
  pub fn duration(&self) -> Option<std::time::Duration> {
    let started = self.started_at?;
    let stopped = self.stopped_at.unwrap_or_else(Utc::now);
    (stopped - started).to_std().ok()
  }
}
