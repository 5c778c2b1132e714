//! One scheduling tick: activation results for every component.

use crate::errors::MeshError;

use super::activation_results::ActivationResultCollection;

/// One activation cycle: 1-based sequence number, the per-component results
/// and a carried error. Immutable once appended to the cycle group.
#[derive(Debug, Default)]
pub struct Cycle {
  number: usize,
  results: ActivationResultCollection,
  chainable_err: Option<MeshError>,
}

impl Cycle {
  pub fn new(number: usize) -> Self {
    Self {
      number,
      results: ActivationResultCollection::new(),
      chainable_err: None,
    }
  }

  pub fn number(&self) -> usize {
    self.number
  }

  pub fn results(&self) -> &ActivationResultCollection {
    &self.results
  }

  pub(crate) fn results_mut(&mut self) -> &mut ActivationResultCollection {
    &mut self.results
  }

  pub fn has_activated_components(&self) -> bool {
    self.results.has_activated_components()
  }

  pub fn has_chainable_err(&self) -> bool {
    self.chainable_err.is_some()
  }

  pub fn chainable_err(&self) -> Option<&MeshError> {
    self.chainable_err.as_ref()
  }

  pub(crate) fn set_chainable_err(&mut self, err: MeshError) {
    self.chainable_err = Some(err);
  }
}
