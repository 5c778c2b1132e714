//! A pipe: a directed edge from an output port to an input port.

use std::fmt;

/// Destination address of a pipe. Pipes are owned by the source port and
/// refer to the destination by component and port name; the mesh resolves
/// the address during the drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeTarget {
  pub component: String,
  pub port: String,
}

impl PipeTarget {
  pub fn new(component: impl Into<String>, port: impl Into<String>) -> Self {
    Self {
      component: component.into(),
      port: port.into(),
    }
  }
}

impl fmt::Display for PipeTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.component, self.port)
  }
}
