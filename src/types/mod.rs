//! Data model of the mesh: signals, ports, pipes, components, cycles.
//!
//! Payloads flow through the mesh as `Arc<dyn Any + Send + Sync>`.

mod activation_result;
mod activation_results;
#[cfg(test)]
mod activation_results_test;
mod component;
#[cfg(test)]
mod component_test;
mod component_collection;
#[cfg(test)]
mod component_collection_test;
mod cycle;
mod cycle_group;
#[cfg(test)]
mod cycle_group_test;
mod labels;
mod pipe;
mod port;
#[cfg(test)]
mod port_test;
mod port_collection;
mod runtime_info;
mod signal;
mod signal_group;
mod state;
#[cfg(test)]
mod state_test;

pub use activation_result::{ActivationCode, ActivationResult};
pub use activation_results::ActivationResultCollection;
pub use component::{ActivationFunc, Component};
pub use component_collection::ComponentCollection;
pub use cycle::Cycle;
pub use cycle_group::CycleGroup;
pub use labels::Labels;
pub use pipe::PipeTarget;
pub use port::{Port, PortDirection, forward_signals, forward_with_filter, forward_with_map};
pub use port_collection::PortCollection;
pub use runtime_info::RuntimeInfo;
pub use signal::{Payload, Signal};
pub use signal_group::SignalGroup;
pub use state::State;
