
pub mod error;
pub mod topology;
pub mod neuron;
pub mod layer;
pub mod nn;
pub mod preprocess;

pub use error::{Error, Result};

// visible in prelude::*;
pub mod prelude {
  pub use crate::error::{Error, Result};
  pub use crate::topology::{Topology, TopologyBuilder};
  pub use crate::neuron::{Neuron, NeuronKind};
  pub use crate::layer::Layer;
  pub use crate::nn::{Network, DEFAULT_ERROR_THRESHOLD};
}
