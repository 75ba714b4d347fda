use crate::error::{Error, Result};
use crate::neuron::{Neuron, NeuronKind};

use std::fmt;

#[derive(Debug, Clone)]
pub struct Layer {
  neurons: Vec<Neuron>,
  kind: NeuronKind
}

impl Layer {
  pub fn new(neurons: Vec<Neuron>, kind: NeuronKind) -> Result<Self> {
    if neurons.is_empty() {
      return Err(Error::invalid("layer neuron list cannot be empty"));
    }
    if neurons.iter().any(|n| n.kind() != kind) {
      return Err(Error::invalid(format!("every neuron in a {} layer must be of kind {}", kind, kind)));
    }

    Ok(Layer { neurons, kind })
  }

  #[inline]
  pub fn kind(&self) -> NeuronKind {
    self.kind
  }

  #[inline]
  pub fn neurons(&self) -> &[Neuron] {
    &self.neurons
  }

  #[inline]
  pub(crate) fn neurons_mut(&mut self) -> &mut [Neuron] {
    &mut self.neurons
  }

  #[inline]
  pub fn neuron_count(&self) -> usize {
    self.neurons.len()
  }

  /// Current output of every neuron, in order.
  pub fn signals(&self) -> Vec<f64> {
    self.neurons
      .iter()
      .map(Neuron::output)
      .collect()
  }
}

impl fmt::Display for Layer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.kind)
  }
}
