use crate::error::{Error, Result};

use std::fmt;

/// Shape and learning rate of a network. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
  input_count: usize,
  output_count: usize,
  learning_rate: f64,
  hidden_layers: Vec<usize> // [2] for a 3 -> 2 -> 1 network
}

impl Topology {
  pub fn new<H: AsRef<[usize]>>(
    input_count: usize,
    output_count: usize,
    learning_rate: f64,
    hidden_layers: H
  ) -> Result<Self> {
    let hidden_layers = hidden_layers.as_ref();

    if input_count == 0 {
      return Err(Error::invalid("input count must be greater than zero"));
    }
    if output_count == 0 {
      return Err(Error::invalid("output count must be greater than zero"));
    }
    if hidden_layers.is_empty() {
      return Err(Error::invalid("network must have at least one hidden layer"));
    }
    if hidden_layers.iter().any(|&size| size == 0) {
      return Err(Error::invalid("every hidden layer size must be greater than zero"));
    }

    Ok(Topology {
      input_count,
      output_count,
      learning_rate,
      hidden_layers: hidden_layers.to_owned()
    })
  }

  #[inline]
  pub fn input_count(&self) -> usize {
    self.input_count
  }

  #[inline]
  pub fn output_count(&self) -> usize {
    self.output_count
  }

  #[inline]
  pub fn learning_rate(&self) -> f64 {
    self.learning_rate
  }

  #[inline]
  pub fn hidden_layers(&self) -> &[usize] {
    &self.hidden_layers
  }

  /// Input, hiddens and output.
  #[inline]
  pub fn total_layer_count(&self) -> usize {
    self.hidden_layers.len() + 2
  }

  /// `[input, hidden..., output]`
  pub fn layer_sizes(&self) -> Vec<usize> {
    let mut sizes = Vec::with_capacity(self.total_layer_count());
    sizes.push(self.input_count);
    sizes.extend_from_slice(&self.hidden_layers);
    sizes.push(self.output_count);
    sizes
  }
}

impl fmt::Display for Topology {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sizes: Vec<String> = self.layer_sizes()
      .iter()
      .map(|size| size.to_string())
      .collect();
    write!(f, "Topology: {}", sizes.join(" -> "))
  }
}


pub struct TopologyBuilder {
  input_count: usize,
  output_count: usize,
  learning_rate: f64,
  hidden_layers: Vec<usize>
}

impl TopologyBuilder {
  pub fn new() -> Self {
    TopologyBuilder {
      input_count: 0,
      output_count: 1,
      learning_rate: 0.1,
      hidden_layers: Vec::new()
    }
  }

  pub fn input_count(mut self, input_count: usize) -> Self {
    self.input_count = input_count;
    self
  }

  pub fn output_count(mut self, output_count: usize) -> Self {
    self.output_count = output_count;
    self
  }

  pub fn learning_rate(mut self, learning_rate: f64) -> Self {
    self.learning_rate = learning_rate;
    self
  }

  pub fn hidden_layers<H: AsRef<[usize]>>(mut self, hidden_layers: H) -> Self {
    self.hidden_layers = hidden_layers.as_ref().to_owned();
    self
  }

  pub fn build(self) -> Result<Topology> {
    Topology::new(self.input_count, self.output_count, self.learning_rate, self.hidden_layers)
  }
}

impl Default for TopologyBuilder {
  fn default() -> Self {
    Self::new()
  }
}
