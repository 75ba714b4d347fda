use rand::Rng;

use crate::error::{Error, Result};

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeuronKind {
  /// Identity pass-through of a single input value, never learns.
  Input,
  Hidden,
  Output
}

impl fmt::Display for NeuronKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      NeuronKind::Input => "Input",
      NeuronKind::Hidden => "Hidden",
      NeuronKind::Output => "Output"
    };
    f.write_str(name)
  }
}

#[inline]
pub fn sigmoid(x: f64) -> f64 {
  1.0 / (1.0 + (-x).exp())
}

/// Sigmoid derivative in terms of an already squashed output `y`.
/// Only valid for the sigmoid.
#[inline]
pub fn sigmoid_dx(y: f64) -> f64 {
  y * (1.0 - y)
}

#[derive(Debug, Clone)]
pub struct Neuron {
  kind: NeuronKind,
  weights: Vec<f64>,
  // inputs seen by the last feed_forward, read back by learn
  inputs: Vec<f64>,
  output: f64,
  delta: f64
}

impl Neuron {
  pub fn new<R: Rng + ?Sized>(input_count: usize, kind: NeuronKind, rng: &mut R) -> Result<Self> {
    if input_count == 0 {
      return Err(Error::invalid("neuron input count must be greater than zero"));
    }
    if kind == NeuronKind::Input && input_count != 1 {
      return Err(Error::invalid("input neurons take exactly one input"));
    }

    let weights = match kind {
      NeuronKind::Input => vec![1.0],
      _ => (0..input_count)
        .map(|_| rng.gen_range(-1.0..1.0))
        .collect()
    };

    Ok(Neuron {
      kind,
      weights,
      inputs: vec![0.0; input_count],
      output: 0.0,
      delta: 0.0
    })
  }

  #[inline]
  pub fn kind(&self) -> NeuronKind {
    self.kind
  }

  #[inline]
  pub fn weights(&self) -> &[f64] {
    &self.weights
  }

  #[inline]
  pub fn inputs(&self) -> &[f64] {
    &self.inputs
  }

  #[inline]
  pub fn output(&self) -> f64 {
    self.output
  }

  #[inline]
  pub fn delta(&self) -> f64 {
    self.delta
  }

  pub fn feed_forward(&mut self, inputs: &[f64]) -> Result<f64> {
    if inputs.len() != self.weights.len() {
      return Err(Error::ShapeMismatch {
        expected: self.weights.len(),
        actual: inputs.len()
      });
    }

    self.inputs.copy_from_slice(inputs);

    let sum: f64 = inputs
      .iter()
      .zip(self.weights.iter())
      .map(|(x, w)| x * w)
      .sum();

    self.output = match self.kind {
      NeuronKind::Input => sum,
      _ => sigmoid(sum)
    };

    Ok(self.output)
  }

  /// Stores `delta = error * output * (1 - output)` and steps every weight
  /// against its cached input. No-op for input neurons.
  pub fn learn(&mut self, error: f64, learning_rate: f64) {
    if self.kind == NeuronKind::Input {
      return;
    }

    self.delta = error * sigmoid_dx(self.output);

    let step = self.delta * learning_rate;
    self.weights
      .iter_mut()
      .zip(self.inputs.iter())
      .for_each(|(w, x)| *w -= x * step);
  }
}

impl fmt::Display for Neuron {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.output)
  }
}
