use rand::Rng;
use tracing::{debug, info, trace};

use crate::error::{Error, Result};
use crate::layer::Layer;
use crate::neuron::{Neuron, NeuronKind};
use crate::topology::Topology;

pub const DEFAULT_ERROR_THRESHOLD: f64 = 0.001;

// errors on rows whose target is exactly 1 are corrected 3x harder
const POSITIVE_TARGET_WEIGHT: f64 = 3.0;

#[derive(Debug, Clone)]
pub struct Network {
  topology: Topology,
  // [input, hidden..., output], never resized after construction
  layers: Vec<Layer>
}

impl Network {
  pub fn new(topology: Topology) -> Result<Self> {
    Self::with_rng(topology, &mut rand::thread_rng())
  }

  /// Builds every layer up front, drawing initial weights from `rng`.
  pub fn with_rng<R: Rng + ?Sized>(topology: Topology, rng: &mut R) -> Result<Self> {
    let mut layers = Vec::with_capacity(topology.total_layer_count());

    let input_neurons = (0..topology.input_count())
      .map(|_| Neuron::new(1, NeuronKind::Input, &mut *rng))
      .collect::<Result<Vec<_>>>()?;
    layers.push(Layer::new(input_neurons, NeuronKind::Input)?);

    let mut prev = topology.input_count();
    for &size in topology.hidden_layers() {
      let hidden_neurons = (0..size)
        .map(|_| Neuron::new(prev, NeuronKind::Hidden, &mut *rng))
        .collect::<Result<Vec<_>>>()?;
      layers.push(Layer::new(hidden_neurons, NeuronKind::Hidden)?);
      prev = size;
    }

    let output_neurons = (0..topology.output_count())
      .map(|_| Neuron::new(prev, NeuronKind::Output, &mut *rng))
      .collect::<Result<Vec<_>>>()?;
    layers.push(Layer::new(output_neurons, NeuronKind::Output)?);

    debug!(layers = layers.len(), "built network, {}", topology);

    Ok(Network { topology, layers })
  }

  #[inline]
  pub fn topology(&self) -> &Topology {
    &self.topology
  }

  #[inline]
  pub fn layers(&self) -> &[Layer] {
    &self.layers
  }

  /// Runs a forward pass and returns the winning output neuron: the only one
  /// when there is a single output, otherwise the one with the largest output
  /// (first one wins a tie).
  pub fn predict<A: AsRef<[f64]>>(&mut self, inputs: A) -> Result<&Neuron> {
    self.feed_forward(inputs.as_ref())?;

    let neurons = self.output_layer().neurons();
    if self.topology.output_count() == 1 {
      return Ok(&neurons[0]);
    }
    Ok(strongest(neurons))
  }

  /// Trains with the default error threshold, see [`Network::learn_with_threshold`].
  pub fn learn<R: AsRef<[f64]>>(&mut self, expected: &[f64], inputs: &[R], epochs: usize) -> Result<f64> {
    self.learn_with_threshold(expected, inputs, epochs, DEFAULT_ERROR_THRESHOLD)
  }

  /// Backpropagates every row of `inputs` against its target in `expected`,
  /// once per epoch, in row order.
  ///
  /// Stops early once the accumulated error divided by the number of epochs
  /// run so far drops below `error_threshold`. Returns the accumulated error
  /// divided by the number of epochs actually run.
  pub fn learn_with_threshold<R: AsRef<[f64]>>(
    &mut self,
    expected: &[f64],
    inputs: &[R],
    epochs: usize,
    error_threshold: f64
  ) -> Result<f64> {
    if epochs == 0 {
      return Err(Error::invalid("epochs must be greater than zero"));
    }
    if inputs.is_empty() {
      return Err(Error::invalid("training set cannot be empty"));
    }
    if expected.len() != inputs.len() {
      return Err(Error::invalid(format!(
        "got {} expected values for {} training rows", expected.len(), inputs.len()
      )));
    }
    let input_count = self.topology.input_count();
    if let Some(row) = inputs.iter().map(|row| row.as_ref()).find(|row| row.len() != input_count) {
      return Err(Error::ShapeMismatch { expected: input_count, actual: row.len() });
    }

    info!(epochs, rows = inputs.len(), "training started");

    let mut total_error = 0.0;
    let mut epochs_run = 0;
    for epoch in 0..epochs {
      for (row, &target) in inputs.iter().zip(expected) {
        total_error += self.backpropagate(target, row.as_ref())?;
      }
      epochs_run = epoch + 1;

      let running_error = total_error / epochs_run as f64;
      trace!(epoch, running_error);
      if running_error < error_threshold {
        info!(epoch, running_error, "error below threshold, stopping early");
        break;
      }
    }

    let mean_error = total_error / epochs_run as f64;
    info!(epochs_run, mean_error, "training finished");

    Ok(mean_error)
  }

  fn feed_forward(&mut self, inputs: &[f64]) -> Result<()> {
    let input_count = self.topology.input_count();
    if inputs.len() != input_count {
      return Err(Error::ShapeMismatch { expected: input_count, actual: inputs.len() });
    }

    for (neuron, &signal) in self.layers[0].neurons_mut().iter_mut().zip(inputs) {
      neuron.feed_forward(&[signal])?;
    }

    for i in 1..self.layers.len() {
      let signals = self.layers[i - 1].signals();
      for neuron in self.layers[i].neurons_mut() {
        neuron.feed_forward(&signals)?;
      }
    }

    Ok(())
  }

  /// One forward and backward pass for a single row, returns the squared
  /// (weighted) difference.
  fn backpropagate(&mut self, expected: f64, inputs: &[f64]) -> Result<f64> {
    let actual = self.predict(inputs)?.output();
    let weight = if expected == 1.0 { POSITIVE_TARGET_WEIGHT } else { 1.0 };
    let difference = (actual - expected) * weight;
    let learning_rate = self.topology.learning_rate();

    let last = self.layers.len() - 1;
    for neuron in self.layers[last].neurons_mut() {
      neuron.learn(difference, learning_rate);
    }

    // deltas of layer i + 1 are already fresh when layer i is visited
    for i in (0..last).rev() {
      let (head, tail) = self.layers.split_at_mut(i + 1);
      let next = &tail[0];

      for (j, neuron) in head[i].neurons_mut().iter_mut().enumerate() {
        let error: f64 = next.neurons()
          .iter()
          .map(|n| n.weights()[j] * n.delta())
          .sum();
        neuron.learn(error, learning_rate);
      }
    }

    Ok(difference * difference)
  }

  #[inline]
  fn output_layer(&self) -> &Layer {
    &self.layers[self.layers.len() - 1]
  }
}

// `neurons` is never empty, layers reject empty neuron lists
fn strongest(neurons: &[Neuron]) -> &Neuron {
  let mut best = &neurons[0];
  for neuron in &neurons[1..] {
    if neuron.output() > best.output() {
      best = neuron;
    }
  }
  best
}

#[cfg(test)]
mod test_nn {
  use super::*;

  use rand::rngs::StdRng;
  use rand::SeedableRng;

  const THIRD_BIT_INPUTS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0]
  ];
  const THIRD_BIT_EXPECTED: [f64; 8] = [0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0];

  fn network(input: usize, output: usize, hidden: &[usize], seed: u64) -> Network {
    let topology = Topology::new(input, output, 0.1, hidden).unwrap();
    Network::with_rng(topology, &mut StdRng::seed_from_u64(seed)).unwrap()
  }

  fn weights(nn: &Network, layer: usize) -> Vec<Vec<f64>> {
    nn.layers()[layer]
      .neurons()
      .iter()
      .map(|n| n.weights().to_owned())
      .collect()
  }

  #[test]
  fn test_nn_new() {
    let nn = network(4, 3, &[8, 6, 5], 1);

    assert_eq!(nn.layers().len(), 5);
    let sizes: Vec<_> = nn.layers().iter().map(Layer::neuron_count).collect();
    assert_eq!(sizes, nn.topology().layer_sizes());
    assert_eq!(sizes, vec![4, 8, 6, 5, 3]);
  }

  #[test]
  fn test_nn_new_wiring() {
    let nn = network(4, 3, &[8, 6], 1);
    let kinds: Vec<_> = nn.layers().iter().map(Layer::kind).collect();

    assert_eq!(kinds, vec![NeuronKind::Input, NeuronKind::Hidden, NeuronKind::Hidden, NeuronKind::Output]);
    assert!(nn.layers()[0].neurons().iter().all(|n| n.weights() == [1.0]));
    assert!(nn.layers()[1].neurons().iter().all(|n| n.weights().len() == 4));
    assert!(nn.layers()[2].neurons().iter().all(|n| n.weights().len() == 8));
    assert!(nn.layers()[3].neurons().iter().all(|n| n.weights().len() == 6));
  }

  #[test]
  fn test_nn_new_seeded_is_deterministic() {
    let a = network(3, 2, &[4], 42);
    let b = network(3, 2, &[4], 42);

    for layer in 0..a.layers().len() {
      assert_eq!(weights(&a, layer), weights(&b, layer));
    }
  }

  #[test]
  fn test_nn_predict_single_output() {
    let mut nn = network(3, 1, &[2], 9);
    let output = nn.predict([0.2, 0.4, 0.6]).unwrap().output();

    assert_eq!(output, nn.layers()[2].neurons()[0].output());
    assert!(output > 0.0 && output < 1.0);
  }

  #[test]
  fn test_nn_predict_multi_output_is_max() {
    let mut nn = network(2, 5, &[6], 13);

    for inputs in [[0.0, 1.0], [1.0, 0.0], [0.3, -0.8]] {
      let winner = nn.predict(inputs).unwrap().output();
      let max = nn.layers()[2]
        .signals()
        .into_iter()
        .fold(f64::MIN, f64::max);
      assert_eq!(winner, max);
    }
  }

  #[test]
  fn test_nn_predict_signals_flow() {
    let mut nn = network(2, 1, &[3], 4);
    nn.predict([0.25, -1.5]).unwrap();

    assert_eq!(nn.layers()[0].signals(), vec![0.25, -1.5]);
    assert_eq!(nn.layers()[1].neurons()[0].inputs(), &[0.25, -1.5]);
    assert_eq!(nn.layers()[2].neurons()[0].inputs(), nn.layers()[1].signals().as_slice());
  }

  #[test]
  fn test_nn_predict_is_idempotent() {
    let mut nn = network(3, 2, &[4, 3], 21);
    let first = nn.predict([1.0, 0.0, 1.0]).unwrap().output();
    let second = nn.predict([1.0, 0.0, 1.0]).unwrap().output();

    assert_eq!(first, second);
  }

  #[test]
  fn test_nn_predict_shape_mismatch() {
    let mut nn = network(3, 1, &[2], 0);

    assert!(matches!(nn.predict([1.0, 0.0]), Err(Error::ShapeMismatch { expected: 3, actual: 2 })));
  }

  #[test]
  fn test_nn_strongest_tie_goes_to_first() {
    let mut a = Neuron::new(2, NeuronKind::Output, &mut StdRng::seed_from_u64(8)).unwrap();
    let mut b = Neuron::new(2, NeuronKind::Output, &mut StdRng::seed_from_u64(8)).unwrap();
    a.feed_forward(&[0.5, 0.5]).unwrap();
    b.feed_forward(&[0.5, 0.5]).unwrap();
    let neurons = vec![a, b];

    assert!(std::ptr::eq(strongest(&neurons), &neurons[0]));
  }

  #[test]
  fn test_nn_learn_rejects_bad_arguments() {
    let mut nn = network(3, 1, &[2], 0);
    let rows = [[0.0, 1.0, 0.0], [1.0, 1.0, 1.0]];

    assert!(matches!(nn.learn(&[0.0, 1.0], &rows, 0), Err(Error::InvalidArgument(_))));
    assert!(matches!(nn.learn(&[0.0], &rows, 10), Err(Error::InvalidArgument(_))));
    assert!(matches!(nn.learn::<[f64; 3]>(&[], &[], 10), Err(Error::InvalidArgument(_))));
    assert!(matches!(
      nn.learn(&[0.0], &[vec![1.0, 0.0]], 10),
      Err(Error::ShapeMismatch { expected: 3, actual: 2 })
    ));
  }

  #[test]
  fn test_nn_learn_updates_weights() {
    let mut nn = network(3, 1, &[2], 17);
    let before: Vec<_> = (0..3).map(|i| weights(&nn, i)).collect();

    let error = nn.learn(&[1.0], &[[1.0, 1.0, 1.0]], 1).unwrap();

    assert!(error > 0.0);
    assert_eq!(weights(&nn, 0), before[0]);
    assert_ne!(weights(&nn, 1), before[1]);
    assert_ne!(weights(&nn, 2), before[2]);
  }

  #[test]
  fn test_nn_learn_early_stop_divides_by_epochs_run() {
    let nn = network(3, 1, &[2], 5);
    let mut stops_early = nn.clone();
    let mut single_epoch = nn;

    let early = stops_early
      .learn_with_threshold(&THIRD_BIT_EXPECTED, &THIRD_BIT_INPUTS, 1000, f64::INFINITY)
      .unwrap();
    let single = single_epoch
      .learn_with_threshold(&THIRD_BIT_EXPECTED, &THIRD_BIT_INPUTS, 1, 0.0)
      .unwrap();

    assert_eq!(early, single);
  }

  #[test]
  fn test_nn_learn_third_bit() {
    // random init can land in a bad basin, so any seed converging is enough
    let converged = (0..10).any(|seed| {
      let mut nn = network(3, 1, &[2], seed);
      nn.learn(&THIRD_BIT_EXPECTED, &THIRD_BIT_INPUTS, 10_000).unwrap();

      let positive = nn.predict([1.0, 0.0, 1.0]).unwrap().output();
      let negative = nn.predict([0.0, 0.0, 0.0]).unwrap().output();
      positive > 0.5 && negative < 0.5
    });

    assert!(converged);
  }
}
