use clap::Parser;
use rand::prelude::*;
use tracing_subscriber::EnvFilter;

use bpnn::prelude::*;

/// Trains a network on the "third bit" selector and prints its predictions.
#[derive(Parser, Debug)]
#[command(name = "bpnn", version, about, long_about = None)]
struct Cli {
  /// Number of passes over the training set
  #[arg(short, long, default_value_t = 10_000)]
  epochs: usize,

  /// Weight update step size
  #[arg(short, long, default_value_t = 0.1)]
  learning_rate: f64,

  /// Hidden layer sizes, e.g. `--hidden 4,3`
  #[arg(long, value_delimiter = ',', default_value = "2")]
  hidden: Vec<usize>,

  /// Stop once the running mean error drops below this
  #[arg(long, default_value_t = DEFAULT_ERROR_THRESHOLD)]
  error_threshold: f64,

  /// Seed for weight initialization, random when omitted
  #[arg(short, long)]
  seed: Option<u64>,

  /// Log filter used when RUST_LOG is unset
  #[arg(long, default_value = "info")]
  log_level: String
}

const INPUTS: [[f64; 3]; 8] = [
  [0.0, 0.0, 0.0],
  [0.0, 0.0, 1.0],
  [0.0, 1.0, 0.0],
  [1.0, 0.0, 0.0],
  [1.0, 1.0, 0.0],
  [0.0, 1.0, 1.0],
  [1.0, 0.0, 1.0],
  [1.0, 1.0, 1.0]
];
const EXPECTED: [f64; 8] = [0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0];

fn main() -> bpnn::Result<()> {
  let cli = Cli::parse();

  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .init();

  let topology = TopologyBuilder::new()
    .input_count(3)
    .output_count(1)
    .learning_rate(cli.learning_rate)
    .hidden_layers(&cli.hidden)
    .build()?;
  println!("{}", topology);

  let mut nn = match cli.seed {
    Some(seed) => Network::with_rng(topology, &mut StdRng::seed_from_u64(seed))?,
    None => Network::new(topology)?
  };

  let error = nn.learn_with_threshold(&EXPECTED, &INPUTS, cli.epochs, cli.error_threshold)?;
  println!("error after {} epochs: {}", cli.epochs, error);

  println!("predictions:");
  for (inputs, expected) in INPUTS.iter().zip(EXPECTED) {
    let prediction = nn.predict(inputs)?;
    println!("{:?} => {:.4} (expected {})", inputs, prediction.output(), expected);
  }

  Ok(())
}
