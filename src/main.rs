use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rand::prelude::*;

use orthogonal::config::TrainConfig;
use orthogonal::data;
use orthogonal::nn::Model;
use orthogonal::plot::{PointSink, TextPoints};
use orthogonal::train::{self, TrainReport};

#[derive(Parser)]
#[command(name = "orthogonal")]
#[command(about = "Train small networks with an orthogonality penalty on their weights")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Learn xor one example at a time
    Xor(TrainArgs),
    /// Reconstruct the doubled xor rows from a single batch
    Autoencoder(TrainArgs),
}

#[derive(Args)]
struct TrainArgs {
    /// Seed for initialization and shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Momentum coefficient
    #[arg(long)]
    alpha: Option<f64>,

    /// Learning rate
    #[arg(long)]
    eta: Option<f64>,

    /// Epoch or iteration budget
    #[arg(long)]
    iterations: Option<usize>,

    /// Stop once an epoch costs less than this
    #[arg(long)]
    threshold: Option<f64>,

    /// Weight of the orthogonality penalty
    #[arg(long)]
    penalty: Option<f64>,

    /// File receiving one `epoch,cost` line per epoch
    #[arg(long, value_name = "PATH", default_value = "epochs.txt")]
    points: PathBuf,
}

impl TrainArgs {
    fn config(&self, defaults: TrainConfig) -> TrainConfig {
        TrainConfig {
            alpha: self.alpha.unwrap_or(defaults.alpha),
            eta: self.eta.unwrap_or(defaults.eta),
            iterations: self.iterations.unwrap_or(defaults.iterations),
            threshold: self.threshold.unwrap_or(defaults.threshold),
            seed: self.seed.unwrap_or(defaults.seed),
            penalty: self.penalty.unwrap_or(defaults.penalty),
        }
    }
}

fn print_weights(model: &Model) -> anyhow::Result<()> {
    for &p in model.params.iter() {
        println!("{}", model.graph.tensor(p)?);
        println!();
    }
    for penalty in model.penalties.iter() {
        println!("{:?} product of {}:", penalty.kind, penalty.weights);
        for (id, tensor) in model.graph.trace(penalty.product)? {
            println!("{id} = {}", model.graph.op(id)?.name());
            println!("{tensor}");
        }
        println!();
    }
    Ok(())
}

fn plot(report: &TrainReport<f32>, path: PathBuf) -> anyhow::Result<()> {
    let mut sink = TextPoints::new(&path);
    sink.scatter(&report.plot_points())
        .with_context(|| format!("writing the cost curve to {}", path.display()))
}

fn xor(args: TrainArgs) -> anyhow::Result<()> {
    let config = args.config(TrainConfig::xor());
    let mut rng = StdRng::seed_from_u64(config.seed);
    let examples = data::xor_examples();

    let mut model = Model::xor(&mut rng, config.penalty)?;
    let report = train::per_example(&mut model, &examples, &config, &mut rng)?;
    print_weights(&model)?;
    train::check_classifier(&mut model, &examples).context("xor did not converge")?;
    println!("all {} examples classified correctly", examples.len());
    plot(&report, args.points)
}

fn autoencoder(args: TrainArgs) -> anyhow::Result<()> {
    let config = args.config(TrainConfig::autoencoder());
    let mut rng = StdRng::seed_from_u64(config.seed);
    let (input, target) = data::autoencoder_batch()?;

    let mut model = Model::autoencoder(&mut rng, input.cols(), config.penalty)?;
    let report = train::batch(&mut model, &input, &target, &config)?;
    print_weights(&model)?;
    println!("{}", model.graph.evaluate(model.prediction)?);
    let mismatches = train::reconstruction_mismatches(&mut model)?;
    println!(
        "{mismatches} of {} outputs are off by at least {}",
        target.capacity(),
        train::DECISION_THRESHOLD
    );
    plot(&report, args.points)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Xor(args) => xor(args),
        Commands::Autoencoder(args) => autoencoder(args),
    }
}
