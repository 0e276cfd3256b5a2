//! Command line front end: train a network on a dataset and save it, or load a
//! saved network and print its predictions.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shallow_net::{format_output, persist, read_dataset, xor_dataset, Initialization, NetworkConfig};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "shallow-net")]
#[command(about = "Train and run a single hidden layer sigmoid network", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command : Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level : String,
}

#[derive(Clone, Copy, ValueEnum)]
enum InitArg {
    /// Uniform in [-band, band)
    Fixed,
    /// Uniform in +-1/sqrt(fan in)
    FanIn,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new network and save it
    Train {
        #[arg(long, default_value = "2")]
        input_size : usize,

        #[arg(long, default_value = "5")]
        hidden_size : usize,

        #[arg(long, default_value = "1")]
        output_size : usize,

        #[arg(short = 'r', long, default_value = "0.5")]
        learning_rate : f64,

        #[arg(short, long, default_value = "10000")]
        epochs : usize,

        /// Seed for the initial weights, random when omitted
        #[arg(long)]
        seed : Option<u64>,

        #[arg(long, value_enum, default_value = "fixed")]
        init : InitArg,

        /// Half width used by the fixed initialization
        #[arg(long, default_value = "0.05")]
        band : f64,

        /// Keep both bias vectors at zero
        #[arg(long)]
        no_biases : bool,

        /// Dataset file with `in1,..;out1,..` lines, XOR when omitted
        #[arg(short, long)]
        data : Option<PathBuf>,

        /// Log the loss every this many epochs (0 disables)
        #[arg(long, default_value = "1000")]
        log_every : usize,

        /// Where to write the trained model
        #[arg(short, long, default_value = "model.bin")]
        output : PathBuf,
    },

    /// Load a saved network and print its predictions
    Predict {
        #[arg(short, long, default_value = "model.bin")]
        model : PathBuf,

        /// Comma separated input vector, may be repeated
        #[arg(short, long, required = true)]
        input : Vec<String>,
    },
}

fn parse_input(text : &str) -> Result<Vec<f64>> {
    text.split(',')
        .map(|v| v.trim().parse::<f64>().with_context(|| format!("invalid input value {:?}", v)))
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.parse::<Level>()
        .map_err(|_| anyhow!("unknown log level {:?}", cli.log_level))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .init();

    match cli.command {
        Commands::Train {
            input_size,
            hidden_size,
            output_size,
            learning_rate,
            epochs,
            seed,
            init,
            band,
            no_biases,
            data,
            log_every,
            output,
        } => {
            let init = match init {
                InitArg::Fixed => Initialization::FixedBand(band),
                InitArg::FanIn => Initialization::FanIn,
            };
            let config = NetworkConfig::new(input_size, hidden_size, output_size, learning_rate)
                .with_init(init)
                .with_biases(!no_biases);
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut network = config.build(&mut rng).context("invalid network configuration")?;

            let samples = match data {
                Some(path) => read_dataset(&path, input_size, output_size)
                    .with_context(|| format!("failed to read dataset {}", path.display()))?,
                None => xor_dataset(),
            };
            info!(samples = samples.len(), epochs, learning_rate, "training");
            let loss = network.fit(&samples, epochs, log_every)?;
            info!(loss, "training done");

            for sample in &samples {
                let prediction = network.predict(&sample.input)?;
                println!("{} -> {}", format_output(&sample.input), format_output(&prediction));
            }

            persist::save(&network, &output)
                .with_context(|| format!("failed to save model to {}", output.display()))?;
            info!(path = %output.display(), "model saved");
        }
        Commands::Predict { model, input } => {
            let network = persist::load(&model)
                .with_context(|| format!("failed to load model from {}", model.display()))?;
            for text in &input {
                let values = parse_input(text)?;
                let prediction = network.predict(&values)?;
                println!("{}", format_output(&prediction));
            }
        }
    }

    Ok(())
}
