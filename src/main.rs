// packetload: how big should a UDP packet be when the link drops some of them?
// Evaluates a small retransmission + header overhead model over packet sizes and
// loss rates and writes the curves out for plotting.

// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use packetload::prelude::*;
use packetload::report;
use packetload::sweep::{run_sweeps_with_progress, size_sweep};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::time::Instant;
use tracing::{info, Level};

// Payload size the UDP file transfer sender settled on
const DEFAULT_PACKET_SIZE: f64 = 1400.0;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args, Clone, Copy)]
struct LinkArgs {
    #[arg(long, default_value_t = 1500)]
    mtu: u32,
    #[arg(long, default_value_t = 120)]
    overhead: u32,
    #[arg(long, default_value_t = 65535)]
    max_size: u32,
}

impl LinkArgs {
    fn model_config(self) -> ModelConfig {
        ModelConfig::default()
            .with_mtu(self.mtu)
            .with_overhead(self.overhead)
            .with_max_size(self.max_size)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Both sweeps, optimal sizes and the figure
    Run {
        #[command(flatten)]
        link: LinkArgs,
        #[arg(short, long, default_value = "results")]
        output: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        no_export: bool,
    },

    /// Load of one packet size at one loss rate
    Eval {
        #[command(flatten)]
        link: LinkArgs,
        #[arg(short, long, default_value_t = DEFAULT_PACKET_SIZE)]
        size: f64,
        #[arg(short, long)]
        loss_rate: f64,
    },

    /// Best packet size for a loss rate
    Optimal {
        #[command(flatten)]
        link: LinkArgs,
        #[arg(short, long)]
        loss_rate: f64,
    },

    /// Monte-Carlo check of the closed form
    Simulate {
        #[command(flatten)]
        link: LinkArgs,
        #[arg(short, long, default_value_t = DEFAULT_PACKET_SIZE)]
        size: f64,
        #[arg(short, long)]
        loss_rate: f64,
        #[arg(short, long, default_value_t = 100_000)]
        trials: u64,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let program_start = Instant::now();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run { link, output, name, no_export } => {
            run(link.model_config(), &output, name, no_export)?;
        }

        Commands::Eval { link, size, loss_rate } => {
            let model = LoadModel::new(link.model_config())?;
            let load = model.load_at(size, loss_rate)?;
            info!(
                "{} bytes = {:.3} fragments at mtu {}",
                size,
                packetload::model::fragments(size, model.mtu()),
                model.config().mtu
            );
            println!("load({} bytes, {}% loss) = {:.6}", size, loss_rate * 100.0, load);
        }

        Commands::Optimal { link, loss_rate } => {
            let model = LoadModel::new(link.model_config())?;
            let sizes = size_sweep(model.config().max_size);
            let (index, load) = model.optimal_size(&sizes, loss_rate)?;
            let optimal = OptimalSize {
                loss_rate,
                index,
                size: sizes[index] as u32,
                load,
            };
            println!("{}", optimal.summary());
            info!("Minimum load {:.6} at {}", load, report::human_size(optimal.size as u64));
        }

        Commands::Simulate { link, size, loss_rate, trials, seed } => {
            let model = LoadModel::new(link.model_config())?;
            let config = SimConfig::default().with_trials(trials).with_seed(seed);
            let sim = simulate_transmissions(&model, size, loss_rate, &config)?;
            println!(
                "simulated load = {:.6}, closed form = {:.6}, |diff| = {:.6}",
                sim.simulated_load,
                sim.expected_load,
                sim.abs_error()
            );
        }
    }

    let total_time = program_start.elapsed();
    info!("Total runtime: {:.2}s", total_time.as_secs_f64());

    Ok(())
}

fn run(model_config: ModelConfig, output: &str, name: Option<String>, no_export: bool) -> Result<()> {
    let model = LoadModel::new(model_config)?;
    let sweep = SweepConfig::default();

    info!("packetload: Sweep");
    info!(
        "MTU: {} bytes, Overhead: {} bytes, Sizes: 1..{}",
        model_config.mtu, model_config.overhead, model_config.max_size
    );

    let results = run_sweeps_with_progress(&model, &sweep)?;

    for (line, optimal) in report::summary_lines(&results).iter().zip(&results.optimal) {
        println!("{}", line);
        info!(
            "  {} at load {:.6}",
            report::human_size(optimal.size as u64),
            optimal.load
        );
    }

    if no_export {
        return Ok(());
    }

    let name = name.unwrap_or_else(report::default_run_name);
    let paths = report::export_all(&results, &model_config, &sweep, output, &name)?;

    info!("");
    info!("Figure is ready. Build it next to its data with:");
    info!("   lualatex {}", paths.figure_tex.display());

    Ok(())
}
