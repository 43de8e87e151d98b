use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;

use journeybench::benchmark::{self, Benchmark};
use journeybench::config;
use journeybench::graph::TimeExpandedGraph;
use journeybench::network::Network;
use journeybench::synthetic::{self, SyntheticConfig};

#[derive(Parser)]
#[command(version, about = "Benchmarks journey planning algorithms on transit networks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Runs the queries of a benchmark config and prints one CSV row per answer.
    Run {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Writes a random network snapshot and a query set.
    Generate {
        #[arg(long, default_value_t = 100)]
        stops: usize,
        #[arg(long, default_value_t = 200)]
        trips: usize,
        #[arg(long, default_value_t = 50)]
        footpaths: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 100)]
        queries: usize,
        #[arg(long)]
        network_out: PathBuf,
        #[arg(long)]
        queries_out: PathBuf,
    },
}

#[derive(Serialize)]
struct ResultRow {
    query_idx: usize,
    repetition: usize,
    runtime_ns: u64,
    journeys: usize,
    legs: usize,
    rides: usize,
    arrival: Option<u32>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Run { config } => run_benchmark(&config),
        Command::Generate {
            stops,
            trips,
            footpaths,
            seed,
            queries,
            network_out,
            queries_out,
        } => {
            let conf = SyntheticConfig {
                stops,
                trips,
                footpaths,
                seed,
                ..SyntheticConfig::default()
            };
            let network = synthetic::network(&conf);
            network.save(&network_out)?;
            benchmark::write_queries(&queries_out, &synthetic::queries(&conf, queries))?;
            log::info!(
                "wrote {} connections to {:?} and {} queries to {:?}",
                network.connections.len(),
                network_out,
                queries,
                queries_out
            );
            Ok(())
        }
    }
}

fn run_benchmark(path: &Path) -> Result<(), Box<dyn Error>> {
    let conf = config::load_config(path)?;
    log::debug!("config: {:?}", conf);
    let network = Network::load(&conf.network_path)?;
    let queries = benchmark::load_queries(&conf.queries_path)?;
    log::info!(
        "network with {} stops, {} connections; {} queries",
        network.stops.len(),
        network.connections.len(),
        queries.len()
    );
    // second index of the network, only for the arrival column
    let graph = if conf.replay_arrivals {
        Some(TimeExpandedGraph::build(&network)?)
    } else {
        None
    };

    let mut bench = Benchmark::new(network);
    bench.set_algorithm(&conf.algorithm)?;
    bench.run_preprocessing()?;

    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for repetition in 0..conf.repetitions {
        for r in bench.run_queries(&queries)? {
            let q = queries[r.query_idx];
            let arrival = match (&graph, r.journeys.first()) {
                (Some(graph), Some(j)) => Some(j.replay(graph, q.origin as usize, q.departure)?.1),
                _ => None,
            };
            writer.serialize(ResultRow {
                query_idx: r.query_idx,
                repetition,
                runtime_ns: r.runtime_ns,
                journeys: r.journeys.len(),
                legs: r.journeys.iter().map(|j| j.legs.len()).sum(),
                rides: r.journeys.iter().map(|j| j.rides()).sum(),
                arrival,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}
