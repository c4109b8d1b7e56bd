use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};

use tissue_graph::cluster::propagation;
use tissue_graph::data::preprocessing::{build_layered, TissueGraph};
use tissue_graph::data::{self, Dataset};
use tissue_graph::graph::algorithms;
use tissue_graph::multiplex;
use tissue_graph::storage::{self, snapshot, NodeProperties};
use tissue_graph::{Algorithm, Config, DatasetSpec, Partition, Strategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Json,
    Parquet,
}

#[derive(Parser, Debug)]
#[clap(
    name = "tissue-graph",
    about = "Per-tissue graph metrics of protein interaction networks"
)]
struct Cli {
    /// Dataset file (JSON) or interaction table (Parquet); repeat for several datasets
    #[clap(long, required = true)]
    input: Vec<String>,

    /// Expression table (Parquet), one per --input
    #[clap(long)]
    expression: Vec<String>,

    /// Input file format
    #[clap(long, value_enum, default_value = "json")]
    format: InputFormat,

    /// Output directory for results
    #[clap(long, default_value = "results")]
    output_dir: String,

    /// Algorithm family to run
    #[clap(long, value_enum, default_value = "all")]
    algorithm: Algorithm,

    /// Implementation used for every family
    #[clap(long, value_enum, default_value = "vectorized")]
    strategy: Strategy,

    /// Label propagation update threshold (default: max(1, N / 1e5))
    #[clap(long)]
    update_threshold: Option<usize>,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Run every strategy of the selected families and report timings and deviations
    #[clap(long)]
    compare: bool,

    /// Also write a JSON snapshot of each layered graph and its layer partitions
    #[clap(long)]
    save_graph: bool,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let datasets = match self.format {
            InputFormat::Json => self
                .input
                .iter()
                .map(|network| DatasetSpec {
                    network: network.clone(),
                    expression: String::new(),
                })
                .collect(),
            InputFormat::Parquet => {
                if self.expression.len() != self.input.len() {
                    return Err(anyhow!(
                        "Parquet input needs one --expression per --input ({} vs {})",
                        self.expression.len(),
                        self.input.len()
                    ));
                }
                self.input
                    .iter()
                    .zip(&self.expression)
                    .map(|(network, expression)| DatasetSpec {
                        network: network.clone(),
                        expression: expression.clone(),
                    })
                    .collect()
            }
        };
        Ok(Config::new(
            self.update_threshold,
            self.strategy,
            self.threads,
            datasets,
        ))
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let config = args.config()?;

    let num_threads = config.resolved_threads();
    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Output: {}", args.output_dir);
    std::fs::create_dir_all(&args.output_dir)?;

    for source in &config.datasets {
        let dataset = load(source, args.format)?;
        let tissue_graph = build_layered(&dataset)?;
        let clusters =
            analyze(&tissue_graph, &config, args.algorithm, args.compare, &args.output_dir)?;
        if args.save_graph {
            save_snapshot(&tissue_graph, clusters.as_deref(), &args.output_dir)?;
        }
    }

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}

fn load(source: &DatasetSpec, format: InputFormat) -> Result<Dataset> {
    match format {
        InputFormat::Json => data::json::load_dataset(&source.network),
        InputFormat::Parquet => data::parquet::load_dataset(&source.network, &source.expression),
    }
}

fn analyze(
    tissue_graph: &TissueGraph,
    config: &Config,
    algorithm: Algorithm,
    compare: bool,
    output_dir: &str,
) -> Result<Option<Vec<Partition>>> {
    let graph = &tissue_graph.graph;
    let strategy = config.strategy;
    let mut properties = NodeProperties::default();

    if algorithm.includes(Algorithm::Degree) {
        properties.degree = Some(timed("degree", || algorithms::degrees(graph.topology())));
        properties.layer_degree = Some(timed("layer degree", || multiplex::layer_degrees(graph)));
        properties.max_layer_degree = Some(multiplex::max_layer_degrees(graph));
        properties.coexistence_degree = Some(multiplex::coexistence_degrees(graph));
        properties.neighbor_existence = Some(multiplex::neighbor_existence_range(graph));
    }

    if algorithm.includes(Algorithm::Cc) {
        if compare {
            compare_scores("clustering", &Strategy::ALL, |s| {
                multiplex::clustering_coefficients(graph, s)
            });
        }
        properties.clustering = Some(timed("clustering", || {
            multiplex::clustering_coefficients(graph, strategy)
        }));
    }

    if algorithm.includes(Algorithm::Bw) {
        if compare {
            compare_scores("betweenness", &[Strategy::Baseline, Strategy::Vectorized], |s| {
                multiplex::betweenness(graph, s)
            });
        }
        properties.betweenness = Some(timed("betweenness", || multiplex::betweenness(graph, strategy)));
    }

    if algorithm.includes(Algorithm::Plp) {
        let threshold = Some(config.resolved_threshold(graph.node_count()));
        if compare {
            let baseline = timed("label propagation [baseline]", || {
                propagation::label_propagation_baseline(graph, threshold)
            });
            let vectorized = timed("label propagation [vectorized]", || {
                propagation::label_propagation_vec(graph, threshold)
            });
            let differing = baseline
                .iter()
                .zip(&vectorized.partitions)
                .filter(|(a, b)| a != b)
                .count();
            log::info!(
                "label propagation: {} rounds, {} of {} layers differ between strategies",
                vectorized.rounds,
                differing,
                baseline.len()
            );
        }
        properties.clusters = Some(timed("label propagation", || {
            propagation::label_propagation(graph, strategy, threshold)
        }));
    }

    if algorithm.includes(Algorithm::Aggregate) {
        let coexistence = timed("coexistence graph", || multiplex::coexistence_graph(graph));
        storage::save_aggregate(output_dir, tissue_graph, "coexistence", &coexistence)?;
        let correlation = timed("correlation graph", || multiplex::correlation_graph(graph));
        storage::save_aggregate(output_dir, tissue_graph, "correlation", &correlation)?;
    }

    storage::save_node_properties(output_dir, tissue_graph, &properties)?;
    storage::save_summary(output_dir, tissue_graph, properties.clusters.as_deref())?;

    Ok(properties.clusters)
}

fn save_snapshot(
    tissue_graph: &TissueGraph,
    clusters: Option<&[Partition]>,
    output_dir: &str,
) -> Result<()> {
    let dir = Path::new(output_dir);
    snapshot::save_graph(
        dir.join(format!("{}_layered_graph.json", tissue_graph.name)),
        &tissue_graph.graph,
    )?;
    if let Some(partitions) = clusters {
        snapshot::save_partitions(
            dir.join(format!("{}_partitions.json", tissue_graph.name)),
            partitions,
        )?;
    }
    Ok(())
}

fn timed<R>(label: &str, run: impl FnOnce() -> R) -> R {
    let start = Instant::now();
    let result = run();
    log::info!("{} took {:.3}s", label, start.elapsed().as_secs_f64());
    result
}

/// Run `compute` with every strategy and log the largest deviation from the first
fn compare_scores<F>(family: &str, strategies: &[Strategy], compute: F)
where
    F: Fn(Strategy) -> Vec<Vec<f64>>,
{
    let results: Vec<(Strategy, Vec<Vec<f64>>)> = strategies
        .iter()
        .map(|&s| (s, timed(&format!("{} [{:?}]", family, s), || compute(s))))
        .collect();

    let Some((reference_strategy, reference)) = results.first() else {
        return;
    };
    for (strategy, scores) in &results[1..] {
        let deviation = reference
            .iter()
            .flatten()
            .zip(scores.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        log::info!(
            "{}: max deviation {:?} vs {:?} = {:e}",
            family,
            strategy,
            reference_strategy,
            deviation
        );
    }
}
