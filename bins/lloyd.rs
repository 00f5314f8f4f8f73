use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

#[path = "lloyd/commands_cluster.rs"]
mod commands_cluster;
#[path = "lloyd/commands_stats.rs"]
mod commands_stats;

#[derive(Debug, Parser)]
#[command(name = "lloyd")]
#[command(about = "k-means clustering and streaming mean statistics", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Cluster a tab-separated point file.
    Kmeans(commands_cluster::KmeansArgs),
    /// Assign points to the nearest of a fixed set of centroids.
    Predict {
        #[arg(long)]
        input: PathBuf,
        /// Tab-separated centroid file, one centroid per line.
        #[arg(long)]
        centroids: PathBuf,
        #[arg(long, value_enum, default_value_t = MetricArg::Euclidean)]
        metric: MetricArg,
        #[arg(long)]
        json: bool,
    },
    /// Read one number per line from stdin, print `count mean mean_of_squares`.
    MeanMapper,
    /// Combine mean-mapper lines from stdin into global statistics.
    MeanReducer,
    /// Write a synthetic blob dataset as tab-separated text.
    Generate {
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = 4)]
        k: usize,
        #[arg(long, default_value_t = 80)]
        points: usize,
        #[arg(long, default_value_t = 2)]
        dim: usize,
        #[arg(long, default_value_t = 0x5EED_1234_ABCD)]
        seed: u64,
        #[arg(long, default_value_t = 1.0)]
        spread: f64,
    },
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum MetricArg {
    Euclidean,
    Manhattan,
}

impl From<MetricArg> for lloyd::MetricKind {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Euclidean => lloyd::MetricKind::Euclidean,
            MetricArg::Manhattan => lloyd::MetricKind::Manhattan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum InitArg {
    Range,
    Sample,
}

impl From<InitArg> for lloyd::InitKind {
    fn from(arg: InitArg) -> Self {
        match arg {
            InitArg::Range => lloyd::InitKind::Range,
            InitArg::Sample => lloyd::InitKind::Sample,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum EmptyClusterArg {
    Keep,
    Fail,
}

impl From<EmptyClusterArg> for lloyd::EmptyClusterPolicy {
    fn from(arg: EmptyClusterArg) -> Self {
        match arg {
            EmptyClusterArg::Keep => lloyd::EmptyClusterPolicy::KeepPrevious,
            EmptyClusterArg::Fail => lloyd::EmptyClusterPolicy::Fail,
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Kmeans(args) => commands_cluster::kmeans(args),
        Command::Predict {
            input,
            centroids,
            metric,
            json,
        } => commands_cluster::predict(&input, &centroids, metric, json),
        Command::MeanMapper => commands_stats::mean_mapper(),
        Command::MeanReducer => commands_stats::mean_reducer(),
        Command::Generate {
            out,
            k,
            points,
            dim,
            seed,
            spread,
        } => commands_cluster::generate(
            out.as_deref(),
            lloyd::SyntheticConfig {
                seed,
                dim,
                clusters: k,
                points,
                spread,
                ..Default::default()
            },
        ),
        Command::Version => {
            println!("{}", lloyd::VERSION);
            Ok(())
        }
    }
}
