use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use lloyd::{Dataset, IterationEvent, IterationObserver, KMeans, KMeansOptions, MetricKind};

use crate::{EmptyClusterArg, InitArg, MetricArg};

#[derive(Debug, Args)]
pub(crate) struct KmeansArgs {
    #[arg(long)]
    input: PathBuf,
    /// JSON file with k-means options; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    k: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    max_iterations: Option<usize>,
    #[arg(long)]
    restarts: Option<usize>,
    #[arg(long, value_enum)]
    metric: Option<MetricArg>,
    #[arg(long, value_enum)]
    init: Option<InitArg>,
    #[arg(long, value_enum)]
    empty_cluster: Option<EmptyClusterArg>,
    /// Write the final centroids here as tab-separated text.
    #[arg(long)]
    centroids_out: Option<PathBuf>,
    #[arg(long)]
    json: bool,
    /// Suppress the per-pass centroid dump.
    #[arg(long)]
    quiet: bool,
}

impl KmeansArgs {
    fn options(&self) -> anyhow::Result<KMeansOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("read config {}", path.display()))?;
                KMeansOptions::from_json(&bytes)
                    .with_context(|| format!("parse config {}", path.display()))?
            }
            None => KMeansOptions::default(),
        };
        if let Some(k) = self.k {
            options.k = k;
        }
        if let Some(seed) = self.seed {
            options.seed = Some(seed);
        }
        if let Some(max) = self.max_iterations {
            options.max_iterations = max;
        }
        if let Some(restarts) = self.restarts {
            options.restarts = restarts;
        }
        if let Some(metric) = self.metric {
            options.metric = metric.into();
        }
        if let Some(init) = self.init {
            options.init = init.into();
        }
        if let Some(policy) = self.empty_cluster {
            options.empty_cluster = policy.into();
        }
        if self.config.is_none() && self.k.is_none() {
            anyhow::bail!("--k is required unless --config sets it");
        }
        options.validate()?;
        Ok(options)
    }
}

struct PassPrinter;

impl IterationObserver for PassPrinter {
    fn on_pass(&mut self, event: &IterationEvent<'_>) {
        println!(
            "restart={} pass={} changed={}",
            event.restart, event.pass, event.changed
        );
        println!("{}", event.centroids);
    }
}

pub(crate) fn kmeans(args: KmeansArgs) -> anyhow::Result<()> {
    let options = args.options()?;
    let data = Dataset::load_tsv(&args.input)
        .with_context(|| format!("load {}", args.input.display()))?;
    tracing::info!(
        observations = data.len(),
        dim = data.dim(),
        k = options.k,
        "loaded dataset"
    );

    let engine = KMeans::new(options);
    let result = if args.quiet || args.json {
        engine.fit(&data)?
    } else {
        engine.fit_with_observer(&data, &mut PassPrinter)?
    };

    if let Some(path) = &args.centroids_out {
        let file =
            File::create(path).with_context(|| format!("create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        Dataset::new(result.centroids.clone())?.write_tsv(&mut out)?;
        out.flush()?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "centroids:")?;
    writeln!(out, "{}", result.centroids)?;
    writeln!(
        out,
        "converged={} iterations={} inertia={}",
        result.converged, result.iterations, result.inertia
    )?;
    writeln!(out, "assignments:")?;
    for a in &result.assignments {
        writeln!(out, "{}\t{}", a.cluster, a.distance_sq)?;
    }
    Ok(())
}

pub(crate) fn predict(
    input: &Path,
    centroids: &Path,
    metric: MetricArg,
    json: bool,
) -> anyhow::Result<()> {
    let data =
        Dataset::load_tsv(input).with_context(|| format!("load {}", input.display()))?;
    let centroids = Dataset::load_tsv(centroids)
        .with_context(|| format!("load centroids {}", centroids.display()))?;
    let metric: MetricKind = metric.into();
    let assignments = lloyd::predict(centroids.points(), &data, &metric)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&assignments)?);
        return Ok(());
    }
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for a in &assignments {
        writeln!(out, "{}\t{}", a.cluster, a.distance_sq)?;
    }
    Ok(())
}

pub(crate) fn generate(out: Option<&Path>, config: lloyd::SyntheticConfig) -> anyhow::Result<()> {
    let synthetic = lloyd::generate_synthetic(&config)?;
    match out {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            synthetic.data.write_tsv(&mut writer)?;
            writer.flush()?;
            tracing::info!(
                path = %path.display(),
                points = config.points,
                clusters = config.clusters,
                "wrote synthetic dataset"
            );
        }
        None => synthetic.data.write_tsv(std::io::stdout().lock())?,
    }
    Ok(())
}
