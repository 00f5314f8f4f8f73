use std::io::Write;

use anyhow::Context;
use lloyd::MeanStats;

pub(crate) fn mean_mapper() -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let stats = MeanStats::from_reader(stdin.lock()).context("read values from stdin")?;
    tracing::debug!(count = stats.count, "mapper input consumed");

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", stats.record())?;
    out.flush()?;
    eprintln!("report: still alive");
    Ok(())
}

pub(crate) fn mean_reducer() -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let total = lloyd::reduce_records(stdin.lock()).context("read mapper records from stdin")?;
    tracing::debug!(count = total.count, "reducer input consumed");

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}\t{}", total.record(), total.variance())?;
    out.flush()?;
    Ok(())
}
