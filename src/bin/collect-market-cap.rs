use std::path::PathBuf;

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rank_race::collect::monthly::{CollectOpts, collect_monthly, write_rows_to_path};
use rank_race::collect::source::DirSnapshotSource;

#[derive(Parser, Debug)]
#[command(
    name = "collect-market-cap",
    version,
    about = "Build a month-end market capitalization CSV from daily snapshot files"
)]
struct Cli {
    /// Snapshot root holding `<market>/<YYYYMMDD>.csv` and `tickers.csv`.
    #[arg(long)]
    snapshots: PathBuf,

    /// First day (YYYY-MM-DD).
    #[arg(long, default_value = "1995-01-01")]
    start: NaiveDate,

    /// Last day (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Output CSV path.
    #[arg(long, default_value = "data/korea_market_cap_monthly.csv")]
    output: PathBuf,

    /// Market code.
    #[arg(long, default_value = "KOSPI")]
    market: String,

    /// Companies kept per month.
    #[arg(long = "top_n", default_value_t = 20)]
    top_n: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let end = cli.end.unwrap_or_else(|| chrono::Local::now().date_naive());

    let source = DirSnapshotSource::open(cli.snapshots.clone())
        .with_context(|| format!("open snapshots '{}'", cli.snapshots.display()))?;
    let opts = CollectOpts {
        market: cli.market.clone(),
        top_n: cli.top_n,
        ..CollectOpts::new(cli.start, end)
    };
    let rows = collect_monthly(&source, &opts)?;
    if rows.is_empty() {
        tracing::warn!(start = %cli.start, end = %end, "no data collected; nothing written");
        return Ok(());
    }

    write_rows_to_path(&cli.output, &rows)
        .with_context(|| format!("write '{}'", cli.output.display()))?;
    eprintln!("wrote {} ({} rows)", cli.output.display(), rows.len());
    Ok(())
}
