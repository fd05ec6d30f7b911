use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use rank_race::{
    ChartOpts, ColumnSpec, Ease, FrameIndex, PrepareOpts, RaceOptions, RaceRenderer, StyleConfig,
    StylePreset, TimeOptions, TimeUnit, prepare_csv,
};

#[derive(Parser, Debug)]
#[command(
    name = "rank-race",
    version,
    about = "Render a bar chart race MP4 from a long-form time-series CSV"
)]
struct Cli {
    /// Input CSV with one row per (time, entity, value).
    #[arg(long)]
    input: PathBuf,

    /// Output MP4 path (a PNG path when `--frame` is given).
    #[arg(long, default_value = "rank_race.mp4")]
    output: PathBuf,

    /// Time column name.
    #[arg(long = "time_col", default_value = "time")]
    time_col: String,

    /// Entity (bar label) column name.
    #[arg(long = "entity_col", default_value = "entity")]
    entity_col: String,

    /// Value column name.
    #[arg(long = "value_col", default_value = "value")]
    value_col: String,

    /// Explicit strftime format of the time column (inferred when omitted).
    #[arg(long = "time_format")]
    time_format: Option<String>,

    /// Time granularity.
    #[arg(long = "time_unit", value_enum, default_value_t = UnitArg::Raw)]
    time_unit: UnitArg,

    /// Inclusive start of the time range.
    #[arg(long = "start_time")]
    start_time: Option<String>,

    /// Inclusive end of the time range.
    #[arg(long = "end_time")]
    end_time: Option<String>,

    /// Bars shown per period.
    #[arg(long = "top_n", default_value_t = 15)]
    top_n: usize,

    /// Chart title.
    #[arg(long, default_value = "Rank Race")]
    title: String,

    /// Frames between two periods.
    #[arg(long = "steps_per_period", default_value_t = 8)]
    steps_per_period: u32,

    /// Milliseconds per period.
    #[arg(long = "period_length", default_value_t = 500)]
    period_length: u32,

    /// Style preset.
    #[arg(long, value_enum, default_value_t = StyleArg::PastelWood)]
    style: StyleArg,

    /// JSON style overrides applied on top of `--style`.
    #[arg(long = "style_file")]
    style_file: Option<PathBuf>,

    /// Extra font directory (repeatable).
    #[arg(long = "font_dir")]
    font_dir: Vec<PathBuf>,

    /// Output width in pixels.
    #[arg(long, default_value_t = 2560)]
    width: u32,

    /// Output height in pixels.
    #[arg(long, default_value_t = 1440)]
    height: u32,

    /// Value labels show `value / value_divisor`; use 1000000 to label in millions.
    #[arg(long = "value_divisor", default_value_t = 1.0)]
    value_divisor: f64,

    /// Decimals of value labels.
    #[arg(long = "value_decimals", default_value_t = 0)]
    value_decimals: usize,

    /// Easing of bar motion between periods.
    #[arg(long, value_enum, default_value_t = EaseArg::Linear)]
    ease: EaseArg,

    /// Scale the axis to the largest visible bar of each frame.
    #[arg(long = "dynamic_max", default_value_t = false)]
    dynamic_max: bool,

    /// Also write the filtered time×entity matrix as CSV.
    #[arg(long = "pivot_out")]
    pivot_out: Option<PathBuf>,

    /// Render only this frame (0-based) as a PNG.
    #[arg(long)]
    frame: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "snake_case")]
enum UnitArg {
    Raw,
    Day,
    Month,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "snake_case")]
enum StyleArg {
    PastelWood,
    DeepNavy,
    MinimalWhite,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "snake_case")]
enum EaseArg {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
}

impl From<UnitArg> for TimeUnit {
    fn from(v: UnitArg) -> Self {
        match v {
            UnitArg::Raw => TimeUnit::Raw,
            UnitArg::Day => TimeUnit::Day,
            UnitArg::Month => TimeUnit::Month,
        }
    }
}

impl From<StyleArg> for StylePreset {
    fn from(v: StyleArg) -> Self {
        match v {
            StyleArg::PastelWood => StylePreset::PastelWood,
            StyleArg::DeepNavy => StylePreset::DeepNavy,
            StyleArg::MinimalWhite => StylePreset::MinimalWhite,
        }
    }
}

impl From<EaseArg> for Ease {
    fn from(v: EaseArg) -> Self {
        match v {
            EaseArg::Linear => Ease::Linear,
            EaseArg::InQuad => Ease::InQuad,
            EaseArg::OutQuad => Ease::OutQuad,
            EaseArg::InOutQuad => Ease::InOutQuad,
            EaseArg::InCubic => Ease::InCubic,
            EaseArg::OutCubic => Ease::OutCubic,
            EaseArg::InOutCubic => Ease::InOutCubic,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let prepared = prepare_csv(
        &cli.input,
        &PrepareOpts {
            columns: ColumnSpec {
                time: cli.time_col.clone(),
                entity: cli.entity_col.clone(),
                value: cli.value_col.clone(),
            },
            time: TimeOptions {
                format: cli.time_format.clone(),
                start: cli.start_time.clone(),
                end: cli.end_time.clone(),
                unit: cli.time_unit.into(),
            },
            top_n: cli.top_n,
        },
    )
    .with_context(|| format!("prepare '{}'", cli.input.display()))?;

    if let Some(path) = &cli.pivot_out {
        rank_race::encode::ffmpeg::ensure_parent_dir(path)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create pivot csv '{}'", path.display()))?;
        prepared.matrix.write_csv(file, prepared.period_format())?;
        eprintln!("wrote {}", path.display());
    }

    let preset = StylePreset::from(cli.style);
    let style = match &cli.style_file {
        Some(path) => StyleConfig::from_path(path, preset)?,
        None => preset.config(),
    };

    let mut font_dirs = cli.font_dir.clone();
    if let Some(parent) = cli.input.parent()
        && !parent.as_os_str().is_empty()
    {
        font_dirs.push(parent.to_path_buf());
    }

    let race = RaceOptions {
        n_bars: cli.top_n,
        steps_per_period: cli.steps_per_period,
        period_length_ms: cli.period_length,
        ease: cli.ease.into(),
        dynamic_max: cli.dynamic_max,
    };
    let chart = ChartOpts {
        canvas: rank_race::Canvas {
            width: cli.width,
            height: cli.height,
        },
        style,
        title: cli.title.clone(),
        value_divisor: cli.value_divisor,
        value_decimals: cli.value_decimals,
        font_dirs,
    };
    let mut renderer = RaceRenderer::new(&prepared.matrix, prepared.period_format(), race, chart)?;

    match cli.frame {
        Some(f) => {
            let out = if cli.output.extension().is_some_and(|e| e == "png") {
                cli.output.clone()
            } else {
                cli.output.with_extension("png")
            };
            let frame = renderer.render_frame(FrameIndex(f))?;
            frame.save_png(&out)?;
            eprintln!("wrote {}", out.display());
        }
        None => {
            renderer.render_to_mp4(&cli.output, true)?;
            eprintln!("wrote {}", cli.output.display());
        }
    }
    Ok(())
}
