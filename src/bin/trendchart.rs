use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use trendchart::{Client, TrendSeries, Viewport, build_chart};
use trendchart::{storage, viz};

#[derive(Parser, Debug)]
#[command(
    name = "trendchart",
    version,
    about = "Lay out, draw & summarize property market-trend charts"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a market-trend JSON file.
    Render(RenderArgs),
    /// Fetch a property's market trend from the backend, then render it.
    Fetch(FetchArgs),
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Create a chart at the given path (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Save the computed chart model as JSON.
    #[arg(long)]
    model: Option<PathBuf>,
    /// Save one CSV row per bar.
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Width of the plot area (default 600).
    #[arg(long, default_value_t = 600.0)]
    width: f64,
    /// Height of the plot area (default 200).
    #[arg(long, default_value_t = 200.0)]
    height: f64,
    /// Locale for number formatting (en, de, fr, es, it, pt, nl).
    #[arg(long, default_value = "fr")]
    locale: String,
    /// Currency symbol appended to prices.
    #[arg(long, default_value = "€")]
    currency: String,
    /// Do not print the text table to stdout.
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Market-trend JSON document (years, average_prices, ...).
    input: PathBuf,
    #[command(flatten)]
    out: OutputArgs,
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Property id.
    property: String,
    /// Backend base URL.
    #[arg(long, default_value = "http://localhost:8000")]
    base_url: String,
    /// Bearer token for the backend.
    #[arg(long, env = "TRENDCHART_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Also save the raw document as JSON.
    #[arg(long)]
    save_raw: Option<PathBuf>,
    #[command(flatten)]
    out: OutputArgs,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Fetch(args) => cmd_fetch(args),
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let series = storage::load_trend_json(&args.input)?;
    emit(&series, &args.out)
}

fn cmd_fetch(args: FetchArgs) -> Result<()> {
    let mut client = Client::new(args.base_url)?;
    if let Some(token) = args.token {
        client = client.with_token(token);
    }
    let doc = client.fetch_market_trend(&args.property)?;
    if let Some(path) = args.save_raw.as_ref() {
        let txt = serde_json::to_string_pretty(&doc)?;
        std::fs::write(path, txt).with_context(|| format!("write {}", path.display()))?;
        eprintln!("Saved raw document to {}", path.display());
    }
    let series = TrendSeries::try_from(doc)?;
    emit(&series, &args.out)
}

fn emit(series: &TrendSeries, out: &OutputArgs) -> Result<()> {
    info!("laying out {} point(s)", series.len());
    let model = build_chart(series, Viewport::new(out.width, out.height))?;

    if let Some(path) = out.model.as_ref() {
        storage::save_model_json(&model, path)?;
        eprintln!("Saved chart model to {}", path.display());
    }
    if let Some(path) = out.csv.as_ref() {
        storage::save_bars_csv(&model, path)?;
        eprintln!("Saved {} bars to {}", model.bars.len(), path.display());
    }
    if let Some(path) = out.plot.as_ref() {
        viz::plot_chart(&model, path)?;
        eprintln!("Wrote plot to {}", path.display());
    }
    if !out.quiet {
        print!("{}", viz::text::render_table(&model, &out.locale, &out.currency));
    }
    Ok(())
}
