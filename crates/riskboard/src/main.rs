use std::path::PathBuf;

use clap::Parser;
use jiff::Span;
use riskboard::{
    FilePriceProvider, JsonSurface, PortfolioFile, SvgSurface, TerminalSurface, init_logging,
};
use riskboard_core::{
    DashboardRenderer, FallbackConfig, FetchConfig, MarketDataProvider, OfflineProvider,
    RenderedArtifact,
};

#[derive(Parser, Debug)]
#[command(name = "riskboard")]
#[command(about = "A single-page portfolio risk dashboard")]
struct Args {
    /// Portfolio definition (YAML); the built-in demo portfolio when omitted
    #[arg(short, long)]
    portfolio: Option<PathBuf>,

    /// Close-price history (YAML); synthetic prices are used when omitted
    #[arg(long)]
    prices: Option<PathBuf>,

    /// Look-back window of the performance chart, in days
    #[arg(long, default_value_t = 365)]
    period_days: i64,

    /// Seed of the synthetic fallback prices
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write an SVG file instead of opening the terminal view
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write the render plan as JSON instead of opening the terminal view
    #[arg(long, conflicts_with = "svg")]
    plan_json: Option<PathBuf>,

    /// Path to the data directory (default: ~/.riskboard/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".riskboard")
}

/// Look-back span for `--period-days`; out-of-range values are an error
fn period_span(days: i64) -> color_eyre::Result<Span> {
    Ok(Span::new().try_days(days)?)
}

fn report<O>(artifact: &RenderedArtifact<O>) {
    if artifact.data_source.is_synthetic() {
        eprintln!("Warning: using {}", artifact.data_source);
    }
    if let Some(overflow) = &artifact.overflow {
        eprintln!("Warning: {}", overflow);
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level)?;

    let portfolio = match &args.portfolio {
        Some(path) => PortfolioFile::load(path)?,
        None => PortfolioFile::demo(),
    };
    let store = portfolio.to_store()?;

    let period = period_span(args.period_days)?;
    let fetch = FetchConfig::default()
        .with_period(period)
        .with_fallback(FallbackConfig::default().with_seed(args.seed));
    let renderer = portfolio.configure(DashboardRenderer::new().with_fetch_config(fetch));

    let provider: Box<dyn MarketDataProvider> = match args.prices {
        Some(path) => Box::new(FilePriceProvider::new(path)),
        None => Box::new(OfflineProvider),
    };
    tracing::info!(
        provider = provider.name(),
        assets = store.assets().len(),
        "rendering dashboard"
    );

    if let Some(path) = args.svg {
        let artifact = renderer.render(&store, &*provider, &mut SvgSurface::new(path))?;
        report(&artifact);
        println!("Wrote {}", artifact.output.display());
    } else if let Some(path) = args.plan_json {
        let artifact = renderer.render(&store, &*provider, &mut JsonSurface::new(path))?;
        report(&artifact);
        println!("Wrote {}", artifact.output.display());
    } else {
        let result = renderer.render(&store, &*provider, &mut TerminalSurface);

        if let Err(err) = ratatui::try_restore() {
            tracing::error!("Failed to restore terminal: {err}");
        }
        report(&result?);
    }

    tracing::info!("riskboard shutting down");
    Ok(())
}
