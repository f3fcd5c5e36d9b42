//! CLI entry point for the house price recession comparison.
//!
//! Provides subcommands for inspecting each normalized source and for
//! running the full university-town versus other-town comparison.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use house_price_recession::analyzers::compare::{LoadStage, Pipeline};
use house_price_recession::analyzers::ttest::{StudentT, TwoSampleTest, WelchT};
use house_price_recession::config::{GdpLayout, SourcePaths, StateTable, TownListing};
use house_price_recession::output::{print_json, print_pretty, write_ratios};
use house_price_recession::parser::{load_gdp, load_housing, load_towns};
use house_price_recession::recession::detect;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "house_price_recession")]
#[command(
    about = "Compare how house prices in university towns fared through a recession",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    sources: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// University-town listing [env: UNIVERSITY_TOWNS_PATH]
    #[arg(long, global = true, value_name = "FILE")]
    towns: Option<PathBuf>,

    /// CSV export of the quarterly GDP sheet [env: GDP_PATH]
    #[arg(long, global = true, value_name = "FILE")]
    gdp: Option<PathBuf>,

    /// City-level monthly housing CSV [env: HOUSING_PATH]
    #[arg(long, global = true, value_name = "FILE")]
    housing: Option<PathBuf>,

    /// JSON object mapping state abbreviations to full names
    #[arg(long, global = true, value_name = "FILE")]
    states: Option<PathBuf>,
}

impl SourceArgs {
    fn paths(&self) -> SourcePaths {
        let mut paths = SourcePaths::from_env();
        if let Some(towns) = &self.towns {
            paths.towns = towns.clone();
        }
        if let Some(gdp) = &self.gdp {
            paths.gdp = gdp.clone();
        }
        if let Some(housing) = &self.housing {
            paths.housing = housing.clone();
        }
        paths
    }

    fn state_table(&self) -> Result<StateTable> {
        match &self.states {
            Some(path) => StateTable::load(path)
                .with_context(|| format!("failed to load state table {}", path.display())),
            None => Ok(StateTable::default()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the university-town listing
    Towns,
    /// Parse the quarterly GDP series from 2000 onward
    Gdp,
    /// Parse the housing table and fold it into quarters
    Housing,
    /// Detect the recession start, end and bottom quarters
    Recession,
    /// Run the full comparison of university and non-university towns
    Compare {
        /// Use Welch's unequal-variance t-test instead of Student's
        #[arg(long, default_value_t = false)]
        welch: bool,

        /// Wait for Enter between stages
        #[arg(long, default_value_t = false)]
        pause: bool,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Directory to write university_ratios.csv and other_ratios.csv into
        #[arg(long, value_name = "DIR")]
        ratios_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/house_price_recession.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("house_price_recession.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let paths = cli.sources.paths();
    let states = cli.sources.state_table()?;

    match cli.command {
        Commands::Towns => {
            let towns = load_towns(&paths.towns, &TownListing::default())
                .with_context(|| format!("failed to parse {}", paths.towns.display()))?;
            for town in &towns {
                debug!(state = %town.state, region = %town.region_name, "University town");
            }
            let states_listed = towns
                .iter()
                .map(|t| t.state.as_str())
                .collect::<std::collections::BTreeSet<_>>()
                .len();
            info!(towns = towns.len(), states = states_listed, "Town listing summary");
        }
        Commands::Gdp => {
            let gdp = load_gdp(&paths.gdp, &GdpLayout::default())
                .with_context(|| format!("failed to parse {}", paths.gdp.display()))?;
            for point in gdp.points() {
                info!(quarter = %point.quarter, gdp = point.gdp, "GDP");
            }
        }
        Commands::Housing => {
            let housing = load_housing(&paths.housing, &states)
                .with_context(|| format!("failed to parse {}", paths.housing.display()))?;
            info!(
                regions = housing.len(),
                first = ?housing.quarters().first().map(|q| q.to_string()),
                last = ?housing.quarters().last().map(|q| q.to_string()),
                "Housing table summary"
            );
        }
        Commands::Recession => {
            let gdp = load_gdp(&paths.gdp, &GdpLayout::default())
                .with_context(|| format!("failed to parse {}", paths.gdp.display()))?;
            let window = detect(&gdp).context("failed to detect recession")?;
            info!(
                start = %window.start,
                end = %window.end,
                bottom = %window.bottom,
                "Recession window"
            );
        }
        Commands::Compare {
            welch,
            pause,
            json,
            ratios_dir,
        } => {
            let test: &dyn TwoSampleTest = if welch { &WelchT } else { &StudentT };
            run_compare(&paths, &states, test, pause, json, ratios_dir.as_deref())?;
        }
    }

    Ok(())
}

/// Loads each source, detects the recession and compares the two town groups,
/// optionally pausing between stages.
#[tracing::instrument(skip_all, fields(test = test.name(), pause = pause, json = json))]
fn run_compare(
    paths: &SourcePaths,
    states: &StateTable,
    test: &dyn TwoSampleTest,
    pause: bool,
    json: bool,
    ratios_dir: Option<&Path>,
) -> Result<()> {
    let pipeline = Pipeline::load_with(
        paths,
        states,
        &GdpLayout::default(),
        &TownListing::default(),
        |stage| {
            let next = match stage {
                LoadStage::Towns => "load GDP",
                LoadStage::Gdp => "load housing prices",
                LoadStage::Housing => "find the recession",
            };
            info!(%stage, "Source loaded");
            Ok(wait_for_enter(pause, &format!("Press Enter to {next}..."))?)
        },
    )
    .context("failed to load sources")?;
    let window = pipeline.window().context("failed to detect recession")?;
    info!(
        start = %window.start,
        end = %window.end,
        bottom = %window.bottom,
        "The recession began in {}, ended in {}, and GDP was lowest in {}",
        window.start,
        window.end,
        window.bottom
    );
    wait_for_enter(pause, "Press Enter to compare price ratios...")?;

    let comparison = pipeline
        .compare(test)
        .context("failed to compare price ratios")?;
    let report = &comparison.report;

    info!(
        regions = report.university.count,
        mean = report.university.mean_ratio,
        stddev = report.university.stddev,
        "University towns"
    );
    info!(
        regions = report.other.count,
        mean = report.other.mean_ratio,
        stddev = report.other.stddev,
        "Non-university towns"
    );

    if let Some(dir) = ratios_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        write_ratios(dir.join("university_ratios.csv"), &comparison.university)?;
        write_ratios(dir.join("other_ratios.csv"), &comparison.other)?;
        info!(dir = %dir.display(), "Ratio tables written");
    }

    if json {
        print_json(report)?;
    } else {
        print_pretty(report);
    }

    info!(
        statistic = report.outcome.statistic,
        p_value = report.outcome.p_value,
        threshold = report.threshold,
        significant = report.significant,
        better = report.better_group(),
        "Null hypothesis that the price ratios do not differ is {}",
        if report.significant { "rejected" } else { "not rejected" }
    );

    Ok(())
}

fn wait_for_enter(enabled: bool, message: &str) -> std::io::Result<()> {
    if !enabled {
        return Ok(());
    }
    let mut stdout = std::io::stdout();
    write!(stdout, "{message}")?;
    stdout.flush()?;
    std::io::stdin().read_line(&mut String::new())?;
    Ok(())
}
