use anyhow::{bail, Context, Result};
use clap::Parser;
use eulp_profiles::chart;
use eulp_profiles::{
    Catalog, DatasetConfig, DayType, Fetcher, FuelType, HttpSource, ProfileFilter, Reporter, Season, Selection,
    Session, UrlBuilder,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::PathBuf;

mod output;
mod selection;

use output::OutputFormat;
use selection::Geography;

#[derive(Parser)]
#[command(name = "eulp_explorer")]
#[command(about = "Average-day load profiles from the ComStock end-use load profile data lake")]
struct Args {
    /// Directory with the county, building type and upgrade tables
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// TOML file overriding the data lake settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Geographic preset
    #[arg(short, long, value_enum, default_value = "custom")]
    geography: Geography,

    /// County to include with the custom preset (repeatable)
    #[arg(short, long = "county")]
    counties: Vec<String>,

    /// Building type to include (repeatable)
    #[arg(short, long = "building-type")]
    building_types: Vec<String>,

    /// Use every commercial building type
    #[arg(long)]
    all_buildings: bool,

    /// Upgrade package (defaults to the first in the crosswalk)
    #[arg(short, long)]
    upgrade: Option<String>,

    /// summer, winter or all
    #[arg(long, default_value = "summer")]
    season: Season,

    /// weekday, weekend or all
    #[arg(long, default_value = "weekday")]
    day_type: DayType,

    /// electricity, natural-gas, other-fuel, district-cooling, district-heating or all
    #[arg(long, default_value = "electricity")]
    fuel_type: FuelType,

    /// Directory for eulpdownload.csv
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,

    /// Write the stacked profile chart to this SVG file
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Also save each normalized file into this directory
    #[arg(long)]
    keep_files: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    output: OutputFormat,
}

/// Prints misses above the progress bar.
struct BarReporter<'a> {
    bar: &'a ProgressBar,
    misses: usize,
}

impl<'a> BarReporter<'a> {
    fn new(bar: &'a ProgressBar) -> Self {
        Self { bar, misses: 0 }
    }
}

impl Reporter for BarReporter<'_> {
    fn report(&mut self, message: &str) {
        self.misses += 1;
        self.bar.println(message);
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("Starting EULP profile build");

    let dataset = match &args.config {
        Some(path) => DatasetConfig::from_toml_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => DatasetConfig::default(),
    };
    let catalog = Catalog::load(&args.data_dir)
        .with_context(|| format!("Failed to load reference tables from {}", args.data_dir.display()))?;

    let counties = selection::counties(args.geography, &args.counties, &catalog, &dataset)?;
    let building_types = selection::building_types(args.all_buildings, &args.building_types, &catalog)?;
    let upgrade = selection::upgrade(args.upgrade.as_deref(), &catalog)?;
    let selections = Selection::cartesian(&counties, &building_types, &upgrade);

    info!(
        "Fetching {} combinations ({} counties x {} building types, upgrade '{}')",
        selections.len(),
        counties.len(),
        building_types.len(),
        upgrade
    );

    let fetcher = Fetcher::new(UrlBuilder::new(&catalog, &dataset), HttpSource::new(&dataset)?);

    let pb = ProgressBar::new(selections.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")?,
    );
    let mut reporter = BarReporter::new(&pb);
    let files = fetcher.fetch_all(&selections, &mut reporter, |_| pb.inc(1))?;
    pb.finish();

    if files.is_empty() {
        bail!(
            "None of the {} selected combinations returned data",
            selections.len()
        );
    }
    if reporter.misses > 0 {
        warn!("{} of {} combinations were skipped", reporter.misses, selections.len());
    }

    let session = Session::from_files(files)?;
    let total_models = session.total_models();
    if let Some(models) = total_models {
        info!("Total Models: {}", models as i64);
    }

    session.write_export(&args.export_dir)?;
    if let Some(dir) = &args.keep_files {
        let kept = session.keep_files(dir)?;
        info!("Saved {} normalized files to {}", kept.len(), dir.display());
    }

    let filter = ProfileFilter::new(args.season, args.day_type, args.fuel_type);
    let profile = session.average_day(&filter)?;

    if let Some(path) = &args.chart {
        if profile.is_empty() {
            warn!("Skipping chart: {} has no data", profile.title());
        } else {
            chart::render_svg(&profile, path)?;
        }
    }

    let text = output::render(
        &profile,
        total_models,
        session.contributing_files().len(),
        args.output,
    )?;
    print!("{}", text);

    Ok(())
}
