use eulp_profiles::{
    Catalog, DatasetConfig, DayType, Fetcher, FuelType, LogReporter, MemorySource, ProfileFilter, Season, Selection, Session,
    UrlBuilder,
};

const COUNTIES: &str = "County,Tract Code,UPPCO\nAlger,G2600030,x\nChippewa,G2600330,\n";
const BUILDING_TYPES: &str = "user-facing name,program-facing name,sector\nWarehouse,warehouse,com\n";
const UPGRADES: &str =
    "2024_comstock_amy2018_release_2_upgrade_name,2024_comstock_amy2018_release_2_upgrade_id\nBaseline,0\n";

/// Two hours of a hot July Monday, at 15-minute resolution.
fn raw_file(scale: f64) -> String {
    let mut body = String::from(
        "timestamp,models_used,floor_area_represented,\
         out.electricity.cooling.energy_consumption.kwh,\
         out.electricity.interior_lighting.energy_consumption.kwh,\
         out.natural_gas.water_systems.energy_consumption.kwh\n",
    );
    for (i, ts) in [
        "2018-07-02 14:15:00",
        "2018-07-02 14:30:00",
        "2018-07-02 14:45:00",
        "2018-07-02 15:00:00",
        "2018-07-02 15:15:00",
        "2018-07-02 15:30:00",
        "2018-07-02 15:45:00",
        "2018-07-02 16:00:00",
    ]
    .iter()
    .enumerate()
    {
        body.push_str(&format!("{ts},12,50000,{},{},1.5\n", scale * (5.0 + i as f64), scale * 2.0));
    }
    body
}

fn main() -> eulp_profiles::Result<()> {
    println!("EULP offline profile example");
    println!("============================");

    let catalog = Catalog::from_readers(COUNTIES.as_bytes(), BUILDING_TYPES.as_bytes(), UPGRADES.as_bytes())?;
    let dataset = DatasetConfig::default();
    let urls = UrlBuilder::new(&catalog, &dataset);

    let selections = Selection::cartesian(&["Alger", "Chippewa"], &["Warehouse"], "Baseline");
    let mut source = MemorySource::new();
    for (selection, scale) in selections.iter().zip([1.0, 2.0]) {
        source.insert(urls.build_for(selection)?.url, raw_file(scale));
    }

    let fetcher = Fetcher::new(urls, source);
    let files = fetcher.fetch_all(&selections, &mut LogReporter, |s| println!("fetched {s}"))?;
    let session = Session::from_files(files)?;

    println!("Total Models: {}", session.total_models().unwrap_or(0.0));

    let filter = ProfileFilter::new(Season::Summer, DayType::Weekday, FuelType::Electricity);
    let profile = session.average_day(&filter)?;

    println!();
    println!("{}", profile.title());
    println!("{}", "=".repeat(profile.title().len()));
    for point in &profile.points {
        println!("{:>2}:00  {:<32} {:>8.0} kWh", point.hour, point.end_use, point.value);
    }

    Ok(())
}
