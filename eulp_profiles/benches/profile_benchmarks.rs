use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eulp_profiles::normalize::normalize_csv;
use eulp_profiles::{average_day, combine, DayType, FuelType, HourlyTable, ProfileFilter, Season};

const END_USES: [&str; 6] = [
    "electricity.heating",
    "electricity.cooling",
    "electricity.interior_lighting",
    "electricity.fans",
    "natural_gas.heating",
    "natural_gas.water_systems",
];

fn year_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2018, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap()
}

/// A synthetic building-year of hourly data.
fn synthetic_year(scale: f64) -> HourlyTable {
    let timestamps: Vec<NaiveDateTime> = (0..8760).map(|h| year_start() + Duration::hours(h)).collect();
    let columns: Vec<(&str, Vec<f64>)> = std::iter::once(("models_used", vec![25.0; timestamps.len()]))
        .chain(END_USES.iter().enumerate().map(|(i, name)| {
            let values = timestamps
                .iter()
                .map(|t| scale * (i as f64 + 1.0) * (1.0 + t.hour() as f64 / 24.0))
                .collect();
            (*name, values)
        }))
        .collect();

    HourlyTable::from_columns(&timestamps, &columns).unwrap()
}

/// One week of 15-minute rows in the raw aggregate layout.
fn raw_week() -> String {
    let mut body = String::from("timestamp,models_used,floor_area_represented");
    for name in END_USES {
        body.push_str(&format!(",out.{name}.energy_consumption.kwh"));
    }
    body.push('\n');

    let start = year_start();
    for quarter in 1..=(7 * 96) {
        let ts = start + Duration::minutes(15 * quarter);
        body.push_str(&format!("{},25,125000", ts.format("%Y-%m-%d %H:%M:%S")));
        for i in 0..END_USES.len() {
            body.push_str(&format!(",{:.3}", (i + 1) as f64 * 0.25));
        }
        body.push('\n');
    }
    body
}

fn benchmark_normalize(c: &mut Criterion) {
    let body = raw_week();
    c.bench_function("normalize_week", |b| {
        b.iter(|| black_box(normalize_csv(body.as_bytes()).unwrap()));
    });
}

fn benchmark_combine(c: &mut Criterion) {
    let tables: Vec<HourlyTable> = (1..=10).map(|i| synthetic_year(i as f64)).collect();
    c.bench_function("combine_ten_years", |b| {
        b.iter(|| black_box(combine(&tables).unwrap()));
    });
}

fn benchmark_average_day(c: &mut Criterion) {
    let table = synthetic_year(1.0);
    let filter = ProfileFilter::new(Season::Summer, DayType::Weekday, FuelType::All);
    c.bench_function("average_day_summer_weekday", |b| {
        b.iter(|| black_box(average_day(&table, &filter).unwrap()));
    });
}

criterion_group!(benches, benchmark_normalize, benchmark_combine, benchmark_average_day);
criterion_main!(benches);
