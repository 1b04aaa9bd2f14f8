//! Turns one raw 15-minute aggregate file into an [`HourlyTable`].

use crate::error::{ProfileError, Result};
use crate::table::{HourlyTable, FLOOR_AREA, MODELS_USED, SUMMARY_COLUMNS, TIMESTAMP};
use chrono::{DateTime, NaiveDateTime};
use log::{debug, warn};
use polars::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use std::io::Cursor;
use std::sync::OnceLock;

pub const METRIC_PREFIX: &str = "out.";
pub const ENERGY_UNIT_MARKER: &str = "kwh";

const MILLIS_PER_HOUR: i64 = 3_600_000;
/// Readings are stamped at the end of their interval; moving them back a
/// quarter hour puts `HH:15..=HH+1:00` into the `HH:00` bucket.
const INTERVAL_SHIFT_MILLIS: i64 = 15 * 60 * 1000;

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^out\.([\w_]+\.[\w_]+).*?(\.savings)?$").expect("column label pattern is valid")
    })
}

/// Parse a CSV body and normalize it.
pub fn normalize_csv(body: &[u8]) -> Result<HourlyTable> {
    let raw = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(body.to_vec()))
        .finish()?;

    normalize_frame(raw)
}

/// Resample a raw frame to hourly buckets and rename its energy columns.
pub fn normalize_frame(mut raw: DataFrame) -> Result<HourlyTable> {
    let names: Vec<String> = raw
        .get_columns()
        .iter()
        .map(|s| s.name().to_string())
        .collect();

    for required in [TIMESTAMP, MODELS_USED, FLOOR_AREA] {
        if !names.iter().any(|n| n == required) {
            return Err(ProfileError::Schema(format!("missing '{required}' column")));
        }
    }

    let metrics: Vec<String> = names
        .iter()
        .filter(|n| n.starts_with(METRIC_PREFIX))
        .cloned()
        .collect();
    if metrics.is_empty() {
        return Err(ProfileError::Schema(format!("no '{METRIC_PREFIX}' metric columns")));
    }
    if raw.height() == 0 {
        return Err(ProfileError::Schema("file has no rows".to_string()));
    }

    let raw_rows = raw.height();
    let buckets = hour_buckets(raw.column(TIMESTAMP)?)?;
    raw.with_column(Series::new(TIMESTAMP.into(), buckets))?;

    let mut aggregations: Vec<Expr> = metrics
        .iter()
        .map(|name| col(name.as_str()).cast(DataType::Float64).sum())
        .collect();
    for summary in SUMMARY_COLUMNS {
        aggregations.push(col(summary).cast(DataType::Float64).mean());
    }

    let observed = raw
        .lazy()
        .group_by([col(TIMESTAMP)])
        .agg(aggregations)
        .collect()?;
    let hourly = fill_missing_hours(observed)?
        .lazy()
        .sort_by_exprs([col(TIMESTAMP)], SortMultipleOptions::default())
        .collect()?;

    let mut columns = vec![
        hourly
            .column(TIMESTAMP)?
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?,
        hourly.column(MODELS_USED)?.clone(),
        hourly.column(FLOOR_AREA)?.clone(),
    ];

    let mut labels = HashSet::new();
    for name in metrics.iter().filter(|n| n.contains(ENERGY_UNIT_MARKER)) {
        match energy_label(name) {
            Some(label) if labels.insert(label.clone()) => {
                columns.push(hourly.column(name)?.clone().with_name(label.as_str().into()));
            }
            Some(label) => warn!("Dropping column '{}': label '{}' is already taken", name, label),
            None => warn!("Dropping column '{}': not a <fuel>.<end_use> metric", name),
        }
    }

    debug!(
        "Normalized {} raw rows into {} hourly rows with {} energy columns",
        raw_rows,
        hourly.height(),
        columns.len() - 3
    );

    Ok(HourlyTable::from_frame(DataFrame::new(columns)?))
}

/// `out.<fuel>.<end_use>.<...>[.savings]` -> `<fuel>.<end_use>[.savings]`
pub fn energy_label(column: &str) -> Option<String> {
    let caps = label_pattern().captures(column)?;
    let base = caps.get(1)?.as_str();
    let suffix = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    Some(format!("{base}{suffix}"))
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts);
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .map_err(|_| ProfileError::Timestamp(raw.to_string()))
}

/// Add a row for every hour between the first and last bucket that has no
/// readings: metrics are zero, summary columns stay null.
fn fill_missing_hours(observed: DataFrame) -> Result<DataFrame> {
    let buckets: HashSet<i64> = observed.column(TIMESTAMP)?.i64()?.into_iter().flatten().collect();
    let (Some(&first), Some(&last)) = (buckets.iter().min(), buckets.iter().max()) else {
        return Ok(observed);
    };

    let missing: Vec<i64> = (first..=last)
        .step_by(MILLIS_PER_HOUR as usize)
        .filter(|bucket| !buckets.contains(bucket))
        .collect();
    if missing.is_empty() {
        return Ok(observed);
    }
    debug!("Filling {} hours with no readings", missing.len());

    let gap_rows = missing.len();
    let mut columns = Vec::with_capacity(observed.width());
    for series in observed.get_columns() {
        let name = series.name().clone();
        let column = if name.as_str() == TIMESTAMP {
            Series::new(name, missing.clone())
        } else if SUMMARY_COLUMNS.contains(&name.as_str()) {
            Series::full_null(name, gap_rows, &DataType::Float64)
        } else {
            Series::new(name, vec![0.0f64; gap_rows])
        };
        columns.push(column);
    }

    let mut filled = observed;
    filled.vstack_mut(&DataFrame::new(columns)?)?;
    Ok(filled)
}

/// Epoch milliseconds of the (shifted) hour each reading belongs to.
fn hour_buckets(timestamps: &Series) -> Result<Vec<i64>> {
    let values = timestamps
        .str()
        .map_err(|_| ProfileError::Schema(format!("'{TIMESTAMP}' column is not text")))?;

    values
        .into_iter()
        .map(|value| {
            let value = value.ok_or_else(|| ProfileError::Timestamp(String::new()))?;
            let millis = parse_timestamp(value)?.and_utc().timestamp_millis() - INTERVAL_SHIFT_MILLIS;
            Ok(millis - millis.rem_euclid(MILLIS_PER_HOUR))
        })
        .collect()
}
