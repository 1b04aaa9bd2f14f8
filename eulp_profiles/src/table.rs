use crate::error::{ProfileError, Result};
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;
use std::io::Write;
use std::path::Path;

pub const TIMESTAMP: &str = "timestamp";
pub const MODELS_USED: &str = "models_used";
pub const FLOOR_AREA: &str = "floor_area_represented";
pub const SUMMARY_COLUMNS: [&str; 2] = [MODELS_USED, FLOOR_AREA];

const CSV_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Hourly energy table: `timestamp`, the two summary columns, then
/// `<fuel>.<end_use>` energy columns in kWh.
///
/// Both a single normalized file and the sum of many files have this shape.
#[derive(Debug, Clone)]
pub struct HourlyTable {
    frame: DataFrame,
}

impl HourlyTable {
    pub(crate) fn from_frame(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// Build a table from hour-start timestamps and named columns.
    ///
    /// Summary columns that are not supplied are filled with zeros.
    pub fn from_columns(timestamps: &[NaiveDateTime], columns: &[(&str, Vec<f64>)]) -> Result<Self> {
        let millis: Vec<i64> = timestamps
            .iter()
            .map(|ts| ts.and_utc().timestamp_millis())
            .collect();
        let mut series = vec![
            Series::new(TIMESTAMP.into(), millis).cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?,
        ];

        for summary in SUMMARY_COLUMNS {
            let values = columns
                .iter()
                .find(|(name, _)| *name == summary)
                .map(|(_, values)| values.clone())
                .unwrap_or_else(|| vec![0.0; timestamps.len()]);
            series.push(Series::new(summary.into(), values));
        }

        for (name, values) in columns {
            if SUMMARY_COLUMNS.contains(name) {
                continue;
            }
            if values.len() != timestamps.len() {
                return Err(ProfileError::Schema(format!(
                    "column '{}' has {} values for {} timestamps",
                    name,
                    values.len(),
                    timestamps.len()
                )));
            }
            series.push(Series::new((*name).into(), values.clone()));
        }

        Ok(Self::from_frame(DataFrame::new(series)?))
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    /// Every column except the timestamp and the summary columns.
    pub fn energy_columns(&self) -> Vec<String> {
        self.column_names()
            .into_iter()
            .filter(|name| name != TIMESTAMP && !SUMMARY_COLUMNS.contains(&name.as_str()))
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    pub fn timestamps(&self) -> Result<Vec<NaiveDateTime>> {
        let millis = self.frame.column(TIMESTAMP)?.cast(&DataType::Int64)?;
        millis
            .i64()?
            .into_iter()
            .map(|ms| {
                ms.and_then(millis_to_datetime)
                    .ok_or_else(|| ProfileError::Schema("null or out-of-range timestamp".to_string()))
            })
            .collect()
    }

    /// Column values with missing cells read as zero.
    pub fn values(&self, column: &str) -> Result<Vec<f64>> {
        let values = self.frame.column(column)?.cast(&DataType::Float64)?;
        Ok(values.f64()?.into_iter().map(|v| v.unwrap_or(0.0)).collect())
    }

    pub fn value_at(&self, timestamp: NaiveDateTime, column: &str) -> Option<f64> {
        let row = self.timestamps().ok()?.iter().position(|ts| *ts == timestamp)?;
        self.values(column).ok()?.get(row).copied()
    }

    /// First `models_used` entry, read as the representative model count.
    pub fn total_models(&self) -> Option<f64> {
        self.frame.column(MODELS_USED).ok()?.f64().ok()?.get(0)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut frame = self.frame.clone();
        CsvWriter::new(writer)
            .include_header(true)
            .with_datetime_format(Some(CSV_DATETIME_FORMAT.to_string()))
            .finish(&mut frame)?;
        Ok(())
    }

    pub fn save_csv(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))
    }
}

impl PartialEq for HourlyTable {
    fn eq(&self, other: &Self) -> bool {
        self.frame.equals(&other.frame)
    }
}

pub(crate) fn millis_to_datetime(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}
