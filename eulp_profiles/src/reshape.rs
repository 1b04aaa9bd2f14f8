use crate::error::Result;
use crate::models::{AveragedProfile, DayType, FuelType, ProfileFilter, ProfilePoint, Season};
use crate::table::{HourlyTable, TIMESTAMP};
use polars::prelude::*;

pub const SAVINGS_MARKER: &str = "savings";

/// Per-fuel totals that would double count the end uses in a stacked chart.
pub const TOTAL_COLUMNS: [&str; 6] = [
    "district_cooling.total",
    "district_heating.total",
    "electricity.total",
    "natural_gas.total",
    "other_fuel.total",
    "site_energy.total",
];

const HOUR: &str = "hour";

/// End-use columns that survive the savings, fuel and total exclusions.
pub fn end_use_columns(table: &HourlyTable, fuel_type: FuelType) -> Vec<String> {
    let mut columns: Vec<String> = table
        .energy_columns()
        .into_iter()
        .filter(|c| !c.contains(SAVINGS_MARKER))
        .filter(|c| fuel_type.admits(c))
        .filter(|c| !TOTAL_COLUMNS.contains(&c.as_str()))
        .collect();
    columns.sort();
    columns
}

/// Average day for the filtered window: mean kWh per (hour, end use).
pub fn average_day(table: &HourlyTable, filter: &ProfileFilter) -> Result<AveragedProfile> {
    let end_uses = end_use_columns(table, filter.fuel_type);
    if end_uses.is_empty() {
        return Ok(AveragedProfile {
            filter: *filter,
            points: Vec::new(),
        });
    }

    let mut window = table.frame().clone().lazy();
    if let Some(predicate) = season_predicate(filter.season) {
        window = window.filter(predicate);
    }
    if let Some(predicate) = day_type_predicate(filter.day_type) {
        window = window.filter(predicate);
    }

    let means: Vec<Expr> = end_uses.iter().map(|c| col(c.as_str()).mean()).collect();
    let hourly = window
        .group_by([col(TIMESTAMP).dt().hour().cast(DataType::UInt32).alias(HOUR)])
        .agg(means)
        .sort_by_exprs([col(HOUR)], SortMultipleOptions::default())
        .collect()?;

    let hours = hourly.column(HOUR)?.u32()?;
    let mut points = Vec::with_capacity(hourly.height() * end_uses.len());
    for end_use in &end_uses {
        let values = hourly.column(end_use)?.f64()?;
        for (hour, mean) in hours.into_iter().zip(values.into_iter()) {
            if let (Some(hour), Some(mean)) = (hour, mean) {
                points.push(ProfilePoint {
                    hour,
                    end_use: end_use.clone(),
                    value: round_half_even(mean),
                });
            }
        }
    }
    points.sort_by(|a, b| a.hour.cmp(&b.hour).then_with(|| a.end_use.cmp(&b.end_use)));

    log::debug!(
        "{}: {} points across {} end uses",
        filter.title(),
        points.len(),
        end_uses.len()
    );

    Ok(AveragedProfile {
        filter: *filter,
        points,
    })
}

/// Banker's rounding to a whole kWh: 12.5 -> 12, 13.5 -> 14.
pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

fn season_predicate(season: Season) -> Option<Expr> {
    let months = season.months()?;
    let month = col(TIMESTAMP).dt().month().cast(DataType::UInt32);
    months
        .iter()
        .map(|&m| month.clone().eq(lit(m)))
        .reduce(|acc, next| acc.or(next))
}

/// ISO weekday numbering: Monday = 1 .. Sunday = 7.
fn day_type_predicate(day_type: DayType) -> Option<Expr> {
    let weekday = col(TIMESTAMP).dt().weekday().cast(DataType::UInt32);
    match day_type {
        DayType::Weekday => Some(weekday.lt_eq(lit(5u32))),
        DayType::Weekend => Some(weekday.gt_eq(lit(6u32))),
        DayType::All => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::hour;
    use crate::table::{FLOOR_AREA, MODELS_USED};
    use chrono::{Datelike, Duration, NaiveDateTime, Timelike, Weekday};

    /// Every hour of 2018. Electricity heating carries the hour of day, the
    /// other columns carry markers that identify month and day kind.
    fn full_year() -> HourlyTable {
        let start = hour(1, 1, 0);
        let timestamps: Vec<NaiveDateTime> = (0..8760).map(|h| start + Duration::hours(h)).collect();

        let by_hour: Vec<f64> = timestamps.iter().map(|t| t.hour() as f64).collect();
        let by_month: Vec<f64> = timestamps.iter().map(|t| t.month() as f64).collect();
        let weekend_flag: Vec<f64> = timestamps
            .iter()
            .map(|t| match t.weekday() {
                Weekday::Sat | Weekday::Sun => 1.0,
                _ => 0.0,
            })
            .collect();
        let ones = vec![1.0; timestamps.len()];

        HourlyTable::from_columns(
            &timestamps,
            &[
                (MODELS_USED, ones.clone()),
                (FLOOR_AREA, ones.clone()),
                ("electricity.heating", by_hour),
                ("electricity.cooling", by_month),
                ("electricity.fans", weekend_flag),
                ("electricity.heating.savings", ones.clone()),
                ("electricity.total", ones.clone()),
                ("site_energy.total", ones.clone()),
                ("natural_gas.heating", ones.clone()),
                ("other_fuel.water_systems", ones.clone()),
                ("district_cooling.cooling", ones.clone()),
                ("district_heating.heating", ones),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_summer_weekday_electricity() {
        let table = full_year();
        let filter = ProfileFilter::new(Season::Summer, DayType::Weekday, FuelType::Electricity);
        let profile = average_day(&table, &filter).unwrap();

        assert_eq!(
            profile.end_uses(),
            vec!["electricity.cooling", "electricity.fans", "electricity.heating"]
        );
        assert_eq!(profile.points.len(), 24 * 3);
        for h in 0..24 {
            assert_eq!(profile.value(h, "electricity.heating"), Some(h as f64));
            // Only weekdays survive
            assert_eq!(profile.value(h, "electricity.fans"), Some(0.0));
        }
        // 21 June, 22 July and 23 August weekdays: 464 / 66 ~ 7.03
        assert_eq!(profile.value(12, "electricity.cooling"), Some(7.0));
    }

    #[test]
    fn test_winter_weekend_keeps_only_winter_weekends() {
        let table = full_year();
        let filter = ProfileFilter::new(Season::Winter, DayType::Weekend, FuelType::Electricity);
        let profile = average_day(&table, &filter).unwrap();

        assert_eq!(profile.value(3, "electricity.fans"), Some(1.0));
        // 8 January, 8 February and 10 December weekend days: 144 / 26 ~ 5.54
        assert_eq!(profile.value(3, "electricity.cooling"), Some(6.0));
    }

    #[test]
    fn test_all_fuels_keeps_every_end_use() {
        let table = full_year();
        let filter = ProfileFilter::new(Season::All, DayType::All, FuelType::All);
        let profile = average_day(&table, &filter).unwrap();

        assert_eq!(
            profile.end_uses(),
            vec![
                "district_cooling.cooling",
                "district_heating.heating",
                "electricity.cooling",
                "electricity.fans",
                "electricity.heating",
                "natural_gas.heating",
                "other_fuel.water_systems",
            ]
        );
    }

    #[test]
    fn test_district_cooling_filter() {
        let table = full_year();
        assert_eq!(
            end_use_columns(&table, FuelType::DistrictCooling),
            vec!["district_cooling.cooling"]
        );
        assert_eq!(
            end_use_columns(&table, FuelType::NaturalGas),
            vec!["natural_gas.heating"]
        );
    }

    #[test]
    fn test_mean_is_rounded_half_to_even() {
        let ts = [hour(7, 2, 5), hour(7, 3, 5)];
        let table = HourlyTable::from_columns(
            &ts,
            &[
                ("electricity.heating", vec![12.0, 12.8]),
                ("electricity.cooling", vec![12.0, 13.0]),
                ("electricity.fans", vec![13.0, 14.0]),
            ],
        )
        .unwrap();
        let filter = ProfileFilter::new(Season::Summer, DayType::Weekday, FuelType::Electricity);
        let profile = average_day(&table, &filter).unwrap();

        assert_eq!(profile.value(5, "electricity.heating"), Some(12.0)); // 12.4
        assert_eq!(profile.value(5, "electricity.cooling"), Some(12.0)); // 12.5
        assert_eq!(profile.value(5, "electricity.fans"), Some(14.0)); // 13.5
    }

    #[test]
    fn test_empty_window_gives_empty_profile() {
        let table = HourlyTable::from_columns(&[hour(1, 3, 0)], &[("electricity.heating", vec![5.0])]).unwrap();
        let filter = ProfileFilter::new(Season::Summer, DayType::All, FuelType::All);
        let profile = average_day(&table, &filter).unwrap();
        assert!(profile.is_empty());
    }
}
