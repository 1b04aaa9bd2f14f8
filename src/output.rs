use anyhow::Result;
use clap::ValueEnum;
use eulp_profiles::AveragedProfile;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Summary,
}

#[derive(Serialize)]
struct ProfileReport<'a> {
    total_models: Option<f64>,
    combinations: usize,
    profile: &'a AveragedProfile,
}

/// Daily kWh and peak hour of one end use.
#[derive(Debug, Clone, PartialEq)]
pub struct EndUseSummary {
    pub end_use: String,
    pub daily_kwh: f64,
    pub peak_hour: u32,
    pub peak_kwh: f64,
}

pub fn summarize(profile: &AveragedProfile) -> Vec<EndUseSummary> {
    let mut rows: Vec<EndUseSummary> = profile
        .end_uses()
        .into_iter()
        .map(|end_use| {
            let series = profile.series(end_use);
            let (peak_hour, peak_kwh) = series
                .iter()
                .copied()
                .fold((0, f64::MIN), |best, point| if point.1 > best.1 { point } else { best });
            EndUseSummary {
                end_use: end_use.to_string(),
                daily_kwh: series.iter().map(|(_, v)| v).sum(),
                peak_hour,
                peak_kwh,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.daily_kwh.total_cmp(&a.daily_kwh));
    rows
}

pub fn render(
    profile: &AveragedProfile,
    total_models: Option<f64>,
    combinations: usize,
    format: OutputFormat,
) -> Result<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&ProfileReport {
            total_models,
            combinations,
            profile,
        })?,
        OutputFormat::Csv => profile.to_csv()?,
        OutputFormat::Summary => {
            let title = format!("Average day: {}", profile.title());
            let mut lines = vec![title.clone(), "=".repeat(title.len())];
            lines.push(format!("Combinations: {}", combinations));
            if let Some(models) = total_models {
                lines.push(format!("Total Models: {}", models as i64));
            }
            lines.push(String::new());

            if profile.is_empty() {
                lines.push("No data in the selected window.".to_string());
            } else {
                lines.push(format!(
                    "{:<36} {:>12} {:>6} {:>12}",
                    "End use", "kWh/day", "Peak", "Peak kWh"
                ));
                for row in summarize(profile) {
                    lines.push(format!(
                        "{:<36} {:>12.0} {:>4}:00 {:>12.0}",
                        row.end_use, row.daily_kwh, row.peak_hour, row.peak_kwh
                    ));
                }
            }
            lines.join("\n") + "\n"
        }
    };
    Ok(text)
}
