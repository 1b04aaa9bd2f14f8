use crate::error::{ProfileError, Result};
use crate::models::AveragedProfile;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (1000, 600);

fn chart_error<E: std::fmt::Display>(e: E) -> ProfileError {
    ProfileError::Chart(e.to_string())
}

/// Stacked area chart of an averaged day, written as SVG.
pub fn render_svg(profile: &AveragedProfile, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    draw(profile, &root)?;
    log::info!("Chart written to {}", path.display());
    Ok(())
}

pub fn render_svg_string(profile: &AveragedProfile) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        draw(profile, &root)?;
    }
    Ok(svg)
}

/// Cumulative layer tops per end use, bottom layer first.
fn stacked_layers(profile: &AveragedProfile) -> Vec<(String, Vec<(i32, f64)>)> {
    let mut running = [0.0f64; 24];
    profile
        .end_uses()
        .into_iter()
        .map(|end_use| {
            for (hour, value) in profile.series(end_use) {
                if let Some(slot) = running.get_mut(hour as usize) {
                    *slot += value;
                }
            }
            let tops = running
                .iter()
                .enumerate()
                .map(|(hour, top)| (hour as i32, *top))
                .collect();
            (end_use.to_string(), tops)
        })
        .collect()
}

fn draw<DB: DrawingBackend>(profile: &AveragedProfile, root: &DrawingArea<DB, Shift>) -> Result<()> {
    if profile.is_empty() {
        return Err(ProfileError::Chart(format!("{} has no data to plot", profile.title())));
    }

    root.fill(&WHITE).map_err(chart_error)?;

    let layers = stacked_layers(profile);
    let peak = layers
        .last()
        .map(|(_, tops)| tops.iter().map(|(_, y)| *y).fold(0.0, f64::max))
        .unwrap_or(0.0);
    let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(profile.title(), ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0i32..23i32, 0.0..y_max)
        .map_err(chart_error)?;

    chart
        .configure_mesh()
        .x_desc("Hour")
        .y_desc("Energy (kWh)")
        .x_labels(24)
        .draw()
        .map_err(chart_error)?;

    // Tallest layer first so each lower layer paints over the one above it.
    for (idx, (end_use, tops)) in layers.iter().enumerate().rev() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(AreaSeries::new(tops.iter().copied(), 0.0, color.mix(0.8)).border_style(color))
            .map_err(chart_error)?
            .label(end_use.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_error)?;

    root.present().map_err(chart_error)?;
    Ok(())
}
