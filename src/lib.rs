//! Measures how far a fixed-point mode 7 projection drifts from the exact
//! floating-point one.

pub mod errormap;
pub mod fixed;
pub mod fp;
pub mod geometry;
pub mod plot;
pub mod projection;
pub mod rng;
pub mod stats;

use anyhow::Result;
use geometry::Geometry;
use log::info;
use projection::{Precision, Variant};
use rng::RttRng;
use stats::ErrorStats;
use std::fmt;
use std::path::PathBuf;

pub struct Config {
    pub geometry: Geometry,
    pub precision: Precision,
    pub chart: PathBuf,
    pub residuals: bool,
    pub samples: usize,
    pub error_map: Option<(PathBuf, Variant)>,
}

/// What `analyze` wrote and measured.
pub struct Report {
    pub chart: PathBuf,
    pub error_map: Option<PathBuf>,
    pub stats: Vec<ErrorStats>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Nothing is displayed on screen; point at the files instead.
        writeln!(f, "chart written to {}", self.chart.display())?;
        if let Some(path) = &self.error_map {
            writeln!(f, "error map written to {}", path.display())?;
        }
        for s in &self.stats {
            writeln!(f, "{}", s)?;
        }
        Ok(())
    }
}

/// Writes the chart (and error map, if requested) and samples the error
/// statistics of every variant. Nothing is written when the geometry would
/// overflow the registers.
pub fn analyze(config: &Config, rng: &RttRng) -> Result<Report> {
    let g = &config.geometry;
    projection::check_range(g, config.precision)?;

    let series = plot::comparison_series(g, config.precision, config.residuals)?;
    plot::save_chart(&config.chart, g, &series)?;
    info!("wrote {}", config.chart.display());

    let mut error_map = None;
    if let Some((path, variant)) = &config.error_map {
        errormap::save_error_map(path, g, config.precision, *variant)?;
        info!("wrote {} ({})", path.display(), variant);
        error_map = Some(path.clone());
    }

    Ok(Report {
        chart: config.chart.clone(),
        error_map,
        stats: stats::collect_all(g, config.precision, config.samples, rng)?,
    })
}
