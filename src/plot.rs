//! Provides the scanline comparison chart.
//!
//! The reference is drawn at the left edge, center and right edge of the
//! middle pixel to show how far the texture coordinate moves within a single
//! pixel; the fixed-point variants are drawn at the pixel left of it.

use super::geometry::*;
use super::projection::*;
use anyhow::{Context, Result};
use itertools::{Itertools, MinMaxResult};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct Series {
    pub label: String,
    pub points: Vec<(u32, f64)>,
}

impl Series {
    fn sample<F: Fn(u32) -> Result<f64>>(g: &Geometry, label: String, f: F) -> Result<Series> {
        let points = g
            .ground_scanlines()
            .map(|v| Ok((v, f(v)?)))
            .collect::<Result<_>>()?;
        Ok(Series { label, points })
    }
}

/// Three reference curves followed by one curve per variant. With
/// `residuals` the variants are plotted as their difference to the reference
/// at the same column and the reference curves are left out.
pub fn comparison_series(g: &Geometry, p: Precision, residuals: bool) -> Result<Vec<Series>> {
    let mid = g.half_width();
    let fixed_sx = mid - 1.;
    let mut series = Vec::new();
    if !residuals {
        for &sx in [mid - 0.5, mid, mid + 0.5].iter() {
            series.push(Series::sample(g, format!("reference sx={}", sx), |v| {
                Ok(reference_x(g, v, sx))
            })?);
        }
    }
    for &variant in VARIANTS.iter() {
        let label = format!("{} sx={}", variant, fixed_sx);
        series.push(Series::sample(g, label, |v| {
            let x = fixed_x(g, v, fixed_sx, p, variant)?;
            Ok(if residuals {
                x - reference_x(g, v, fixed_sx)
            } else {
                x
            })
        })?);
    }
    Ok(series)
}

/// Vertical extent of every series, padded so curves do not touch the frame.
pub fn value_range(series: &[Series]) -> (f64, f64) {
    let values = series.iter().flat_map(|s| s.points.iter().map(|&(_, x)| x));
    let (lo, hi) = match values.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => (-1., 1.),
        MinMaxResult::OneElement(x) => (x, x),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };
    let pad = ((hi - lo) * 0.05).max(1e-3);
    (lo - pad, hi + pad)
}

pub const CHART_SIZE: (u32, u32) = (1200, 700);

/// Writes the chart; the extension picks SVG or PNG.
pub fn save_chart<P: AsRef<Path>>(path: P, g: &Geometry, series: &[Series]) -> Result<()> {
    let path = path.as_ref();
    let is_svg = path
        .extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("svg"));
    let drawn = if is_svg {
        draw_chart(SVGBackend::new(path, CHART_SIZE).into_drawing_area(), g, series)
    } else {
        draw_chart(BitMapBackend::new(path, CHART_SIZE).into_drawing_area(), g, series)
    };
    drawn.with_context(|| format!("writing chart {}", path.display()))
}

fn draw_chart<DB>(root: DrawingArea<DB, Shift>, g: &Geometry, series: &[Series]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let ground = g.ground_scanlines();
    let (lo, hi) = value_range(series);
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Mode 7 texture x per scanline", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(ground.start..ground.end, lo..hi)?;

    chart
        .configure_mesh()
        .x_desc("scanline")
        .y_desc("texel x")
        .draw()?;

    for (i, s) in series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(s.points.iter().copied(), &color))?
            .label(s.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_curves_over_the_ground() {
        let g = Geometry::default();
        let series = comparison_series(&g, Precision::GBA, false).unwrap();
        assert_eq!(series.len(), 6);
        assert_eq!(series[0].label, "reference sx=119.5");
        assert_eq!(series[3].label, "truncated sx=119");
        for s in &series {
            assert_eq!(s.points.len(), 79);
            assert_eq!(s.points[0].0, 81);
            assert_eq!(s.points[78].0, 159);
        }
        // Pixel spread brackets the center curve.
        for i in 0..79 {
            assert!(series[0].points[i].1 < series[1].points[i].1);
            assert!(series[1].points[i].1 < series[2].points[i].1);
        }
    }

    #[test]
    fn residuals_drop_reference() {
        let g = Geometry::default();
        let series = comparison_series(&g, Precision::GBA, true).unwrap();
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|s| s.points.iter().all(|p| p.1.abs() < 0.5)));
    }

    #[test]
    fn range_is_padded() {
        let s = Series {
            label: String::new(),
            points: vec![(1, -1.), (2, 1.)],
        };
        let (lo, hi) = value_range(&[s]);
        assert!(lo < -1. && hi > 1.);
        let (lo, hi) = value_range(&[]);
        assert!((lo + 1.1).abs() < 1e-12 && (hi - 1.1).abs() < 1e-12);
    }
}
