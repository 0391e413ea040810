//! Provides sampled error statistics of the fixed-point variants.

use super::fp::*;
use super::geometry::*;
use super::projection::*;
use super::rng::*;
use anyhow::Result;
use log::debug;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErrorStats {
    pub variant: Variant,
    pub count: usize,
    pub max_abs: f64,
    pub mean_abs: f64,
    /// Mean signed error; truncation shows up as a negative bias.
    pub bias: f64,
    /// Analytic worst case over the same samples.
    pub bound: f64,
}

impl ErrorStats {
    /// Compares `variant` against the reference at `samples` random offsets
    /// on every ground scanline.
    pub fn collect(
        g: &Geometry,
        p: Precision,
        variant: Variant,
        samples: usize,
        rng: &mut RttRng,
    ) -> Result<ErrorStats> {
        let offsets = subpixel_offsets(g.width);
        let d = variant.discretization();
        let mut stats = ErrorStats {
            variant,
            count: 0,
            max_abs: 0.,
            mean_abs: 0.,
            bias: 0.,
            bound: 0.,
        };
        let (mut sum_abs, mut sum) = (0., 0.);
        for v in g.ground_scanlines() {
            let reference = reference(g, v);
            let fixed = fixed(g, v, p, d)?;
            for _ in 0..samples {
                let sx = rng.sample(offsets);
                let err = fixed.texel_x(sx) - reference.texel_x(sx);
                stats.max_abs = stats.max_abs.max(err.abs());
                stats.bound = stats.bound.max(texel_error_bound(g, v, sx, p, d));
                sum_abs += err.abs();
                sum += err;
                stats.count += 1;
            }
        }
        if stats.count > 0 {
            stats.mean_abs = sum_abs / stats.count as f64;
            stats.bias = sum / stats.count as f64;
        }
        debug!("{}: {} samples, bias {:+.5}", variant, stats.count, stats.bias);
        Ok(stats)
    }
}

impl fmt::Display for ErrorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<13} max {:.5}  mean {:.5}  bias {:+.5}  bound {:.5}",
            self.variant.name(),
            self.max_abs,
            self.mean_abs,
            self.bias,
            self.bound
        )
    }
}

/// Statistics for every variant, each drawing from the same sample stream.
pub fn collect_all(
    g: &Geometry,
    p: Precision,
    samples: usize,
    rng: &RttRng,
) -> Result<Vec<ErrorStats>> {
    VARIANTS
        .iter()
        .map(|&v| ErrorStats::collect(g, p, v, samples, &mut rng.clone()))
        .collect()
}
