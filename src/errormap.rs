// Provides the per-pixel error raster.

use super::geometry::*;
use super::projection::*;
use anyhow::{Context, Result};
use palette::{LinSrgb, Mix, Srgb};
use rayon::prelude::*;
use std::path::Path;

pub const BYTES_PER_PIXEL: usize = 3;

/// Signed error that saturates the colour map, in texels.
pub const FULL_SCALE: f64 = 0.5;

/// Blue for texels sampled too far left, red for too far right.
pub fn error_color(err: f64, full_scale: f64) -> [u8; 3] {
    let white: LinSrgb = LinSrgb::new(1., 1., 1.);
    let target: LinSrgb = if err < 0. {
        LinSrgb::new(0.05, 0.15, 0.9)
    } else {
        LinSrgb::new(0.9, 0.05, 0.05)
    };
    let t = (err.abs() / full_scale).min(1.) as f32;
    let c: Srgb<u8> = Srgb::from_linear(white.mix(&target, t)).into_format();
    let (r, g, b) = c.into_components();
    [r, g, b]
}

/// RGB8 raster, row-major from the top scanline, of `variant - reference` at
/// each pixel's left edge. Rows above the ground are black.
pub fn error_map(
    g: &Geometry,
    p: Precision,
    variant: Variant,
    full_scale: f64,
) -> Result<Vec<u8>> {
    let (w, h) = (g.width as usize, g.height as usize);
    let d = variant.discretization();
    let ground = g.ground_scanlines();
    let mut pixels = vec![0u8; w * h * BYTES_PER_PIXEL];
    pixels
        .par_chunks_mut(w * BYTES_PER_PIXEL)
        .enumerate()
        .try_for_each(|(v, row)| -> Result<()> {
            let v = v as u32;
            if !ground.contains(&v) {
                return Ok(());
            }
            let reference = reference(g, v);
            let fixed = fixed(g, v, p, d)?;
            for (sx, px) in row.chunks_mut(BYTES_PER_PIXEL).enumerate() {
                let sx = sx as f64;
                let err = fixed.texel_x(sx) - reference.texel_x(sx);
                px.copy_from_slice(&error_color(err, full_scale));
            }
            Ok(())
        })?;
    Ok(pixels)
}

pub fn save_error_map<P: AsRef<Path>>(
    path: P,
    g: &Geometry,
    p: Precision,
    variant: Variant,
) -> Result<()> {
    let path = path.as_ref();
    let pixels = error_map(g, p, variant, FULL_SCALE)?;
    image::save_buffer(path, &pixels[..], g.width, g.height, image::ColorType::Rgb8)
        .with_context(|| format!("writing error map {}", path.display()))
}
