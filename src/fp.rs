//! Provides fixed-point error bounds.

use super::fixed::Rounding;
use super::geometry::Geometry;
use super::projection::{Discretization, Precision};

/// The smallest step of a format with `bits` fractional bits.
pub fn quantum(bits: u32) -> f64 {
    (-(bits as f64)).exp2()
}

/// Largest error introduced by writing a value to a register with `bits`
/// fractional bits. Truncation loses up to a full quantum, rounding half.
pub fn quantization_bound(bits: u32, rounding: Rounding) -> f64 {
    match rounding {
        Rounding::Truncate => quantum(bits),
        Rounding::Nearest => 0.5 * quantum(bits),
    }
}

/// Worst case |fixed - reference| of the texture coordinate at column `sx`.
///
/// With `l` the exact scale and `l'` the scale register, the error splits
/// into `(l - l') (W/2 - sx)` from the origin and `(pa - l') sx` from the
/// step register. `l'` carries the depth and reciprocal errors through the
/// product before being quantized itself.
pub fn texel_error_bound(
    g: &Geometry,
    scanline: u32,
    sx: f64,
    p: Precision,
    d: Discretization,
) -> f64 {
    let recip = 1. / g.row_distance(scanline);
    let eb_depth = quantization_bound(p.depth_bits, d.depth);
    let eb_recip = quantization_bound(p.reciprocal_bits, d.reciprocal);
    let eb_scale = eb_depth * (recip + eb_recip)
        + g.depth.abs() * eb_recip
        + quantization_bound(p.scale_bits, d.scale);
    let eb_step = quantization_bound(p.step_bits, d.step);
    eb_scale * (g.half_width() - sx).abs() + eb_step * sx.abs()
}
