//! Provides the per-scanline mode 7 projection, in floating point and in
//! fixed point.
//!
//! For a scanline `v` the affine background parameters are
//!
//! ```text
//! lambda = z / (v - VRes/2 + 0.5)
//! d      = lambda * VRes / (2 * tgy)
//! pa     = lambda
//! x      = -d * tgx
//! ```
//!
//! and the texture coordinate sampled at screen column `sx` is `x + pa * sx`.

use super::fixed::*;
use super::geometry::*;
use anyhow::{ensure, Result};
use std::fmt;
use std::str::FromStr;

/// Wider formats would overflow the i64 registers in `Fx::mul`.
pub const MAX_FRAC_BITS: u32 = 30;

/// Affine parameters of one scanline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub scale: f64,
    pub distance: f64,
    pub step: f64,
    pub origin: f64,
}

impl Projection {
    fn from_scale(g: &Geometry, scale: f64, step: f64) -> Projection {
        let distance = scale * g.height as f64 / (2. * g.tan_y);
        Projection {
            scale,
            distance,
            step,
            origin: -distance * g.tan_x(),
        }
    }

    /// Horizontal texture coordinate sampled at screen column `sx`.
    pub fn texel_x(&self, sx: f64) -> f64 {
        self.origin + self.step * sx
    }
}

pub fn reference(g: &Geometry, scanline: u32) -> Projection {
    let scale = g.depth / g.row_distance(scanline);
    Projection::from_scale(g, scale, scale)
}

pub fn reference_x(g: &Geometry, scanline: u32, sx: f64) -> f64 {
    reference(g, scanline).texel_x(sx)
}

/// Fractional bits of each register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Precision {
    pub depth_bits: u32,
    pub reciprocal_bits: u32,
    pub scale_bits: u32,
    pub step_bits: u32,
}

impl Precision {
    /// Camera z in .8, `lu_div` in .16, lambda in .12 and BG2PA in .8.
    pub const GBA: Precision = Precision {
        depth_bits: 8,
        reciprocal_bits: 16,
        scale_bits: 12,
        step_bits: 8,
    };

    pub fn new(
        depth_bits: u32,
        reciprocal_bits: u32,
        scale_bits: u32,
        step_bits: u32,
    ) -> Result<Precision> {
        let p = Precision {
            depth_bits,
            reciprocal_bits,
            scale_bits,
            step_bits,
        };
        ensure!(
            p.max_bits() <= MAX_FRAC_BITS,
            "precision {} exceeds {} fractional bits",
            p,
            MAX_FRAC_BITS
        );
        Ok(p)
    }

    /// Every register widened by `extra` bits.
    pub fn with_extra_bits(self, extra: u32) -> Result<Precision> {
        Precision::new(
            self.depth_bits + extra,
            self.reciprocal_bits + extra,
            self.scale_bits + extra,
            self.step_bits + extra,
        )
    }

    fn max_bits(&self) -> u32 {
        self.depth_bits
            .max(self.reciprocal_bits)
            .max(self.scale_bits)
            .max(self.step_bits)
    }
}

impl Default for Precision {
    fn default() -> Precision {
        Precision::GBA
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "z.{} div.{} lambda.{} pa.{}",
            self.depth_bits, self.reciprocal_bits, self.scale_bits, self.step_bits
        )
    }
}

/// Rounding applied when each register is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Discretization {
    pub depth: Rounding,
    pub reciprocal: Rounding,
    pub scale: Rounding,
    pub step: Rounding,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Truncated,
    RoundedStep,
    Rounded,
}

pub const VARIANTS: [Variant; 3] = [Variant::Truncated, Variant::RoundedStep, Variant::Rounded];

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Variant::Truncated => "truncated",
            Variant::RoundedStep => "rounded-step",
            Variant::Rounded => "rounded",
        }
    }

    pub fn discretization(self) -> Discretization {
        use Rounding::*;
        match self {
            Variant::Truncated => Discretization {
                depth: Truncate,
                reciprocal: Truncate,
                scale: Truncate,
                step: Truncate,
            },
            Variant::RoundedStep => Discretization {
                depth: Truncate,
                reciprocal: Truncate,
                scale: Truncate,
                step: Nearest,
            },
            Variant::Rounded => Discretization {
                depth: Nearest,
                reciprocal: Nearest,
                scale: Nearest,
                step: Nearest,
            },
        }
    }
}

impl Default for Variant {
    fn default() -> Variant {
        Variant::Rounded
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Variant> {
        VARIANTS
            .iter()
            .copied()
            .find(|v| v.name() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown variant `{}`", s))
    }
}

/// Rejects a geometry whose registers could overflow at precision `p`.
///
/// The full-width product holds `z * 2^depth_bits` times a reciprocal of at
/// most 2 in `.reciprocal_bits`, and the scale register may widen it further;
/// all of it must stay clear of the i64 range so the bounds in `fp` hold.
pub fn check_range(g: &Geometry, p: Precision) -> Result<()> {
    ensure!(g.depth.is_finite(), "depth {} is not finite", g.depth);
    ensure!(
        g.tan_y.is_finite() && g.tan_y > 0.,
        "tan(y) {} must be finite and positive",
        g.tan_y
    );
    let widest = (p.depth_bits + p.reciprocal_bits).max(p.scale_bits);
    let headroom = ((widest + 1) as f64).exp2();
    ensure!(
        g.depth.abs() * headroom < MAX_REGISTER,
        "depth {} overflows the registers at {}",
        g.depth,
        p
    );
    Ok(())
}

/// Largest magnitude a full-width register product may reach.
const MAX_REGISTER: f64 = (1_u64 << 62) as f64;

/// The projection as computed with fixed-point registers. Only meaningful
/// for scanlines below the horizon.
pub fn fixed(g: &Geometry, scanline: u32, p: Precision, d: Discretization) -> Result<Projection> {
    debug_assert!(scanline > g.center());
    let z = Fx::from_f64(g.depth, p.depth_bits, d.depth)?;
    // 1 / (v - c + 0.5) == 2 / (2 (v - c) + 1)
    let rows = 2 * (scanline as i64 - g.center() as i64) + 1;
    let recip = Fx::ratio(2, rows, p.reciprocal_bits, d.reciprocal)?;
    let lambda = z.mul(recip, p.scale_bits, d.scale)?;
    let pa = lambda.requantize(p.step_bits, d.step)?;
    Ok(Projection::from_scale(g, lambda.to_f64(), pa.to_f64()))
}

pub fn fixed_x(g: &Geometry, scanline: u32, sx: f64, p: Precision, v: Variant) -> Result<f64> {
    Ok(fixed(g, scanline, p, v.discretization())?.texel_x(sx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_first_ground_scanline() {
        let g = Geometry::default();
        let r = reference(&g, 81);
        assert_eq!(r.scale, 1.);
        assert_eq!(r.distance, 160.);
        assert_eq!(r.origin, -120.);
        assert_eq!(r.texel_x(120.), 0.);
        assert_eq!(reference_x(&g, 81, 120.5), 0.5);
    }

    #[test]
    fn reference_origin_is_half_screen() {
        let g = Geometry::default();
        for v in g.ground_scanlines() {
            let r = reference(&g, v);
            assert!((r.origin + r.scale * g.half_width()).abs() < 1e-12);
        }
    }

    #[test]
    fn truncated_registers_on_gba() {
        let g = Geometry::default();
        // v = 83: recip = 2/7 -> 18724 (.16), lambda = 384 * 18724 >> 12 = 1755
        let f = fixed(&g, 83, Precision::GBA, Variant::Truncated.discretization()).unwrap();
        assert_eq!(f.scale, 1755. / 4096.);
        assert_eq!(f.step, 109. / 256.);
    }

    #[test]
    fn rounded_registers_on_gba() {
        let g = Geometry::default();
        // recip = 18725, lambda = (384 * 18725 + 2048) >> 12 = 1755, pa = 110
        let f = fixed(&g, 83, Precision::GBA, Variant::Rounded.discretization()).unwrap();
        assert_eq!(f.scale, 1755. / 4096.);
        assert_eq!(f.step, 110. / 256.);
        let s = fixed(&g, 83, Precision::GBA, Variant::RoundedStep.discretization()).unwrap();
        assert_eq!(s.step, 110. / 256.);
    }

    #[test]
    fn precision_is_bounded() {
        assert!(Precision::GBA.with_extra_bits(14).is_ok());
        assert!(Precision::GBA.with_extra_bits(15).is_err());
        assert!(Precision::new(31, 0, 0, 0).is_err());
    }

    #[test]
    fn depth_is_range_checked() {
        let g = Geometry::default();
        assert!(check_range(&g, Precision::GBA).is_ok());
        assert!(check_range(&g, Precision::GBA.with_extra_bits(14).unwrap()).is_ok());

        let far = Geometry { depth: 1e12, ..g };
        let p = Precision::GBA.with_extra_bits(14).unwrap();
        let err = check_range(&far, p).unwrap_err();
        assert!(err.to_string().contains("overflows"), "{}", err);
        assert!(check_range(&Geometry { depth: -1e30, ..g }, Precision::GBA).is_err());
        assert!(check_range(&Geometry { depth: f64::NAN, ..g }, Precision::GBA).is_err());
        assert!(check_range(&Geometry { depth: f64::INFINITY, ..g }, Precision::GBA).is_err());
        assert!(check_range(&Geometry { tan_y: 0., ..g }, Precision::GBA).is_err());
    }

    #[test]
    fn accepted_depths_never_overflow() {
        let p = Precision::GBA.with_extra_bits(14).unwrap();
        // Largest register widths with a non-trivial camera height.
        let g = Geometry {
            depth: 3.9,
            ..Geometry::default()
        };
        assert!(check_range(&g, p).is_ok());
        for &variant in VARIANTS.iter() {
            for v in g.ground_scanlines() {
                assert!(fixed(&g, v, p, variant.discretization()).is_ok());
            }
        }
    }

    #[test]
    fn oversized_depth_is_an_error_not_garbage() {
        let g = Geometry {
            depth: 1e30,
            ..Geometry::default()
        };
        assert!(fixed(&g, 81, Precision::GBA, Variant::Truncated.discretization()).is_err());
    }

    #[test]
    fn variant_names_round_trip() {
        for v in VARIANTS.iter() {
            assert_eq!(v.name().parse::<Variant>().unwrap(), *v);
        }
        assert!("floor".parse::<Variant>().is_err());
    }
}
