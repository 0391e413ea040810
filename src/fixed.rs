//! Provides the fixed-point register model.
//!
//! A `Fx` is a raw integer together with its number of fractional bits, the
//! way the hardware registers hold `.8`, `.12` or `.16` values. Every
//! operation that drops fractional bits takes a `Rounding` so the same
//! formula can be evaluated with different discretization strategies.
//! Values that do not fit a 64-bit register are errors, never wrapped.

use anyhow::{anyhow, ensure, Result};
use std::convert::TryFrom;

/// How fractional bits are discarded when a value is narrowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    /// Drop the extra bits, rounding toward zero.
    Truncate,
    /// Add half a quantum, then floor.
    Nearest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fx {
    pub raw: i64,
    pub frac: u32,
}

impl Fx {
    pub fn from_f64(value: f64, frac: u32, rounding: Rounding) -> Result<Fx> {
        let scaled = value * (1_i64 << frac) as f64;
        let raw = match rounding {
            Rounding::Truncate => scaled.trunc(),
            Rounding::Nearest => (scaled + 0.5).floor(),
        };
        // i64::MAX is not representable; 2^63 is the first value past it.
        ensure!(
            raw.is_finite() && raw >= i64::MIN as f64 && raw < -(i64::MIN as f64),
            "{} does not fit a .{} register",
            value,
            frac
        );
        Ok(Fx {
            raw: raw as i64,
            frac,
        })
    }

    /// `num / den` with `frac` fractional bits, using integer division only.
    pub fn ratio(num: i64, den: i64, frac: u32, rounding: Rounding) -> Result<Fx> {
        ensure!(den != 0, "division by zero in a .{} register", frac);
        let (mut n, mut d) = ((num as i128) << frac, den as i128);
        if d < 0 {
            n = -n;
            d = -d;
        }
        let raw = match rounding {
            Rounding::Truncate => n / d,
            Rounding::Nearest => (2 * n + d).div_euclid(2 * d),
        };
        Fx::from_wide(raw, frac)
    }

    /// Full-width product narrowed (or widened) to `frac` bits.
    pub fn mul(self, other: Fx, frac: u32, rounding: Rounding) -> Result<Fx> {
        let wide = self.raw as i128 * other.raw as i128;
        Fx::from_wide(rescale(wide, self.frac + other.frac, frac, rounding)?, frac)
    }

    pub fn requantize(self, frac: u32, rounding: Rounding) -> Result<Fx> {
        Fx::from_wide(rescale(self.raw as i128, self.frac, frac, rounding)?, frac)
    }

    fn from_wide(raw: i128, frac: u32) -> Result<Fx> {
        let raw = i64::try_from(raw).map_err(|_| anyhow!("overflow in a .{} register", frac))?;
        Ok(Fx { raw, frac })
    }

    pub fn to_f64(self) -> f64 {
        self.raw as f64 / (1_i64 << self.frac) as f64
    }
}

fn rescale(raw: i128, from: u32, to: u32, rounding: Rounding) -> Result<i128> {
    if to >= from {
        return raw
            .checked_mul(1_i128 << (to - from))
            .ok_or_else(|| anyhow!("overflow widening .{} to .{}", from, to));
    }
    let shift = from - to;
    Ok(match rounding {
        // Plain `>>` floors; the registers truncate toward zero.
        Rounding::Truncate => raw / (1_i128 << shift),
        Rounding::Nearest => (raw + (1_i128 << (shift - 1))) >> shift,
    })
}
