// Provides the screen geometry the projection is evaluated against.

use std::ops::Range;

/// GBA screen, tan(y) = 0.5 (vertical field of view ~= 53.13 deg) and the
/// camera height used by the mode 7 demo (384 in .8).
pub const SCREEN_WIDTH: u32 = 240;
pub const SCREEN_HEIGHT: u32 = 160;
pub const TAN_Y: f64 = 0.5;
pub const DEPTH: f64 = 384. / 256.;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub tan_y: f64,
    pub depth: f64,
}

impl Default for Geometry {
    fn default() -> Geometry {
        Geometry {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            tan_y: TAN_Y,
            depth: DEPTH,
        }
    }
}

impl Geometry {
    /// The horizon scanline.
    pub fn center(&self) -> u32 {
        self.height / 2
    }

    pub fn tan_x(&self) -> f64 {
        self.tan_y * self.width as f64 / self.height as f64
    }

    pub fn half_width(&self) -> f64 {
        self.width as f64 / 2.
    }

    /// Distance of the scanline's pixel center below the horizon.
    pub fn row_distance(&self, scanline: u32) -> f64 {
        scanline as f64 - self.center() as f64 + 0.5
    }

    /// Scanlines strictly below the horizon, i.e. the ones showing ground.
    pub fn ground_scanlines(&self) -> Range<u32> {
        self.center() + 1..self.height
    }
}
