// Provides random number generation.

use rand::distributions::Uniform;
pub use rand::Rng;
pub use rand::SeedableRng;

/// Small, fast and seedable. The error statistics only need well spread
/// sub-pixel offsets, and a fixed seed keeps reports reproducible.
pub type RttRng = rand_xoshiro::Xoshiro128Plus;

/// Uniformly distributed sample offsets across a scanline of `width` pixels.
pub fn subpixel_offsets(width: u32) -> Uniform<f64> {
    Uniform::new(0., width as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_stay_on_screen() {
        let mut rng = RttRng::seed_from_u64(7);
        let d = subpixel_offsets(240);
        for _ in 0..1000 {
            let sx = rng.sample(d);
            assert!((0. ..240.).contains(&sx));
        }
    }

    #[test]
    fn seed_is_reproducible() {
        let d = subpixel_offsets(240);
        let a: Vec<f64> = RttRng::seed_from_u64(1).sample_iter(d).take(8).collect();
        let b: Vec<f64> = RttRng::seed_from_u64(1).sample_iter(d).take(8).collect();
        assert_eq!(a, b);
    }
}
