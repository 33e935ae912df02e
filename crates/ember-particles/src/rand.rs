//! Random sampling for particle spawns

use ember_core::Vec2;

/// Source of uniform random values used when spawning particles
pub trait Sampler {
    /// Uniform float in `[min, max]`
    fn frand(&mut self, min: f32, max: f32) -> f32;

    /// Uniform point in the box spanned by `area`: each axis in `[0, area.axis]`
    fn rand2f(&mut self, area: Vec2) -> Vec2 {
        Vec2::new(self.frand(0.0, area.x), self.frand(0.0, area.y))
    }
}

/// Lightweight xorshift32 PRNG
#[derive(Clone, Debug)]
pub struct ParticleRng {
    state: u32,
}

impl ParticleRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1]
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() as f32) / (u32::MAX as f32)
    }
}

impl Default for ParticleRng {
    fn default() -> Self {
        Self::new(0xDEAD_BEEF)
    }
}

impl Sampler for ParticleRng {
    fn frand(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_range_bounds() {
        let mut rng = ParticleRng::new(42);
        for _ in 0..1000 {
            let v = rng.frand(-5.0, 10.0);
            assert!((-5.0..=10.0).contains(&v));
        }
    }

    #[test]
    fn rng_zero_seed_is_usable() {
        let mut rng = ParticleRng::new(0);
        let a = rng.next_f32();
        let b = rng.next_f32();
        assert_ne!(a, b);
    }

    #[test]
    fn rng_is_deterministic_per_seed() {
        let mut a = ParticleRng::new(7);
        let mut b = ParticleRng::new(7);
        for _ in 0..16 {
            assert_eq!(a.frand(0.0, 1.0), b.frand(0.0, 1.0));
        }
    }

    #[test]
    fn rand2f_stays_inside_area() {
        let mut rng = ParticleRng::new(99);
        let area = Vec2::new(40.0, 10.0);
        for _ in 0..500 {
            let p = rng.rand2f(area);
            assert!((0.0..=40.0).contains(&p.x));
            assert!((0.0..=10.0).contains(&p.y));
        }
    }

    #[test]
    fn rand2f_zero_area_is_origin() {
        let mut rng = ParticleRng::new(3);
        assert_eq!(rng.rand2f(Vec2::ZERO), Vec2::ZERO);
    }
}
