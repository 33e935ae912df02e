//! Ember Particles - 2D sprite particle emitter
//!
//! Provides a single-emitter particle system with:
//! - Template-sprite spawning (every particle starts as a copy)
//! - Rate-based emission with a fractional accumulator, or radial bursts
//! - Linear motion, lifetime fade-out and compounding per-frame growth
//! - A `Drawable` surface plus GPU instance packing for instanced renderers

pub mod emitter;
pub mod particle;
pub mod rand;
pub mod render;
pub mod sprite;
pub mod system;

use ember_core::Result;
use ember_runtime::RuntimeSystem;

pub use emitter::{ParticleSystemConfig, TextureConfig};
pub use particle::{Particle, ParticleController, ParticleInstance};
pub use rand::{ParticleRng, Sampler};
pub use render::{Drawable, InstanceBatch, ParticleBlendMode, RenderStates, RenderTarget};
pub use sprite::Sprite;
pub use system::ParticleSystem;

impl<R: Sampler> RuntimeSystem for ParticleSystem<R> {
    fn initialize(&mut self) -> Result<()> {
        log::info!(
            "[particles] emitter at ({}, {}), {} particle(s)/s, emission {}",
            self.emitter().x,
            self.emitter().y,
            self.respawn_rate(),
            if self.is_emitted() { "on" } else { "off" }
        );
        Ok(())
    }

    fn update(&mut self, dt: f64) -> Result<()> {
        ParticleSystem::update(self, dt as f32);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        log::info!(
            "[particles] shutting down with {} live particle(s), {} spawned in total",
            self.particle_count(),
            self.spawned()
        );
        self.clear();
        Ok(())
    }

    fn name(&self) -> &str {
        "particles"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_as_runtime_system() {
        let mut system = ParticleSystem::with_seed(1);
        system.set_respawn_rate(10.0);
        system.set_emitted(true);

        RuntimeSystem::initialize(&mut system).unwrap();
        RuntimeSystem::update(&mut system, 0.25).unwrap();
        assert_eq!(system.particle_count(), 2);
        assert_eq!(RuntimeSystem::name(&system), "particles");

        RuntimeSystem::shutdown(&mut system).unwrap();
        assert!(system.is_empty());
    }

    #[test]
    fn drives_through_trait_object() {
        let mut system: Box<dyn RuntimeSystem> = Box::new(ParticleSystem::new());
        system.initialize().unwrap();
        system.update(1.0 / 60.0).unwrap();
        assert_eq!(system.name(), "particles");
        system.shutdown().unwrap();
    }
}
