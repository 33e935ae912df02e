//! Particle types: CPU simulation state and GPU instance data

use crate::sprite::Sprite;
use bytemuck::{Pod, Zeroable};
use ember_core::Vec2;

/// Motion state that the template sprite does not carry
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParticleController {
    /// Pixels per second, fixed at spawn
    pub velocity: Vec2,
    /// Seconds left; the particle is dropped once this is observed <= 0
    pub lifetime: f32,
}

/// One live particle
#[derive(Clone, Debug)]
pub struct Particle {
    pub controller: ParticleController,
    pub sprite: Sprite,
}

impl Particle {
    /// Start a particle from a snapshot of the template sprite
    pub fn from_template(template: &Sprite, velocity: Vec2, lifetime: f32) -> Self {
        Self {
            controller: ParticleController { velocity, lifetime },
            sprite: template.clone(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.controller.lifetime > 0.0
    }
}

/// GPU instance data for one sprite quad.
/// 48 bytes, 16-byte rows (3 x vec4).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    /// xy = position, zw = on-screen size
    pub pos_size: [f32; 4],
    /// Normalized rgba
    pub color: [f32; 4],
    /// x = rotation (radians), yz = scaled origin, w unused
    pub rotation_origin: [f32; 4],
}

impl ParticleInstance {
    /// Pack a sprite, shifted by `offset`
    pub fn from_sprite(sprite: &Sprite, offset: Vec2) -> Self {
        let position = sprite.position + offset;
        let size = sprite.size();
        let origin = sprite.origin.mul_elem(sprite.scale);
        Self {
            pos_size: [position.x, position.y, size.x, size.y],
            color: sprite.color.to_f32_array(),
            rotation_origin: [sprite.rotation.as_radians(), origin.x, origin.y, 0.0],
        }
    }
}

/// Insertion-ordered particle collection.
///
/// Order matters: particles draw in spawn order, so expired entries are
/// removed in place rather than swap-removed.
#[derive(Clone, Debug, Default)]
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    /// Visit every particle once, in order.
    ///
    /// Particles already expired at the start of the visit are removed;
    /// live ones are handed to `step` and kept. Every visited particle then
    /// loses `dt` of lifetime, so a particle whose lifetime reaches zero
    /// during this call survives until the next one.
    pub fn advance(&mut self, dt: f32, mut step: impl FnMut(&mut Particle)) {
        self.particles.retain_mut(|p| {
            let alive = p.is_alive();
            if alive {
                step(p);
            }
            p.controller.lifetime -= dt;
            alive
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::{Angle, Color, Texture};

    fn particle(lifetime: f32, x: f32) -> Particle {
        let mut template = Sprite::new();
        template.position.x = x;
        Particle::from_template(&template, Vec2::new(1.0, 0.0), lifetime)
    }

    #[test]
    fn advance_keeps_order_and_drops_expired() {
        let mut pool = ParticlePool::new();
        pool.push(particle(1.0, 0.0));
        pool.push(particle(0.0, 1.0));
        pool.push(particle(1.0, 2.0));

        let mut visited = 0;
        pool.advance(0.25, |_| visited += 1);

        assert_eq!(visited, 2);
        assert_eq!(pool.len(), 2);
        let xs: Vec<f32> = pool.iter().map(|p| p.sprite.position.x).collect();
        assert_eq!(xs, vec![0.0, 2.0]);
        assert!(pool.iter().all(|p| (p.controller.lifetime - 0.75).abs() < 1e-6));
    }

    #[test]
    fn advance_grants_one_frame_of_grace() {
        let mut pool = ParticlePool::new();
        pool.push(particle(0.5, 0.0));

        pool.advance(0.5, |_| {});
        // lifetime is now 0 but the particle is still in the pool
        assert_eq!(pool.len(), 1);
        assert!(!pool.iter().next().unwrap().is_alive());

        pool.advance(0.5, |_| {});
        assert!(pool.is_empty());
    }

    #[test]
    fn instance_packs_sprite_state() {
        let mut sprite = Sprite::new();
        sprite.set_texture(Texture::shared("dot.png", 8, 4));
        sprite.position = Vec2::new(10.0, 20.0);
        sprite.scale = Vec2::new(2.0, 2.0);
        sprite.origin = Vec2::new(4.0, 2.0);
        sprite.rotation = Angle::degrees(180.0);
        sprite.color = Color::new(255, 0, 0, 0);

        let inst = ParticleInstance::from_sprite(&sprite, Vec2::new(1.0, -1.0));
        assert_eq!(inst.pos_size, [11.0, 19.0, 16.0, 8.0]);
        assert_eq!(inst.color, [1.0, 0.0, 0.0, 0.0]);
        assert!((inst.rotation_origin[0] - std::f32::consts::PI).abs() < 1e-5);
        assert_eq!(&inst.rotation_origin[1..3], &[8.0, 4.0]);
    }

    #[test]
    fn particle_instance_layout() {
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 48);
        assert_eq!(std::mem::align_of::<ParticleInstance>(), 4);
        let inst = ParticleInstance::zeroed();
        assert_eq!(bytemuck::bytes_of(&inst).len(), 48);
    }
}
