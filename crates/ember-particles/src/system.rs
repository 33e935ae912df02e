//! The particle system: template sprite, emission state and live particles

use crate::emitter::{ParticleSystemConfig, TextureConfig};
use crate::particle::{Particle, ParticlePool};
use crate::rand::{ParticleRng, Sampler};
use crate::render::{Drawable, RenderStates, RenderTarget};
use crate::sprite::Sprite;
use ember_core::{Angle, Color, Texture, TextureHandle, Vec2};
use std::f32::consts::TAU;

/// Most particles rate emission creates in a single update; the rest of a
/// larger backlog is discarded
pub const MAX_SPAWNS_PER_UPDATE: usize = 1 << 16;

/// Spawns, simulates and draws sprite particles around an emitter point.
///
/// Every particle starts as a copy of a template sprite (texture, tint,
/// size, origin). Particles come either from continuous emission at
/// `respawn_rate` per second or from a one-shot radial burst
/// (`set_explosion`). Call [`update`](Self::update) once per frame, then draw
/// through [`Drawable`].
pub struct ParticleSystem<R: Sampler = ParticleRng> {
    particles: ParticlePool,
    template: Sprite,

    particle_size: Vec2,
    emitter: Vec2,
    direction: Angle,
    dispersion: Angle,
    velocity: f32,
    respawn_rate: f32,
    respawn_area: Vec2,
    lifetime_max: f32,
    exponential_growth: Vec2,

    /// Fractional particle accumulator for rate-based emission
    spawn_timer: f32,
    is_emitted: bool,
    is_attenuated: bool,
    /// Particles created since construction (both spawn paths)
    spawned: u64,

    rng: R,
}

impl ParticleSystem<ParticleRng> {
    pub fn new() -> Self {
        Self::with_sampler(ParticleRng::default())
    }

    pub fn with_seed(seed: u32) -> Self {
        Self::with_sampler(ParticleRng::new(seed))
    }
}

impl Default for ParticleSystem<ParticleRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Sampler> ParticleSystem<R> {
    pub fn with_sampler(rng: R) -> Self {
        Self {
            particles: ParticlePool::new(),
            template: Sprite::new(),
            particle_size: Vec2::splat(32.0),
            emitter: Vec2::ZERO,
            direction: Angle::ZERO,
            dispersion: Angle::ZERO,
            velocity: 0.0,
            respawn_rate: 0.0,
            respawn_area: Vec2::ZERO,
            lifetime_max: 0.0,
            exponential_growth: Vec2::ONE,
            spawn_timer: 0.0,
            is_emitted: false,
            is_attenuated: false,
            spawned: 0,
            rng,
        }
    }

    /// Apply every field of `config` through the regular setters.
    ///
    /// The texture (if any) is bound first so that the configured particle
    /// size wins over the texture's native size.
    pub fn apply_config(&mut self, config: &ParticleSystemConfig) {
        if let Some(texture) = &config.texture {
            self.set_texture(Texture::shared(
                texture.name.clone(),
                texture.width,
                texture.height,
            ));
        }
        self.set_particle_size(config.particle_size);
        self.set_color(config.color);
        self.set_emitter(config.emitter);
        self.set_direction(config.direction);
        self.set_dispersion(config.dispersion);
        self.set_velocity(config.velocity);
        self.set_respawn_rate(config.respawn_rate);
        self.set_respawn_area(config.respawn_area);
        self.set_lifetime(config.lifetime);
        self.set_exponential_growth(config.exponential_growth);
        self.set_emitted(config.emitted);
        self.set_attenuated(config.attenuated);
    }

    /// Snapshot of the current settings. Host-side fields (blend mode,
    /// startup burst) are not tracked here and come back as defaults.
    pub fn config(&self) -> ParticleSystemConfig {
        ParticleSystemConfig {
            texture: self.template.texture.as_deref().map(|t| {
                let (width, height) = t.size();
                TextureConfig {
                    name: t.name().to_string(),
                    width,
                    height,
                }
            }),
            particle_size: self.particle_size,
            color: self.template.color,
            emitter: self.emitter,
            direction: self.direction,
            dispersion: self.dispersion,
            velocity: self.velocity,
            respawn_rate: self.respawn_rate,
            respawn_area: self.respawn_area,
            lifetime: self.lifetime_max,
            exponential_growth: self.exponential_growth,
            emitted: self.is_emitted,
            attenuated: self.is_attenuated,
            ..Default::default()
        }
    }

    // ── Template ──

    /// Bind a texture to the template and size particles to it.
    ///
    /// Only particles spawned afterwards use the new texture.
    pub fn set_texture(&mut self, texture: TextureHandle) {
        let (width, height) = texture.size();
        log::debug!(
            "[particles] binding texture '{}' ({width}x{height})",
            texture.name()
        );
        self.template.set_texture(texture);
        self.set_particle_size(Vec2::new(width as f32, height as f32));
    }

    /// Tint for new particles; live particles keep their color
    pub fn set_color(&mut self, color: Color) {
        self.template.color = color;
    }

    /// Target on-screen size of new particles, in pixels.
    ///
    /// Rescales the template against its texture rect; without a texture the
    /// scale is left alone. The origin is recentered either way.
    pub fn set_particle_size(&mut self, size: Vec2) {
        self.particle_size = size;

        let rect = self.template.texture_rect;
        if !rect.is_degenerate() {
            let native = rect.size().abs();
            self.template.scale = Vec2::new(size.x / native.x, size.y / native.y);
        }
        self.template.origin = size * 0.5;
    }

    // ── Emission ──

    pub fn set_emitter(&mut self, emitter: Vec2) {
        self.emitter = emitter;
    }

    pub fn set_direction(&mut self, direction: Angle) {
        self.direction = direction;
    }

    /// Full angular spread; spawn directions fall within ±dispersion/2
    pub fn set_dispersion(&mut self, dispersion: Angle) {
        self.dispersion = dispersion;
    }

    /// Speed in pixels per second; the sign is discarded
    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity.abs();
    }

    /// Particles per second; the sign is discarded
    pub fn set_respawn_rate(&mut self, rate: f32) {
        self.respawn_rate = rate.abs();
    }

    /// Spawn offsets are drawn from `[0, area.x] x [0, area.y]`
    pub fn set_respawn_area(&mut self, area: Vec2) {
        self.respawn_area = area;
    }

    /// Upper bound of the random extra lifetime; every particle also gets a
    /// fixed one second. The sign is discarded.
    pub fn set_lifetime(&mut self, lifetime: f32) {
        self.lifetime_max = lifetime.abs();
    }

    /// Per-frame scale multiplier applied to every live particle
    pub fn set_exponential_growth(&mut self, factors: Vec2) {
        self.exponential_growth = factors;
    }

    pub fn set_emitted(&mut self, emitted: bool) {
        self.is_emitted = emitted;
    }

    /// Fade particles out as their remaining lifetime runs down
    pub fn set_attenuated(&mut self, attenuated: bool) {
        self.is_attenuated = attenuated;
    }

    /// Fire `count` particles evenly around a circle of `radius` centered on
    /// the emitter, moving radially outward.
    ///
    /// Ignored while any particle is alive. Firing turns continuous emission
    /// off; re-enable it with `set_emitted` once the burst has died out.
    pub fn set_explosion(&mut self, count: usize, radius: f32) {
        if !self.particles.is_empty() {
            log::trace!(
                "[particles] burst ignored, {} particle(s) still alive",
                self.particles.len()
            );
            return;
        }

        self.set_emitted(false);
        if count == 0 {
            log::warn!("[particles] burst requested with zero particles");
            return;
        }

        log::debug!("[particles] burst of {count} at radius {radius}");
        let step = TAU / count as f32;
        for i in 0..count {
            let dir = Vec2::from_angle(Angle::radians(i as f32 * step));
            let lifetime = self.sample_lifetime();

            let mut particle =
                Particle::from_template(&self.template, dir * self.velocity, lifetime);
            particle.sprite.position = self.emitter + dir * radius;
            self.push(particle);
        }
    }

    // ── Simulation ──

    /// Advance the simulation by `dt` seconds.
    ///
    /// Emission runs first, so particles spawned this frame also move this
    /// frame. Each particle is then checked, updated, and only afterwards
    /// loses `dt` of lifetime: a particle whose lifetime hits zero is still
    /// drawn once more and is removed on the following call.
    pub fn update(&mut self, dt: f32) {
        if self.is_emitted {
            self.spawn_timer += self.respawn_rate * dt;
        }

        self.spawn_due();

        let growth = self.exponential_growth;
        let lifetime_max = self.lifetime_max;
        // nothing to fade against without a lifetime range
        let attenuated = self.is_attenuated && lifetime_max > 0.0;

        self.particles.advance(dt, |p| {
            p.sprite.move_by(p.controller.velocity * dt);
            if attenuated {
                p.sprite.color.a = attenuation_alpha(p.controller.lifetime, lifetime_max);
            }
            p.sprite.scale_by(growth);
        });
    }

    /// Spawn every whole particle the accumulator holds past 1.0.
    ///
    /// Same count as subtracting 1.0 while the timer stays strictly above
    /// 1.0, but computed up front: past 2^24 an f32 no longer changes when
    /// 1.0 is taken off it.
    fn spawn_due(&mut self) {
        if !self.spawn_timer.is_finite() {
            log::warn!(
                "[particles] emission accumulator overflowed ({}), dropping this frame's spawns",
                self.spawn_timer
            );
            self.spawn_timer = 0.0;
            return;
        }
        if self.spawn_timer <= 1.0 {
            return;
        }

        let due = (self.spawn_timer - 1.0).ceil();
        self.spawn_timer = (self.spawn_timer - due).max(0.0);

        let count = if due > MAX_SPAWNS_PER_UPDATE as f32 {
            log::warn!(
                "[particles] {due} particles due in one update, spawning {MAX_SPAWNS_PER_UPDATE}"
            );
            MAX_SPAWNS_PER_UPDATE
        } else {
            due as usize
        };
        for _ in 0..count {
            self.create_particle();
        }
    }

    /// Drop every live particle and the pending emission remainder
    pub fn clear(&mut self) {
        self.particles.clear();
        self.spawn_timer = 0.0;
    }

    fn create_particle(&mut self) {
        let half = (self.dispersion * 0.5).as_degrees();
        let deviation = Angle::degrees(self.rng.frand(-half, half));
        let velocity = Vec2::from_angle(self.direction + deviation) * self.velocity;
        let lifetime = self.sample_lifetime();

        let mut particle = Particle::from_template(&self.template, velocity, lifetime);
        particle.sprite.position = self.emitter + self.rng.rand2f(self.respawn_area);
        particle.sprite.rotation = Angle::degrees(self.rng.frand(0.0, 360.0));
        self.push(particle);
    }

    fn sample_lifetime(&mut self) -> f32 {
        self.rng.frand(0.0, self.lifetime_max) + 1.0
    }

    fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
        self.spawned += 1;
    }

    // ── Getters ──

    pub fn texture(&self) -> Option<&TextureHandle> {
        self.template.texture.as_ref()
    }

    pub fn color(&self) -> Color {
        self.template.color
    }

    pub fn particle_size(&self) -> Vec2 {
        self.particle_size
    }

    pub fn emitter(&self) -> Vec2 {
        self.emitter
    }

    pub fn direction(&self) -> Angle {
        self.direction
    }

    pub fn dispersion(&self) -> Angle {
        self.dispersion
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn respawn_rate(&self) -> f32 {
        self.respawn_rate
    }

    pub fn respawn_area(&self) -> Vec2 {
        self.respawn_area
    }

    pub fn lifetime(&self) -> f32 {
        self.lifetime_max
    }

    pub fn exponential_growth(&self) -> Vec2 {
        self.exponential_growth
    }

    pub fn is_emitted(&self) -> bool {
        self.is_emitted
    }

    pub fn is_attenuated(&self) -> bool {
        self.is_attenuated
    }

    /// The sprite every new particle is cloned from
    pub fn template(&self) -> &Sprite {
        &self.template
    }

    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    /// Live particles in draw order
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Total particles spawned since construction
    pub fn spawned(&self) -> u64 {
        self.spawned
    }
}

impl<R: Sampler> Drawable for ParticleSystem<R> {
    fn draw(&self, target: &mut dyn RenderTarget, states: &RenderStates) {
        for particle in self.particles.iter() {
            target.draw_sprite(&particle.sprite, states);
        }
    }
}

/// Alpha for a particle with `lifetime` seconds left out of `lifetime_max`.
///
/// Fresh particles can hold more than `lifetime_max` (the fixed extra
/// second), so the ratio is clamped.
fn attenuation_alpha(lifetime: f32, lifetime_max: f32) -> u8 {
    let ratio = (lifetime / lifetime_max).clamp(0.0, 1.0);
    (ratio * 255.0) as u8
}
