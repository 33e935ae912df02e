//! Draw-side contract between particle systems and renderers

use crate::particle::ParticleInstance;
use crate::sprite::Sprite;
use ember_core::Vec2;

/// Blend mode for particle rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParticleBlendMode {
    #[default]
    Alpha,
    Additive,
}

/// Per-draw render parameters supplied by the host
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStates {
    pub blend_mode: ParticleBlendMode,
    /// Translation applied to every submitted sprite
    pub offset: Vec2,
}

impl RenderStates {
    pub fn with_blend_mode(mut self, blend_mode: ParticleBlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }
}

/// Something sprites can be submitted to
pub trait RenderTarget {
    fn draw_sprite(&mut self, sprite: &Sprite, states: &RenderStates);
}

/// Something that can submit itself to a render target
pub trait Drawable {
    fn draw(&self, target: &mut dyn RenderTarget, states: &RenderStates);
}

/// One contiguous run of instances sharing texture and blend mode
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceRange {
    pub texture: String,
    pub blend_mode: ParticleBlendMode,
    pub start: usize,
    pub count: usize,
}

/// Render target that packs submitted sprites into GPU instance data.
///
/// Consecutive sprites with the same texture and blend mode share a range,
/// so an instanced renderer issues one draw call per range.
#[derive(Debug, Default)]
pub struct InstanceBatch {
    instances: Vec<ParticleInstance>,
    ranges: Vec<InstanceRange>,
}

impl InstanceBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new frame, keeping allocations
    pub fn clear(&mut self) {
        self.instances.clear();
        self.ranges.clear();
    }

    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    pub fn ranges(&self) -> &[InstanceRange] {
        &self.ranges
    }

    /// Raw bytes ready for a vertex/storage buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl RenderTarget for InstanceBatch {
    fn draw_sprite(&mut self, sprite: &Sprite, states: &RenderStates) {
        let texture = sprite.texture_name();
        let start = self.instances.len();
        self.instances.push(ParticleInstance::from_sprite(sprite, states.offset));

        match self.ranges.last_mut() {
            Some(range) if range.texture == texture && range.blend_mode == states.blend_mode => {
                range.count += 1;
            }
            _ => self.ranges.push(InstanceRange {
                texture: texture.to_string(),
                blend_mode: states.blend_mode,
                start,
                count: 1,
            }),
        }
    }
}
