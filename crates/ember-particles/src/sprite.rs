//! Sprite visual state shared by the template and every particle

use ember_core::{Angle, Color, IntRect, TextureHandle, Vec2};

/// Everything a renderer needs to draw one textured quad.
///
/// `origin` is in local (unscaled) coordinates, and position, rotation and
/// scale are applied around it.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub texture: Option<TextureHandle>,
    pub texture_rect: IntRect,
    pub position: Vec2,
    pub rotation: Angle,
    pub scale: Vec2,
    pub origin: Vec2,
    pub color: Color,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            texture: None,
            texture_rect: IntRect::default(),
            position: Vec2::ZERO,
            rotation: Angle::ZERO,
            scale: Vec2::ONE,
            origin: Vec2::ZERO,
            color: Color::WHITE,
        }
    }
}

impl Sprite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a texture and cover all of it
    pub fn set_texture(&mut self, texture: TextureHandle) {
        let (width, height) = texture.size();
        self.texture_rect = IntRect::new(0, 0, width as i32, height as i32);
        self.texture = Some(texture);
    }

    /// Translate by `offset`
    pub fn move_by(&mut self, offset: Vec2) {
        self.position += offset;
    }

    /// Multiply the current scale component-wise
    pub fn scale_by(&mut self, factors: Vec2) {
        self.scale *= factors;
    }

    /// On-screen size in pixels (texture rect times scale)
    pub fn size(&self) -> Vec2 {
        self.texture_rect.size().abs().mul_elem(self.scale)
    }

    /// Texture name, or empty when untextured
    pub fn texture_name(&self) -> &str {
        self.texture.as_deref().map(|t| t.name()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::Texture;

    #[test]
    fn set_texture_covers_full_texture() {
        let mut sprite = Sprite::new();
        sprite.set_texture(Texture::shared("smoke.png", 64, 32));
        assert_eq!(sprite.texture_rect, IntRect::new(0, 0, 64, 32));
        assert_eq!(sprite.texture_name(), "smoke.png");
        assert_eq!(sprite.size(), Vec2::new(64.0, 32.0));
    }

    #[test]
    fn move_and_scale_accumulate() {
        let mut sprite = Sprite::new();
        sprite.move_by(Vec2::new(1.0, 2.0));
        sprite.move_by(Vec2::new(1.0, 2.0));
        assert_eq!(sprite.position, Vec2::new(2.0, 4.0));

        sprite.scale_by(Vec2::new(2.0, 0.5));
        sprite.scale_by(Vec2::new(2.0, 0.5));
        assert_eq!(sprite.scale, Vec2::new(4.0, 0.25));
    }

    #[test]
    fn clone_is_independent() {
        let mut template = Sprite::new();
        template.color = Color::RED;
        let mut copy = template.clone();
        copy.color.a = 10;
        assert_eq!(template.color, Color::RED);
        assert_eq!(copy.color.a, 10);
    }
}
