//! Texture descriptors shared between particle systems and renderers

use std::rc::Rc;

/// A texture known to the renderer, identified by name.
///
/// Ember never touches pixel data; it only needs the native size to derive
/// particle dimensions. The renderer resolves `name` to its GPU resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    name: String,
    width: u32,
    height: u32,
}

/// Shared, reference-counted texture handle.
///
/// Anything holding a handle keeps the texture alive, so a particle system
/// can never observe a texture that has been dropped.
pub type TextureHandle = Rc<Texture>;

impl Texture {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    /// Convenience for building a handle directly
    pub fn shared(name: impl Into<String>, width: u32, height: u32) -> TextureHandle {
        Rc::new(Self::new(name, width, height))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Native size in pixels as (width, height)
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_keeps_texture_alive() {
        let handle = Texture::shared("spark.png", 16, 8);
        let other = Rc::clone(&handle);
        drop(handle);
        assert_eq!(other.name(), "spark.png");
        assert_eq!(other.size(), (16, 8));
        assert_eq!(Rc::strong_count(&other), 1);
    }
}
