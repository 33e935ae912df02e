//! Ember Core - Foundational types for the Ember particle engine
//!
//! This crate provides the types that the other Ember crates share:
//! - `Vec2`, `Angle`, `Color`, `IntRect` - 2D value types
//! - `Texture` / `TextureHandle` - shared texture references
//! - Error types and Result alias

mod error;
mod texture;
mod types;

pub use error::{EmberError, Result};
pub use texture::{Texture, TextureHandle};
pub use types::{Angle, Color, IntRect, Vec2};
