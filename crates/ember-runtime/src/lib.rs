//! Ember Runtime - Frame loop building blocks
//!
//! - `GameClock` for per-frame delta tracking
//! - `RuntimeSystem`, the trait for systems ticked by the host loop

mod clock;
mod system;

pub use clock::GameClock;
pub use system::RuntimeSystem;
