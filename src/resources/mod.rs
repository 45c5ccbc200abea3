//! Resource management
//!
//! Materials the room's surfaces are shaded with.

mod material;

pub use material::*;
