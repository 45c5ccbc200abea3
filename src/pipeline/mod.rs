//! Render pipeline stages the room scene declares
//!
//! The scene never renders itself; it hands these stage descriptions to the
//! host renderer together with its surfaces.

pub mod postprocess;
