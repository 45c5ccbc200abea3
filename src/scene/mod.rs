//! Scene composition

pub mod binding;
mod declaration;
mod room;
mod transform;

pub use declaration::*;
pub use room::*;
pub use transform::*;
