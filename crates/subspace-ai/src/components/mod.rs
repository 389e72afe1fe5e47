//! Component definitions for the ECS world.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod ai;
mod common;
mod ship;
mod space;

pub use ai::*;
pub use common::*;
pub use ship::*;
pub use space::*;
