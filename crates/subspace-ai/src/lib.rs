//! Subspace AI - NPC behavior engine for a space sandbox
//!
//! Drives autonomous ships through a twelve-state machine: idling, patrols,
//! mining, combat with per-personality tactics, fleeing, returning home for
//! repairs, and probe-based exploration of wormhole signatures.
//!
//! # Architecture
//!
//! The engine runs over an Entity Component System (ECS) via `hecs`:
//! - **Entities**: ships, asteroids, scan signatures
//! - **Components**: pure data (`Physics`, `CombatState`, `AIComponent`, ...)
//! - **Systems**: perception, decision, orchestration, movement, scanning
//!
//! Each tick flows one way: perception builds a snapshot, the evaluator picks
//! a state, the orchestrator applies transitions and per-state logic, and the
//! movement planner pushes force and torque onto `Physics`. Integrating that
//! force is left to whatever physics step the host runs.
//!
//! # Example
//!
//! ```rust,no_run
//! use subspace_ai::prelude::*;
//!
//! let mut engine = BehaviorEngine::new();
//! let ship = engine.world.spawn((Physics::at(Vec3::ZERO), Faction::new("Miners Guild")));
//! engine.add_ai(ship, AIPersonality::Miner).unwrap();
//!
//! loop {
//!     engine.update(1.0 / 60.0);
//!     for event in engine.drain_events() {
//!         println!("{}", event.name());
//!     }
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::BehaviorConfig;
    pub use crate::engine::BehaviorEngine;
    pub use crate::error::{BehaviorError, Result};
    pub use crate::systems::{AiEvent, DecisionEvaluator, PersonalityEvaluator, ReputationTable};
}
