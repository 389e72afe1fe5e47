//! Error types for the behavior engine's public surface.
//!
//! Nothing in the per-tick path raises these to the caller: `update` turns
//! every per-entity failure into a log line and moves on.

use hecs::Entity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("entity {0:?} does not exist")]
    NoSuchEntity(Entity),

    #[error("entity {0:?} has no AI record")]
    MissingAi(Entity),

    #[error("component access failed for {entity:?}: {source}")]
    Component {
        entity: Entity,
        #[source]
        source: hecs::ComponentError,
    },

    #[error("entity {0:?} has a non-finite position or velocity")]
    CorruptPhysics(Entity),

    #[error("invalid behavior config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("waypoint is not a finite position")]
    InvalidWaypoint,
}

impl BehaviorError {
    /// Wrap a hecs component error with the entity it concerned
    pub fn component(entity: Entity, source: hecs::ComponentError) -> Self {
        match source {
            hecs::ComponentError::NoSuchEntity => BehaviorError::NoSuchEntity(entity),
            other => BehaviorError::Component {
                entity,
                source: other,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, BehaviorError>;
