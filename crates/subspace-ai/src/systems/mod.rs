//! Systems - per-tick logic over the component data.

mod behavior;
mod decision;
mod events;
mod faction;
mod movement;
mod perception;
mod scanning;

pub use behavior::*;
pub use decision::*;
pub use events::*;
pub use faction::*;
pub use movement::*;
pub use perception::*;
pub use scanning::*;

use hecs::{Component, ComponentError, Entity, Ref, RefMut, World};

use crate::error::{BehaviorError, Result};

/// Shared access to a collaborator component the entity may not carry.
/// Only a missing entity is an error.
pub(crate) fn optional<T: Component>(world: &World, entity: Entity) -> Result<Option<Ref<'_, T>>> {
    match world.get::<&T>(entity) {
        Ok(component) => Ok(Some(component)),
        Err(ComponentError::MissingComponent(_)) => Ok(None),
        Err(err) => Err(BehaviorError::component(entity, err)),
    }
}

/// Mutable counterpart of [`optional`]
pub(crate) fn optional_mut<T: Component>(world: &World, entity: Entity) -> Result<Option<RefMut<'_, T>>> {
    match world.get::<&mut T>(entity) {
        Ok(component) => Ok(Some(component)),
        Err(ComponentError::MissingComponent(_)) => Ok(None),
        Err(err) => Err(BehaviorError::component(entity, err)),
    }
}
