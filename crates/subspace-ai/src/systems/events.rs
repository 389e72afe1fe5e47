//! Notification bus - behavior events published for other systems.
//!
//! The engine never acts on these itself. Docking, jump drives, UI and
//! telemetry drain the queue once per frame.

use hecs::Entity;

use crate::components::{AIState, Vec3};

/// Something an AI did that the rest of the game may care about
#[derive(Debug, Clone, PartialEq)]
pub enum AiEvent {
    StateChanged {
        entity: Entity,
        from: AIState,
        to: AIState,
    },
    TargetAcquired {
        entity: Entity,
        target: Entity,
    },
    /// Within docking range of home base
    ArrivedAtBase {
        entity: Entity,
        position: Vec3,
    },
    WormholeDetected {
        entity: Entity,
        signature: Entity,
        class: u8,
    },
    /// Wormhole fully resolved and logged as a discovery
    WormholeDiscovered {
        entity: Entity,
        signature: Entity,
        class: u8,
    },
    WormholeEntryDecision {
        entity: Entity,
        signature: Entity,
        class: u8,
        enter: bool,
    },
}

impl AiEvent {
    /// Stable event name for subscribers keyed by string
    pub fn name(&self) -> &'static str {
        match self {
            AiEvent::StateChanged { .. } => "AIStateChanged",
            AiEvent::TargetAcquired { .. } => "AITargetAcquired",
            AiEvent::ArrivedAtBase { .. } => "AIArrivedAtBase",
            AiEvent::WormholeDetected { .. } => "AIWormholeDetected",
            AiEvent::WormholeDiscovered { .. } => "AIWormholeDiscovered",
            AiEvent::WormholeEntryDecision { .. } => "AIWormholeEntryDecision",
        }
    }

    /// The AI entity the event is about
    pub fn entity(&self) -> Entity {
        match self {
            AiEvent::StateChanged { entity, .. }
            | AiEvent::TargetAcquired { entity, .. }
            | AiEvent::ArrivedAtBase { entity, .. }
            | AiEvent::WormholeDetected { entity, .. }
            | AiEvent::WormholeDiscovered { entity, .. }
            | AiEvent::WormholeEntryDecision { entity, .. } => *entity,
        }
    }
}

/// FIFO queue of published events
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<AiEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, event: AiEvent) {
        log::trace!("event {} for {:?}", event.name(), event.entity());
        self.events.push(event);
    }

    /// Take every pending event in publish order
    pub fn drain(&mut self) -> Vec<AiEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending(&self) -> &[AiEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
