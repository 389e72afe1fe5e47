//! Behavior engine - main entry point for driving NPC behavior

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use hecs::{ComponentError, Entity, Ref, RefMut, World};

use crate::components::{AIComponent, AIPersonality, AIState, Vec3};
use crate::config::BehaviorConfig;
use crate::error::{BehaviorError, Result};
use crate::systems::*;

/// Owns the registry and runs every enabled AI record once per tick
pub struct BehaviorEngine {
    /// ECS world holding AI records and the components they read
    pub world: World,
    /// Faction standings used for hostility checks
    pub reputation: ReputationTable,
    /// Notifications waiting for external systems
    pub events: EventBus,
    pub config: BehaviorConfig,
    evaluator: Box<dyn DecisionEvaluator>,
    /// Faults per entity since the last shutdown
    faults: HashMap<Entity, u32>,
    initialized: bool,
}

impl BehaviorEngine {
    pub fn new() -> Self {
        Self::with_config(BehaviorConfig::default())
    }

    pub fn with_config(config: BehaviorConfig) -> Self {
        Self {
            world: World::new(),
            reputation: ReputationTable::new(),
            events: EventBus::new(),
            config,
            evaluator: Box::new(PersonalityEvaluator::default()),
            faults: HashMap::new(),
            initialized: false,
        }
    }

    /// Replace the decision evaluator
    pub fn with_evaluator(mut self, evaluator: impl DecisionEvaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        log::info!(
            "behavior engine initialized with {} AI records",
            self.world.query::<&AIComponent>().iter().count()
        );
    }

    /// Forget fault history and pending notifications
    pub fn shutdown(&mut self) {
        self.faults.clear();
        self.events.clear();
        self.initialized = false;
        log::info!("behavior engine shut down");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Attach an AI record to an existing entity, replacing any previous one
    pub fn add_ai(&mut self, entity: Entity, personality: AIPersonality) -> Result<()> {
        if !self.world.contains(entity) {
            return Err(BehaviorError::NoSuchEntity(entity));
        }
        let seed = self.config.seed ^ entity.to_bits().get();
        self.world
            .insert_one(entity, AIComponent::new(personality, seed))
            .map_err(|_| BehaviorError::NoSuchEntity(entity))?;
        log::info!("{:?} is now autonomous ({:?})", entity, personality);
        Ok(())
    }

    /// Detach and return the AI record
    pub fn remove_ai(&mut self, entity: Entity) -> Result<AIComponent> {
        let ai = self
            .world
            .remove_one::<AIComponent>(entity)
            .map_err(|err| match err {
                ComponentError::MissingComponent(_) => BehaviorError::MissingAi(entity),
                other => BehaviorError::component(entity, other),
            })?;
        self.faults.remove(&entity);
        Ok(ai)
    }

    pub fn ai(&self, entity: Entity) -> Option<Ref<'_, AIComponent>> {
        self.world.get::<&AIComponent>(entity).ok()
    }

    pub fn state_of(&self, entity: Entity) -> Option<AIState> {
        self.ai(entity).map(|ai| ai.current_state)
    }

    /// Replace the patrol route and restart it from the first waypoint
    pub fn set_patrol_waypoints(&mut self, entity: Entity, waypoints: Vec<Vec3>) -> Result<()> {
        if !waypoints.iter().all(Vec3::is_finite) {
            return Err(BehaviorError::InvalidWaypoint);
        }
        let mut ai = self.record_mut(entity)?;
        ai.patrol_waypoints = waypoints;
        ai.current_patrol_index = 0;
        Ok(())
    }

    pub fn set_home_base(&mut self, entity: Entity, home: Vec3) -> Result<()> {
        if !home.is_finite() {
            return Err(BehaviorError::InvalidWaypoint);
        }
        self.record_mut(entity)?.home_base = Some(home);
        Ok(())
    }

    pub fn set_enabled(&mut self, entity: Entity, enabled: bool) -> Result<()> {
        self.record_mut(entity)?.enabled = enabled;
        Ok(())
    }

    fn record_mut(&self, entity: Entity) -> Result<RefMut<'_, AIComponent>> {
        self.world.get::<&mut AIComponent>(entity).map_err(|err| match err {
            ComponentError::MissingComponent(_) => BehaviorError::MissingAi(entity),
            other => BehaviorError::component(entity, other),
        })
    }

    /// Advance every enabled AI record by `delta_seconds`.
    ///
    /// Records are processed one after another. A record that faults, by
    /// error or by panic, keeps its state from before this tick; the fault is
    /// logged and counted and the batch carries on.
    pub fn update(&mut self, delta_seconds: f32) {
        if !self.initialized {
            self.initialize();
        }

        let entities: Vec<Entity> = self
            .world
            .query::<&AIComponent>()
            .iter()
            .filter(|(_, ai)| ai.enabled)
            .map(|(entity, _)| entity)
            .collect();

        let env = BehaviorEnv {
            world: &self.world,
            reputation: &self.reputation,
            evaluator: self.evaluator.as_ref(),
            config: &self.config,
        };

        for entity in entities {
            // Work on a copy; only a clean tick is written back
            let Some(mut ai) = self.world.get::<&AIComponent>(entity).ok().map(|ai| (*ai).clone()) else {
                continue;
            };

            let events = &mut self.events;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                update_entity(env, events, entity, &mut ai, delta_seconds)
            }));

            match outcome {
                Ok(Ok(())) => {
                    if let Ok(mut record) = self.world.get::<&mut AIComponent>(entity) {
                        *record = ai;
                    }
                }
                Ok(Err(err)) => {
                    log::error!("AI update failed for {:?}: {}", entity, err);
                    *self.faults.entry(entity).or_insert(0) += 1;
                }
                Err(payload) => {
                    log::error!("AI update panicked for {:?}: {}", entity, panic_message(&*payload));
                    *self.faults.entry(entity).or_insert(0) += 1;
                }
            }
        }
    }

    pub fn fault_count(&self, entity: Entity) -> u32 {
        self.faults.get(&entity).copied().unwrap_or(0)
    }

    pub fn total_faults(&self) -> u32 {
        self.faults.values().sum()
    }

    /// Number of records in each state, in declaration order
    pub fn state_counts(&self) -> Vec<(AIState, usize)> {
        let mut counts: Vec<(AIState, usize)> = AIState::ALL.iter().map(|s| (*s, 0)).collect();
        for (_, ai) in self.world.query::<&AIComponent>().iter() {
            if let Some(slot) = counts.iter_mut().find(|(s, _)| *s == ai.current_state) {
                slot.1 += 1;
            }
        }
        counts
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<AiEvent> {
        self.events.drain()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

impl Default for BehaviorEngine {
    fn default() -> Self {
        Self::new()
    }
}
