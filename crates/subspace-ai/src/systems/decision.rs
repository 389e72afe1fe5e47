//! Decision evaluation - picks the state an AI wants to be in.
//!
//! The orchestrator treats the evaluator's answer as authoritative. An
//! evaluator must be a pure function of the AI record and the snapshot; any
//! randomness belongs to the orchestrator's per-record source, not here.

use crate::components::{AIComponent, AIPersonality, AIState, TargetPriority};
use crate::systems::perception::{find_best_asteroid, PerceptionSnapshot};

/// Chooses the next state for one AI record
pub trait DecisionEvaluator: Send + Sync {
    fn evaluate(&self, ai: &AIComponent, perception: &PerceptionSnapshot) -> AIState;
}

/// Default personality-driven heuristic.
///
/// Priorities, highest first: threats (fight or flee), a hull too damaged to
/// keep working, a full hold, finishing a repair, mining work. Otherwise the
/// current state stands. It never moves Idle to Patrol; the idle timer does.
/// A ship that reaches home with a full hold stays in ReturningToBase until
/// something external unloads it.
#[derive(Debug, Clone)]
pub struct PersonalityEvaluator {
    /// Hull fraction below which even fighters disengage
    pub retreat_hull: f32,
    /// Hull fraction below which a ship with a home base goes to repair
    pub repair_hull: f32,
    /// Distance to home base counted as docked
    pub dock_distance: f32,
}

impl Default for PersonalityEvaluator {
    fn default() -> Self {
        Self {
            retreat_hull: 0.25,
            repair_hull: 0.5,
            dock_distance: 100.0,
        }
    }
}

impl PersonalityEvaluator {
    fn respond_to_threats(&self, ai: &AIComponent, perception: &PerceptionSnapshot) -> Option<AIState> {
        let top = perception.threats.first()?;
        let hull = perception.self_status.hull_fraction;

        if ai.personality == AIPersonality::Coward || hull < self.retreat_hull {
            return Some(AIState::Fleeing);
        }
        if ai.personality.fights_at(top.priority) {
            return Some(AIState::Combat);
        }
        // Civilians run from anything that is actually dangerous
        if top.priority >= TargetPriority::High {
            return Some(AIState::Fleeing);
        }
        None
    }

    fn at_home(&self, ai: &AIComponent, perception: &PerceptionSnapshot) -> bool {
        ai.home_base
            .map(|home| home.distance(&perception.self_status.position) < self.dock_distance)
            .unwrap_or(false)
    }
}

impl DecisionEvaluator for PersonalityEvaluator {
    fn evaluate(&self, ai: &AIComponent, perception: &PerceptionSnapshot) -> AIState {
        let current = ai.current_state;
        let status = &perception.self_status;

        if let Some(state) = self.respond_to_threats(ai, perception) {
            return state;
        }

        // Nothing left to fight or run from
        if current.is_engagement() && !perception.has_threats() {
            return if ai.home_base.is_some() && status.hull_fraction < self.repair_hull {
                AIState::ReturningToBase
            } else {
                AIState::Idle
            };
        }

        match current {
            AIState::ReturningToBase if self.at_home(ai, perception) => {
                return if status.hull_fraction < 1.0 {
                    AIState::Repairing
                } else if status.cargo_fraction >= ai.cargo_return_threshold {
                    // Docked until the hold is unloaded
                    AIState::ReturningToBase
                } else {
                    AIState::Idle
                };
            }
            AIState::ReturningToBase => return AIState::ReturningToBase,
            AIState::Repairing => {
                return if status.hull_fraction >= 1.0 {
                    AIState::Idle
                } else {
                    AIState::Repairing
                };
            }
            _ => {}
        }

        if ai.home_base.is_some()
            && (status.cargo_fraction >= ai.cargo_return_threshold
                || status.hull_fraction < self.repair_hull)
        {
            return AIState::ReturningToBase;
        }

        if ai.can_mine && matches!(current, AIState::Idle | AIState::Patrol | AIState::Mining) {
            return if find_best_asteroid(perception).is_some() {
                AIState::Mining
            } else if current == AIState::Mining {
                AIState::Idle
            } else {
                current
            };
        }

        current
    }
}
