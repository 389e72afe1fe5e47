//! Behavior orchestrator - the state machine driver for one AI record.
//!
//! Per tick: advance timers, rebuild perception, consult the evaluator on the
//! record's own cadence, run the current state's tick handler, then plan
//! movement. Every state change goes through [`transition`] so exit and
//! enter hooks and the notification happen exactly once.

use hecs::{Entity, World};

use crate::components::{
    AIComponent, AIState, Asteroid, CombatState, MiningState, Physics, ScannerState, Signature, Vec3,
};
use crate::config::BehaviorConfig;
use crate::error::{BehaviorError, Result};
use crate::systems::decision::DecisionEvaluator;
use crate::systems::events::{AiEvent, EventBus};
use crate::systems::faction::ReputationTable;
use crate::systems::movement::{plan_movement, PlannerContext};
use crate::systems::perception::{
    build_perception, find_best_asteroid, find_best_target, PerceptionSnapshot, WorldView,
};
use crate::systems::scanning::{should_start_scanning, update_scanning, ScanContext};
use crate::systems::{optional, optional_mut};

/// Read-only inputs shared by every record in a batch
#[derive(Clone, Copy)]
pub struct BehaviorEnv<'a> {
    pub world: &'a World,
    pub reputation: &'a ReputationTable,
    pub evaluator: &'a dyn DecisionEvaluator,
    pub config: &'a BehaviorConfig,
}

/// Per-record state for one tick, minus the AI record itself
pub struct TickContext<'a> {
    pub world: &'a World,
    pub entity: Entity,
    /// Copy of the entity's physics at the start of the tick
    pub body: Option<Physics>,
    pub perception: &'a PerceptionSnapshot,
    pub events: &'a mut EventBus,
    pub config: &'a BehaviorConfig,
    pub dt: f32,
}

/// Per-state tick logic. May ask for a transition by returning a state.
pub type StateHandler = fn(&mut TickContext<'_>, &mut AIComponent) -> Result<Option<AIState>>;

/// State → tick handler
pub fn state_handler(state: AIState) -> StateHandler {
    match state {
        AIState::Idle => tick_idle,
        AIState::Mining => tick_mining,
        AIState::Combat => tick_combat,
        AIState::Fleeing => tick_fleeing,
        AIState::ReturningToBase => tick_returning,
        AIState::Scanning | AIState::Exploring => tick_scanning,
        // Movement cycles patrol waypoints; the rest belong to external systems
        AIState::Patrol | AIState::Salvaging | AIState::Trading | AIState::Evasion | AIState::Repairing => {
            tick_passive
        }
    }
}

/// Run one full tick for one record
pub fn update_entity(
    env: BehaviorEnv<'_>,
    events: &mut EventBus,
    entity: Entity,
    ai: &mut AIComponent,
    dt: f32,
) -> Result<()> {
    let world = env.world;
    let config = env.config;

    ai.state_timer += dt;
    ai.time_since_last_evaluation += dt;

    let body = optional::<Physics>(world, entity)?.map(|b| *b);
    if let Some(body) = &body {
        if !body.position.is_finite() || !body.velocity.is_finite() {
            return Err(BehaviorError::CorruptPhysics(entity));
        }
    }

    let perception = match &body {
        Some(body) => build_perception(
            entity,
            body.position,
            config.perception_radius,
            WorldView {
                world,
                reputation: env.reputation,
                config,
            },
        ),
        // Without a body there is nowhere to look from
        None => PerceptionSnapshot::empty(entity, Vec3::ZERO, config.perception_radius),
    };

    let mut ctx = TickContext {
        world,
        entity,
        body,
        perception: &perception,
        events,
        config,
        dt,
    };

    if ai.time_since_last_evaluation >= ai.evaluation_interval {
        ai.time_since_last_evaluation = 0.0;
        let mut next = env.evaluator.evaluate(ai, &perception);

        let settled = next == ai.current_state && matches!(next, AIState::Idle | AIState::Patrol);
        if settled && has_scanner(world, entity) && should_start_scanning(ai.personality, &mut ai.rng, config) {
            next = AIState::Scanning;
        }
        transition(&mut ctx, ai, next)?;
    }

    let handler = state_handler(ai.current_state);
    if let Some(next) = handler(&mut ctx, ai)? {
        transition(&mut ctx, ai, next)?;
    }

    if let Some(body) = body {
        let target_position = resolve_target_position(world, &perception, ai.current_target);
        let command = plan_movement(&mut PlannerContext {
            ai: &mut *ai,
            body: &body,
            perception: &perception,
            target_position,
            config,
            dt,
        });
        if let Some(mut physics) = optional_mut::<Physics>(world, entity)? {
            physics.apply_force(command.force);
            physics.apply_torque(command.torque);
        }
    }

    Ok(())
}

/// Move the record to `to`, running the exit hook of the old state and the
/// enter hook of the new one. Does nothing if the record is already there.
pub fn transition(ctx: &mut TickContext<'_>, ai: &mut AIComponent, to: AIState) -> Result<()> {
    let from = ai.current_state;
    if from == to {
        return Ok(());
    }

    exit_state(ctx, from)?;
    ai.previous_state = from;
    ai.current_state = to;
    ai.state_timer = 0.0;
    enter_state(ctx, ai, from, to)?;

    log::debug!("{:?}: {:?} -> {:?}", ctx.entity, from, to);
    ctx.events.publish(AiEvent::StateChanged {
        entity: ctx.entity,
        from,
        to,
    });
    Ok(())
}

fn exit_state(ctx: &mut TickContext<'_>, from: AIState) -> Result<()> {
    match from {
        AIState::Mining => {
            if let Some(mut mining) = optional_mut::<MiningState>(ctx.world, ctx.entity)? {
                mining.stop_mining();
            }
        }
        AIState::Combat => {
            if let Some(mut combat) = optional_mut::<CombatState>(ctx.world, ctx.entity)? {
                combat.current_target = None;
            }
        }
        _ => {}
    }
    Ok(())
}

fn enter_state(ctx: &mut TickContext<'_>, ai: &mut AIComponent, from: AIState, to: AIState) -> Result<()> {
    match to {
        AIState::Combat => acquire_target(ctx, ai)?,
        AIState::Mining => match find_best_asteroid(ctx.perception) {
            Some(asteroid) => {
                ai.current_target = Some(asteroid.entity);
                ai.current_waypoint = Some(asteroid.position);
            }
            None => {
                ai.current_target = None;
                ai.current_waypoint = None;
            }
        },
        AIState::Patrol if from == AIState::Idle => ai.current_patrol_index = 0,
        AIState::Fleeing => ai.current_target = None,
        AIState::ReturningToBase => {
            if let Some(home) = ai.home_base {
                ai.current_waypoint = Some(home);
            }
            ai.arrival_announced = false;
        }
        AIState::Scanning => {
            ai.current_target = None;
            ai.current_waypoint = None;
        }
        _ => {}
    }
    Ok(())
}

/// Pick a combat target for the record's personality and mirror it onto the
/// combat record
fn acquire_target(ctx: &mut TickContext<'_>, ai: &mut AIComponent) -> Result<()> {
    let target = find_best_target(ctx.perception, ai.personality).map(|t| t.entity);
    ai.current_target = target;
    if let Some(mut combat) = optional_mut::<CombatState>(ctx.world, ctx.entity)? {
        combat.current_target = target;
    }
    if let Some(target) = target {
        log::debug!("{:?} targeting {:?}", ctx.entity, target);
        ctx.events.publish(AiEvent::TargetAcquired {
            entity: ctx.entity,
            target,
        });
    }
    Ok(())
}

fn has_scanner(world: &World, entity: Entity) -> bool {
    world
        .entity(entity)
        .map(|e| e.has::<ScannerState>())
        .unwrap_or(false)
}

/// Where the target is right now: the snapshot first, then the registry
pub fn resolve_target_position(
    world: &World,
    perception: &PerceptionSnapshot,
    target: Option<Entity>,
) -> Option<Vec3> {
    let target = target?;
    if let Some(position) = perception.position_of(target) {
        return Some(position);
    }
    if let Ok(body) = world.get::<&Physics>(target) {
        return Some(body.position);
    }
    if let Ok(asteroid) = world.get::<&Asteroid>(target) {
        return Some(asteroid.position);
    }
    world.get::<&Signature>(target).ok().map(|s| s.position)
}

// ── State handlers ──────────────────────────────────────────────────────

fn tick_passive(_ctx: &mut TickContext<'_>, _ai: &mut AIComponent) -> Result<Option<AIState>> {
    Ok(None)
}

fn tick_idle(_ctx: &mut TickContext<'_>, ai: &mut AIComponent) -> Result<Option<AIState>> {
    if ai.state_timer >= ai.idle_timeout && !ai.patrol_waypoints.is_empty() {
        return Ok(Some(AIState::Patrol));
    }
    Ok(None)
}

fn tick_mining(ctx: &mut TickContext<'_>, ai: &mut AIComponent) -> Result<Option<AIState>> {
    let Some(body) = ctx.body else {
        return Ok(None);
    };
    let Some(target) = ai.current_target else {
        return Ok(None);
    };

    // Rock ran dry or vanished: move on to the next one in view
    let depleted = ctx
        .world
        .get::<&Asteroid>(target)
        .map(|a| a.is_depleted())
        .unwrap_or(true);
    if depleted {
        if let Some(mut mining) = optional_mut::<MiningState>(ctx.world, ctx.entity)? {
            mining.stop_mining();
        }
        let next = find_best_asteroid(ctx.perception).filter(|a| a.entity != target);
        ai.current_target = next.map(|a| a.entity);
        ai.current_waypoint = next.map(|a| a.position);
        return Ok(None);
    }

    let Some(waypoint) = ai.current_waypoint else {
        return Ok(None);
    };
    if body.position.distance(&waypoint) >= ctx.config.mining_range {
        return Ok(None);
    }
    if let Some(mut mining) = optional_mut::<MiningState>(ctx.world, ctx.entity)? {
        if !mining.is_mining {
            mining.start_mining(target, waypoint);
            log::info!("{:?} started mining {:?}", ctx.entity, target);
        }
    }
    Ok(None)
}

fn tick_combat(ctx: &mut TickContext<'_>, ai: &mut AIComponent) -> Result<Option<AIState>> {
    let target = ai.current_target.filter(|t| ctx.world.contains(*t));
    let Some(target) = target else {
        acquire_target(ctx, ai)?;
        return Ok(None);
    };
    let Some(body) = ctx.body else {
        return Ok(None);
    };
    let Some(aim_point) = resolve_target_position(ctx.world, ctx.perception, Some(target)) else {
        return Ok(None);
    };

    let distance = body.position.distance(&aim_point);
    if let Some(mut combat) = optional_mut::<CombatState>(ctx.world, ctx.entity)? {
        combat.current_target = Some(target);
        for index in 0..combat.turrets.len() {
            let turret = combat.turrets[index];
            if distance <= turret.range && turret.is_ready() {
                combat.fire_turret(index, aim_point);
            }
        }
    }
    Ok(None)
}

fn tick_fleeing(ctx: &mut TickContext<'_>, ai: &mut AIComponent) -> Result<Option<AIState>> {
    if let Some(nearest) = ctx.perception.nearest_threat() {
        if ai.current_target != Some(nearest.entity) {
            log::debug!("{:?} fleeing from {:?}", ctx.entity, nearest.entity);
            ai.current_target = Some(nearest.entity);
        }
    }
    Ok(None)
}

fn tick_returning(ctx: &mut TickContext<'_>, ai: &mut AIComponent) -> Result<Option<AIState>> {
    let (Some(body), Some(home)) = (ctx.body, ai.home_base) else {
        return Ok(None);
    };
    if !ai.arrival_announced && body.position.distance(&home) < ctx.config.home_arrival_distance {
        ai.arrival_announced = true;
        log::info!("{:?} arrived at home base", ctx.entity);
        ctx.events.publish(AiEvent::ArrivedAtBase {
            entity: ctx.entity,
            position: home,
        });
    }
    Ok(None)
}

fn tick_scanning(ctx: &mut TickContext<'_>, ai: &mut AIComponent) -> Result<Option<AIState>> {
    let Some(body) = ctx.body else {
        return Ok(None);
    };
    update_scanning(
        &mut ScanContext {
            world: ctx.world,
            entity: ctx.entity,
            body: &body,
            events: &mut *ctx.events,
            config: ctx.config,
            dt: ctx.dt,
        },
        ai,
    )
}
