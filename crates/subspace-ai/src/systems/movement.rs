//! Movement planning - turns the active state into force and torque.
//!
//! The planner only decides what to push with. Integration, collision and
//! thruster limits belong to the physics step that consumes the force.
//!
//! Orientation uses a simplified controller: the heading error becomes a
//! desired spin about the cross-product axis, capped at `max_turn_rate`, and
//! the torque corrects the current spin toward it. It is not a quaternion
//! attitude controller and overshoots slightly on large turns; that is the
//! intended flight feel.

use rand::Rng;

use crate::components::{AIComponent, AIState, CombatTactic, Physics, Vec3};
use crate::config::BehaviorConfig;
use crate::systems::perception::PerceptionSnapshot;

/// Force and torque requested for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringCommand {
    pub force: Vec3,
    pub torque: Vec3,
}

impl SteeringCommand {
    pub const NONE: Self = Self {
        force: Vec3::ZERO,
        torque: Vec3::ZERO,
    };

    pub fn new(force: Vec3, torque: Vec3) -> Self {
        Self { force, torque }
    }

    pub fn thrust(force: Vec3) -> Self {
        Self {
            force,
            torque: Vec3::ZERO,
        }
    }
}

/// Everything a movement handler may look at or touch
pub struct PlannerContext<'a> {
    pub ai: &'a mut AIComponent,
    pub body: &'a Physics,
    pub perception: &'a PerceptionSnapshot,
    /// Resolved position of `ai.current_target`, if it still exists
    pub target_position: Option<Vec3>,
    pub config: &'a BehaviorConfig,
    pub dt: f32,
}

/// Inputs for one combat maneuver
pub struct TacticContext<'a> {
    pub ai: &'a mut AIComponent,
    pub body: &'a Physics,
    pub target: Vec3,
    pub config: &'a BehaviorConfig,
    pub dt: f32,
}

pub type MovementHandler = fn(&mut PlannerContext<'_>) -> SteeringCommand;
pub type TacticHandler = fn(&mut TacticContext<'_>) -> SteeringCommand;

/// State → movement handler
pub fn movement_handler(state: AIState) -> MovementHandler {
    match state {
        AIState::Patrol => patrol,
        AIState::Combat => combat,
        AIState::Fleeing => flee,
        AIState::Evasion => evade,
        AIState::Mining | AIState::Salvaging | AIState::Trading | AIState::Exploring => approach_waypoint,
        AIState::ReturningToBase => return_to_base,
        AIState::Idle | AIState::Repairing | AIState::Scanning => hold_position,
    }
}

/// Tactic → combat maneuver
pub fn tactic_handler(tactic: CombatTactic) -> TacticHandler {
    match tactic {
        CombatTactic::Aggressive => aggressive,
        CombatTactic::Kiting => kiting,
        CombatTactic::Strafing => strafing,
        CombatTactic::Broadsiding => broadsiding,
        CombatTactic::Defensive => defensive,
    }
}

/// Plan this tick's steering for the record's current state
pub fn plan_movement(ctx: &mut PlannerContext<'_>) -> SteeringCommand {
    let handler = movement_handler(ctx.ai.current_state);
    handler(ctx)
}

// ── Primitives ──────────────────────────────────────────────────────────

/// Velocity that heads for `target`, slowing as it gets close
pub fn desired_velocity_toward(body: &Physics, target: Vec3, max_speed: f32) -> Vec3 {
    let offset = target - body.position;
    let distance = offset.length();
    offset.normalize() * max_speed.max(0.0).min(distance)
}

/// Force that corrects the current velocity toward `desired`
pub fn match_velocity(body: &Physics, desired: Vec3, config: &BehaviorConfig) -> Vec3 {
    (desired - body.velocity) * body.mass * config.steering_gain
}

/// Steer toward a point, capped by `max_speed` and the remaining distance
pub fn move_toward(body: &Physics, target: Vec3, max_speed: f32, config: &BehaviorConfig) -> Vec3 {
    match_velocity(body, desired_velocity_toward(body, target, max_speed), config)
}

/// Force bringing the ship to rest
pub fn brake(body: &Physics, config: &BehaviorConfig) -> Vec3 {
    match_velocity(body, Vec3::ZERO, config)
}

/// Torque turning the nose toward `direction`
pub fn face_direction(body: &Physics, direction: Vec3, config: &BehaviorConfig) -> Vec3 {
    let desired = direction.normalize();
    let forward = body.forward.normalize();
    if desired == Vec3::ZERO || forward == Vec3::ZERO {
        return Vec3::ZERO;
    }

    let angle = forward.dot(&desired).clamp(-1.0, 1.0).acos();
    let desired_spin = if angle <= config.facing_tolerance {
        Vec3::ZERO
    } else {
        let axis = forward.cross(&desired);
        // Pointing straight away: any axis perpendicular to the nose will do
        let axis = if axis.length() > 1e-4 {
            axis.normalize()
        } else {
            forward.any_perpendicular()
        };
        axis * (angle * config.turn_gain).min(config.max_turn_rate)
    };

    (desired_spin - body.angular_velocity) * body.mass * config.steering_gain
}

pub fn face_target(body: &Physics, target: Vec3, config: &BehaviorConfig) -> Vec3 {
    face_direction(body, target - body.position, config)
}

/// Uniformly scattered unit vector
pub fn random_direction<R: Rng>(rng: &mut R) -> Vec3 {
    let v = Vec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    )
    .normalize();
    if v == Vec3::ZERO {
        Vec3::X
    } else {
        v
    }
}

/// Point on the line of sight `range` meters short of the target
fn standoff_point(body: &Physics, target: Vec3, range: f32) -> Vec3 {
    let toward = (target - body.position).normalize();
    target - toward * range
}

// ── State handlers ──────────────────────────────────────────────────────

fn hold_position(ctx: &mut PlannerContext<'_>) -> SteeringCommand {
    if ctx.body.speed() > ctx.config.idle_drift_threshold {
        SteeringCommand::thrust(brake(ctx.body, ctx.config))
    } else {
        SteeringCommand::NONE
    }
}

fn patrol(ctx: &mut PlannerContext<'_>) -> SteeringCommand {
    let Some(mut waypoint) = ctx.ai.current_patrol_waypoint() else {
        return hold_position(ctx);
    };
    if ctx.body.position.distance(&waypoint) < ctx.config.arrival_distance {
        ctx.ai.advance_patrol();
        log::trace!("patrol advanced to waypoint {}", ctx.ai.current_patrol_index);
        waypoint = ctx.ai.current_patrol_waypoint().unwrap_or(waypoint);
    }
    SteeringCommand::new(
        move_toward(ctx.body, waypoint, ctx.config.patrol_speed, ctx.config),
        face_target(ctx.body, waypoint, ctx.config),
    )
}

fn combat(ctx: &mut PlannerContext<'_>) -> SteeringCommand {
    let Some(target) = ctx.target_position else {
        return hold_position(ctx);
    };
    let handler = tactic_handler(ctx.ai.combat_tactic);
    handler(&mut TacticContext {
        ai: &mut *ctx.ai,
        body: ctx.body,
        target,
        config: ctx.config,
        dt: ctx.dt,
    })
}

fn flee(ctx: &mut PlannerContext<'_>) -> SteeringCommand {
    let body = ctx.body;
    let speed = ctx.config.flee_speed;

    let heading = if let Some(threat) = ctx.target_position {
        let away = (body.position - threat).normalize();
        if away == Vec3::ZERO {
            -body.forward
        } else {
            away
        }
    } else if let Some(home) = ctx.ai.home_base {
        let force = move_toward(body, home, speed, ctx.config);
        return SteeringCommand::new(force, face_target(body, home, ctx.config));
    } else {
        let current = body.velocity.normalize();
        if current == Vec3::ZERO {
            body.forward
        } else {
            current
        }
    };

    SteeringCommand::new(
        match_velocity(body, heading * speed, ctx.config),
        face_direction(body, heading, ctx.config),
    )
}

/// Jink sideways relative to the nearest threat, switching sides each period
fn evade(ctx: &mut PlannerContext<'_>) -> SteeringCommand {
    let body = ctx.body;
    let Some(threat) = ctx.target_position.or_else(|| ctx.perception.nearest_threat().map(|t| t.position)) else {
        return hold_position(ctx);
    };
    let line_of_sight = threat - body.position;
    let period = ctx.config.evasive_period.max(0.1);
    let side = if ((ctx.ai.state_timer / period) as u32) % 2 == 0 { 1.0 } else { -1.0 };
    let lateral = line_of_sight.any_perpendicular() * side;
    SteeringCommand::new(
        match_velocity(body, lateral * ctx.config.combat_speed, ctx.config),
        face_target(body, threat, ctx.config),
    )
}

fn approach_waypoint(ctx: &mut PlannerContext<'_>) -> SteeringCommand {
    let Some(waypoint) = ctx.ai.current_waypoint else {
        return hold_position(ctx);
    };
    let distance = ctx.body.position.distance(&waypoint);
    let braking = ctx.config.braking_distance;
    let speed = if distance < braking && braking > 0.0 {
        ctx.config.work_speed * distance / braking
    } else {
        ctx.config.work_speed
    };
    SteeringCommand::new(
        move_toward(ctx.body, waypoint, speed, ctx.config),
        face_target(ctx.body, waypoint, ctx.config),
    )
}

fn return_to_base(ctx: &mut PlannerContext<'_>) -> SteeringCommand {
    let Some(home) = ctx.ai.home_base else {
        return hold_position(ctx);
    };
    SteeringCommand::new(
        move_toward(ctx.body, home, ctx.config.return_speed, ctx.config),
        face_target(ctx.body, home, ctx.config),
    )
}

// ── Combat tactics ──────────────────────────────────────────────────────

fn aggressive(ctx: &mut TacticContext<'_>) -> SteeringCommand {
    let body = ctx.body;
    let distance = body.position.distance(&ctx.target);
    let min = ctx.ai.min_combat_distance;
    let force = if distance > min {
        move_toward(body, ctx.target, ctx.config.combat_speed, ctx.config)
    } else {
        // Inside minimum range: back off to it
        move_toward(body, standoff_point(body, ctx.target, min), ctx.config.combat_speed, ctx.config)
    };
    SteeringCommand::new(force, face_target(body, ctx.target, ctx.config))
}

fn kiting(ctx: &mut TacticContext<'_>) -> SteeringCommand {
    let body = ctx.body;
    let distance = body.position.distance(&ctx.target);
    let ideal = ctx.ai.ideal_combat_distance();
    let ideal_point = standoff_point(body, ctx.target, ideal);
    let speed = ctx.config.combat_speed;

    let force = if distance < ideal || distance > ctx.ai.max_combat_distance {
        move_toward(body, ideal_point, speed, ctx.config)
    } else if distance > ideal {
        // Inside the band but past ideal: drift back in without hurrying
        move_toward(body, ideal_point, speed * 0.5, ctx.config)
    } else {
        brake(body, ctx.config)
    };
    SteeringCommand::new(force, face_target(body, ctx.target, ctx.config))
}

fn strafing(ctx: &mut TacticContext<'_>) -> SteeringCommand {
    let body = ctx.body;
    let ideal = ctx.ai.ideal_combat_distance();
    let radial = desired_velocity_toward(body, standoff_point(body, ctx.target, ideal), ctx.config.combat_speed);
    let tangent = (ctx.target - body.position).any_perpendicular() * ctx.config.strafe_speed;
    SteeringCommand::new(
        match_velocity(body, radial + tangent, ctx.config),
        face_target(body, ctx.target, ctx.config),
    )
}

fn broadsiding(ctx: &mut TacticContext<'_>) -> SteeringCommand {
    let body = ctx.body;
    let line_of_sight = ctx.target - body.position;
    let distance = line_of_sight.length();
    let range = ctx.ai.min_combat_distance + ctx.config.broadside_offset;

    let force = if (distance - range).abs() > ctx.config.broadside_tolerance {
        move_toward(body, standoff_point(body, ctx.target, range), ctx.config.combat_speed, ctx.config)
    } else {
        brake(body, ctx.config)
    };
    // Present the flank, not the nose
    SteeringCommand::new(
        force,
        face_direction(body, line_of_sight.any_perpendicular(), ctx.config),
    )
}

fn defensive(ctx: &mut TacticContext<'_>) -> SteeringCommand {
    let body = ctx.body;
    let hold = standoff_point(body, ctx.target, ctx.ai.max_combat_distance);
    let mut force = move_toward(body, hold, ctx.config.combat_speed, ctx.config);

    ctx.ai.maneuver_timer -= ctx.dt;
    if ctx.ai.maneuver_timer <= 0.0 {
        ctx.ai.maneuver_timer = ctx.config.evasive_period;
        let burst = random_direction(&mut ctx.ai.rng);
        force += burst * (ctx.config.evasive_strength * body.mass);
    }

    SteeringCommand::new(force, face_target(body, ctx.target, ctx.config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::AIPersonality;
    use hecs::World;

    fn config() -> BehaviorConfig {
        BehaviorConfig::default()
    }

    fn ai_with(tactic: CombatTactic) -> AIComponent {
        let mut ai = AIComponent::new(AIPersonality::Balanced, 11)
            .with_tactic(tactic)
            .with_combat_band(300.0, 800.0);
        ai.current_state = AIState::Combat;
        ai
    }

    fn run_tactic(ai: &mut AIComponent, body: &Physics, target: Vec3) -> SteeringCommand {
        let config = config();
        let handler = tactic_handler(ai.combat_tactic);
        handler(&mut TacticContext {
            ai,
            body,
            target,
            config: &config,
            dt: 0.1,
        })
    }

    fn run_state(ai: &mut AIComponent, body: &Physics, target_position: Option<Vec3>) -> SteeringCommand {
        let mut world = World::new();
        let me = world.spawn(());
        let snapshot = PerceptionSnapshot::empty(me, body.position, 2000.0);
        let config = config();
        plan_movement(&mut PlannerContext {
            ai,
            body,
            perception: &snapshot,
            target_position,
            config: &config,
            dt: 0.1,
        })
    }

    /// Component of the force along the line toward the target
    fn closing(cmd: &SteeringCommand, body: &Physics, target: Vec3) -> f32 {
        cmd.force.dot(&(target - body.position).normalize())
    }

    #[test]
    fn test_move_toward_caps_speed_by_distance() {
        let config = config();
        let body = Physics::at(Vec3::ZERO).with_mass(10.0);
        let desired = desired_velocity_toward(&body, Vec3::new(50.0, 0.0, 0.0), 300.0);
        assert!((desired.x - 50.0).abs() < 1e-4);

        let force = move_toward(&body, Vec3::new(1000.0, 0.0, 0.0), 300.0, &config);
        // (300 - 0) * mass 10 * gain 2
        assert!((force.x - 6000.0).abs() < 1e-2);
        assert!(force.y.abs() < 1e-4);
    }

    #[test]
    fn test_brake_opposes_velocity() {
        let body = Physics::at(Vec3::ZERO).with_velocity(Vec3::new(0.0, 40.0, 0.0));
        let force = brake(&body, &config());
        assert!(force.y < 0.0);
    }

    #[test]
    fn test_face_direction_turns_toward_goal() {
        let config = config();
        let body = Physics::at(Vec3::ZERO).with_forward(Vec3::X);
        let torque = face_direction(&body, Vec3::Y, &config);
        // Turning from +X to +Y spins about +Z
        assert!(torque.z > 0.0);
        assert!(torque.x.abs() < 1e-3 && torque.y.abs() < 1e-3);

        // Already aligned and not spinning: no torque
        let aligned = face_direction(&body, Vec3::X, &config);
        assert_eq!(aligned, Vec3::ZERO);

        // Straight behind still produces a turn
        let behind = face_direction(&body, -Vec3::X, &config);
        assert!(behind.length() > 0.0);
    }

    #[test]
    fn test_face_direction_caps_spin() {
        let config = config();
        let body = Physics::at(Vec3::ZERO).with_mass(1.0).with_forward(Vec3::X);
        let torque = face_direction(&body, -Vec3::Y, &config);
        let expected = config.max_turn_rate * config.steering_gain;
        assert!((torque.length() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_kiting_closes_when_far_and_withdraws_when_near() {
        let target = Vec3::ZERO;
        let mut ai = ai_with(CombatTactic::Kiting);
        let ideal = ai.ideal_combat_distance();

        for distance in [ideal + 50.0, 900.0, 1500.0] {
            let body = Physics::at(Vec3::new(distance, 0.0, 0.0));
            let cmd = run_tactic(&mut ai, &body, target);
            assert!(closing(&cmd, &body, target) > 0.0, "should close at {distance}");
        }

        for distance in [ideal - 50.0, 300.0, 100.0] {
            let body = Physics::at(Vec3::new(0.0, distance, 0.0));
            let cmd = run_tactic(&mut ai, &body, target);
            assert!(closing(&cmd, &body, target) < 0.0, "should withdraw at {distance}");
        }
    }

    #[test]
    fn test_aggressive_closes_then_backs_off() {
        let target = Vec3::ZERO;
        let mut ai = ai_with(CombatTactic::Aggressive);

        let far = Physics::at(Vec3::new(1200.0, 0.0, 0.0));
        assert!(closing(&run_tactic(&mut ai, &far, target), &far, target) > 0.0);

        let near = Physics::at(Vec3::new(100.0, 0.0, 0.0));
        assert!(closing(&run_tactic(&mut ai, &near, target), &near, target) < 0.0);
    }

    #[test]
    fn test_strafing_adds_tangential_thrust() {
        let target = Vec3::ZERO;
        let mut ai = ai_with(CombatTactic::Strafing);
        let ideal = ai.ideal_combat_distance();
        let body = Physics::at(Vec3::new(ideal, 0.0, 0.0));

        let cmd = run_tactic(&mut ai, &body, target);
        let radial = closing(&cmd, &body, target);
        let tangential = cmd.force.dot(&(target - body.position).any_perpendicular());
        assert!(radial.abs() < 1e-2, "already at ideal range");
        assert!(tangential > 0.0);
    }

    #[test]
    fn test_broadside_presents_flank() {
        let config = config();
        let target = Vec3::ZERO;
        let mut ai = ai_with(CombatTactic::Broadsiding);
        let range = ai.min_combat_distance + config.broadside_offset;

        // Nose pointed at the target: torque must turn it away
        let body = Physics::at(Vec3::new(range, 0.0, 0.0)).with_forward(-Vec3::X);
        let cmd = run_tactic(&mut ai, &body, target);
        assert!(cmd.torque.length() > 0.0);
        assert_eq!(cmd.force, Vec3::ZERO);

        // Too far out of the band: close in
        let far = Physics::at(Vec3::new(range + 200.0, 0.0, 0.0));
        assert!(closing(&run_tactic(&mut ai, &far, target), &far, target) > 0.0);

        // Too close: open up
        let near = Physics::at(Vec3::new(range - 200.0, 0.0, 0.0));
        assert!(closing(&run_tactic(&mut ai, &near, target), &near, target) < 0.0);
    }

    #[test]
    fn test_defensive_bursts_periodically() {
        let config = config();
        let target = Vec3::ZERO;
        let mut ai = ai_with(CombatTactic::Defensive);
        let body = Physics::at(Vec3::new(ai.max_combat_distance, 0.0, 0.0));

        // First tick fires a burst and arms the timer
        let first = run_tactic(&mut ai, &body, target);
        assert!(first.force.length() > 0.0);
        assert!((ai.maneuver_timer - config.evasive_period).abs() < 1e-4);

        // Holding at max range between bursts needs no thrust
        let quiet = run_tactic(&mut ai, &body, target);
        assert!(quiet.force.length() < 1e-2);
    }

    #[test]
    fn test_defensive_bursts_are_reproducible() {
        let target = Vec3::ZERO;
        let body = Physics::at(Vec3::new(800.0, 0.0, 0.0));
        let mut a = ai_with(CombatTactic::Defensive);
        let mut b = ai_with(CombatTactic::Defensive);
        assert_eq!(run_tactic(&mut a, &body, target), run_tactic(&mut b, &body, target));
    }

    #[test]
    fn test_patrol_advances_on_arrival() {
        let mut ai = AIComponent::new(AIPersonality::Balanced, 1).with_patrol(vec![
            Vec3::new(50.0, 0.0, 0.0),
            Vec3::new(1000.0, 0.0, 0.0),
        ]);
        ai.current_state = AIState::Patrol;
        let body = Physics::at(Vec3::ZERO);

        let cmd = run_state(&mut ai, &body, None);
        assert_eq!(ai.current_patrol_index, 1);
        assert!(cmd.force.x > 0.0);

        // Arriving at the last waypoint wraps to the first
        let at_last = Physics::at(Vec3::new(980.0, 0.0, 0.0));
        run_state(&mut ai, &at_last, None);
        assert_eq!(ai.current_patrol_index, 0);
    }

    #[test]
    fn test_flee_runs_from_target() {
        let mut ai = AIComponent::new(AIPersonality::Coward, 1);
        ai.current_state = AIState::Fleeing;
        let body = Physics::at(Vec3::ZERO);
        let threat = Vec3::new(300.0, 0.0, 0.0);
        let cmd = run_state(&mut ai, &body, Some(threat));
        assert!(cmd.force.x < 0.0);

        // Full flee speed: (500 - 0) * mass * gain
        let config = config();
        let expected = config.flee_speed * body.mass * config.steering_gain;
        assert!((cmd.force.length() - expected).abs() < 1.0);
    }

    #[test]
    fn test_flee_without_target_goes_home_or_keeps_heading() {
        let mut ai = AIComponent::new(AIPersonality::Coward, 1).with_home_base(Vec3::new(0.0, -5000.0, 0.0));
        ai.current_state = AIState::Fleeing;
        let body = Physics::at(Vec3::ZERO);
        assert!(run_state(&mut ai, &body, None).force.y < 0.0);

        ai.home_base = None;
        let moving = Physics::at(Vec3::ZERO).with_velocity(Vec3::new(0.0, 0.0, 100.0));
        assert!(run_state(&mut ai, &moving, None).force.z > 0.0);
    }

    #[test]
    fn test_work_states_brake_near_waypoint() {
        let config = config();
        let mut ai = AIComponent::new(AIPersonality::Miner, 1);
        ai.current_state = AIState::Mining;
        ai.current_waypoint = Some(Vec3::new(1000.0, 0.0, 0.0));

        let far = Physics::at(Vec3::ZERO);
        let cruise = run_state(&mut ai, &far, None);
        let expected = config.work_speed * far.mass * config.steering_gain;
        assert!((cruise.force.x - expected).abs() < 1.0);

        // 100 units out: desired speed 250 * 100/200 = 125, still moving inward
        let near = Physics::at(Vec3::new(900.0, 0.0, 0.0)).with_velocity(Vec3::new(250.0, 0.0, 0.0));
        let slowing = run_state(&mut ai, &near, None);
        assert!(slowing.force.x < 0.0);
    }

    #[test]
    fn test_idle_brakes_only_when_drifting() {
        let mut ai = AIComponent::new(AIPersonality::Balanced, 1);
        let still = Physics::at(Vec3::ZERO).with_velocity(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(run_state(&mut ai, &still, None), SteeringCommand::NONE);

        let drifting = Physics::at(Vec3::ZERO).with_velocity(Vec3::new(30.0, 0.0, 0.0));
        assert!(run_state(&mut ai, &drifting, None).force.x < 0.0);
    }

    #[test]
    fn test_return_to_base() {
        let mut ai = AIComponent::new(AIPersonality::Miner, 1).with_home_base(Vec3::new(-2000.0, 0.0, 0.0));
        ai.current_state = AIState::ReturningToBase;
        let body = Physics::at(Vec3::ZERO);
        let cmd = run_state(&mut ai, &body, None);
        let config = config();
        assert!((cmd.force.x + config.return_speed * body.mass * config.steering_gain).abs() < 1.0);
    }

    #[test]
    fn test_combat_without_target_holds() {
        let mut ai = ai_with(CombatTactic::Aggressive);
        let body = Physics::at(Vec3::ZERO);
        assert_eq!(run_state(&mut ai, &body, None), SteeringCommand::NONE);
    }

    #[test]
    fn test_evasion_moves_sideways() {
        let mut ai = AIComponent::new(AIPersonality::Balanced, 1);
        ai.current_state = AIState::Evasion;
        let body = Physics::at(Vec3::ZERO);
        let threat = Vec3::new(500.0, 0.0, 0.0);
        let cmd = run_state(&mut ai, &body, Some(threat));
        assert!(closing(&cmd, &body, threat).abs() < 1e-2);
        assert!(cmd.force.length() > 0.0);
    }
}
