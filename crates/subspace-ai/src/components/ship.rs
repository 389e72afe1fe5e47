//! Ship components owned by other subsystems (physics, combat, structure,
//! factions, mining). The behavior engine reads them and issues commands
//! through the small helpers here; it never integrates or resolves damage.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::common::Vec3;

/// Rigid-body state plus the force/torque accumulated for this frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Physics {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Unit vector the nose points along
    pub forward: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    /// Force accumulated since the physics step last consumed it
    pub force: Vec3,
    pub torque: Vec3,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            forward: Vec3::X,
            angular_velocity: Vec3::ZERO,
            mass: 1000.0,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }
}

impl Physics {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_forward(mut self, forward: Vec3) -> Self {
        let f = forward.normalize();
        if f != Vec3::ZERO {
            self.forward = f;
        }
        self
    }

    pub fn apply_force(&mut self, force: Vec3) {
        if force.is_finite() {
            self.force += force;
        }
    }

    pub fn apply_torque(&mut self, torque: Vec3) {
        if torque.is_finite() {
            self.torque += torque;
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// A single weapon mount
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Turret {
    pub range: f32,
    /// Seconds between shots
    pub cooldown: f32,
    /// Seconds until the turret can fire again (ticked by the combat system)
    pub cooldown_remaining: f32,
}

impl Turret {
    pub fn new(range: f32, cooldown: f32) -> Self {
        Self {
            range,
            cooldown,
            cooldown_remaining: 0.0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }
}

/// Request for the combat system to fire a turret this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireOrder {
    pub turret: usize,
    pub target: Option<Entity>,
    pub aim_point: Vec3,
}

/// Shields, weapons and targeting for an armed entity
#[derive(Debug, Clone, Default)]
pub struct CombatState {
    pub shields: f32,
    pub max_shields: f32,
    pub turrets: Vec<Turret>,
    pub current_target: Option<Entity>,
    /// Orders issued since the combat system last drained them
    pub fire_orders: Vec<FireOrder>,
}

impl CombatState {
    pub fn new(max_shields: f32) -> Self {
        Self {
            shields: max_shields,
            max_shields,
            ..Default::default()
        }
    }

    pub fn with_turret(mut self, turret: Turret) -> Self {
        self.turrets.push(turret);
        self
    }

    /// Shield charge in [0, 1]
    pub fn shield_fraction(&self) -> f32 {
        if self.max_shields > 0.0 {
            (self.shields / self.max_shields).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Queue a shot from turret `index` and start its cooldown.
    /// Returns false if the turret does not exist or is still cooling down.
    pub fn fire_turret(&mut self, index: usize, aim_point: Vec3) -> bool {
        let target = self.current_target;
        let Some(turret) = self.turrets.get_mut(index) else {
            return false;
        };
        if !turret.is_ready() {
            return false;
        }
        turret.cooldown_remaining = turret.cooldown;
        self.fire_orders.push(FireOrder {
            turret: index,
            target,
            aim_point,
        });
        true
    }

    pub fn drain_fire_orders(&mut self) -> Vec<FireOrder> {
        std::mem::take(&mut self.fire_orders)
    }
}

/// One structural voxel block
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HullBlock {
    pub durability: f32,
    pub max_durability: f32,
}

impl HullBlock {
    pub fn new(max_durability: f32) -> Self {
        Self {
            durability: max_durability,
            max_durability,
        }
    }
}

/// Structural blocks making up a hull
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Structure {
    pub blocks: Vec<HullBlock>,
}

impl Structure {
    pub fn uniform(count: usize, max_durability: f32) -> Self {
        Self {
            blocks: vec![HullBlock::new(max_durability); count],
        }
    }

    /// Remaining durability over max durability across all blocks.
    /// A hull with no measurable blocks counts as undamaged.
    pub fn hull_fraction(&self) -> f32 {
        let (current, max) = self
            .blocks
            .iter()
            .fold((0.0f32, 0.0f32), |(c, m), b| (c + b.durability.max(0.0), m + b.max_durability));
        if max > 0.0 {
            (current / max).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Faction membership
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Faction {
    pub name: String,
}

impl Faction {
    /// The faction nobody treats as hostile by default
    pub const NEUTRAL: &'static str = "Neutral";

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn is_neutral(&self) -> bool {
        self.name == Self::NEUTRAL
    }
}

/// Mining laser and cargo hold
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MiningState {
    pub is_mining: bool,
    #[serde(skip)]
    pub target: Option<Entity>,
    pub target_position: Option<Vec3>,
    pub cargo: f32,
    pub cargo_capacity: f32,
}

impl Default for MiningState {
    fn default() -> Self {
        Self {
            is_mining: false,
            target: None,
            target_position: None,
            cargo: 0.0,
            cargo_capacity: 1000.0,
        }
    }
}

impl MiningState {
    pub fn new(cargo_capacity: f32) -> Self {
        Self {
            cargo_capacity,
            ..Default::default()
        }
    }

    /// Lock the mining laser onto an asteroid
    pub fn start_mining(&mut self, asteroid: Entity, position: Vec3) {
        self.is_mining = true;
        self.target = Some(asteroid);
        self.target_position = Some(position);
    }

    pub fn stop_mining(&mut self) {
        self.is_mining = false;
    }

    pub fn cargo_fraction(&self) -> f32 {
        if self.cargo_capacity > 0.0 {
            (self.cargo / self.cargo_capacity).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hull_fraction() {
        let mut structure = Structure::uniform(4, 100.0);
        assert_eq!(structure.hull_fraction(), 1.0);

        structure.blocks[0].durability = 0.0;
        structure.blocks[1].durability = 50.0;
        assert!((structure.hull_fraction() - 0.625).abs() < 1e-5);

        assert_eq!(Structure::default().hull_fraction(), 1.0);
    }

    #[test]
    fn test_shield_fraction() {
        let mut combat = CombatState::new(200.0);
        combat.shields = 50.0;
        assert_eq!(combat.shield_fraction(), 0.25);
        assert_eq!(CombatState::default().shield_fraction(), 0.0);
    }

    #[test]
    fn test_fire_turret_respects_cooldown() {
        let mut combat = CombatState::new(100.0).with_turret(Turret::new(800.0, 2.0));
        assert!(combat.fire_turret(0, Vec3::new(10.0, 0.0, 0.0)));
        assert!(!combat.fire_turret(0, Vec3::new(10.0, 0.0, 0.0)));
        assert!(!combat.fire_turret(3, Vec3::ZERO));

        let orders = combat.drain_fire_orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].turret, 0);
        assert!(combat.fire_orders.is_empty());
        assert_eq!(combat.turrets[0].cooldown_remaining, 2.0);
    }

    #[test]
    fn test_physics_accumulates_forces() {
        let mut body = Physics::at(Vec3::ZERO);
        body.apply_force(Vec3::new(1.0, 0.0, 0.0));
        body.apply_force(Vec3::new(2.0, 0.0, 0.0));
        body.apply_force(Vec3::new(f32::NAN, 0.0, 0.0));
        assert_eq!(body.force, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_neutral_faction() {
        assert!(Faction::new("Neutral").is_neutral());
        assert!(!Faction::new("Pirates").is_neutral());
    }
}
