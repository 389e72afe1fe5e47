//! Perception - builds the per-tick snapshot of what an AI can see.
//!
//! A snapshot is rebuilt from scratch on every tick and thrown away after it.
//! Threat ordering is load-bearing: combat and flee logic pick "the first
//! threat" and rely on it being the highest tier, nearest first.

use hecs::{Entity, World};

use crate::components::{
    AIPersonality, Asteroid, CombatState, Faction, MiningState, Physics, ResourceKind, Structure,
    TargetPriority, Vec3,
};
use crate::config::BehaviorConfig;
use crate::systems::faction::{Disposition, ReputationTable};

/// Read access to everything perception needs
#[derive(Clone, Copy)]
pub struct WorldView<'a> {
    pub world: &'a World,
    pub reputation: &'a ReputationTable,
    pub config: &'a BehaviorConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerceivedEntity {
    pub entity: Entity,
    pub position: Vec3,
    pub velocity: Vec3,
    pub distance: f32,
    pub is_hostile: bool,
    pub is_friendly: bool,
    pub shield_fraction: f32,
    pub hull_fraction: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerceivedAsteroid {
    pub entity: Entity,
    pub position: Vec3,
    pub distance: f32,
    pub resource: ResourceKind,
    pub remaining: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Threat {
    pub entity: Entity,
    pub position: Vec3,
    pub distance: f32,
    pub priority: TargetPriority,
    /// 0.0 (harmless) to 1.0 (deadly)
    pub threat_level: f32,
    /// The threat has us as its current combat target
    pub is_attacking: bool,
}

/// The observer's own condition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelfStatus {
    pub position: Vec3,
    pub velocity: Vec3,
    pub hull_fraction: f32,
    pub shield_fraction: f32,
    pub cargo_fraction: f32,
}

impl Default for SelfStatus {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            hull_fraction: 1.0,
            shield_fraction: 0.0,
            cargo_fraction: 0.0,
        }
    }
}

/// Everything one AI knows about its surroundings for a single tick
#[derive(Debug, Clone)]
pub struct PerceptionSnapshot {
    pub observer: Entity,
    pub radius: f32,
    pub self_status: SelfStatus,
    pub nearby_entities: Vec<PerceivedEntity>,
    pub asteroids: Vec<PerceivedAsteroid>,
    /// Sorted by priority (highest first), then distance (nearest first)
    pub threats: Vec<Threat>,
}

impl PerceptionSnapshot {
    /// An empty snapshot, as seen from nowhere in particular
    pub fn empty(observer: Entity, position: Vec3, radius: f32) -> Self {
        Self {
            observer,
            radius,
            self_status: SelfStatus {
                position,
                ..Default::default()
            },
            nearby_entities: Vec::new(),
            asteroids: Vec::new(),
            threats: Vec::new(),
        }
    }

    pub fn entity(&self, entity: Entity) -> Option<&PerceivedEntity> {
        self.nearby_entities.iter().find(|e| e.entity == entity)
    }

    pub fn threat(&self, entity: Entity) -> Option<&Threat> {
        self.threats.iter().find(|t| t.entity == entity)
    }

    /// Closest threat regardless of tier
    pub fn nearest_threat(&self) -> Option<&Threat> {
        first_min_by(&self.threats, |t| t.distance)
    }

    pub fn has_threats(&self) -> bool {
        !self.threats.is_empty()
    }

    /// Last known position of anything in the snapshot
    pub fn position_of(&self, entity: Entity) -> Option<Vec3> {
        self.entity(entity)
            .map(|e| e.position)
            .or_else(|| self.asteroids.iter().find(|a| a.entity == entity).map(|a| a.position))
    }
}

/// Build the snapshot for `observer` standing at `position`
pub fn build_perception(
    observer: Entity,
    position: Vec3,
    radius: f32,
    view: WorldView<'_>,
) -> PerceptionSnapshot {
    let world = view.world;
    let mut snapshot = PerceptionSnapshot::empty(observer, position, radius);
    snapshot.self_status = self_status(world, observer, position);

    let own_faction = world.get::<&Faction>(observer).ok().map(|f| (*f).clone());

    for (entity, body) in world.query::<&Physics>().iter() {
        if entity == observer {
            continue;
        }
        let distance = body.position.distance(&position);
        // Written so NaN positions are excluded too
        if !(distance <= radius) {
            continue;
        }

        let disposition = match (&own_faction, world.get::<&Faction>(entity).ok()) {
            (Some(ours), Some(theirs)) => view.reputation.disposition(ours, &theirs, view.config),
            _ => Disposition::Neutral,
        };

        let combat = world.get::<&CombatState>(entity).ok();
        let shield_fraction = combat.as_ref().map(|c| c.shield_fraction()).unwrap_or(0.0);
        let is_attacking = combat
            .as_ref()
            .map(|c| c.current_target == Some(observer))
            .unwrap_or(false);
        drop(combat);

        let hull_fraction = world
            .get::<&Structure>(entity)
            .map(|s| s.hull_fraction())
            .unwrap_or(1.0);

        let perceived = PerceivedEntity {
            entity,
            position: body.position,
            velocity: body.velocity,
            distance,
            is_hostile: disposition == Disposition::Hostile,
            is_friendly: disposition == Disposition::Friendly,
            shield_fraction,
            hull_fraction,
        };

        if perceived.is_hostile {
            snapshot
                .threats
                .push(assess_threat(&perceived, is_attacking, radius, view.config));
        }
        snapshot.nearby_entities.push(perceived);
    }

    for (entity, asteroid) in world.query::<&Asteroid>().iter() {
        let distance = asteroid.position.distance(&position);
        if !(distance <= radius) {
            continue;
        }
        snapshot.asteroids.push(PerceivedAsteroid {
            entity,
            position: asteroid.position,
            distance,
            resource: asteroid.resource,
            remaining: asteroid.remaining,
        });
    }

    sort_threats(&mut snapshot.threats);
    snapshot
}

fn self_status(world: &World, observer: Entity, position: Vec3) -> SelfStatus {
    SelfStatus {
        position,
        velocity: world
            .get::<&Physics>(observer)
            .map(|b| b.velocity)
            .unwrap_or(Vec3::ZERO),
        hull_fraction: world
            .get::<&Structure>(observer)
            .map(|s| s.hull_fraction())
            .unwrap_or(1.0),
        shield_fraction: world
            .get::<&CombatState>(observer)
            .map(|c| c.shield_fraction())
            .unwrap_or(0.0),
        cargo_fraction: world
            .get::<&MiningState>(observer)
            .map(|m| m.cargo_fraction())
            .unwrap_or(0.0),
    }
}

/// Score a hostile contact and put it in a priority tier
pub fn assess_threat(
    perceived: &PerceivedEntity,
    is_attacking: bool,
    radius: f32,
    config: &BehaviorConfig,
) -> Threat {
    let proximity = if radius > 0.0 {
        1.0 - perceived.distance / radius
    } else {
        0.0
    };
    let threat_level = (0.3 * proximity
        + 0.2 * perceived.shield_fraction
        + 0.3 * perceived.hull_fraction
        + config.approach_bonus)
        .clamp(0.0, 1.0);

    let priority = if is_attacking {
        TargetPriority::Critical
    } else if perceived.distance < config.high_priority_distance || threat_level > 0.7 {
        TargetPriority::High
    } else if threat_level > 0.4 {
        TargetPriority::Medium
    } else if threat_level > 0.2 {
        TargetPriority::Low
    } else {
        TargetPriority::None
    };

    Threat {
        entity: perceived.entity,
        position: perceived.position,
        distance: perceived.distance,
        priority,
        threat_level,
        is_attacking,
    }
}

/// Highest priority first, nearest first within a tier
pub fn sort_threats(threats: &mut [Threat]) {
    threats.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.distance.total_cmp(&b.distance))
    });
}

/// Nearest asteroid that still has ore in it
pub fn find_best_asteroid(snapshot: &PerceptionSnapshot) -> Option<&PerceivedAsteroid> {
    let minable: Vec<&PerceivedAsteroid> = snapshot.asteroids.iter().filter(|a| a.remaining > 0.0).collect();
    first_min_by(&minable, |a| a.distance).copied()
}

/// Pick the threat this personality would engage.
///
/// Aggressive goes for the most dangerous, Defensive for the closest, and
/// everyone else takes the head of the sorted threat list.
pub fn find_best_target(snapshot: &PerceptionSnapshot, personality: AIPersonality) -> Option<&Threat> {
    match personality {
        AIPersonality::Aggressive => {
            let mut best: Option<&Threat> = None;
            for threat in &snapshot.threats {
                if best.map_or(true, |b| threat.threat_level > b.threat_level) {
                    best = Some(threat);
                }
            }
            best
        }
        AIPersonality::Defensive => snapshot.nearest_threat(),
        _ => snapshot.threats.first(),
    }
}

/// First element with the smallest key (keeps the earliest on ties)
fn first_min_by<T>(items: &[T], key: impl Fn(&T) -> f32) -> Option<&T> {
    let mut best: Option<(&T, f32)> = None;
    for item in items {
        let k = key(item);
        if best.map_or(true, |(_, bk)| k < bk) {
            best = Some((item, k));
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{HullBlock, Turret};

    fn view<'a>(world: &'a World, reputation: &'a ReputationTable, config: &'a BehaviorConfig) -> WorldView<'a> {
        WorldView {
            world,
            reputation,
            config,
        }
    }

    fn ship(world: &mut World, faction: &str, position: Vec3) -> Entity {
        world.spawn((Physics::at(position), Faction::new(faction)))
    }

    #[test]
    fn test_excludes_self_and_far_entities() {
        let mut world = World::new();
        let config = BehaviorConfig::default();
        let reputation = ReputationTable::new();

        let me = ship(&mut world, "Miners", Vec3::ZERO);
        let near = ship(&mut world, "Miners", Vec3::new(1500.0, 0.0, 0.0));
        let _far = ship(&mut world, "Miners", Vec3::new(2500.0, 0.0, 0.0));
        let edge = ship(&mut world, "Miners", Vec3::new(0.0, 2000.0, 0.0));

        let snapshot = build_perception(me, Vec3::ZERO, 2000.0, view(&world, &reputation, &config));
        let seen: Vec<Entity> = snapshot.nearby_entities.iter().map(|e| e.entity).collect();
        assert_eq!(seen.len(), 2);
        assert!(seen.contains(&near));
        assert!(seen.contains(&edge));
        assert!(!seen.contains(&me));
        assert!(snapshot.nearby_entities.iter().all(|e| e.distance <= 2000.0));
    }

    #[test]
    fn test_hostile_at_400_is_high_priority() {
        let mut world = World::new();
        let config = BehaviorConfig::default();
        let mut reputation = ReputationTable::new();
        reputation.set_standing("Miners", "Pirates", -60.0);

        let me = ship(&mut world, "Miners", Vec3::ZERO);
        let pirate = ship(&mut world, "Pirates", Vec3::new(400.0, 0.0, 0.0));

        let snapshot = build_perception(me, Vec3::ZERO, 2000.0, view(&world, &reputation, &config));
        assert_eq!(snapshot.threats.len(), 1);
        let threat = &snapshot.threats[0];
        assert_eq!(threat.entity, pirate);
        assert_eq!(threat.priority, TargetPriority::High);
        assert!(!threat.is_attacking);
    }

    #[test]
    fn test_attacker_is_critical() {
        let mut world = World::new();
        let config = BehaviorConfig::default();
        let reputation = ReputationTable::new();

        let me = ship(&mut world, "Miners", Vec3::ZERO);
        let mut guns = CombatState::new(100.0).with_turret(Turret::new(900.0, 1.0));
        guns.current_target = Some(me);
        let attacker = world.spawn((
            Physics::at(Vec3::new(1800.0, 0.0, 0.0)),
            Faction::new("Pirates"),
            guns,
        ));

        let snapshot = build_perception(me, Vec3::ZERO, 2000.0, view(&world, &reputation, &config));
        let threat = snapshot.threat(attacker).unwrap();
        assert_eq!(threat.priority, TargetPriority::Critical);
        assert!(threat.is_attacking);
    }

    #[test]
    fn test_threat_level_formula() {
        let config = BehaviorConfig::default();
        let mut world = World::new();
        let e = world.spawn(());
        let perceived = PerceivedEntity {
            entity: e,
            position: Vec3::new(1000.0, 0.0, 0.0),
            velocity: Vec3::ZERO,
            distance: 1000.0,
            is_hostile: true,
            is_friendly: false,
            shield_fraction: 0.5,
            hull_fraction: 0.5,
        };
        let threat = assess_threat(&perceived, false, 2000.0, &config);
        // 0.3*0.5 + 0.2*0.5 + 0.3*0.5 + 0.2
        assert!((threat.threat_level - 0.6).abs() < 1e-5);
        assert_eq!(threat.priority, TargetPriority::Medium);

        let faint = PerceivedEntity {
            distance: 2000.0,
            shield_fraction: 0.0,
            hull_fraction: 0.0,
            ..perceived.clone()
        };
        let threat = assess_threat(&faint, false, 2000.0, &config);
        assert!((threat.threat_level - 0.2).abs() < 1e-5);
        assert_eq!(threat.priority, TargetPriority::None);

        let no_bonus = BehaviorConfig {
            approach_bonus: 0.0,
            ..BehaviorConfig::default()
        };
        let threat = assess_threat(&perceived, false, 2000.0, &no_bonus);
        assert!((threat.threat_level - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_shield_and_hull_fractions() {
        let mut world = World::new();
        let config = BehaviorConfig::default();
        let reputation = ReputationTable::new();

        let me = ship(&mut world, "Miners", Vec3::ZERO);
        let mut shields = CombatState::new(200.0);
        shields.shields = 100.0;
        let mut hull = Structure::uniform(2, 100.0);
        hull.blocks[0] = HullBlock {
            durability: 0.0,
            max_durability: 100.0,
        };
        let damaged = world.spawn((Physics::at(Vec3::new(100.0, 0.0, 0.0)), shields, hull));
        let bare = world.spawn((Physics::at(Vec3::new(200.0, 0.0, 0.0)),));

        let snapshot = build_perception(me, Vec3::ZERO, 2000.0, view(&world, &reputation, &config));
        let d = snapshot.entity(damaged).unwrap();
        assert_eq!(d.shield_fraction, 0.5);
        assert_eq!(d.hull_fraction, 0.5);
        // No faction on the other side: neither hostile nor friendly
        assert!(!d.is_hostile && !d.is_friendly);

        let b = snapshot.entity(bare).unwrap();
        assert_eq!(b.shield_fraction, 0.0);
        assert_eq!(b.hull_fraction, 1.0);
    }

    #[test]
    fn test_unknown_factions_are_hostile() {
        let mut world = World::new();
        let config = BehaviorConfig::default();
        let reputation = ReputationTable::new();

        let red = ship(&mut world, "Red", Vec3::ZERO);
        let blue = ship(&mut world, "Blue", Vec3::new(300.0, 0.0, 0.0));
        let grey = ship(&mut world, Faction::NEUTRAL, Vec3::new(0.0, 300.0, 0.0));

        let from_red = build_perception(red, Vec3::ZERO, 2000.0, view(&world, &reputation, &config));
        assert!(from_red.entity(blue).unwrap().is_hostile);
        assert!(!from_red.entity(grey).unwrap().is_hostile);

        let from_blue = build_perception(
            blue,
            Vec3::new(300.0, 0.0, 0.0),
            2000.0,
            view(&world, &reputation, &config),
        );
        assert!(from_blue.entity(red).unwrap().is_hostile);
    }

    #[test]
    fn test_threat_sort_order() {
        let mut world = World::new();
        let a = world.spawn(());
        let b = world.spawn(());
        let c = world.spawn(());
        let d = world.spawn(());
        let threat = |entity, priority, distance| Threat {
            entity,
            position: Vec3::ZERO,
            distance,
            priority,
            threat_level: 0.5,
            is_attacking: false,
        };
        let mut threats = vec![
            threat(a, TargetPriority::Low, 100.0),
            threat(b, TargetPriority::High, 900.0),
            threat(c, TargetPriority::High, 300.0),
            threat(d, TargetPriority::Critical, 1500.0),
        ];
        sort_threats(&mut threats);
        let order: Vec<Entity> = threats.iter().map(|t| t.entity).collect();
        assert_eq!(order, vec![d, c, b, a]);
    }

    #[test]
    fn test_find_best_asteroid_skips_depleted() {
        let mut world = World::new();
        let config = BehaviorConfig::default();
        let reputation = ReputationTable::new();
        let me = world.spawn((Physics::at(Vec3::ZERO),));
        let _empty = world.spawn((Asteroid::new(Vec3::new(50.0, 0.0, 0.0), ResourceKind::Iron, 0.0),));
        let rich = world.spawn((Asteroid::new(Vec3::new(400.0, 0.0, 0.0), ResourceKind::Titanium, 80.0),));
        let _farther = world.spawn((Asteroid::new(Vec3::new(900.0, 0.0, 0.0), ResourceKind::Iron, 500.0),));

        let snapshot = build_perception(me, Vec3::ZERO, 2000.0, view(&world, &reputation, &config));
        assert_eq!(snapshot.asteroids.len(), 3);
        assert_eq!(find_best_asteroid(&snapshot).map(|a| a.entity), Some(rich));

        let empty = PerceptionSnapshot::empty(me, Vec3::ZERO, 2000.0);
        assert!(find_best_asteroid(&empty).is_none());
    }

    #[test]
    fn test_find_best_target_by_personality() {
        let mut world = World::new();
        let me = world.spawn(());
        let close = world.spawn(());
        let scary = world.spawn(());
        let tied = world.spawn(());

        let mut snapshot = PerceptionSnapshot::empty(me, Vec3::ZERO, 2000.0);
        snapshot.threats = vec![
            Threat {
                entity: scary,
                position: Vec3::ZERO,
                distance: 800.0,
                priority: TargetPriority::High,
                threat_level: 0.9,
                is_attacking: false,
            },
            Threat {
                entity: tied,
                position: Vec3::ZERO,
                distance: 850.0,
                priority: TargetPriority::High,
                threat_level: 0.9,
                is_attacking: false,
            },
            Threat {
                entity: close,
                position: Vec3::ZERO,
                distance: 200.0,
                priority: TargetPriority::Medium,
                threat_level: 0.5,
                is_attacking: false,
            },
        ];

        let pick = |p| find_best_target(&snapshot, p).map(|t| t.entity);
        assert_eq!(pick(AIPersonality::Aggressive), Some(scary));
        assert_eq!(pick(AIPersonality::Defensive), Some(close));
        assert_eq!(pick(AIPersonality::Balanced), Some(scary));
        assert_eq!(pick(AIPersonality::Coward), Some(scary));

        snapshot.threats.clear();
        assert!(find_best_target(&snapshot, AIPersonality::Aggressive).is_none());
    }
}
