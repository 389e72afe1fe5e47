//! Scanning and exploration - directional sweeps, probe patterns and
//! wormhole discoveries.
//!
//! Only runs while a record is Scanning or Exploring. A ship that lands in
//! either state without a scanner drops back to Idle; that is a capability
//! downgrade, not a fault.

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{AIComponent, AIPersonality, AIState, Physics, ScannerState, Signature, SignatureKind, Vec3};
use crate::config::BehaviorConfig;
use crate::error::Result;
use crate::systems::events::{AiEvent, EventBus};
use crate::systems::movement::random_direction;
use crate::systems::optional_mut;

/// Probe offsets of the fixed four-point pattern (vertices of a tetrahedron)
const TETRAHEDRON: [Vec3; 4] = [
    Vec3 { x: 1.0, y: 1.0, z: 1.0 },
    Vec3 { x: 1.0, y: -1.0, z: -1.0 },
    Vec3 { x: -1.0, y: 1.0, z: -1.0 },
    Vec3 { x: -1.0, y: -1.0, z: 1.0 },
];

/// What one sweep did to one signature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanHit {
    pub signature: Entity,
    pub kind: SignatureKind,
    /// First time this scanner picked the signature up
    pub detected: bool,
    /// This sweep completed the signature
    pub resolved: bool,
}

pub struct ScanContext<'a> {
    pub world: &'a World,
    pub entity: Entity,
    pub body: &'a Physics,
    pub events: &'a mut EventBus,
    pub config: &'a BehaviorConfig,
    pub dt: f32,
}

/// Roll whether an idle ship of this personality starts scanning
pub fn should_start_scanning<R: Rng>(personality: AIPersonality, rng: &mut R, config: &BehaviorConfig) -> bool {
    let chance = match personality {
        AIPersonality::Explorer => config.explorer_scan_chance,
        AIPersonality::Trader => config.trader_scan_chance,
        _ => return false,
    };
    rng.gen::<f32>() < chance
}

/// Roll whether this personality would jump into a wormhole of `class`
pub fn should_enter_wormhole<R: Rng>(
    personality: AIPersonality,
    class: u8,
    rng: &mut R,
    config: &BehaviorConfig,
) -> bool {
    let high_class = class >= config.high_wormhole_class;
    match personality {
        AIPersonality::Coward => false,
        AIPersonality::Explorer => true,
        AIPersonality::Defensive if high_class => false,
        _ => {
            let chance = if high_class {
                config.high_class_entry_chance
            } else {
                config.low_class_entry_chance
            };
            rng.gen::<f32>() < chance
        }
    }
}

/// Probe positions `spread` meters out from `center`
pub fn tetrahedral_pattern(center: Vec3, spread: f32) -> Vec<Vec3> {
    TETRAHEDRON.iter().map(|offset| center + offset.normalize() * spread).collect()
}

/// Sweep a cone from `origin` along `direction`, adding progress to every
/// signature inside the scanner's range and half-angle
pub fn directional_scan(
    world: &World,
    scanner: &mut ScannerState,
    origin: Vec3,
    direction: Vec3,
    config: &BehaviorConfig,
) -> Vec<ScanHit> {
    let heading = direction.normalize();
    let half_angle = scanner.scan_angle.to_radians();
    let mut hits = Vec::new();

    for (entity, signature) in world.query::<&Signature>().iter() {
        let offset = signature.position - origin;
        let distance = offset.length();
        if !(distance <= scanner.scan_range) {
            continue;
        }
        // Something sitting on the scanner is inside any cone
        if distance > f32::EPSILON {
            let angle = offset.normalize().dot(&heading).clamp(-1.0, 1.0).acos();
            if angle > half_angle {
                continue;
            }
        }
        hits.push(sweep(scanner, entity, signature, config.directional_scan_strength));
    }
    hits
}

/// Sweep with every deployed probe; each signature is advanced once even if
/// several probes cover it
pub fn probe_scan(world: &World, scanner: &mut ScannerState, config: &BehaviorConfig) -> Vec<ScanHit> {
    let mut hits = Vec::new();
    for (entity, signature) in world.query::<&Signature>().iter() {
        let range = scanner.probe_range;
        let covered = scanner
            .deployed_probes
            .iter()
            .any(|probe| probe.distance(&signature.position) <= range);
        if covered {
            hits.push(sweep(scanner, entity, signature, config.probe_scan_strength));
        }
    }
    hits
}

fn sweep(scanner: &mut ScannerState, entity: Entity, signature: &Signature, amount: f32) -> ScanHit {
    let detected = scanner.tracked(entity).is_none();
    let resolved = scanner.advance(entity, signature, amount);
    ScanHit {
        signature: entity,
        kind: signature.kind,
        detected,
        resolved,
    }
}

/// Tick the scanning behavior. Returns the state the record should move to,
/// if any; the caller performs the transition.
pub fn update_scanning(ctx: &mut ScanContext<'_>, ai: &mut AIComponent) -> Result<Option<AIState>> {
    let Some(mut scanner) = optional_mut::<ScannerState>(ctx.world, ctx.entity)? else {
        log::warn!(
            "{:?} is {:?} without a scanner, falling back to Idle",
            ctx.entity,
            ai.current_state
        );
        return Ok(Some(AIState::Idle));
    };

    scanner.directional_timer += ctx.dt;
    scanner.probe_timer += ctx.dt;
    let explorer = ai.personality == AIPersonality::Explorer;
    let mut next = None;

    if scanner.directional_timer >= scanner.directional_cooldown {
        scanner.directional_timer = 0.0;
        forget_lost_signatures(ctx, &mut scanner);
        let heading = match ctx.body.velocity.normalize() {
            v if v == Vec3::ZERO => random_direction(&mut ai.rng),
            v => v,
        };
        let hits = directional_scan(ctx.world, &mut scanner, ctx.body.position, heading, ctx.config);
        let first_wormhole = record_hits(ctx, ai, &mut scanner, &hits);

        if explorer && ai.current_target.is_none() {
            if let Some(wormhole) = first_wormhole {
                ai.current_target = Some(wormhole);
                ai.current_waypoint = scanner.tracked(wormhole).map(|t| t.position);
                log::debug!("{:?} investigating wormhole {:?}", ctx.entity, wormhole);
            }
        }
    }

    if explorer && scanner.deployed_probes.is_empty() && scanner.available_probes as usize >= TETRAHEDRON.len() {
        let pattern = tetrahedral_pattern(ctx.body.position, ctx.config.probe_spread);
        if scanner.deploy_probes(&pattern) {
            log::info!("{:?} deployed {} probes", ctx.entity, pattern.len());
        }
    }

    if !scanner.deployed_probes.is_empty() && scanner.probe_timer >= scanner.probe_cooldown {
        scanner.probe_timer = 0.0;
        forget_lost_signatures(ctx, &mut scanner);
        let hits = probe_scan(ctx.world, &mut scanner, ctx.config);
        record_hits(ctx, ai, &mut scanner, &hits);
        let covered_resolved = hits
            .iter()
            .all(|hit| scanner.tracked(hit.signature).is_some_and(|t| t.is_resolved()));
        if covered_resolved {
            let recalled = scanner.recall_probes();
            log::info!("{:?} recalled {} probes, all signatures resolved", ctx.entity, recalled);
            next = Some(AIState::Exploring);
        }
    }

    match ai.current_state {
        AIState::Scanning if next.is_none() => {
            let target_resolved = ai
                .current_target
                .and_then(|t| scanner.tracked(t))
                .is_some_and(|t| t.is_resolved());
            if explorer && target_resolved {
                next = Some(AIState::Exploring);
            } else if scanner.deployed_probes.is_empty() && ai.state_timer >= ctx.config.scan_duration {
                // Nothing more to learn from here
                next = Some(if explorer { AIState::Exploring } else { AIState::Idle });
            }
        }
        AIState::Exploring => match ai.current_waypoint {
            None => {
                let heading = random_direction(&mut ai.rng);
                let waypoint = ctx.body.position + heading * (scanner.scan_range * 0.5);
                ai.current_waypoint = Some(waypoint);
                log::debug!("{:?} exploring toward {:?}", ctx.entity, waypoint);
            }
            Some(waypoint) if ctx.body.position.distance(&waypoint) < ctx.config.arrival_distance => {
                ai.current_waypoint = None;
                next = Some(AIState::Scanning);
            }
            Some(_) => {}
        },
        _ => {}
    }

    Ok(next)
}

/// Drop tracking for signatures that have left the world
fn forget_lost_signatures(ctx: &ScanContext<'_>, scanner: &mut ScannerState) {
    let world = ctx.world;
    let dropped = scanner.forget_lost(|e| world.entity(e).is_ok_and(|r| r.has::<Signature>()));
    if dropped > 0 {
        log::debug!("{:?} lost track of {} signatures", ctx.entity, dropped);
    }
}

/// Publish detections and discoveries. Returns the first wormhole this pass
/// detected for the first time.
fn record_hits(
    ctx: &mut ScanContext<'_>,
    ai: &mut AIComponent,
    scanner: &mut ScannerState,
    hits: &[ScanHit],
) -> Option<Entity> {
    let mut first_wormhole = None;
    for hit in hits {
        let Some(class) = hit.kind.wormhole_class() else {
            continue;
        };
        if hit.detected {
            log::info!("{:?} detected class {} wormhole {:?}", ctx.entity, class, hit.signature);
            ctx.events.publish(AiEvent::WormholeDetected {
                entity: ctx.entity,
                signature: hit.signature,
                class,
            });
            first_wormhole.get_or_insert(hit.signature);
        }
        if hit.resolved {
            scanner.discoveries.push(hit.signature);
            log::info!("{:?} discovered class {} wormhole {:?}", ctx.entity, class, hit.signature);
            ctx.events.publish(AiEvent::WormholeDiscovered {
                entity: ctx.entity,
                signature: hit.signature,
                class,
            });
            decide_entry(ctx, ai, scanner, hit.signature, class);
        }
    }
    first_wormhole
}

fn decide_entry(
    ctx: &mut ScanContext<'_>,
    ai: &mut AIComponent,
    scanner: &mut ScannerState,
    signature: Entity,
    class: u8,
) {
    let Some(tracked) = scanner.signatures.iter_mut().find(|s| s.signature == signature) else {
        return;
    };
    if tracked.entry_decided {
        return;
    }
    tracked.entry_decided = true;
    let position = tracked.position;

    let enter = should_enter_wormhole(ai.personality, class, &mut ai.rng, ctx.config);
    ctx.events.publish(AiEvent::WormholeEntryDecision {
        entity: ctx.entity,
        signature,
        class,
        enter,
    });
    if enter {
        ai.current_target = Some(signature);
        ai.current_waypoint = Some(position);
        log::debug!("{:?} heading into wormhole {:?}", ctx.entity, signature);
    }
}
