//! Subspace Headless Behavior Harness
//!
//! Runs scripted encounters through the behavior engine with a minimal
//! physics step. No renderer, no networking.
//!
//! Usage:
//!   cargo run -p subspace-simtest
//!   cargo run -p subspace-simtest -- --verbose

use hecs::Entity;
use log::{Level, LevelFilter, Metadata, Record};
use subspace_ai::prelude::*;
use subspace_ai::systems::Disposition;

// ── Behavior tuning (same JSON a game server would ship) ────────────────
const CONFIG_JSON: &str = include_str!("../../../data/behavior_config.json");

const DT: f32 = 0.1;

// ── Logging ─────────────────────────────────────────────────────────────

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN ",
            Level::Info => "INFO ",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        println!("    [{}] {}", tag, record.args());
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn init_logging(verbose: bool) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        });
    }
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    init_logging(verbose);
    println!("=== Subspace Behavior Harness ===\n");

    let mut results = Vec::new();

    // 1. Config file
    let config = match BehaviorConfig::from_json(CONFIG_JSON) {
        Ok(c) => {
            results.extend(validate_config(&c));
            c
        }
        Err(e) => {
            results.push(TestResult {
                name: "config_parse".into(),
                passed: false,
                detail: format!("{}", e),
            });
            BehaviorConfig::default()
        }
    };

    // 2. Faction standings
    results.extend(validate_reputation(&config));

    // 3. Mixed encounter: pirates, miners, traders, explorers
    results.extend(run_encounter(config, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Config ───────────────────────────────────────────────────────────

fn validate_config(config: &BehaviorConfig) -> Vec<TestResult> {
    println!("--- Config ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "config_seed".into(),
        passed: config.seed == 20250101,
        detail: format!("seed {}", config.seed),
    });

    // Fields absent from the file keep their defaults
    let defaults = BehaviorConfig::default();
    results.push(TestResult {
        name: "config_defaults_fill_gaps".into(),
        passed: config.mining_range == defaults.mining_range
            && config.scan_duration == defaults.scan_duration,
        detail: format!(
            "mining_range {}, scan_duration {}",
            config.mining_range, config.scan_duration
        ),
    });

    let speeds = [
        config.patrol_speed,
        config.flee_speed,
        config.work_speed,
        config.return_speed,
        config.combat_speed,
    ];
    results.push(TestResult {
        name: "config_positive_speeds".into(),
        passed: speeds.iter().all(|s| *s > 0.0),
        detail: format!("{:?}", speeds),
    });

    results
}

// ── 2. Reputation ───────────────────────────────────────────────────────

fn validate_reputation(config: &BehaviorConfig) -> Vec<TestResult> {
    println!("--- Reputation ---");
    let mut results = Vec::new();
    let table = seeded_reputation();

    let fed = Faction::new("Federation");
    let pirates = Faction::new("Pirates");
    let traders = Faction::new("Traders");
    let drifter = Faction::new("Neutral");

    let cases = [
        ("federation_vs_pirates", &fed, &pirates, Disposition::Hostile),
        ("pirates_vs_federation", &pirates, &fed, Disposition::Hostile),
        ("federation_vs_traders", &fed, &traders, Disposition::Neutral),
        ("federation_vs_self", &fed, &fed, Disposition::Neutral),
        ("traders_vs_pirates", &traders, &pirates, Disposition::Hostile),
        ("neutral_vs_pirates", &drifter, &pirates, Disposition::Neutral),
    ];
    for (name, a, b, expected) in cases {
        let got = table.disposition(a, b, config);
        results.push(TestResult {
            name: format!("reputation_{}", name),
            passed: got == expected,
            detail: format!("{:?} (expected {:?})", got, expected),
        });
    }

    results
}

fn seeded_reputation() -> ReputationTable {
    let mut table = ReputationTable::new();
    table.set_standing("Federation", "Federation", 0.0);
    table.set_mutual("Pirates", "Federation", -50.0);
    table.set_mutual("Federation", "Traders", 25.0);
    table
}

// ── 3. Encounter ────────────────────────────────────────────────────────

struct Cast {
    hunters: Vec<Entity>,
    pirates: Vec<Entity>,
    trader: Entity,
    miner: Entity,
    explorer: Entity,
    wormhole: Entity,
}

fn armed_ship(engine: &mut BehaviorEngine, faction: &str, position: Vec3) -> Entity {
    engine.world.spawn((
        Physics::at(position),
        Faction::new(faction),
        Structure::uniform(8, 100.0),
        CombatState::new(150.0).with_turret(Turret::new(900.0, 1.0)),
    ))
}

fn stage(engine: &mut BehaviorEngine) -> Result<Cast> {
    let mut hunters = Vec::new();
    let mut pirates = Vec::new();
    for i in 0..3 {
        let offset = i as f32 * 120.0;
        let hunter = armed_ship(engine, "Federation", Vec3::new(0.0, offset, 0.0));
        engine.add_ai(hunter, AIPersonality::Aggressive)?;
        hunters.push(hunter);

        let pirate = armed_ship(engine, "Pirates", Vec3::new(800.0, offset, 0.0));
        engine.add_ai(pirate, AIPersonality::Balanced)?;
        pirates.push(pirate);
    }

    let trader = armed_ship(engine, "Traders", Vec3::new(1100.0, -400.0, 0.0));
    engine.add_ai(trader, AIPersonality::Coward)?;
    engine.set_home_base(trader, Vec3::new(9000.0, -400.0, 0.0))?;

    // Miners work well outside everyone's perception radius
    let field = Vec3::new(0.0, 20_000.0, 0.0);
    let miner = engine.world.spawn((
        Physics::at(field),
        Faction::new("Miners Guild"),
        Structure::uniform(4, 100.0),
        MiningState::new(400.0),
    ));
    engine.add_ai(miner, AIPersonality::Miner)?;
    engine.set_home_base(miner, field + Vec3::new(-1500.0, 0.0, 0.0))?;
    for i in 0..3 {
        let rock = field + Vec3::new(150.0 + i as f32 * 300.0, 60.0, 0.0);
        engine
            .world
            .spawn((Asteroid::new(rock, ResourceKind::Iron, 600.0),));
    }

    let outpost = Vec3::new(0.0, 0.0, 30_000.0);
    let explorer = engine.world.spawn((
        Physics::at(outpost),
        Faction::new("Explorers"),
        Structure::uniform(4, 100.0),
        ScannerState::default().with_probes(8),
    ));
    engine.add_ai(explorer, AIPersonality::Explorer)?;
    let wormhole = engine
        .world
        .spawn((Signature::wormhole(outpost + Vec3::new(900.0, 300.0, 0.0), 5),));

    Ok(Cast {
        hunters,
        pirates,
        trader,
        miner,
        explorer,
        wormhole,
    })
}

/// Semi-implicit Euler over the force the behavior engine queued this tick
fn integrate(world: &mut hecs::World, dt: f32) {
    for (_, body) in world.query_mut::<&mut Physics>() {
        let mass = body.mass.max(1.0);
        body.velocity += body.force * (dt / mass);
        body.position += body.velocity * dt;
        body.angular_velocity += body.torque * (dt / mass);
        let spin = body.angular_velocity.cross(&body.forward) * dt;
        let forward = (body.forward + spin).normalize();
        if forward != Vec3::ZERO {
            body.forward = forward;
        }
        body.force = Vec3::ZERO;
        body.torque = Vec3::ZERO;
    }
}

/// Cool turrets down and consume fire orders; returns shots fired
fn resolve_combat(world: &mut hecs::World, dt: f32) -> usize {
    let mut shots = 0;
    for (_, combat) in world.query_mut::<&mut CombatState>() {
        for turret in &mut combat.turrets {
            turret.cooldown_remaining = (turret.cooldown_remaining - dt).max(0.0);
        }
        shots += combat.drain_fire_orders().len();
    }
    shots
}

/// Move ore into the hold while a miner is working
fn resolve_mining(world: &mut hecs::World, dt: f32) {
    for (_, mining) in world.query_mut::<&mut MiningState>() {
        if mining.is_mining {
            mining.cargo = (mining.cargo + 40.0 * dt).min(mining.cargo_capacity);
        }
    }
}

fn run_encounter(config: BehaviorConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Encounter ---");
    let mut results = Vec::new();

    let mut engine = BehaviorEngine::with_config(config);
    engine.reputation = seeded_reputation();
    engine.initialize();

    let cast = match stage(&mut engine) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "encounter_stage".into(),
                passed: false,
                detail: format!("{}", e),
            });
            return results;
        }
    };

    // Explorers go straight to work
    if let Ok(mut ai) = engine.world.get::<&mut AIComponent>(cast.explorer) {
        ai.current_state = AIState::Scanning;
    }

    let mut events = Vec::new();
    let mut shots = 0;
    let mut invalid_states = 0;
    let steps = (90.0 / DT) as usize;
    for _ in 0..steps {
        engine.update(DT);
        integrate(&mut engine.world, DT);
        shots += resolve_combat(&mut engine.world, DT);
        resolve_mining(&mut engine.world, DT);
        events.extend(engine.drain_events());

        invalid_states += engine
            .state_counts()
            .iter()
            .filter(|(state, _)| !AIState::ALL.contains(state))
            .count();
    }

    if verbose {
        for (state, count) in engine.state_counts() {
            println!("    {:?}: {}", state, count);
        }
    }

    let entered = |entity: Entity, state: AIState| {
        events.iter().any(|e| {
            matches!(e, AiEvent::StateChanged { entity: who, to, .. } if *who == entity && *to == state)
        })
    };

    let engaged = cast
        .hunters
        .iter()
        .filter(|h| entered(**h, AIState::Combat))
        .count();
    results.push(TestResult {
        name: "encounter_hunters_engage".into(),
        passed: engaged == cast.hunters.len(),
        detail: format!("{}/{} hunters entered combat", engaged, cast.hunters.len()),
    });

    let targeted_pirates = events
        .iter()
        .filter(|e| {
            matches!(e, AiEvent::TargetAcquired { target, .. } if cast.pirates.contains(target))
        })
        .count();
    results.push(TestResult {
        name: "encounter_pirates_targeted".into(),
        passed: targeted_pirates > 0,
        detail: format!("{} target acquisitions on pirates", targeted_pirates),
    });

    results.push(TestResult {
        name: "encounter_turrets_fire".into(),
        passed: shots > 0,
        detail: format!("{} shots fired", shots),
    });

    results.push(TestResult {
        name: "encounter_coward_flees".into(),
        passed: entered(cast.trader, AIState::Fleeing),
        detail: format!("trader ended {:?}", engine.state_of(cast.trader)),
    });

    let mined = entered(cast.miner, AIState::Mining);
    let headed_home = entered(cast.miner, AIState::ReturningToBase);
    results.push(TestResult {
        name: "encounter_miner_cycle".into(),
        passed: mined && headed_home,
        detail: format!("mining {}, returning {}", mined, headed_home),
    });

    let detected = events.iter().any(|e| {
        matches!(e, AiEvent::WormholeDetected { signature, .. } if *signature == cast.wormhole)
    });
    let discoveries = engine
        .world
        .get::<&ScannerState>(cast.explorer)
        .map(|s| s.discoveries.len())
        .unwrap_or(0);
    results.push(TestResult {
        name: "encounter_explorer_finds_wormhole".into(),
        passed: detected,
        detail: format!("detected {}, {} resolved discoveries", detected, discoveries),
    });

    results.push(TestResult {
        name: "encounter_no_faults".into(),
        passed: engine.total_faults() == 0,
        detail: format!("{} faults", engine.total_faults()),
    });

    results.push(TestResult {
        name: "encounter_valid_states".into(),
        passed: invalid_states == 0,
        detail: format!("{} events over {} ticks", events.len(), steps),
    });

    engine.shutdown();
    results
}
