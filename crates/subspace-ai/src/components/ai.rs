//! AI components: the per-entity behavior record and its enumerations.

use hecs::Entity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::common::Vec3;

/// Behavior states an autonomous ship can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AIState {
    /// Drifting in place, waiting for something to do
    #[default]
    Idle,
    /// Cycling through patrol waypoints
    Patrol,
    /// Flying to and extracting from an asteroid
    Mining,
    Salvaging,
    Trading,
    /// Engaging a hostile target with the preferred tactic
    Combat,
    /// Running away from the current threat
    Fleeing,
    Evasion,
    ReturningToBase,
    /// Docked at home base waiting for hull repairs
    Repairing,
    /// Sweeping for signatures with scanner and probes
    Scanning,
    /// Investigating scanned signatures
    Exploring,
}

impl AIState {
    pub const ALL: [AIState; 12] = [
        AIState::Idle,
        AIState::Patrol,
        AIState::Mining,
        AIState::Salvaging,
        AIState::Trading,
        AIState::Combat,
        AIState::Fleeing,
        AIState::Evasion,
        AIState::ReturningToBase,
        AIState::Repairing,
        AIState::Scanning,
        AIState::Exploring,
    ];

    /// Hostile-contact states the evaluator may leave once threats are gone
    pub fn is_engagement(&self) -> bool {
        matches!(self, AIState::Combat | AIState::Fleeing | AIState::Evasion)
    }

    /// Work states that fly to a waypoint and hold there
    pub fn is_work(&self) -> bool {
        matches!(self, AIState::Mining | AIState::Salvaging | AIState::Trading)
    }
}

/// Fixed trait biasing target selection and state choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AIPersonality {
    #[default]
    Balanced,
    Aggressive,
    Defensive,
    Miner,
    Trader,
    Salvager,
    Explorer,
    Coward,
}

impl AIPersonality {
    pub const ALL: [AIPersonality; 8] = [
        AIPersonality::Balanced,
        AIPersonality::Aggressive,
        AIPersonality::Defensive,
        AIPersonality::Miner,
        AIPersonality::Trader,
        AIPersonality::Salvager,
        AIPersonality::Explorer,
        AIPersonality::Coward,
    ];

    /// Tactic a fresh AI record of this personality starts with
    pub fn default_tactic(&self) -> CombatTactic {
        match self {
            AIPersonality::Aggressive => CombatTactic::Aggressive,
            AIPersonality::Defensive => CombatTactic::Defensive,
            AIPersonality::Balanced => CombatTactic::Strafing,
            AIPersonality::Salvager | AIPersonality::Trader => CombatTactic::Broadsiding,
            AIPersonality::Miner | AIPersonality::Explorer | AIPersonality::Coward => {
                CombatTactic::Kiting
            }
        }
    }

    /// Whether this personality fights when it sees a threat of the given tier
    pub fn fights_at(&self, priority: TargetPriority) -> bool {
        match self {
            AIPersonality::Aggressive | AIPersonality::Balanced | AIPersonality::Defensive => true,
            AIPersonality::Coward => false,
            // Civilians only shoot back at someone already shooting at them
            _ => priority == TargetPriority::Critical,
        }
    }
}

/// Distance/orientation control strategy used while in Combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CombatTactic {
    /// Close in and stay nose-on
    #[default]
    Aggressive,
    /// Hold the middle of the combat band, back off when pressed
    Kiting,
    /// Circle the target while correcting range
    Strafing,
    /// Present the flank at a fixed range
    Broadsiding,
    /// Hang at max range with periodic evasive bursts
    Defensive,
}

impl CombatTactic {
    pub const ALL: [CombatTactic; 5] = [
        CombatTactic::Aggressive,
        CombatTactic::Kiting,
        CombatTactic::Strafing,
        CombatTactic::Broadsiding,
        CombatTactic::Defensive,
    ];
}

/// Threat tier, ordered from least to most urgent
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum TargetPriority {
    #[default]
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

/// Behavior record attached to every autonomous entity
#[derive(Debug, Clone)]
pub struct AIComponent {
    pub current_state: AIState,
    pub previous_state: AIState,
    pub personality: AIPersonality,
    /// Ship, asteroid or signature the current state is working against
    pub current_target: Option<Entity>,
    pub current_waypoint: Option<Vec3>,
    pub patrol_waypoints: Vec<Vec3>,
    pub current_patrol_index: usize,
    /// Seconds spent in the current state
    pub state_timer: f32,
    pub time_since_last_evaluation: f32,
    /// Seconds between decision evaluations
    pub evaluation_interval: f32,
    pub min_combat_distance: f32,
    pub max_combat_distance: f32,
    pub combat_tactic: CombatTactic,
    /// Seconds idle before falling back to patrol
    pub idle_timeout: f32,
    pub can_mine: bool,
    pub can_salvage: bool,
    pub can_trade: bool,
    pub home_base: Option<Vec3>,
    /// Cargo fill fraction at which the ship heads home
    pub cargo_return_threshold: f32,
    pub enabled: bool,
    /// Seconds until the next defensive evasive burst
    pub maneuver_timer: f32,
    /// Set once the arrival at home base has been announced for this trip
    pub arrival_announced: bool,
    /// Per-record random source for every probabilistic decision
    pub rng: ChaCha8Rng,
}

impl AIComponent {
    pub fn new(personality: AIPersonality, seed: u64) -> Self {
        Self {
            current_state: AIState::Idle,
            previous_state: AIState::Idle,
            personality,
            current_target: None,
            current_waypoint: None,
            patrol_waypoints: Vec::new(),
            current_patrol_index: 0,
            state_timer: 0.0,
            time_since_last_evaluation: 0.0,
            evaluation_interval: 1.0,
            min_combat_distance: 300.0,
            max_combat_distance: 800.0,
            combat_tactic: personality.default_tactic(),
            idle_timeout: 5.0,
            can_mine: personality == AIPersonality::Miner,
            can_salvage: personality == AIPersonality::Salvager,
            can_trade: personality == AIPersonality::Trader,
            home_base: None,
            cargo_return_threshold: 0.9,
            enabled: true,
            maneuver_timer: 0.0,
            arrival_announced: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn with_tactic(mut self, tactic: CombatTactic) -> Self {
        self.combat_tactic = tactic;
        self
    }

    pub fn with_combat_band(mut self, min: f32, max: f32) -> Self {
        self.min_combat_distance = min.min(max);
        self.max_combat_distance = max.max(min);
        self
    }

    pub fn with_home_base(mut self, home: Vec3) -> Self {
        self.home_base = Some(home);
        self
    }

    pub fn with_patrol(mut self, waypoints: Vec<Vec3>) -> Self {
        self.patrol_waypoints = waypoints;
        self.current_patrol_index = 0;
        self
    }

    /// Midpoint of the combat band
    pub fn ideal_combat_distance(&self) -> f32 {
        (self.min_combat_distance + self.max_combat_distance) * 0.5
    }

    /// Waypoint the patrol is currently heading for
    pub fn current_patrol_waypoint(&self) -> Option<Vec3> {
        self.patrol_waypoints.get(self.current_patrol_index).copied()
    }

    /// Move to the next patrol waypoint, wrapping around
    pub fn advance_patrol(&mut self) {
        if !self.patrol_waypoints.is_empty() {
            self.current_patrol_index = (self.current_patrol_index + 1) % self.patrol_waypoints.len();
        }
    }
}
