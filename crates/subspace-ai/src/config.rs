//! Tuning constants for perception, steering and scanning.
//!
//! Every number the behavior systems use lives here so designers can
//! override them from a JSON document without touching code. Fields missing
//! from the document keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    // ── Perception ──
    /// Entities farther than this are invisible to the AI
    pub perception_radius: f32,
    /// Standing below this is hostile
    pub hostile_standing: f32,
    /// Standing above this is friendly
    pub friendly_standing: f32,
    /// Hostiles closer than this are always at least High priority
    pub high_priority_distance: f32,
    /// Flat bonus in the threat score standing in for "is closing in".
    /// Not derived from velocity yet; see DESIGN.md.
    pub approach_bonus: f32,

    // ── Steering ──
    /// Velocity-matching gain in moveToward
    pub steering_gain: f32,
    /// Gain turning heading error into desired spin
    pub turn_gain: f32,
    /// Cap on the desired angular velocity (rad/s)
    pub max_turn_rate: f32,
    /// Heading error (radians) treated as "facing"
    pub facing_tolerance: f32,
    /// Idle ships brake once drifting faster than this
    pub idle_drift_threshold: f32,
    pub patrol_speed: f32,
    pub flee_speed: f32,
    pub work_speed: f32,
    pub return_speed: f32,
    pub combat_speed: f32,
    /// Patrol waypoint counts as reached inside this distance
    pub arrival_distance: f32,
    /// Work states start slowing down inside this distance of the waypoint
    pub braking_distance: f32,
    /// Distance to home base that counts as arrived
    pub home_arrival_distance: f32,
    pub mining_range: f32,
    pub strafe_speed: f32,
    /// Broadside range is min combat distance plus this offset
    pub broadside_offset: f32,
    /// Allowed drift around the broadside range
    pub broadside_tolerance: f32,
    /// Seconds between defensive evasive bursts
    pub evasive_period: f32,
    /// Peak evasive burst acceleration (m/s²)
    pub evasive_strength: f32,

    // ── Scanning ──
    /// Radius of the tetrahedral probe pattern
    pub probe_spread: f32,
    /// Seconds a probe-less scan runs before giving up
    pub scan_duration: f32,
    /// Progress added per directional sweep
    pub directional_scan_strength: f32,
    /// Progress added per probe sweep
    pub probe_scan_strength: f32,
    pub explorer_scan_chance: f32,
    pub trader_scan_chance: f32,
    /// Wormholes at or above this class are high-danger
    pub high_wormhole_class: u8,
    pub high_class_entry_chance: f32,
    pub low_class_entry_chance: f32,

    /// Base seed for per-entity random sources
    pub seed: u64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            perception_radius: 2000.0,
            hostile_standing: -30.0,
            friendly_standing: 30.0,
            high_priority_distance: 500.0,
            approach_bonus: 0.2,

            steering_gain: 2.0,
            turn_gain: 2.0,
            max_turn_rate: 1.5,
            facing_tolerance: 0.02,
            idle_drift_threshold: 5.0,
            patrol_speed: 300.0,
            flee_speed: 500.0,
            work_speed: 250.0,
            return_speed: 350.0,
            combat_speed: 400.0,
            arrival_distance: 100.0,
            braking_distance: 200.0,
            home_arrival_distance: 100.0,
            mining_range: 150.0,
            strafe_speed: 150.0,
            broadside_offset: 200.0,
            broadside_tolerance: 50.0,
            evasive_period: 3.0,
            evasive_strength: 60.0,

            probe_spread: 1000.0,
            scan_duration: 30.0,
            directional_scan_strength: 0.25,
            probe_scan_strength: 0.5,
            explorer_scan_chance: 0.30,
            trader_scan_chance: 0.05,
            high_wormhole_class: 5,
            high_class_entry_chance: 0.5,
            low_class_entry_chance: 0.7,

            seed: 0x5AB5_7ACE,
        }
    }
}

impl BehaviorConfig {
    /// Parse a (possibly partial) JSON override document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
