//! Faction standings and the hostility rule perception uses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::components::Faction;
use crate::config::BehaviorConfig;

/// How one faction regards another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Hostile,
    Neutral,
    Friendly,
}

/// Stored standings, keyed by (observer faction, other faction).
/// Standings run from -100 (war) to 100 (allied).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReputationTable {
    standings: HashMap<String, HashMap<String, f32>>,
}

impl ReputationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_standing(&mut self, observer: &str, other: &str, standing: f32) {
        self.standings
            .entry(observer.to_string())
            .or_default()
            .insert(other.to_string(), standing.clamp(-100.0, 100.0));
    }

    /// Set the same standing in both directions
    pub fn set_mutual(&mut self, a: &str, b: &str, standing: f32) {
        self.set_standing(a, b, standing);
        self.set_standing(b, a, standing);
    }

    pub fn standing(&self, observer: &str, other: &str) -> Option<f32> {
        self.standings.get(observer)?.get(other).copied()
    }

    /// Classify `other` from the point of view of `observer`.
    ///
    /// A stored standing wins. Without one, members of the same faction are
    /// friendly and two different factions are hostile unless either side is
    /// the Neutral faction.
    pub fn disposition(&self, observer: &Faction, other: &Faction, config: &BehaviorConfig) -> Disposition {
        if let Some(standing) = self.standing(&observer.name, &other.name) {
            return if standing < config.hostile_standing {
                Disposition::Hostile
            } else if standing > config.friendly_standing {
                Disposition::Friendly
            } else {
                Disposition::Neutral
            };
        }

        if observer.name == other.name {
            Disposition::Friendly
        } else if observer.is_neutral() || other.is_neutral() {
            Disposition::Neutral
        } else {
            Disposition::Hostile
        }
    }
}
