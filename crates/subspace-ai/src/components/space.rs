//! Space objects that are not ships: asteroids, scan signatures, and the
//! scanner hardware that reveals them.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::common::Vec3;

/// Ore kinds an asteroid can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Iron,
    Titanium,
    Naonite,
    Trinium,
    Xanion,
    Ogonite,
    Avorion,
}

/// A mineable asteroid
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Asteroid {
    pub position: Vec3,
    pub resource: ResourceKind,
    pub remaining: f32,
}

impl Asteroid {
    pub fn new(position: Vec3, resource: ResourceKind, remaining: f32) -> Self {
        Self {
            position,
            resource,
            remaining,
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// What a scan signature turns out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureKind {
    /// Wormhole with danger class 1 (tame) to 6 (lethal)
    Wormhole { class: u8 },
    Anomaly,
    Derelict,
}

impl SignatureKind {
    pub fn wormhole_class(&self) -> Option<u8> {
        match self {
            SignatureKind::Wormhole { class } => Some(*class),
            _ => None,
        }
    }
}

/// A hidden object in space that scanners can resolve
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Signature {
    pub position: Vec3,
    pub kind: SignatureKind,
    /// Multiplier on scan progress (lower is harder to resolve)
    pub strength: f32,
}

impl Signature {
    pub fn wormhole(position: Vec3, class: u8) -> Self {
        Self {
            position,
            kind: SignatureKind::Wormhole { class },
            strength: 1.0,
        }
    }
}

/// A signature this scanner has picked up, with its resolution progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedSignature {
    pub signature: Entity,
    pub kind: SignatureKind,
    pub position: Vec3,
    /// 0.0 (faint blip) to 1.0 (fully resolved)
    pub progress: f32,
    /// Whether the wormhole entry decision has already been made
    pub entry_decided: bool,
}

impl TrackedSignature {
    pub fn is_resolved(&self) -> bool {
        self.progress >= 1.0
    }
}

/// Scanner suite: directional scanner plus a probe launcher
#[derive(Debug, Clone)]
pub struct ScannerState {
    pub scan_range: f32,
    /// Cone half-angle of the directional scan, in degrees
    pub scan_angle: f32,
    pub directional_cooldown: f32,
    pub directional_timer: f32,
    pub probe_cooldown: f32,
    pub probe_timer: f32,
    pub probe_range: f32,
    pub available_probes: u32,
    pub deployed_probes: Vec<Vec3>,
    pub signatures: Vec<TrackedSignature>,
    /// Fully resolved wormholes, in discovery order
    pub discoveries: Vec<Entity>,
}

impl Default for ScannerState {
    fn default() -> Self {
        Self {
            scan_range: 5000.0,
            scan_angle: 30.0,
            directional_cooldown: 5.0,
            directional_timer: 0.0,
            probe_cooldown: 10.0,
            probe_timer: 0.0,
            probe_range: 1500.0,
            available_probes: 8,
            deployed_probes: Vec::new(),
            signatures: Vec::new(),
            discoveries: Vec::new(),
        }
    }
}

impl ScannerState {
    pub fn with_probes(mut self, count: u32) -> Self {
        self.available_probes = count;
        self
    }

    /// Launch probes to the given positions. Fails without side effects if
    /// the launcher does not hold enough probes.
    pub fn deploy_probes(&mut self, positions: &[Vec3]) -> bool {
        let needed = positions.len() as u32;
        if needed == 0 || needed > self.available_probes {
            return false;
        }
        self.available_probes -= needed;
        self.deployed_probes.extend_from_slice(positions);
        self.probe_timer = 0.0;
        true
    }

    /// Return every deployed probe to the launcher
    pub fn recall_probes(&mut self) -> usize {
        let recalled = self.deployed_probes.len();
        self.available_probes += recalled as u32;
        self.deployed_probes.clear();
        recalled
    }

    pub fn tracked(&self, signature: Entity) -> Option<&TrackedSignature> {
        self.signatures.iter().find(|s| s.signature == signature)
    }

    /// Stop tracking signatures `exists` no longer vouches for. Returns how
    /// many were dropped.
    pub fn forget_lost(&mut self, mut exists: impl FnMut(Entity) -> bool) -> usize {
        let before = self.signatures.len();
        self.signatures.retain(|s| exists(s.signature));
        before - self.signatures.len()
    }

    /// Add scan progress to a signature, tracking it if it is new.
    /// Returns true when this call resolved it.
    pub fn advance(&mut self, signature: Entity, sig: &Signature, amount: f32) -> bool {
        let entry = match self.signatures.iter().position(|s| s.signature == signature) {
            Some(i) => &mut self.signatures[i],
            None => {
                self.signatures.push(TrackedSignature {
                    signature,
                    kind: sig.kind,
                    position: sig.position,
                    progress: 0.0,
                    entry_decided: false,
                });
                let last = self.signatures.len() - 1;
                &mut self.signatures[last]
            }
        };
        let was_resolved = entry.is_resolved();
        entry.progress = (entry.progress + amount * sig.strength.max(0.0)).min(1.0);
        entry.position = sig.position;
        !was_resolved && entry.is_resolved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::World;

    #[test]
    fn test_probe_inventory() {
        let mut scanner = ScannerState::default().with_probes(4);
        let spots = [Vec3::ZERO; 4];
        assert!(scanner.deploy_probes(&spots));
        assert_eq!(scanner.available_probes, 0);
        assert!(!scanner.deploy_probes(&spots[..1]));

        assert_eq!(scanner.recall_probes(), 4);
        assert_eq!(scanner.available_probes, 4);
        assert!(scanner.deployed_probes.is_empty());
    }

    #[test]
    fn test_advance_resolves_once() {
        let mut world = World::new();
        let sig = Signature::wormhole(Vec3::new(10.0, 0.0, 0.0), 3);
        let e = world.spawn((sig,));

        let mut scanner = ScannerState::default();
        assert!(!scanner.advance(e, &sig, 0.6));
        assert!(scanner.advance(e, &sig, 0.6));
        assert!(!scanner.advance(e, &sig, 0.6));
        assert_eq!(scanner.signatures.len(), 1);
        assert_eq!(scanner.tracked(e).map(|t| t.progress), Some(1.0));
        assert!(scanner.tracked(e).is_some_and(TrackedSignature::is_resolved));
    }

    #[test]
    fn test_forget_lost_signatures() {
        let mut world = World::new();
        let sig = Signature::wormhole(Vec3::ZERO, 2);
        let kept = world.spawn((sig,));
        let gone = world.spawn((sig,));
        let mut scanner = ScannerState::default();
        scanner.advance(kept, &sig, 0.2);
        scanner.advance(gone, &sig, 0.2);
        world.despawn(gone).unwrap();

        assert_eq!(scanner.forget_lost(|e| world.contains(e)), 1);
        assert!(scanner.tracked(kept).is_some());
        assert!(scanner.tracked(gone).is_none());
    }

    #[test]
    fn test_asteroid_depletion() {
        let rock = Asteroid::new(Vec3::ZERO, ResourceKind::Iron, 0.0);
        assert!(rock.is_depleted());
        assert_eq!(SignatureKind::Wormhole { class: 5 }.wormhole_class(), Some(5));
        assert_eq!(SignatureKind::Anomaly.wormhole_class(), None);
    }
}
