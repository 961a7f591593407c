use std::f32::consts::TAU;

use glam::Vec3;
use log::{info, warn};

use super::target::{Target, TargetId, TargetKind};
use crate::config::TargetConfig;

/// What the projectile hit test sees of the target collection.
pub trait TargetQuery {
    /// Targets eligible for hit testing, in insertion order. The order
    /// decides which target wins when a projectile overlaps several.
    fn active_targets(&self) -> impl Iterator<Item = &Target>;

    /// Run the hit transition on `id`. `false` if it was already down or unknown.
    fn hit_target(&mut self, id: TargetId) -> bool;
}

/// Where a target was put and whether random sampling gave up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub fallback: bool,
}

/// Owns the targets; they are never destroyed, only knocked down and respawned.
pub struct TargetManager {
    targets: Vec<Target>,
    config: TargetConfig,
    rng: fastrand::Rng,
    next_id: TargetId,
}

impl TargetManager {
    pub fn new(config: &TargetConfig) -> Self {
        Self {
            targets: Vec::new(),
            config: config.clone(),
            rng: fastrand::Rng::with_seed(config.seed),
            next_id: 0,
        }
    }

    /// Add an active target at an explicit position.
    pub fn add_target(&mut self, kind: TargetKind, position: Vec3) -> TargetId {
        let id = self.next_id;
        self.next_id += 1;
        self.targets.push(Target::new(
            id,
            kind,
            position,
            self.config.radius,
            self.config.respawn_delay,
        ));
        id
    }

    /// Replace every target with `config.count` freshly placed ones,
    /// kinds cycling wood, stone, metal.
    pub fn spawn_initial(&mut self, tank_position: Vec3) {
        self.targets.clear();
        self.next_id = 0;
        for i in 0..self.config.count {
            let id = self.next_id;
            let placement = self.place(id, tank_position);
            self.add_target(TargetKind::ALL[i % TargetKind::ALL.len()], placement.position);
        }
        info!("spawned {} targets", self.targets.len());
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id() == id)
    }

    pub fn active_count(&self) -> usize {
        self.targets.iter().filter(|t| t.is_active()).count()
    }

    /// Tick respawn timers; targets whose timer ran out are re-placed.
    /// Returns the ids that came back this frame.
    pub fn update(&mut self, dt: f32, tank_position: Vec3) -> Vec<TargetId> {
        let mut respawned = Vec::new();
        for i in 0..self.targets.len() {
            if !self.targets[i].update(dt) {
                continue;
            }
            let id = self.targets[i].id();
            let placement = self.place(id, tank_position);
            self.targets[i].respawn_at(placement.position);
            info!(
                "target {id} respawned at {:.1}{}",
                placement.position,
                if placement.fallback { " (fallback slot)" } else { "" }
            );
            respawned.push(id);
        }
        respawned
    }

    /// Pick a position for target `id`.
    ///
    /// Samples a uniform angle and a radius inside the ring band, rejecting
    /// points too close to another active target or to the tank. After
    /// `max_attempts` misses it falls back to the first free angular slot.
    pub fn place(&mut self, id: TargetId, tank_position: Vec3) -> Placement {
        let c = &self.config;
        for _ in 0..c.max_attempts {
            let angle = self.rng.f32() * TAU;
            let radius = c.ring_min + self.rng.f32() * (c.ring_max - c.ring_min);
            let position = self.ring_point(angle, radius);
            if self.is_clear(id, position, tank_position) {
                return Placement {
                    position,
                    fallback: false,
                };
            }
        }

        let position = self.fallback_slot(id);
        warn!("target {id}: no clear spot after {} samples, using fallback slot", c.max_attempts);
        Placement {
            position,
            fallback: true,
        }
    }

    fn ring_point(&self, angle: f32, radius: f32) -> Vec3 {
        Vec3::new(
            angle.cos() * radius,
            self.config.spawn_height,
            angle.sin() * radius,
        )
    }

    fn is_clear(&self, id: TargetId, position: Vec3, tank_position: Vec3) -> bool {
        if position.distance(tank_position) < self.config.min_tank_distance {
            return false;
        }
        self.targets
            .iter()
            .filter(|t| t.id() != id && t.is_active())
            .all(|t| t.world_position().distance(position) >= self.config.min_separation)
    }

    /// First slot on the mid-ring no other active target sits on.
    fn fallback_slot(&self, id: TargetId) -> Vec3 {
        let slots = self.config.fallback_slots.max(1);
        let radius = (self.config.ring_min + self.config.ring_max) * 0.5;
        let slot_point = |slot: u32| self.ring_point(slot as f32 * TAU / slots as f32, radius);

        (0..slots)
            .map(slot_point)
            .find(|&p| {
                self.targets
                    .iter()
                    .filter(|t| t.id() != id && t.is_active())
                    .all(|t| t.world_position().distance(p) >= self.config.min_separation)
            })
            .unwrap_or_else(|| slot_point(id % slots))
    }
}

impl TargetQuery for TargetManager {
    fn active_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| t.is_active())
    }

    fn hit_target(&mut self, id: TargetId) -> bool {
        match self.targets.iter_mut().find(|t| t.id() == id) {
            Some(target) => target.hit(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TargetConfig {
        TargetConfig::default()
    }

    #[test]
    fn initial_targets_keep_their_distance() {
        let mut manager = TargetManager::new(&config());
        manager.spawn_initial(Vec3::ZERO);
        let targets = manager.targets();
        assert_eq!(targets.len(), 5);
        assert_eq!(targets[1].kind(), TargetKind::Stone);

        for t in targets {
            let flat = Vec3::new(t.world_position().x, 0.0, t.world_position().z);
            assert!(flat.length() >= 40.0 - 1e-3 && flat.length() <= 120.0 + 1e-3);
            assert_eq!(t.world_position().y, 2.0);
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let mut a = TargetManager::new(&config());
        let mut b = TargetManager::new(&config());
        a.spawn_initial(Vec3::ZERO);
        b.spawn_initial(Vec3::ZERO);
        let pa: Vec<Vec3> = a.targets().iter().map(|t| t.world_position()).collect();
        let pb: Vec<Vec3> = b.targets().iter().map(|t| t.world_position()).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn respawn_after_delay() {
        let mut manager = TargetManager::new(&config());
        let id = manager.add_target(TargetKind::Metal, Vec3::new(60.0, 2.0, 0.0));
        assert!(manager.hit_target(id));
        assert!(!manager.hit_target(id));
        assert_eq!(manager.active_targets().count(), 0);

        assert!(manager.update(2.0, Vec3::ZERO).is_empty());
        assert_eq!(manager.update(1.5, Vec3::ZERO), vec![id]);
        assert!(manager.get(id).unwrap().is_active());
    }

    #[test]
    fn impossible_constraints_use_fallback_slot() {
        let mut cfg = config();
        // Nothing on the ring can be this far from the tank.
        cfg.min_tank_distance = 1000.0;
        let mut manager = TargetManager::new(&cfg);
        manager.add_target(TargetKind::Wood, Vec3::new(80.0, 2.0, 0.0));

        let placement = manager.place(99, Vec3::ZERO);
        assert!(placement.fallback);
        // Slot 0 sits on the existing target, so slot 1 is taken.
        let expected = Vec3::new((TAU / 8.0).cos() * 80.0, 2.0, (TAU / 8.0).sin() * 80.0);
        assert!(placement.position.abs_diff_eq(expected, 1e-3));
    }

    #[test]
    fn unknown_target_cannot_be_hit() {
        let mut manager = TargetManager::new(&config());
        assert!(!manager.hit_target(42));
    }
}
