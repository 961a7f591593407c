use std::collections::VecDeque;

use glam::Vec3;
use log::{debug, info, warn};

use super::projectile::{
    DestroyReason, HitReport, HitResult, HitTest, Projectile, ProjectileEvent, ProjectileId, WorldBox,
};
use super::target::TargetId;
use super::targets::TargetQuery;
use crate::config::ProjectileConfig;

pub type HitCallback = Box<dyn FnMut(&HitReport)>;

/// Hit test over a target collection: the first active target (in
/// collection order) whose sphere touches the projectile wins.
struct FirstMatch<'a, T: TargetQuery> {
    targets: &'a mut T,
}

impl<T: TargetQuery> HitTest for FirstMatch<'_, T> {
    fn check(&mut self, projectile: &Projectile) -> Option<HitResult> {
        self.targets
            .active_targets()
            .find(|t| t.world_position().distance(projectile.position()) <= t.radius() + projectile.radius())
            .map(|t| HitResult {
                target_id: t.id(),
                target_kind: t.kind(),
            })
    }

    fn register_hit(&mut self, target: TargetId) -> bool {
        self.targets.hit_target(target)
    }
}

/// Owns live projectiles, hands out ids from a small ring and enforces the live cap.
pub struct ProjectileManager {
    live: VecDeque<Projectile>,
    retired: Vec<Projectile>,
    /// Set once an update finishes; the next fire, update or clear starts a fresh retired list.
    retired_stale: bool,
    config: ProjectileConfig,
    bounds: WorldBox,
    next_id: u32,
    clock: f32,
    on_hit: Option<HitCallback>,
}

impl ProjectileManager {
    /// `id_range` is raised to `max_live` if smaller, so live ids never collide.
    pub fn new(config: &ProjectileConfig) -> Self {
        let mut config = config.clone();
        config.max_live = config.max_live.max(1);
        if (config.id_range as usize) < config.max_live {
            warn!(
                "projectile id range {} below live cap {}, widening",
                config.id_range, config.max_live
            );
            config.id_range = config.max_live as u32;
        }
        let bounds = WorldBox {
            min: config.bounds_min,
            max: config.bounds_max,
        };
        Self {
            live: VecDeque::with_capacity(config.max_live),
            retired: Vec::new(),
            retired_stale: false,
            config,
            bounds,
            next_id: 0,
            clock: 0.0,
            on_hit: None,
        }
    }

    /// Called with every hit, right after the projectile that scored it updates.
    pub fn set_hit_callback(&mut self, callback: impl FnMut(&HitReport) + 'static) {
        self.on_hit = Some(Box::new(callback));
    }

    pub fn bounds(&self) -> WorldBox {
        self.bounds
    }

    fn allocate_id(&mut self) -> ProjectileId {
        let id = self.next_id;
        self.next_id = (self.next_id + 1) % self.config.id_range;
        id
    }

    /// Spawn a projectile. At the cap, the oldest live one is retired first.
    pub fn fire(&mut self, origin: Vec3, direction: Vec3) -> ProjectileId {
        self.open_retired();
        while self.live.len() >= self.config.max_live {
            let Some(mut oldest) = self.live.pop_front() else {
                break;
            };
            oldest.deactivate(DestroyReason::Manual);
            debug!("projectile {} evicted to make room", oldest.id());
            self.retired.push(oldest);
        }

        let id = self.allocate_id();
        self.live.push_back(Projectile::new(
            id,
            origin,
            direction,
            self.config.speed,
            self.config.radius,
            self.config.max_lifetime,
        ));
        debug!("projectile {id} fired from {origin:.1}");
        id
    }

    /// Advance every live projectile, then drop the ones that went inactive.
    pub fn update<T: TargetQuery>(&mut self, dt: f32, targets: &mut T) -> Vec<HitReport> {
        self.open_retired();
        self.clock += dt;

        let mut hit_test = FirstMatch { targets };
        let mut hits = Vec::new();
        for projectile in self.live.iter_mut() {
            match projectile.update(dt, self.clock, &self.bounds, &mut hit_test) {
                Some(ProjectileEvent::Hit(report)) => {
                    info!(
                        "projectile {} hit {} target {}",
                        report.projectile_id,
                        report.target_kind.name(),
                        report.target_id
                    );
                    if let Some(callback) = self.on_hit.as_mut() {
                        callback(&report);
                    }
                    hits.push(report);
                }
                Some(_) => {
                    if let Some(reason) = projectile.destroy_reason() {
                        debug!("projectile {} retired: {}", projectile.id(), reason.as_str());
                    }
                }
                None => {}
            }
        }

        let mut kept = VecDeque::with_capacity(self.live.len());
        for projectile in self.live.drain(..) {
            if projectile.is_active() {
                kept.push_back(projectile);
            } else {
                self.retired.push(projectile);
            }
        }
        self.live = kept;
        self.retired_stale = true;
        hits
    }

    fn open_retired(&mut self) {
        if self.retired_stale {
            self.retired.clear();
            self.retired_stale = false;
        }
    }

    /// Retire every live projectile.
    pub fn clear(&mut self) {
        self.open_retired();
        for mut projectile in self.live.drain(..) {
            projectile.deactivate(DestroyReason::Cleared);
            self.retired.push(projectile);
        }
    }

    /// Oldest first.
    pub fn live(&self) -> impl Iterator<Item = &Projectile> {
        self.live.iter()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Everything retired in the current frame: evictions and clears since
    /// the previous update, then whatever the last update pruned.
    pub fn retired(&self) -> &[Projectile] {
        &self.retired
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::game::{TargetKind, TargetManager};
    use crate::config::TargetConfig;

    fn manager() -> ProjectileManager {
        ProjectileManager::new(&ProjectileConfig::default())
    }

    fn empty_targets() -> TargetManager {
        TargetManager::new(&TargetConfig::default())
    }

    #[test]
    fn sixth_shot_evicts_the_oldest() {
        let mut projectiles = manager();
        for i in 0..5 {
            projectiles.fire(Vec3::new(i as f32, 2.0, 0.0), Vec3::Z);
        }
        let newest = projectiles.fire(Vec3::new(9.0, 2.0, 0.0), Vec3::Z);

        assert_eq!(projectiles.live_count(), 5);
        let ids: Vec<_> = projectiles.live().map(|p| p.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, newest]);
        assert_eq!(projectiles.retired().len(), 1);
        assert_eq!(projectiles.retired()[0].id(), 0);
        assert_eq!(projectiles.retired()[0].destroy_reason(), Some(DestroyReason::Manual));
    }

    #[test]
    fn eviction_survives_the_same_frames_update() {
        let mut targets = empty_targets();
        let mut projectiles = manager();
        for _ in 0..5 {
            projectiles.fire(Vec3::new(0.0, 2.0, 0.0), Vec3::Z);
            projectiles.update(1.0 / 60.0, &mut targets);
        }

        // Fire then update, the way a game frame does.
        projectiles.fire(Vec3::new(0.0, 2.0, 0.0), Vec3::Z);
        projectiles.update(1.0 / 60.0, &mut targets);
        let retired: Vec<_> = projectiles
            .retired()
            .iter()
            .map(|p| (p.id(), p.destroy_reason()))
            .collect();
        assert_eq!(retired, vec![(0, Some(DestroyReason::Manual))]);

        // The next frame starts a fresh list.
        projectiles.update(1.0 / 60.0, &mut targets);
        assert!(projectiles.retired().is_empty());
    }

    #[test]
    fn narrow_id_range_is_widened_to_the_cap() {
        let config = ProjectileConfig {
            max_live: 5,
            id_range: 2,
            ..Default::default()
        };
        let mut projectiles = ProjectileManager::new(&config);
        for _ in 0..5 {
            projectiles.fire(Vec3::ZERO, Vec3::Z);
        }
        let mut ids: Vec<_> = projectiles.live().map(|p| p.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn ids_cycle_through_the_ring() {
        let mut projectiles = manager();
        let ids: Vec<_> = (0..12).map(|_| projectiles.fire(Vec3::ZERO, Vec3::Z)).collect();
        assert_eq!(&ids[..], &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 1]);
    }

    #[test]
    fn first_target_in_order_wins() {
        let mut targets = empty_targets();
        let far = targets.add_target(TargetKind::Wood, Vec3::new(0.0, 2.0, 10.0));
        let near = targets.add_target(TargetKind::Metal, Vec3::new(0.0, 2.0, 2.0));

        let mut projectiles = manager();
        projectiles.fire(Vec3::new(0.0, 2.0, 0.0), Vec3::Z);
        let hits = projectiles.update(1.0 / 60.0, &mut targets);

        // Both spheres contain the projectile; collection order, not distance, decides.
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target_id, far);
        assert!(targets.get(far).unwrap().is_respawning());
        assert!(targets.get(near).unwrap().is_active());
        assert_eq!(projectiles.live_count(), 0);
    }

    #[test]
    fn hit_callback_sees_every_report() {
        let mut targets = empty_targets();
        targets.add_target(TargetKind::Stone, Vec3::new(0.0, 2.0, 0.0));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut projectiles = manager();
        projectiles.set_hit_callback(move |report| sink.borrow_mut().push(*report));
        projectiles.fire(Vec3::new(0.0, 2.0, 0.0), Vec3::X);
        projectiles.update(0.1, &mut targets);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].target_kind, TargetKind::Stone);
        assert!((seen[0].timestamp - 0.1).abs() < 1e-6);
    }

    #[test]
    fn pruned_after_all_updates() {
        let mut targets = empty_targets();
        let mut projectiles = manager();
        projectiles.fire(Vec3::new(149.0, 2.0, 0.0), Vec3::X);
        projectiles.fire(Vec3::ZERO, Vec3::Z);
        projectiles.update(0.1, &mut targets);

        assert_eq!(projectiles.live_count(), 1);
        assert_eq!(projectiles.retired().len(), 1);
        assert_eq!(projectiles.retired()[0].destroy_reason(), Some(DestroyReason::BoundaryHit));
    }

    #[test]
    fn clear_marks_everything_cleared() {
        let mut projectiles = manager();
        projectiles.fire(Vec3::ZERO, Vec3::Z);
        projectiles.fire(Vec3::ZERO, Vec3::X);
        projectiles.clear();

        assert_eq!(projectiles.live_count(), 0);
        assert!(projectiles
            .retired()
            .iter()
            .all(|p| p.destroy_reason() == Some(DestroyReason::Cleared)));
    }
}
