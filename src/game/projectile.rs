//! Projectiles and their per-frame update.
//!
//! Hit detection is not a separate collision pass: the projectile asks a
//! [`HitTest`] strategy about targets right after it moves, and a hit ends
//! its update for that frame. Bounds and lifetime are only looked at when
//! nothing was hit, so a projectile makes at most one state change per
//! frame and a hit always wins.

use glam::{Mat4, Quat, Vec3};

use super::target::{TargetId, TargetKind};

pub type ProjectileId = u32;

/// Why a projectile stopped being active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestroyReason {
    TargetHit,
    BoundaryHit,
    Expired,
    /// Retired by its owner, e.g. evicted to make room for a new shot.
    Manual,
    /// Removed by a bulk clear (game reset).
    Cleared,
}

impl DestroyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestroyReason::TargetHit => "target_hit",
            DestroyReason::BoundaryHit => "boundary_hit",
            DestroyReason::Expired => "expired",
            DestroyReason::Manual => "manual",
            DestroyReason::Cleared => "cleared",
        }
    }
}

/// Which target a hit test matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitResult {
    pub target_id: TargetId,
    pub target_kind: TargetKind,
}

/// Snapshot handed to hit listeners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitReport {
    pub projectile_id: ProjectileId,
    pub target_id: TargetId,
    pub target_kind: TargetKind,
    /// Seconds on the owning manager's clock.
    pub timestamp: f32,
}

/// Hit-check strategy injected into [`Projectile::update`] by the owner.
pub trait HitTest {
    /// Target the projectile currently overlaps, if any.
    fn check(&mut self, projectile: &Projectile) -> Option<HitResult>;

    /// Run the struck target's hit transition.
    fn register_hit(&mut self, target: TargetId) -> bool;
}

/// What happened to a projectile during one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileEvent {
    Hit(HitReport),
    OutOfBounds,
    Expired,
}

/// Axis-aligned box projectiles must stay inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl WorldBox {
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[derive(Debug, Clone)]
pub struct Projectile {
    id: ProjectileId,
    position: Vec3,
    direction: Vec3,
    speed: f32,
    radius: f32,
    active: bool,
    age: f32,
    max_lifetime: f32,
    destroy_reason: Option<DestroyReason>,
    /// Lookup key only; resolved against the target manager when needed.
    hit_target: Option<TargetId>,
    transform: Mat4,
}

impl Projectile {
    /// `direction` is normalized; a zero direction falls back to +Z.
    pub fn new(
        id: ProjectileId,
        position: Vec3,
        direction: Vec3,
        speed: f32,
        radius: f32,
        max_lifetime: f32,
    ) -> Self {
        let mut projectile = Self {
            id,
            position,
            direction: direction.try_normalize().unwrap_or(Vec3::Z),
            speed,
            radius,
            active: true,
            age: 0.0,
            max_lifetime,
            destroy_reason: None,
            hit_target: None,
            transform: Mat4::IDENTITY,
        };
        projectile.update_transform();
        projectile
    }

    pub fn id(&self) -> ProjectileId {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn destroy_reason(&self) -> Option<DestroyReason> {
        self.destroy_reason
    }

    pub fn hit_target(&self) -> Option<TargetId> {
        self.hit_target
    }

    /// Model matrix for a unit sphere.
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Retire the projectile. Only the first call has any effect.
    pub fn deactivate(&mut self, reason: DestroyReason) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.destroy_reason = Some(reason);
        true
    }

    fn update_transform(&mut self) {
        self.transform =
            Mat4::from_scale_rotation_translation(Vec3::splat(self.radius), Quat::IDENTITY, self.position);
    }

    /// One frame: move, test for hits, then bounds, then lifetime.
    pub fn update(
        &mut self,
        dt: f32,
        now: f32,
        bounds: &WorldBox,
        hit_test: &mut dyn HitTest,
    ) -> Option<ProjectileEvent> {
        if !self.active {
            return None;
        }

        self.position += self.direction * self.speed * dt;
        self.update_transform();

        if let Some(hit) = hit_test.check(self) {
            self.deactivate(DestroyReason::TargetHit);
            self.hit_target = Some(hit.target_id);
            if !hit_test.register_hit(hit.target_id) {
                log::debug!("projectile {} hit target {} which was already down", self.id, hit.target_id);
            }
            return Some(ProjectileEvent::Hit(HitReport {
                projectile_id: self.id,
                target_id: hit.target_id,
                target_kind: hit.target_kind,
                timestamp: now,
            }));
        }

        if !bounds.contains(self.position) {
            self.deactivate(DestroyReason::BoundaryHit);
            return Some(ProjectileEvent::OutOfBounds);
        }

        self.age += dt;
        if self.age > self.max_lifetime {
            self.deactivate(DestroyReason::Expired);
            return Some(ProjectileEvent::Expired);
        }

        None
    }
}
