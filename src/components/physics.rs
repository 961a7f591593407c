use glam::Vec3;
use hecs::Entity;

/// Linear velocity in world space.
pub struct Velocity(pub Vec3);

/// Per-body acceleration, accumulated from forces and cleared every tick.
pub struct Acceleration(pub Vec3);

/// Body mass. Always positive; static bodies ignore it (infinite for impulses).
pub struct Mass(pub f32);

/// Marker: body is affected by world gravity.
pub struct GravityAffected;

/// Marker: body is immovable (infinite mass for collision response).
pub struct Static;

/// Marker: body is inactive. Skipped by every phase and by raycasts.
pub struct Disabled;

/// Collision shape attached to a body. Boxes are axis-aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
}

impl Collider {
    /// Half-size of the shape along each world axis.
    pub fn extents(&self) -> Vec3 {
        match *self {
            Collider::Sphere { radius } => Vec3::splat(radius),
            Collider::Box { half_extents } => half_extents,
        }
    }
}

/// Restitution coefficient (bounciness). 0.0 = no bounce, 1.0 = perfect bounce.
/// Pairs combine by taking the minimum.
pub struct Restitution(pub f32);

/// Surface friction coefficient, stored per body and reported in snapshots.
pub struct Friction(pub f32);

/// What a body ran into during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionKind {
    /// Clamped against one or more world-bound faces.
    Boundary,
    /// Touched another body (the payload).
    Body(Entity),
}

/// Payload handed to a body's collision callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionNotice {
    pub body: Entity,
    pub kind: CollisionKind,
}

pub type CollisionCallback = Box<dyn FnMut(&CollisionNotice) + Send + Sync>;

/// Optional per-body collision callback.
pub struct OnCollision(pub CollisionCallback);

/// Collision contact produced by the detection phase.
/// `contact_normal` is a unit vector pointing from `entity_a` toward `entity_b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub entity_a: Entity,
    pub entity_b: Entity,
    pub contact_normal: Vec3,
    pub penetration_depth: f32,
    pub contact_point: Vec3,
}
