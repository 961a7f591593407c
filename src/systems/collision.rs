use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{
    Collider, CollisionEvent, CollisionKind, CollisionNotice, Disabled, LocalTransform, Mass,
    OnCollision, Restitution, Static, Velocity,
};
use crate::physics::primitives::{sphere_to_box, sphere_to_sphere, Contact};

/// Copy of the state one pair test needs, read out so no borrow is held
/// while the other body is inspected.
struct BodyState {
    entity: Entity,
    position: Vec3,
    velocity: Vec3,
    inverse_mass: f32,
    collider: Collider,
    restitution: f32,
}

impl BodyState {
    /// `None` for missing or disabled bodies.
    fn read(world: &mut World, entity: Entity) -> Option<Self> {
        let (local, vel, mass, collider, restitution, stat, disabled) = world
            .query_one_mut::<(
                &LocalTransform,
                &Velocity,
                &Mass,
                &Collider,
                &Restitution,
                Option<&Static>,
                Option<&Disabled>,
            )>(entity)
            .ok()?;
        if disabled.is_some() {
            return None;
        }
        Some(Self {
            entity,
            position: local.position,
            velocity: vel.0,
            // Static bodies have infinite mass.
            inverse_mass: if stat.is_some() { 0.0 } else { 1.0 / mass.0 },
            collider: *collider,
            restitution: restitution.0,
        })
    }

    fn write(&self, world: &mut World) {
        if self.inverse_mass == 0.0 {
            return;
        }
        if let Ok((local, vel)) =
            world.query_one_mut::<(&mut LocalTransform, &mut Velocity)>(self.entity)
        {
            local.position = self.position;
            vel.0 = self.velocity;
        }
    }
}

/// Narrow phase for one pair. The returned normal points from `a` toward `b`.
fn test_pair(a: &BodyState, b: &BodyState) -> Option<Contact> {
    match (a.collider, b.collider) {
        (Collider::Sphere { radius: ra }, Collider::Sphere { radius: rb }) => {
            sphere_to_sphere(a.position, ra, b.position, rb)
        }
        // sphere_to_box reports box -> sphere, i.e. B -> A here.
        (Collider::Sphere { radius }, Collider::Box { half_extents }) => {
            sphere_to_box(a.position, radius, b.position, half_extents).map(|c| Contact {
                normal: -c.normal,
                ..c
            })
        }
        (Collider::Box { half_extents }, Collider::Sphere { radius }) => {
            sphere_to_box(b.position, radius, a.position, half_extents)
        }
        // Box vs box is not simulated.
        (Collider::Box { .. }, Collider::Box { .. }) => None,
    }
}

/// Fire `entity`'s collision callback, if it has one.
pub(crate) fn notify(world: &mut World, entity: Entity, kind: CollisionKind) {
    if let Ok(callback) = world.query_one_mut::<&mut OnCollision>(entity) {
        (callback.0)(&CollisionNotice { body: entity, kind });
    }
}

/// Detect and resolve one pair in place. Returns the contact if there was one.
fn resolve_pair(world: &mut World, entity_a: Entity, entity_b: Entity) -> Option<CollisionEvent> {
    let mut a = BodyState::read(world, entity_a)?;
    let mut b = BodyState::read(world, entity_b)?;
    let contact = test_pair(&a, &b)?;

    let total_inverse = a.inverse_mass + b.inverse_mass;
    if total_inverse <= 0.0 {
        return None;
    }
    let n = contact.normal;

    // Positional correction, split by inverse mass. Static side never moves.
    a.position -= n * (contact.penetration * a.inverse_mass / total_inverse);
    b.position += n * (contact.penetration * b.inverse_mass / total_inverse);

    // Positive = already separating; leave velocities alone.
    let velocity_along_normal = (b.velocity - a.velocity).dot(n);
    if velocity_along_normal <= 0.0 {
        let e = a.restitution.min(b.restitution);
        let j = -(1.0 + e) * velocity_along_normal / total_inverse;
        a.velocity -= n * (j * a.inverse_mass);
        b.velocity += n * (j * b.inverse_mass);
    }

    a.write(world);
    b.write(world);

    notify(world, entity_a, CollisionKind::Body(entity_b));
    notify(world, entity_b, CollisionKind::Body(entity_a));

    Some(CollisionEvent {
        entity_a,
        entity_b,
        contact_normal: n,
        penetration_depth: contact.penetration,
        contact_point: contact.point,
    })
}

/// Phase 5: brute-force pairs, resolved as they are found.
///
/// Dynamic-dynamic pairs (i < j) first, then every dynamic body against
/// every static body, both in insertion order. The returned events keep
/// that order. `contact_normal` always points from `entity_a` to `entity_b`:
/// - A is pushed along -normal
/// - B is pushed along +normal
pub fn collision_system(world: &mut World, dynamic: &[Entity], statics: &[Entity]) -> Vec<CollisionEvent> {
    let mut events = Vec::new();

    for i in 0..dynamic.len() {
        for j in (i + 1)..dynamic.len() {
            if let Some(event) = resolve_pair(world, dynamic[i], dynamic[j]) {
                events.push(event);
            }
        }
    }

    for &a in dynamic {
        for &b in statics {
            if let Some(event) = resolve_pair(world, a, b) {
                events.push(event);
            }
        }
    }

    events
}
