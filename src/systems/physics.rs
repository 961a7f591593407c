use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{
    Acceleration, Collider, CollisionKind, Disabled, GravityAffected, LocalTransform, Mass,
    Restitution, Static, Velocity,
};
use super::collision::notify;

/// Phase 1: accumulate `gravity * mass` as acceleration (`force / mass`).
pub fn gravity_system(world: &mut World, gravity: Vec3) {
    for (_entity, (accel, mass, _gravity, stat, disabled)) in world.query_mut::<(
        &mut Acceleration,
        &Mass,
        &GravityAffected,
        Option<&Static>,
        Option<&Disabled>,
    )>() {
        if stat.is_some() || disabled.is_some() {
            continue;
        }
        let force = gravity * mass.0;
        accel.0 += force / mass.0;
    }
}

/// Phase 2: explicit Euler. Acceleration does not persist across ticks.
pub fn integration_system(world: &mut World, dt: f32) {
    for (_entity, (local, vel, accel, stat, disabled)) in world.query_mut::<(
        &mut LocalTransform,
        &mut Velocity,
        &mut Acceleration,
        Option<&Static>,
        Option<&Disabled>,
    )>() {
        if stat.is_some() || disabled.is_some() {
            continue;
        }
        vel.0 += accel.0 * dt;
        local.position += vel.0 * dt;
        accel.0 = Vec3::ZERO;
    }
}

/// Phase 3: flat per-tick velocity damping.
pub fn damping_system(world: &mut World, damping: f32) {
    for (_entity, (vel, stat, disabled)) in
        world.query_mut::<(&mut Velocity, Option<&Static>, Option<&Disabled>)>()
    {
        if stat.is_some() || disabled.is_some() {
            continue;
        }
        vel.0 *= damping;
    }
}

/// Phase 4: clamp dynamic bodies into the world box.
///
/// Axes are handled independently (X, Y, Z), so a body can bounce off
/// several faces in one tick. The offending velocity component is negated
/// and scaled by the body's restitution. Returns the bodies that touched a
/// bound, in `order`, after firing their callbacks with `Boundary`.
pub fn bounds_system(world: &mut World, order: &[Entity], min: Vec3, max: Vec3) -> Vec<Entity> {
    let mut touched = Vec::new();

    for &entity in order {
        let Ok((local, vel, collider, restitution, disabled)) = world.query_one_mut::<(
            &mut LocalTransform,
            &mut Velocity,
            &Collider,
            &Restitution,
            Option<&Disabled>,
        )>(entity) else {
            continue;
        };
        if disabled.is_some() {
            continue;
        }

        let extents = collider.extents();
        let mut hit = false;
        for axis in 0..3 {
            let ext = extents[axis];
            if local.position[axis] - ext < min[axis] {
                local.position[axis] = min[axis] + ext;
                vel.0[axis] = -vel.0[axis] * restitution.0;
                hit = true;
            } else if local.position[axis] + ext > max[axis] {
                local.position[axis] = max[axis] - ext;
                vel.0[axis] = -vel.0[axis] * restitution.0;
                hit = true;
            }
        }

        if hit {
            touched.push(entity);
        }
    }

    for &entity in &touched {
        log::trace!("body {entity:?} clamped to world bounds");
        notify(world, entity, CollisionKind::Boundary);
    }
    touched
}
