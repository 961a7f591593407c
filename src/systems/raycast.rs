use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Collider, Disabled, LocalTransform};
use crate::physics::primitives::{ray_to_box, ray_to_sphere};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub entity: Entity,
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Cast a ray against every active body. Hits within `max_distance` come
/// back sorted nearest first. A zero direction hits nothing.
pub fn raycast_bodies(world: &World, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RaycastHit> {
    let Some(dir) = direction.try_normalize() else {
        return Vec::new();
    };
    let mut hits = Vec::new();

    for (entity, (local, collider, disabled)) in world
        .query::<(&LocalTransform, &Collider, Option<&Disabled>)>()
        .iter()
    {
        if disabled.is_some() {
            continue;
        }
        let center = local.position;

        let hit = match *collider {
            Collider::Sphere { radius } => ray_to_sphere(origin, dir, center, radius).map(|t| {
                let point = origin + dir * t;
                (t, point, (point - center).normalize_or_zero())
            }),
            Collider::Box { half_extents } => {
                ray_to_box(origin, dir, center - half_extents, center + half_extents)
                    .map(|h| (h.distance, h.point, h.normal))
            }
        };

        if let Some((distance, point, normal)) = hit {
            if distance <= max_distance {
                hits.push(RaycastHit {
                    entity,
                    distance,
                    point,
                    normal,
                });
            }
        }
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hits_are_sorted_nearest_first() {
        let mut world = World::new();
        let far = world.spawn((
            LocalTransform::new(Vec3::new(0.0, 0.0, 20.0)),
            Collider::Sphere { radius: 1.0 },
        ));
        let near = world.spawn((
            LocalTransform::new(Vec3::new(0.0, 0.0, 10.0)),
            Collider::Box { half_extents: Vec3::ONE },
        ));

        let hits = raycast_bodies(&world, Vec3::ZERO, Vec3::Z * 3.0, 100.0);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entity, near);
        assert_relative_eq!(hits[0].distance, 9.0, epsilon = 1e-4);
        assert_eq!(hits[0].normal, Vec3::NEG_Z);
        assert_eq!(hits[1].entity, far);
        assert_relative_eq!(hits[1].distance, 19.0, epsilon = 1e-4);
    }

    #[test]
    fn respects_max_distance_and_disabled() {
        let mut world = World::new();
        world.spawn((
            LocalTransform::new(Vec3::new(0.0, 0.0, 10.0)),
            Collider::Sphere { radius: 1.0 },
            Disabled,
        ));
        world.spawn((
            LocalTransform::new(Vec3::new(0.0, 0.0, 50.0)),
            Collider::Sphere { radius: 1.0 },
        ));
        assert!(raycast_bodies(&world, Vec3::ZERO, Vec3::Z, 30.0).is_empty());
    }

    #[test]
    fn zero_direction_hits_nothing() {
        let mut world = World::new();
        world.spawn((LocalTransform::new(Vec3::ZERO), Collider::Sphere { radius: 1.0 }));
        assert!(raycast_bodies(&world, Vec3::ZERO, Vec3::ZERO, 10.0).is_empty());
    }
}
