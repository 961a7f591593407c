use glam::Vec3;
use log::trace;

use crate::components::{Collider, CollisionKind, CollisionNotice, Material};
use crate::error::PhysicsError;
use crate::game::Prop;
use crate::physics::{PhysicsWorld, RigidBodyDesc};

/// (x, z, height) of each concrete block.
const OBSTACLES: [(f32, f32, f32); 4] = [
    (30.0, 25.0, 6.0),
    (-35.0, 20.0, 8.0),
    (20.0, -40.0, 5.0),
    (-25.0, -30.0, 7.0),
];

/// Barrels start a little above the ground and settle under gravity.
const BARRELS: [(f32, f32); 3] = [(12.0, 18.0), (-15.0, 10.0), (8.0, -20.0)];

const BARREL_RADIUS: f32 = 1.5;

/// Create the arena's static blocks and loose barrels in `physics`.
pub fn populate_arena(physics: &mut PhysicsWorld) -> Result<Vec<Prop>, PhysicsError> {
    let mut props = Vec::with_capacity(OBSTACLES.len() + BARRELS.len());
    let (floor, _) = physics.bounds();

    let concrete = Material::default();
    for &(x, z, h) in &OBSTACLES {
        let body = physics.create_body(RigidBodyDesc {
            position: Vec3::new(x, floor.y + h / 2.0, z),
            collider: Collider::Box {
                half_extents: Vec3::new(4.0, h / 2.0, 4.0),
            },
            is_static: true,
            use_gravity: false,
            ..Default::default()
        })?;
        props.push(Prop {
            body,
            material: concrete,
        });
    }

    let rust = Material::solid(Vec3::new(0.7, 0.25, 0.12));
    for (i, &(x, z)) in BARRELS.iter().enumerate() {
        let body = physics.create_body(RigidBodyDesc {
            position: Vec3::new(x, floor.y + BARREL_RADIUS + 2.0, z),
            mass: 20.0,
            collider: Collider::Sphere {
                radius: BARREL_RADIUS,
            },
            restitution: 0.3,
            on_collision: Some(Box::new(move |notice: &CollisionNotice| match notice.kind {
                CollisionKind::Boundary => trace!("barrel {i} touched the arena bounds"),
                CollisionKind::Body(other) => trace!("barrel {i} bumped {other:?}"),
            })),
            ..Default::default()
        })?;
        props.push(Prop {
            body,
            material: rust,
        });
    }

    Ok(props)
}
