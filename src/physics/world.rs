use glam::Vec3;
use hecs::{Entity, EntityBuilder, World};
use log::{debug, warn};

use crate::components::{
    Acceleration, Collider, CollisionCallback, CollisionEvent, Disabled, Friction,
    GravityAffected, LocalTransform, Mass, OnCollision, Restitution, Static, Velocity,
};
use crate::config::PhysicsConfig;
use crate::error::PhysicsError;
use crate::systems::{
    bounds_system, collision_system, damping_system, gravity_system, integration_system,
    raycast_bodies, RaycastHit,
};

/// Stable reference to a body. Stale after `remove_body` or `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub Entity);

/// Factory input for [`PhysicsWorld::create_body`]. Missing fields come from `Default`.
pub struct RigidBodyDesc {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub collider: Collider,
    pub is_static: bool,
    pub use_gravity: bool,
    pub active: bool,
    pub restitution: f32,
    pub friction: f32,
    pub on_collision: Option<CollisionCallback>,
}

impl Default for RigidBodyDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            mass: 1.0,
            collider: Collider::Sphere { radius: 1.0 },
            is_static: false,
            use_gravity: true,
            active: true,
            restitution: 0.5,
            friction: 0.3,
            on_collision: None,
        }
    }
}

/// Read-only copy of a body's state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    pub handle: BodyHandle,
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub collider: Collider,
    pub restitution: f32,
    pub friction: f32,
    pub is_static: bool,
    pub use_gravity: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhysicsStats {
    pub dynamic_bodies: usize,
    pub static_bodies: usize,
    pub active_bodies: usize,
    pub contacts_last_step: usize,
}

/// Owns every rigid body and advances them one tick at a time.
pub struct PhysicsWorld {
    world: World,
    /// Insertion order fixes the pair order of the collision phase.
    dynamic: Vec<Entity>,
    statics: Vec<Entity>,
    gravity: Vec3,
    damping: f32,
    bounds_min: Vec3,
    bounds_max: Vec3,
    contacts_last_step: usize,
}

impl PhysicsWorld {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            world: World::new(),
            dynamic: Vec::new(),
            statics: Vec::new(),
            gravity: config.gravity,
            damping: config.damping,
            bounds_min: config.bounds_min,
            bounds_max: config.bounds_max,
            contacts_last_step: 0,
        }
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.bounds_min, self.bounds_max)
    }

    pub fn set_bounds(&mut self, min: Vec3, max: Vec3) {
        self.bounds_min = min;
        self.bounds_max = max;
    }

    // ==================== Bodies ====================

    pub fn create_body(&mut self, desc: RigidBodyDesc) -> Result<BodyHandle, PhysicsError> {
        if !(desc.mass > 0.0 && desc.mass.is_finite()) {
            warn!("rejecting rigid body with mass {}", desc.mass);
            return Err(PhysicsError::InvalidMass(desc.mass));
        }

        // A static body never carries motion.
        let velocity = if desc.is_static { Vec3::ZERO } else { desc.velocity };

        let mut builder = EntityBuilder::new();
        builder.add(LocalTransform::new(desc.position));
        builder.add(Velocity(velocity));
        builder.add(Acceleration(Vec3::ZERO));
        builder.add(Mass(desc.mass));
        builder.add(desc.collider);
        builder.add(Restitution(desc.restitution));
        builder.add(Friction(desc.friction));
        if desc.is_static {
            builder.add(Static);
        }
        if desc.use_gravity {
            builder.add(GravityAffected);
        }
        if !desc.active {
            builder.add(Disabled);
        }
        if let Some(callback) = desc.on_collision {
            builder.add(OnCollision(callback));
        }

        let entity = self.world.spawn(builder.build());
        if desc.is_static {
            self.statics.push(entity);
        } else {
            self.dynamic.push(entity);
        }
        debug!(
            "created {} body {entity:?} at {}",
            if desc.is_static { "static" } else { "dynamic" },
            desc.position
        );
        Ok(BodyHandle(entity))
    }

    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<(), PhysicsError> {
        self.world
            .despawn(handle.0)
            .map_err(|_| PhysicsError::BodyNotFound(handle))?;
        self.dynamic.retain(|&e| e != handle.0);
        self.statics.retain(|&e| e != handle.0);
        Ok(())
    }

    pub fn set_active(&mut self, handle: BodyHandle, active: bool) -> Result<(), PhysicsError> {
        self.ensure(handle)?;
        // The handle was just checked, so neither call can fail; removing an
        // absent marker is also fine.
        if active {
            self.world.remove_one::<Disabled>(handle.0).ok();
        } else {
            // insert_one replaces an existing marker
            self.world.insert_one(handle.0, Disabled).ok();
        }
        Ok(())
    }

    /// Adds `force / mass` to the body's acceleration for the next tick.
    /// No-op for static or inactive bodies.
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec3) -> Result<(), PhysicsError> {
        let (accel, mass, stat, disabled) = self
            .world
            .query_one_mut::<(&mut Acceleration, &Mass, Option<&Static>, Option<&Disabled>)>(handle.0)
            .map_err(|_| PhysicsError::BodyNotFound(handle))?;
        if stat.is_none() && disabled.is_none() {
            accel.0 += force / mass.0;
        }
        Ok(())
    }

    /// Adds `impulse / mass` straight to the velocity.
    /// No-op for static or inactive bodies.
    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3) -> Result<(), PhysicsError> {
        let (vel, mass, stat, disabled) = self
            .world
            .query_one_mut::<(&mut Velocity, &Mass, Option<&Static>, Option<&Disabled>)>(handle.0)
            .map_err(|_| PhysicsError::BodyNotFound(handle))?;
        if stat.is_none() && disabled.is_none() {
            vel.0 += impulse / mass.0;
        }
        Ok(())
    }

    pub fn body(&self, handle: BodyHandle) -> Option<BodySnapshot> {
        let mut query = self
            .world
            .query_one::<(
                &LocalTransform,
                &Velocity,
                &Mass,
                &Collider,
                &Restitution,
                &Friction,
                Option<&Static>,
                Option<&GravityAffected>,
                Option<&Disabled>,
            )>(handle.0)
            .ok()?;
        let (local, vel, mass, collider, restitution, friction, stat, gravity, disabled) =
            query.get()?;
        Some(BodySnapshot {
            handle,
            position: local.position,
            velocity: vel.0,
            mass: mass.0,
            collider: *collider,
            restitution: restitution.0,
            friction: friction.0,
            is_static: stat.is_some(),
            use_gravity: gravity.is_some(),
            active: disabled.is_none(),
        })
    }

    /// Every body, dynamic first, each group in insertion order.
    pub fn bodies(&self) -> Vec<BodySnapshot> {
        self.dynamic
            .iter()
            .chain(self.statics.iter())
            .filter_map(|&e| self.body(BodyHandle(e)))
            .collect()
    }

    pub fn stats(&self) -> PhysicsStats {
        let active_bodies = self
            .dynamic
            .iter()
            .chain(self.statics.iter())
            .filter(|&&e| self.world.get::<&Disabled>(e).is_err())
            .count();
        PhysicsStats {
            dynamic_bodies: self.dynamic.len(),
            static_bodies: self.statics.len(),
            active_bodies,
            contacts_last_step: self.contacts_last_step,
        }
    }

    /// Ray against every active body, nearest hit first.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<(BodyHandle, RaycastHit)> {
        raycast_bodies(&self.world, origin, direction, max_distance)
            .into_iter()
            .map(|hit| (BodyHandle(hit.entity), hit))
            .collect()
    }

    pub fn clear(&mut self) {
        self.world.clear();
        self.dynamic.clear();
        self.statics.clear();
        self.contacts_last_step = 0;
    }

    // ==================== Simulation ====================

    /// Advance one tick. Phase order is fixed:
    /// gravity, integration, damping, world bounds, collisions.
    pub fn step(&mut self, dt: f32) -> Vec<CollisionEvent> {
        gravity_system(&mut self.world, self.gravity);
        integration_system(&mut self.world, dt);
        damping_system(&mut self.world, self.damping);
        bounds_system(&mut self.world, &self.dynamic, self.bounds_min, self.bounds_max);
        let events = collision_system(&mut self.world, &self.dynamic, &self.statics);
        self.contacts_last_step = events.len();
        events
    }

    fn ensure(&self, handle: BodyHandle) -> Result<(), PhysicsError> {
        if self.world.contains(handle.0) {
            Ok(())
        } else {
            Err(PhysicsError::BodyNotFound(handle))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{CollisionKind, CollisionNotice};
    use approx::assert_relative_eq;
    use std::sync::{Arc, Mutex};

    fn still_world() -> PhysicsWorld {
        PhysicsWorld::new(&PhysicsConfig {
            gravity: Vec3::ZERO,
            damping: 1.0,
            ..Default::default()
        })
    }

    #[test]
    fn factory_defaults() {
        let mut physics = still_world();
        let handle = physics.create_body(RigidBodyDesc::default()).unwrap();
        let body = physics.body(handle).unwrap();
        assert_eq!(body.mass, 1.0);
        assert_eq!(body.collider, Collider::Sphere { radius: 1.0 });
        assert!(body.active && body.use_gravity && !body.is_static);
    }

    #[test]
    fn rejects_non_positive_mass() {
        let mut physics = still_world();
        let result = physics.create_body(RigidBodyDesc {
            mass: 0.0,
            ..Default::default()
        });
        assert!(matches!(result, Err(PhysicsError::InvalidMass(_))));
    }

    #[test]
    fn static_body_drops_initial_velocity() {
        let mut physics = still_world();
        let wall = physics
            .create_body(RigidBodyDesc {
                is_static: true,
                velocity: Vec3::X,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(physics.body(wall).unwrap().velocity, Vec3::ZERO);
    }

    #[test]
    fn forces_and_impulses_scale_by_mass() {
        let mut physics = still_world();
        let ball = physics
            .create_body(RigidBodyDesc {
                mass: 2.0,
                position: Vec3::new(0.0, 50.0, 0.0),
                ..Default::default()
            })
            .unwrap();

        physics.apply_impulse(ball, Vec3::new(4.0, 0.0, 0.0)).unwrap();
        assert_eq!(physics.body(ball).unwrap().velocity, Vec3::new(2.0, 0.0, 0.0));

        physics.apply_force(ball, Vec3::new(0.0, 0.0, 20.0)).unwrap();
        physics.step(0.1);
        let body = physics.body(ball).unwrap();
        assert_relative_eq!(body.velocity.z, 1.0, epsilon = 1e-5);

        // Force does not persist into the next tick.
        physics.step(0.1);
        assert_relative_eq!(physics.body(ball).unwrap().velocity.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn forces_ignore_static_and_inactive_bodies() {
        let mut physics = still_world();
        let wall = physics
            .create_body(RigidBodyDesc {
                is_static: true,
                ..Default::default()
            })
            .unwrap();
        let sleeper = physics
            .create_body(RigidBodyDesc {
                active: false,
                position: Vec3::new(10.0, 10.0, 0.0),
                ..Default::default()
            })
            .unwrap();

        physics.apply_impulse(wall, Vec3::X).unwrap();
        physics.apply_impulse(sleeper, Vec3::X).unwrap();
        physics.apply_force(sleeper, Vec3::X).unwrap();
        assert_eq!(physics.body(wall).unwrap().velocity, Vec3::ZERO);
        assert_eq!(physics.body(sleeper).unwrap().velocity, Vec3::ZERO);
    }

    #[test]
    fn stale_handles_are_reported() {
        let mut physics = still_world();
        let ball = physics.create_body(RigidBodyDesc::default()).unwrap();
        physics.remove_body(ball).unwrap();
        assert!(matches!(
            physics.apply_force(ball, Vec3::X),
            Err(PhysicsError::BodyNotFound(_))
        ));
        assert!(physics.remove_body(ball).is_err());
        assert!(physics.body(ball).is_none());
    }

    #[test]
    fn stats_count_collections() {
        let mut physics = still_world();
        physics.create_body(RigidBodyDesc::default()).unwrap();
        physics
            .create_body(RigidBodyDesc {
                active: false,
                position: Vec3::new(20.0, 5.0, 0.0),
                ..Default::default()
            })
            .unwrap();
        physics
            .create_body(RigidBodyDesc {
                is_static: true,
                position: Vec3::new(-20.0, 5.0, 0.0),
                collider: Collider::Box { half_extents: Vec3::ONE },
                ..Default::default()
            })
            .unwrap();

        let stats = physics.stats();
        assert_eq!(stats.dynamic_bodies, 2);
        assert_eq!(stats.static_bodies, 1);
        assert_eq!(stats.active_bodies, 2);

        physics.clear();
        assert_eq!(physics.stats(), PhysicsStats::default());
    }

    #[test]
    fn boundary_callback_fires() {
        let mut physics = still_world();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let ball = physics
            .create_body(RigidBodyDesc {
                position: Vec3::new(149.5, 50.0, 0.0),
                velocity: Vec3::new(60.0, 0.0, 0.0),
                restitution: 0.5,
                on_collision: Some(Box::new(move |n: &CollisionNotice| {
                    sink.lock().unwrap().push(n.kind);
                })),
                ..Default::default()
            })
            .unwrap();

        physics.step(1.0 / 60.0);
        let body = physics.body(ball).unwrap();
        assert_relative_eq!(body.position.x, 149.0);
        assert_relative_eq!(body.velocity.x, -30.0, epsilon = 1e-4);
        assert_eq!(*seen.lock().unwrap(), vec![CollisionKind::Boundary]);
    }

    #[test]
    fn gravity_and_bounds_apply_from_the_next_step() {
        let mut physics = still_world();
        let ball = physics
            .create_body(RigidBodyDesc {
                position: Vec3::new(0.0, 50.0, 0.0),
                ..Default::default()
            })
            .unwrap();

        physics.step(0.1);
        assert_eq!(physics.body(ball).unwrap().velocity, Vec3::ZERO);

        physics.set_gravity(Vec3::new(0.0, -10.0, 0.0));
        assert_eq!(physics.gravity(), Vec3::new(0.0, -10.0, 0.0));
        physics.step(0.1);
        let body = physics.body(ball).unwrap();
        assert_relative_eq!(body.velocity.y, -1.0, epsilon = 1e-5);
        assert_relative_eq!(body.position.y, 49.9, epsilon = 1e-4);

        // Shrink the box under the ball: it is clamped to the new ceiling.
        physics.set_gravity(Vec3::ZERO);
        physics.set_bounds(Vec3::splat(-20.0), Vec3::splat(20.0));
        assert_eq!(physics.bounds(), (Vec3::splat(-20.0), Vec3::splat(20.0)));
        physics.step(0.1);
        let body = physics.body(ball).unwrap();
        assert_relative_eq!(body.position.y, 19.0, epsilon = 1e-5);
        assert_relative_eq!(body.velocity.y, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn inactive_bodies_freeze_until_reenabled() {
        let mut physics = still_world();
        let ball = physics
            .create_body(RigidBodyDesc {
                position: Vec3::new(0.0, 50.0, 0.0),
                velocity: Vec3::new(10.0, 0.0, 0.0),
                ..Default::default()
            })
            .unwrap();

        physics.set_active(ball, false).unwrap();
        physics.set_active(ball, false).unwrap();
        physics.step(0.1);
        let body = physics.body(ball).unwrap();
        assert!(!body.active);
        assert_eq!(body.position, Vec3::new(0.0, 50.0, 0.0));
        assert_eq!(physics.stats().active_bodies, 0);

        physics.set_active(ball, true).unwrap();
        physics.step(0.1);
        let body = physics.body(ball).unwrap();
        assert!(body.active);
        assert_relative_eq!(body.position.x, 1.0, epsilon = 1e-5);

        physics.remove_body(ball).unwrap();
        assert!(matches!(
            physics.set_active(ball, true),
            Err(PhysicsError::BodyNotFound(_))
        ));
    }

    #[test]
    fn raycast_returns_handles_in_distance_order() {
        let mut physics = still_world();
        let far = physics
            .create_body(RigidBodyDesc {
                position: Vec3::new(0.0, 5.0, 40.0),
                ..Default::default()
            })
            .unwrap();
        let near = physics
            .create_body(RigidBodyDesc {
                position: Vec3::new(0.0, 5.0, 20.0),
                is_static: true,
                collider: Collider::Box { half_extents: Vec3::splat(2.0) },
                ..Default::default()
            })
            .unwrap();

        let hits = physics.raycast(Vec3::new(0.0, 5.0, 0.0), Vec3::Z, 100.0);
        let order: Vec<BodyHandle> = hits.iter().map(|(h, _)| *h).collect();
        assert_eq!(order, vec![near, far]);
    }
}
