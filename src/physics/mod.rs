//! Rigid-body world: sphere and box bodies under explicit Euler integration
//! with linear impulse collision response.
//!
//! ```ignore
//! let mut physics = PhysicsWorld::new(&PhysicsConfig::default());
//! let ball = physics.create_body(RigidBodyDesc {
//!     position: Vec3::new(0.0, 10.0, 0.0),
//!     ..Default::default()
//! })?;
//! let events = physics.step(1.0 / 60.0);
//! ```

pub mod primitives;
mod world;

pub use world::{BodyHandle, BodySnapshot, PhysicsStats, PhysicsWorld, RigidBodyDesc};
