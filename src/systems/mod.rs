mod collision;
mod physics;
mod raycast;

pub use collision::collision_system;
pub use physics::{bounds_system, damping_system, gravity_system, integration_system};
pub use raycast::{raycast_bodies, RaycastHit};
