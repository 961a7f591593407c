use glam::{Mat4, Quat, Vec3};

use super::InputFrame;
use crate::components::Material;
use crate::config::TankConfig;

/// Hull half-size. Also the margin kept from the arena walls.
pub const HULL_HALF_EXTENTS: Vec3 = Vec3::new(2.5, 1.0, 3.5);

/// Player tank on the ground plane. Yaw 0 faces +Z.
#[derive(Debug, Clone)]
pub struct Tank {
    pub position: Vec3,
    /// Radians, counter-clockwise seen from above.
    pub yaw: f32,
    move_speed: f32,
    turn_rate: f32,
    barrel_length: f32,
    turret_height: f32,
}

/// One drawable piece of the tank.
pub struct TankPart {
    pub model: Mat4,
    pub material: Material,
}

impl Tank {
    pub fn new(config: &TankConfig) -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            move_speed: config.move_speed,
            turn_rate: config.turn_rate,
            barrel_length: config.barrel_length,
            turret_height: config.turret_height,
        }
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Turn then move, keeping the hull inside `min..max` on X and Z.
    pub fn drive(&mut self, input: &InputFrame, dt: f32, min: Vec3, max: Vec3) {
        if input.rotate_left {
            self.yaw += self.turn_rate * dt;
        }
        if input.rotate_right {
            self.yaw -= self.turn_rate * dt;
        }

        let mut throttle = 0.0;
        if input.forward {
            throttle += 1.0;
        }
        if input.back {
            throttle -= 1.0;
        }
        self.position += self.forward() * throttle * self.move_speed * dt;

        let margin = HULL_HALF_EXTENTS.z;
        self.position.x = self.position.x.clamp(min.x + margin, max.x - margin);
        self.position.z = self.position.z.clamp(min.z + margin, max.z - margin);
    }

    /// Fire origin at the barrel tip and the unit fire direction.
    pub fn muzzle(&self) -> (Vec3, Vec3) {
        let forward = self.forward();
        let origin = self.position + Vec3::Y * self.turret_height + forward * self.barrel_length;
        (origin, forward)
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(Quat::from_rotation_y(self.yaw), self.position)
    }

    /// Hull, turret and barrel as unit boxes scaled into place.
    pub fn parts(&self) -> [TankPart; 3] {
        let base = self.transform();
        let hull = Mat4::from_translation(Vec3::Y * HULL_HALF_EXTENTS.y) * Mat4::from_scale(HULL_HALF_EXTENTS * 2.0);
        let turret = Mat4::from_translation(Vec3::Y * self.turret_height) * Mat4::from_scale(Vec3::new(3.0, 1.2, 3.0));
        let barrel = Mat4::from_translation(Vec3::new(0.0, self.turret_height, self.barrel_length * 0.5))
            * Mat4::from_scale(Vec3::new(0.5, 0.5, self.barrel_length));

        [
            TankPart {
                model: base * hull,
                material: Material::solid(Vec3::new(0.25, 0.4, 0.2)),
            },
            TankPart {
                model: base * turret,
                material: Material::solid(Vec3::new(0.3, 0.48, 0.24)),
            },
            TankPart {
                model: base * barrel,
                material: Material::solid(Vec3::new(0.18, 0.2, 0.18)),
            },
        ]
    }

    /// Back to the arena center, facing +Z.
    pub fn reset(&mut self) {
        self.position = Vec3::ZERO;
        self.yaw = 0.0;
    }
}
