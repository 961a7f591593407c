use glam::{Mat4, Vec3};

/// Chase camera that trails the tank from behind and above.
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub distance: f32,
    pub height: f32,
    /// Fraction of the remaining gap closed per second.
    pub stiffness: f32,
    pub fov: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 18.0, -30.0),
            target: Vec3::ZERO,
            distance: 30.0,
            height: 18.0,
            stiffness: 6.0,
            fov: 60.0,
        }
    }

    /// Ease toward the spot behind `focus` along `-forward`.
    pub fn follow(&mut self, focus: Vec3, forward: Vec3, dt: f32) {
        let desired = focus - forward * self.distance + Vec3::Y * self.height;
        let t = (self.stiffness * dt).clamp(0.0, 1.0);
        self.position = self.position.lerp(desired, t);
        self.target = focus + Vec3::Y * 2.0;
    }

    /// Jump straight to the chase spot (after a reset).
    pub fn snap(&mut self, focus: Vec3, forward: Vec3) {
        self.position = focus - forward * self.distance + Vec3::Y * self.height;
        self.target = focus + Vec3::Y * 2.0;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect, 0.5, 800.0)
    }
}
