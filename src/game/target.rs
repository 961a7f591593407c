use glam::Vec3;

use crate::components::Material;

pub type TargetId = u32;

/// Material class of a target. Decides its color and score value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Wood,
    Stone,
    Metal,
}

impl TargetKind {
    pub const ALL: [TargetKind; 3] = [TargetKind::Wood, TargetKind::Stone, TargetKind::Metal];

    pub fn name(&self) -> &'static str {
        match self {
            TargetKind::Wood => "wood",
            TargetKind::Stone => "stone",
            TargetKind::Metal => "metal",
        }
    }

    pub fn score(&self) -> u32 {
        match self {
            TargetKind::Wood => 1,
            TargetKind::Stone => 2,
            TargetKind::Metal => 3,
        }
    }

    pub fn material(&self) -> Material {
        match self {
            TargetKind::Wood => Material::solid(Vec3::new(0.55, 0.35, 0.18)),
            TargetKind::Stone => Material::solid(Vec3::new(0.45, 0.45, 0.48)),
            TargetKind::Metal => Material::solid(Vec3::new(0.75, 0.78, 0.85)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetState {
    Active,
    /// Down after a hit; back up once `remaining` reaches zero.
    Respawning { remaining: f32 },
}

#[derive(Debug, Clone)]
pub struct Target {
    id: TargetId,
    kind: TargetKind,
    position: Vec3,
    radius: f32,
    respawn_delay: f32,
    state: TargetState,
}

impl Target {
    pub fn new(id: TargetId, kind: TargetKind, position: Vec3, radius: f32, respawn_delay: f32) -> Self {
        Self {
            id,
            kind,
            position,
            radius,
            respawn_delay,
            state: TargetState::Active,
        }
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    /// Targets are not parented, so local position is world position.
    pub fn world_position(&self) -> Vec3 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn state(&self) -> TargetState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == TargetState::Active
    }

    pub fn is_respawning(&self) -> bool {
        matches!(self.state, TargetState::Respawning { .. })
    }

    /// Knock the target down and start the respawn countdown.
    /// Returns `false` (and changes nothing) if it is already down.
    pub fn hit(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = TargetState::Respawning {
            remaining: self.respawn_delay,
        };
        true
    }

    /// Advance the respawn countdown. Returns `true` once it has run out;
    /// the owner then picks a position and calls [`Target::respawn_at`].
    pub fn update(&mut self, dt: f32) -> bool {
        match &mut self.state {
            TargetState::Active => false,
            TargetState::Respawning { remaining } => {
                *remaining -= dt;
                *remaining <= 0.0
            }
        }
    }

    pub fn respawn_at(&mut self, position: Vec3) {
        self.position = position;
        self.state = TargetState::Active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_only_counts_once() {
        let mut target = Target::new(0, TargetKind::Wood, Vec3::ZERO, 5.0, 3.0);
        assert!(target.hit());
        assert!(target.is_respawning());
        assert!(!target.hit());
    }

    #[test]
    fn countdown_runs_only_while_down() {
        let mut target = Target::new(0, TargetKind::Stone, Vec3::ZERO, 5.0, 1.0);
        assert!(!target.update(10.0));

        target.hit();
        assert!(!target.update(0.6));
        assert!(target.update(0.6));

        target.respawn_at(Vec3::new(50.0, 2.0, 0.0));
        assert!(target.is_active());
        assert_eq!(target.world_position(), Vec3::new(50.0, 2.0, 0.0));
    }
}
