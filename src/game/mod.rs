//! The simulation core of the arena: tank, projectiles, targets and physics
//! props, advanced together once per frame in a fixed order.

mod projectile;
mod projectiles;
mod tank;
mod target;
mod targets;

pub use projectile::{
    DestroyReason, HitReport, HitResult, HitTest, Projectile, ProjectileEvent, ProjectileId, WorldBox,
};
pub use projectiles::{HitCallback, ProjectileManager};
pub use tank::{Tank, TankPart, HULL_HALF_EXTENTS};
pub use target::{Target, TargetId, TargetKind, TargetState};
pub use targets::{Placement, TargetManager, TargetQuery};

use glam::{Mat4, Vec3};
use log::info;

use crate::components::{
    Collider, CollisionEvent, LocalTransform, Material, Primitive, PrimitiveRenderer,
};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::physics::{BodyHandle, PhysicsWorld};
use crate::scene::populate_arena;

/// Action flags for one frame. Movement flags are held state; `fire` and
/// `reset` are already edge-triggered by the input source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputFrame {
    pub forward: bool,
    pub back: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub fire: bool,
    pub reset: bool,
}

/// What happened during one [`Game::frame`].
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Delta actually simulated, after clamping.
    pub dt: f32,
    pub hits: Vec<HitReport>,
    pub respawned: Vec<TargetId>,
    pub contacts: Vec<CollisionEvent>,
    pub fired: Option<ProjectileId>,
    pub reset: bool,
}

/// A physics body the game draws each frame.
#[derive(Debug, Clone, Copy)]
pub struct Prop {
    pub body: BodyHandle,
    pub material: Material,
}

const GROUND_MATERIAL: Material = Material::solid(Vec3::new(0.32, 0.36, 0.28));
const PROJECTILE_MATERIAL: Material = Material::glowing(Vec3::new(1.0, 0.75, 0.2));

pub struct Game {
    config: GameConfig,
    physics: PhysicsWorld,
    projectiles: ProjectileManager,
    targets: TargetManager,
    tank: Tank,
    props: Vec<Prop>,
    score: u32,
}

/// Clamp a raw frame delta so a stall never turns into one huge step.
pub fn clamp_dt(raw_dt: f32, max_dt: f32) -> f32 {
    if raw_dt.is_finite() && raw_dt > 0.0 {
        raw_dt.min(max_dt)
    } else {
        0.0
    }
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let mut physics = PhysicsWorld::new(&config.physics);
        let props = populate_arena(&mut physics)?;
        let tank = Tank::new(&config.tank);
        let mut targets = TargetManager::new(&config.targets);
        targets.spawn_initial(tank.position);

        Ok(Self {
            projectiles: ProjectileManager::new(&config.projectiles),
            config,
            physics,
            targets,
            tank,
            props,
            score: 0,
        })
    }

    /// Advance one frame: tank, fire, projectiles, physics, then target timers.
    pub fn frame(&mut self, raw_dt: f32, input: &InputFrame) -> Result<FrameReport, GameError> {
        let dt = clamp_dt(raw_dt, self.config.frame.max_frame_dt);
        let mut report = FrameReport {
            dt,
            ..Default::default()
        };

        if input.reset {
            self.reset()?;
            report.reset = true;
            return Ok(report);
        }

        let (min, max) = self.physics.bounds();
        self.tank.drive(input, dt, min, max);

        if input.fire {
            let (origin, direction) = self.tank.muzzle();
            report.fired = Some(self.projectiles.fire(origin, direction));
        }

        report.hits = self.projectiles.update(dt, &mut self.targets);
        for hit in &report.hits {
            self.score += hit.target_kind.score();
        }

        report.contacts = self.physics.step(dt);
        report.respawned = self.targets.update(dt, self.tank.position);
        Ok(report)
    }

    /// Fresh round: no projectiles, rebuilt props, new targets, score zero.
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.projectiles.clear();
        self.physics.clear();
        self.props = populate_arena(&mut self.physics)?;
        self.tank.reset();
        self.targets = TargetManager::new(&self.config.targets);
        self.targets.spawn_initial(self.tank.position);
        self.score = 0;
        info!("game reset");
        Ok(())
    }

    /// Hand every visible object to `renderer`.
    pub fn draw<R: PrimitiveRenderer>(&self, renderer: &mut R) {
        let (min, max) = self.physics.bounds();
        let size = max - min;
        let ground = Mat4::from_translation(Vec3::new((min.x + max.x) * 0.5, min.y - 0.5, (min.z + max.z) * 0.5))
            * Mat4::from_scale(Vec3::new(size.x, 1.0, size.z));
        renderer.draw_primitive(Primitive::Box, &ground, &GROUND_MATERIAL);

        for part in self.tank.parts() {
            renderer.draw_primitive(Primitive::Box, &part.model, &part.material);
        }

        for projectile in self.projectiles.live() {
            renderer.draw_primitive(Primitive::Sphere, &projectile.transform(), &PROJECTILE_MATERIAL);
        }

        for target in self.targets.active_targets() {
            let model = LocalTransform {
                scale: Vec3::splat(target.radius()),
                ..LocalTransform::new(target.world_position())
            }
            .matrix();
            renderer.draw_primitive(Primitive::Sphere, &model, &target.kind().material());
        }

        for prop in &self.props {
            let Some(body) = self.physics.body(prop.body) else {
                continue;
            };
            if !body.active {
                continue;
            }
            let extents = body.collider.extents();
            let (primitive, scale) = match body.collider {
                Collider::Sphere { .. } => (Primitive::Sphere, extents),
                Collider::Box { .. } => (Primitive::Box, extents * 2.0),
            };
            let model = LocalTransform {
                scale,
                ..LocalTransform::new(body.position)
            }
            .matrix();
            renderer.draw_primitive(primitive, &model, &prop.material);
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tank(&self) -> &Tank {
        &self.tank
    }

    pub fn targets(&self) -> &TargetManager {
        &self.targets
    }

    pub fn projectiles(&self) -> &ProjectileManager {
        &self.projectiles
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
