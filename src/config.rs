//! Game configuration.
//!
//! Every section has serde defaults, so a config file only needs the values
//! it wants to change:
//!
//! ```json
//! { "projectiles": { "speed": 120.0 }, "targets": { "seed": 42 } }
//! ```

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub projectiles: ProjectileConfig,
    pub targets: TargetConfig,
    pub tank: TankConfig,
    pub frame: FrameConfig,
}

/// Rigid-body world settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    /// Velocity multiplier applied once per tick after integration.
    pub damping: f32,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            damping: 0.99,
            bounds_min: Vec3::new(-150.0, 0.0, -150.0),
            bounds_max: Vec3::new(150.0, 100.0, 150.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub speed: f32,
    pub radius: f32,
    /// Hard cap on simultaneously live projectiles. Firing past it evicts the oldest.
    pub max_live: usize,
    /// Size of the reusable id ring.
    pub id_range: u32,
    /// Seconds before an unobstructed projectile expires.
    pub max_lifetime: f32,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 100.0,
            radius: 3.0,
            max_live: 5,
            id_range: 10,
            max_lifetime: 3.0,
            bounds_min: Vec3::new(-150.0, -10.0, -150.0),
            bounds_max: Vec3::new(150.0, 100.0, 150.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub count: usize,
    pub radius: f32,
    pub spawn_height: f32,
    pub respawn_delay: f32,
    /// Inner radius of the placement ring around the arena center.
    pub ring_min: f32,
    /// Outer radius of the placement ring.
    pub ring_max: f32,
    pub min_separation: f32,
    pub min_tank_distance: f32,
    /// Random samples tried before falling back to a fixed angular slot.
    pub max_attempts: u32,
    pub fallback_slots: u32,
    pub seed: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            count: 5,
            radius: 20.0,
            spawn_height: 2.0,
            respawn_delay: 3.0,
            ring_min: 40.0,
            ring_max: 120.0,
            min_separation: 45.0,
            min_tank_distance: 35.0,
            max_attempts: 30,
            fallback_slots: 8,
            seed: 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    pub move_speed: f32,
    /// Radians per second.
    pub turn_rate: f32,
    pub barrel_length: f32,
    pub turret_height: f32,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            move_speed: 30.0,
            turn_rate: 2.0,
            barrel_length: 6.0,
            turret_height: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Upper bound on the per-frame delta fed to any integrator.
    pub max_frame_dt: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { max_frame_dt: 0.1 }
    }
}

impl GameConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        if !(p.damping > 0.0 && p.damping <= 1.0) {
            return invalid(format!("physics.damping must be in (0, 1], got {}", p.damping));
        }
        check_bounds("physics", p.bounds_min, p.bounds_max)?;

        let pr = &self.projectiles;
        positive("projectiles.speed", pr.speed)?;
        positive("projectiles.radius", pr.radius)?;
        positive("projectiles.max_lifetime", pr.max_lifetime)?;
        if pr.max_live == 0 {
            return invalid("projectiles.max_live must be at least 1".into());
        }
        if (pr.id_range as usize) < pr.max_live {
            return invalid(format!(
                "projectiles.id_range ({}) must cover max_live ({})",
                pr.id_range, pr.max_live
            ));
        }
        check_bounds("projectiles", pr.bounds_min, pr.bounds_max)?;

        let t = &self.targets;
        positive("targets.radius", t.radius)?;
        positive("targets.respawn_delay", t.respawn_delay)?;
        if t.ring_min < 0.0 || t.ring_max <= t.ring_min {
            return invalid(format!(
                "targets ring band is empty: {}..{}",
                t.ring_min, t.ring_max
            ));
        }
        if t.fallback_slots == 0 {
            return invalid("targets.fallback_slots must be at least 1".into());
        }

        positive("tank.move_speed", self.tank.move_speed)?;
        positive("frame.max_frame_dt", self.frame.max_frame_dt)?;
        Ok(())
    }
}

fn invalid(msg: String) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(msg))
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        invalid(format!("{name} must be positive, got {value}"))
    }
}

fn check_bounds(section: &str, min: Vec3, max: Vec3) -> Result<(), ConfigError> {
    if min.cmplt(max).all() {
        Ok(())
    } else {
        invalid(format!("{section} bounds are inverted: {min} .. {max}"))
    }
}
