use glam::{Mat4, Vec3};

/// Primitive shapes the renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Unit-radius sphere; scale the model matrix by the radius.
    Sphere,
    /// Unit cube (side 1); scale the model matrix by the full extents.
    Box,
}

/// Surface description passed alongside a primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Vec3,
    /// 0.0 = plain lit color, 1.0 = fully emissive.
    pub emissive: f32,
}

impl Material {
    pub const fn solid(color: Vec3) -> Self {
        Self { color, emissive: 0.0 }
    }

    pub const fn glowing(color: Vec3) -> Self {
        Self { color, emissive: 1.0 }
    }
}

impl Default for Material {
    /// Neutral grey used whenever a more specific material is unavailable.
    fn default() -> Self {
        Self::solid(Vec3::new(0.5, 0.5, 0.52))
    }
}

/// Anything that can draw a positioned primitive. The game hands it every
/// visible object each frame and gets nothing back.
pub trait PrimitiveRenderer {
    fn draw_primitive(&mut self, primitive: Primitive, model: &Mat4, material: &Material);
}
