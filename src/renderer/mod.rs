pub mod mesh;
pub mod shader;

use glam::{Mat4, Vec3};
use log::warn;
use mesh::{unit_box, unit_sphere, Mesh};
use shader::ShaderProgram;

use crate::components::{Material, Primitive, PrimitiveRenderer};
use crate::error::GameError;

const VERT_SRC: &str = include_str!("../../shaders/lit.vert");
const FRAG_SRC: &str = include_str!("../../shaders/lit.frag");

/// Unlit fallback used when the lit program does not build on this driver.
const FLAT_VERT_SRC: &str = "#version 330 core
layout (location = 0) in vec3 a_position;
uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
void main() { gl_Position = u_projection * u_view * u_model * vec4(a_position, 1.0); }
";
const FLAT_FRAG_SRC: &str = "#version 330 core
uniform vec3 u_object_color;
out vec4 frag_color;
void main() { frag_color = vec4(u_object_color, 1.0); }
";

const FOG_COLOR: Vec3 = Vec3::new(0.55, 0.68, 0.8);
const LIGHT_DIR: Vec3 = Vec3::new(-0.4, -1.0, -0.3);

pub struct Renderer {
    shader: ShaderProgram,
    sphere: Mesh,
    cube: Mesh,
}

impl Renderer {
    /// Requires a current GL 3.3 context.
    pub fn new() -> Result<Self, GameError> {
        unsafe {
            gl::Enable(gl::DEPTH_TEST);
            gl::Enable(gl::CULL_FACE);
            gl::ClearColor(FOG_COLOR.x, FOG_COLOR.y, FOG_COLOR.z, 1.0);
        }

        let shader = match ShaderProgram::from_sources(VERT_SRC, FRAG_SRC) {
            Ok(shader) => shader,
            Err(e) => {
                warn!("lit shader unavailable ({e}), falling back to flat shading");
                ShaderProgram::from_sources(FLAT_VERT_SRC, FLAT_FRAG_SRC)?
            }
        };

        Ok(Self {
            shader,
            sphere: Mesh::upload(&unit_sphere(16, 24)),
            cube: Mesh::upload(&unit_box()),
        })
    }

    pub fn resize(&self, width: u32, height: u32) {
        unsafe {
            gl::Viewport(0, 0, width as i32, height as i32);
        }
    }

    /// Clear the frame and set per-frame uniforms.
    pub fn begin_frame(&mut self, view: &Mat4, proj: &Mat4, camera_pos: Vec3) {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }

        self.shader.bind();
        self.shader.set_mat4("u_view", view);
        self.shader.set_mat4("u_projection", proj);
        self.shader.set_vec3("u_light_dir", LIGHT_DIR);
        self.shader.set_vec3("u_camera_pos", camera_pos);
        self.shader.set_vec3("u_ambient_color", Vec3::splat(0.3));
        self.shader.set_vec3("u_fog_color", FOG_COLOR);
        self.shader.set_float("u_fog_start", 120.0);
        self.shader.set_float("u_fog_end", 400.0);
    }
}

impl PrimitiveRenderer for Renderer {
    fn draw_primitive(&mut self, primitive: Primitive, model: &Mat4, material: &Material) {
        self.shader.set_mat4("u_model", model);
        self.shader.set_vec3("u_object_color", material.color);
        self.shader.set_float("u_emissive", material.emissive);
        match primitive {
            Primitive::Sphere => self.sphere.draw(),
            Primitive::Box => self.cube.draw(),
        }
    }
}
