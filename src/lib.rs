//! Tank arena: a small 3D arcade shooter.
//!
//! The simulation ([`game`], [`physics`]) is independent of SDL and OpenGL
//! and can be driven headless; [`app`] wires it to a window and renderer.

pub mod app;
pub mod camera;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod physics;
pub mod renderer;
pub mod scene;
pub mod systems;
