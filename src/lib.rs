//! Ownership-safe wrappers over OpenGL objects, procedural geometry and a
//! small fly-camera harness that renders them.

pub mod engine;
pub mod game;
