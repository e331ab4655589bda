pub mod components;
pub mod config;
pub mod gl;
pub mod logging;
pub mod utils;

pub use components::{ Direction, FlyCamera, Mesh };
pub use config::HarnessConfig;
