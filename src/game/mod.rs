pub mod input;
pub mod scene;
pub mod state;

pub use input::{ action_for, KeyAction };
pub use scene::Scene;
pub use state::{ AppState, WindowRequest };
