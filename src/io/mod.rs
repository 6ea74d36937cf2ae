//! I/O layer: writing the assembled configuration for the rescoring tool,
//! form presets, and locating the presentation resources.
pub mod config;
pub use config::{load_preset, read_preset, save_preset, write_configuration};

pub mod resources;
pub use resources::Resources;
