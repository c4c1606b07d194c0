//! CLI commands module.

mod config;
mod melody;
mod notify;
mod play;
mod render;
mod util;

pub use config::ConfigCommand;
pub use melody::MelodyCommand;
pub use notify::NotifyCommand;
pub use play::PlayCommand;
pub use render::RenderCommand;

// Re-export utils for use in commands
pub(crate) use util::*;
