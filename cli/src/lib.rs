//! CLI utilities for the snail mail notifier.
//!
//! This crate provides profile configuration, output helpers and melody
//! file loading shared by the command-line tools.

pub mod config;
pub mod melody_file;
pub mod output;

pub use config::{Config, Profile, load_config};
pub use melody_file::{MelodyFileError, load_melody, load_melody_from_stdin};
pub use output::{Output, OutputFormat, pcm_file_name};
