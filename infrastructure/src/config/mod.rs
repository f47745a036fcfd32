//! Configuration loading and file formats

pub mod file_config;
pub mod loader;

pub use file_config::{AgentProfileConfig, FileConfig};
pub use loader::ConfigLoader;
