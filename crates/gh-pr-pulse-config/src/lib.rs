//! Configuration and file management for gh-pr-pulse
//!
//! This crate provides:
//! - Platform paths for data files (the score log)
//! - Configuration file discovery and loading (TOML)
//! - Application configuration (AppConfig), including the score weights

pub mod app_config;
pub mod config_file;
pub mod paths;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use app_config::{AppConfig, SourceKind};
pub use config_file::{load_config_file, ConfigSource};
pub use paths::{data_dir, default_log_path};
