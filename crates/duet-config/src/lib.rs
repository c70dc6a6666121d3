//! Relay configuration.
//!
//! TOML-based configuration for the signaling relay. Every section uses
//! serde defaults so a partial file (or none at all) works.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use duet_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("listening on {}", config.server.bind_addr());
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{CorsConfig, RelayConfig, ServerConfig};

use duet_common::ConfigError;
use std::path::Path;

/// Load the relay config from `path`, or from the platform default location
/// when `path` is `None`, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}
