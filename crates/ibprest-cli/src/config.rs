//! Command configuration: TOML file, built-in defaults and their merge with
//! command-line overrides.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

pub use builder::build_config;
