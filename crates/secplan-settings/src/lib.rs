//! Persisted preference state.
//!
//! TOML configuration in the platform config directory: assist webhook,
//! export defaults, and UI preferences.

pub mod config;

pub use config::{AssistSettings, Config, ExportSettings, Theme, UiSettings};
