//! Configuration management for the ATIS composer.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Documented defaults for every domain convention (letter exclusions,
//!   spread threshold, visibility ceiling, altimeter range)
//!
//! # Example
//!
//! ```no_run
//! use atis_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/atis.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Spread threshold: {}", config.settings().advisory.spread_threshold);
//!
//! config.settings_mut().transcript.closing = false;
//! config.update_section(ConfigSection::Transcript).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    AdvisorySettings, AlphabetSettings, AltimeterSettings, ConfigSection, ExportSettings,
    LoggingSettings, Settings, TranscriptSettings, VisibilitySettings, WindSettings,
};
