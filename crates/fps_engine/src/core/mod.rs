//! # Core Engine Module
//!
//! Shared configuration types used by every physics subsystem.
//!
//! ## Organization
//!
//! - **Config**: Simulation-wide tuning constants with validation

pub mod config;

// Re-export commonly used config types
pub use config::{
    PlayerConfig,
    SimulationConfig,
    SphereConfig,
    StepConfig,
    WorldConfig,
};
pub use crate::config::{Config, ConfigError};
