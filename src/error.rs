// Error types: rejected commands and invalid session configuration

use thiserror::Error;

/// Command Errors
#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum CommandError {
    #[error("Hero {index} does not exist ({count} heroes in the arena)")]
    UnknownHero { index: usize, count: usize },
    #[error("Fire interval {value} ms is outside the accepted range")]
    FireIntervalOutOfRange { value: u32 },
    #[error("Movement speed {value} is outside the accepted range")]
    SpeedOutOfRange { value: f64 },
    #[error("Hero {hero} cannot fire for another {remaining_ms:.0} ms")]
    FireOnCooldown { hero: usize, remaining_ms: f64 },
}

/// Config Errors
#[derive(Error, Debug, PartialEq, Clone, Copy)]
pub enum ConfigError {
    #[error("Tick period must be positive, got {0} s")]
    InvalidTickPeriod(f32),
    #[error("Evasion buffer must be non-negative, got {0}")]
    InvalidEvasionBuffer(f64),
    #[error("Field size must be positive, got {width}x{height}")]
    InvalidFieldSize { width: f64, height: f64 },
}
