//! Configuration constants and the runtime simulation settings.

use crate::error::ConfigError;

// Field
pub const FIELD_WIDTH: f64 = 800.0;
pub const FIELD_HEIGHT: f64 = 600.0;

// Heroes
pub const HERO_RADIUS: f64 = 15.0;
pub const DEFAULT_HERO_SPEED: f64 = 2.0; // Distance units per tick
pub const DEFAULT_FIRE_INTERVAL_MS: u32 = 1000;
pub const EVASION_BUFFER: f64 = 30.0; // Cursor proximity that makes a hero flee

// Projectiles
pub const PROJECTILE_RADIUS: f64 = 5.0;
pub const PROJECTILE_SPEED: f64 = 5.0; // Distance units per tick

// Ranges accepted by the configuration panel
pub const FIRE_INTERVAL_MIN_MS: u32 = 500;
pub const FIRE_INTERVAL_MAX_MS: u32 = 3000;
pub const FIRE_INTERVAL_STEP_MS: u32 = 100;
pub const SPEED_MIN: f64 = 1.0;
pub const SPEED_MAX: f64 = 10.0;
pub const SPEED_STEP: f64 = 1.0;

// Clock
pub const TICK_PERIOD_MS: u32 = 16;
pub const MAX_TICKS_PER_FRAME: u32 = 8; // Caps catch-up after a long frame

// Rendering configuration
pub const UI_PANEL_WIDTH: i32 = 240;
pub const WINDOW_WIDTH: i32 = FIELD_WIDTH as i32 + UI_PANEL_WIDTH;
pub const WINDOW_HEIGHT: i32 = FIELD_HEIGHT as i32;

/// Runtime settings of one simulation session.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub field_width: f64,
    pub field_height: f64,
    pub hero_radius: f64,
    pub projectile_radius: f64,
    pub projectile_speed: f64,
    pub evasion_buffer: f64,
    /// Seconds between two simulation ticks.
    pub tick_duration: f32,
    pub max_ticks_per_frame: u32,
    /// Reject `fire` while a hero's fire interval has not elapsed.
    /// Off by default: the stored interval is informational only.
    pub enforce_fire_interval: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            hero_radius: HERO_RADIUS,
            projectile_radius: PROJECTILE_RADIUS,
            projectile_speed: PROJECTILE_SPEED,
            evasion_buffer: EVASION_BUFFER,
            tick_duration: TICK_PERIOD_MS as f32 / 1000.0,
            max_ticks_per_frame: MAX_TICKS_PER_FRAME,
            enforce_fire_interval: false,
        }
    }
}

impl SimConfig {
    /// Builds a config with the tick period given in milliseconds.
    pub fn with_tick_ms(mut self, tick_ms: u32) -> Self {
        self.tick_duration = tick_ms as f32 / 1000.0;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_duration > 0.0) || !self.tick_duration.is_finite() {
            return Err(ConfigError::InvalidTickPeriod(self.tick_duration));
        }
        if !(self.evasion_buffer >= 0.0) || !self.evasion_buffer.is_finite() {
            return Err(ConfigError::InvalidEvasionBuffer(self.evasion_buffer));
        }
        if !(self.field_width > 0.0 && self.field_height > 0.0) {
            return Err(ConfigError::InvalidFieldSize {
                width: self.field_width,
                height: self.field_height,
            });
        }
        Ok(())
    }

    /// Simulated milliseconds covered by `ticks` ticks.
    pub fn ticks_to_ms(&self, ticks: u64) -> f64 {
        ticks as f64 * self.tick_duration as f64 * 1000.0
    }
}
