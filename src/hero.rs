use crate::config::{self, SimConfig};
use crate::error::CommandError;
use crate::types::*;
use crate::utils;

/// Partial update applied through the configuration panel.
/// Only the fields that are `Some` change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeroPatch {
    pub projectile_color: Option<PaletteColor>,
    pub fire_interval_ms: Option<u32>,
    pub speed: Option<f64>,
}

impl HeroPatch {
    pub fn projectile_color(color: PaletteColor) -> Self {
        HeroPatch {
            projectile_color: Some(color),
            ..Default::default()
        }
    }

    pub fn fire_interval_ms(value: u32) -> Self {
        HeroPatch {
            fire_interval_ms: Some(value),
            ..Default::default()
        }
    }

    pub fn speed(value: f64) -> Self {
        HeroPatch {
            speed: Some(value),
            ..Default::default()
        }
    }

    /// Checks every field against the panel ranges without applying anything.
    pub fn validate(&self) -> Result<(), CommandError> {
        if let Some(value) = self.fire_interval_ms {
            if !(config::FIRE_INTERVAL_MIN_MS..=config::FIRE_INTERVAL_MAX_MS).contains(&value) {
                return Err(CommandError::FireIntervalOutOfRange { value });
            }
        }
        if let Some(value) = self.speed {
            if !(config::SPEED_MIN..=config::SPEED_MAX).contains(&value) {
                return Err(CommandError::SpeedOutOfRange { value });
            }
        }
        Ok(())
    }
}

/// What a hero's movement step did, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovementReport {
    pub evaded: bool,
    pub reflected: bool,
}

// Represents a hero patrolling its vertical lane
#[derive(Debug, Clone, PartialEq)]
pub struct Hero {
    pub index: usize,
    pub position: Point,
    pub direction: Direction, // Along the y axis
    pub side: Side,
    pub color: PaletteColor, // Team color, fixed
    pub score: u32,
    pub projectile_color: PaletteColor,
    pub fire_interval_ms: u32,
    pub speed: f64,                   // Distance units per tick
    pub last_fired_tick: Option<u64>, // Only consulted when the fire interval is enforced
}

impl Hero {
    // Creates a hero heading down its lane. The side comes from the lane's half of the field.
    pub fn new(
        index: usize,
        position: Point,
        color: PaletteColor,
        projectile_color: PaletteColor,
        field_width: f64,
    ) -> Self {
        let side = if position.x < field_width / 2.0 {
            Side::Left
        } else {
            Side::Right
        };

        Hero {
            index,
            position,
            direction: Direction::Positive,
            side,
            color,
            score: 0,
            projectile_color,
            fire_interval_ms: config::DEFAULT_FIRE_INTERVAL_MS,
            speed: config::DEFAULT_HERO_SPEED,
            last_fired_tick: None,
        }
    }

    /// Advances the hero one tick along its lane.
    ///
    /// A cursor inside the evasion buffer inverts the direction before the
    /// step is applied. This happens on every tick the cursor stays inside,
    /// so a hero under the pointer jitters in place instead of steering away.
    /// Landing on either end of the lane reflects the direction, overriding
    /// the evasion flip.
    pub fn process_movement(
        &mut self,
        cursor: Option<Point>,
        evasion_buffer: f64,
        field_height: f64,
    ) -> MovementReport {
        let mut report = MovementReport::default();

        let mut direction = self.direction;
        if let Some(cursor) = cursor {
            if utils::within_radius(self.position, cursor, evasion_buffer) {
                direction = direction.flipped();
                report.evaded = true;
            }
        }

        let new_y = utils::clamp(
            self.position.y + direction.sign() * self.speed,
            0.0,
            field_height,
        );
        if new_y == 0.0 || new_y == field_height {
            direction = direction.flipped();
            report.reflected = true;
        }

        self.position.y = new_y;
        self.direction = direction;
        report
    }

    /// Builds a projectile at the hero's rim on the side facing the opponent.
    pub fn spawn_projectile(&self, hero_radius: f64, projectile_radius: f64) -> Projectile {
        let direction = self.side.firing_direction();
        Projectile {
            position: Point {
                x: self.position.x + direction.sign() * hero_radius,
                y: self.position.y,
            },
            direction,
            radius: projectile_radius,
            color: self.projectile_color,
            owner: self.index,
        }
    }

    /// Applies a validated patch. Position, direction and score are never touched.
    pub fn apply_patch(&mut self, patch: &HeroPatch) -> Result<(), CommandError> {
        patch.validate()?;
        if let Some(color) = patch.projectile_color {
            self.projectile_color = color;
        }
        if let Some(interval) = patch.fire_interval_ms {
            self.fire_interval_ms = interval;
        }
        if let Some(speed) = patch.speed {
            self.speed = speed;
        }
        Ok(())
    }
}

/// The two-hero lineup a session starts with: red on the left, blue on the right.
pub fn default_roster(config: &SimConfig) -> Vec<Hero> {
    let mid_y = config.field_height / 2.0;
    vec![
        Hero::new(
            0,
            Point::new(100.0, mid_y),
            PaletteColor::Red,
            PaletteColor::Blue,
            config.field_width,
        ),
        Hero::new(
            1,
            Point::new(config.field_width - 100.0, mid_y),
            PaletteColor::Blue,
            PaletteColor::Green,
            config.field_width,
        ),
    ]
}
