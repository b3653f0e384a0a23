use crate::config::SimConfig;
use crate::error::CommandError;
use crate::hero::{self, Hero, MovementReport};
use crate::types::*;
use crate::utils;

/// A projectile that connected with an opposing hero this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub owner: usize,  // Hero credited with the point
    pub target: usize, // Hero that was struck
    pub position: Point,
}

// Owns every actor on the field: the heroes and the projectiles in flight
#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
    pub heroes: Vec<Hero>,
    pub projectiles: Vec<Projectile>,
}

impl Arena {
    /// Arena with the default two-hero lineup.
    pub fn new(config: &SimConfig) -> Self {
        Self::with_heroes(config, hero::default_roster(config))
    }

    /// Arena with a custom roster. Heroes are renumbered by their slot so that
    /// projectile owners, lookups and score credit all use the same index.
    pub fn with_heroes(config: &SimConfig, mut heroes: Vec<Hero>) -> Self {
        for (slot, hero) in heroes.iter_mut().enumerate() {
            if hero.index != slot {
                log::warn!("Hero {} placed in slot {}; renumbering", hero.index, slot);
                hero.index = slot;
            }
        }
        log::info!(
            "Arena created: {}x{} field with {} heroes.",
            config.field_width,
            config.field_height,
            heroes.len()
        );
        Arena {
            width: config.field_width,
            height: config.field_height,
            heroes,
            projectiles: Vec::new(),
        }
    }

    pub fn hero(&self, index: usize) -> Result<&Hero, CommandError> {
        let count = self.heroes.len();
        self.heroes
            .get(index)
            .ok_or(CommandError::UnknownHero { index, count })
    }

    pub fn hero_mut(&mut self, index: usize) -> Result<&mut Hero, CommandError> {
        let count = self.heroes.len();
        self.heroes
            .get_mut(index)
            .ok_or(CommandError::UnknownHero { index, count })
    }

    // Adds a projectile to the arena's list
    pub fn spawn_projectile(&mut self, projectile: Projectile) {
        log::debug!(
            target: "command",
            "Spawning projectile from Hero {} at ({:.1}, {:.1}) heading {:?}",
            projectile.owner,
            projectile.position.x,
            projectile.position.y,
            projectile.direction
        );
        self.projectiles.push(projectile);
    }

    /// Moves every hero one step along its lane, in index order.
    pub fn move_heroes(&mut self, cursor: Option<Point>, evasion_buffer: f64) -> Vec<MovementReport> {
        let height = self.height;
        self.heroes
            .iter_mut()
            .map(|hero| hero.process_movement(cursor, evasion_buffer, height))
            .collect()
    }

    /// Advances every projectile and retires those that left the open interval (0, width).
    /// Returns how many were retired.
    pub fn update_projectiles(&mut self, speed: f64) -> usize {
        let width = self.width;
        let before = self.projectiles.len();

        self.projectiles.retain_mut(|projectile| {
            projectile.position.x += projectile.direction.sign() * speed;
            let inside = projectile.position.x > 0.0 && projectile.position.x < width;
            if !inside {
                log::debug!(
                    target: "collision",
                    "Projectile from Hero {} left the field at x={:.1}",
                    projectile.owner,
                    projectile.position.x
                );
            }
            inside
        });

        before - self.projectiles.len()
    }

    /// Tests each projectile against every hero but its owner. The first hero
    /// in index order that overlaps wins: the owner scores once and the
    /// projectile is removed.
    pub fn resolve_collisions(&mut self, hero_radius: f64) -> Vec<Hit> {
        let Arena {
            heroes,
            projectiles,
            ..
        } = self;
        let mut hits = Vec::new();

        projectiles.retain(|projectile| {
            let contact_radius = projectile.radius + hero_radius;
            let target = heroes.iter().position(|hero| {
                hero.index != projectile.owner
                    && utils::within_radius(projectile.position, hero.position, contact_radius)
            });

            let Some(target) = target else {
                return true;
            };

            if let Some(owner) = heroes.get_mut(projectile.owner) {
                owner.score += 1;
                log::info!(
                    target: "collision",
                    "Hero {} hit Hero {} at ({:.1}, {:.1}), score now {}",
                    projectile.owner,
                    target,
                    projectile.position.x,
                    projectile.position.y,
                    owner.score
                );
            }
            hits.push(Hit {
                owner: projectile.owner,
                target,
                position: projectile.position,
            });
            false
        });

        hits
    }
}
