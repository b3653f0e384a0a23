use crate::arena::{Arena, Hit};
use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::error::{CommandError, ConfigError};
use crate::hero::{Hero, HeroPatch};
use crate::input;
use crate::render::Renderer;
use crate::types::*;
use crate::{debug_clock, debug_collision, debug_command, debug_movement};
use log::{info, warn};
use macroquad::prelude::{get_frame_time, next_frame};
use std::collections::VecDeque;

/// What one call to [`Game::tick`] did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickOutcome {
    pub applied: bool,  // False when the simulation is paused
    pub retired: usize, // Projectiles that left the field
    pub hits: Vec<Hit>,
}

/// Read-only copy of the simulation handed to the renderer and input adapter.
/// Always taken between ticks, never mid-tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub tick: u64,
    pub running: bool,
    pub selected_hero: Option<usize>,
    pub cursor: Option<Point>,
    pub heroes: Vec<Hero>,
    pub projectiles: Vec<Projectile>,
}

/// The Game struct owns the whole simulation state and is its only writer
pub struct Game {
    pub arena: Arena,
    config: SimConfig,
    running: bool,
    selected_hero: Option<usize>,
    cursor: Option<Point>, // Latest pointer position, read once per tick
    command_queue: VecDeque<Command>,
    clock: SimClock,
    tick_count: u64,
}

impl Game {
    /// Create a new game with the default two heroes
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let arena = Arena::new(&config);
        Self::with_arena(config, arena)
    }

    pub fn with_arena(config: SimConfig, mut arena: Arena) -> Result<Self, ConfigError> {
        config.validate()?;
        // Tick numbering restarts at zero
        for hero in &mut arena.heroes {
            hero.last_fired_tick = None;
        }
        info!(
            "Simulation ready: tick every {:.1} ms, evasion buffer {}, fire interval {}",
            config.tick_duration * 1000.0,
            config.evasion_buffer,
            if config.enforce_fire_interval {
                "enforced"
            } else {
                "not enforced"
            }
        );

        Ok(Game {
            arena,
            clock: SimClock::new(config.tick_duration, config.max_ticks_per_frame),
            config,
            running: true,
            selected_hero: None,
            cursor: None,
            command_queue: VecDeque::new(),
            tick_count: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn selected_hero(&self) -> Option<usize> {
        self.selected_hero
    }

    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Stores the latest pointer position. Takes effect on the next tick.
    pub fn set_cursor(&mut self, cursor: Option<Point>) {
        self.cursor = cursor;
    }

    /// Advance the simulation by one fixed step.
    ///
    /// Order is fixed: all heroes move, then all projectiles move (and leave
    /// the field), then surviving projectiles are tested for hits. Paused
    /// games are left untouched.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::default();
        }

        let cursor = self.cursor;
        self.tick_count += 1;
        let tick = self.tick_count;

        let reports = self.arena.move_heroes(cursor, self.config.evasion_buffer);
        for (hero, report) in self.arena.heroes.iter().zip(&reports) {
            if report.evaded || report.reflected {
                debug_movement!(
                    hero.index,
                    tick,
                    "y={:.1} direction {:?} (evaded: {}, reflected: {})",
                    hero.position.y,
                    hero.direction,
                    report.evaded,
                    report.reflected
                );
            }
        }

        let retired = self.arena.update_projectiles(self.config.projectile_speed);
        let hits = self.arena.resolve_collisions(self.config.hero_radius);
        for hit in &hits {
            debug_collision!(
                hit.target,
                tick,
                "struck by a projectile from Hero {} at ({:.1}, {:.1})",
                hit.owner,
                hit.position.x,
                hit.position.y
            );
        }

        if retired > 0 || !hits.is_empty() {
            debug_clock!(
                tick,
                "{} projectiles retired, {} hits, {} in flight",
                retired,
                hits.len(),
                self.arena.projectiles.len()
            );
        }

        TickOutcome {
            applied: true,
            retired,
            hits,
        }
    }

    /// Applies queued commands, then runs every tick due for `frame_time` seconds.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        self.process_commands();

        if !self.running {
            // Paused time never turns into catch-up ticks on resume
            self.clock.reset();
            return 0;
        }

        let due = self.clock.accumulate(frame_time);
        for _ in 0..due {
            self.tick();
        }
        due
    }

    /// Queues a command to be applied before the next tick.
    pub fn queue(&mut self, command: Command) {
        self.command_queue.push_back(command);
    }

    /// Applies every queued command in arrival order. Rejected commands are logged and dropped.
    pub fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(e) = self.apply(command) {
                warn!("Rejected {:?}: {}", command, e);
            }
        }
    }

    pub fn apply(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::Fire(index) => self.fire(index),
            Command::Configure(index, patch) => self.configure(index, patch),
            Command::SetRunning(running) => {
                self.set_running(running);
                Ok(())
            }
            Command::TogglePause => {
                self.set_running(!self.running);
                Ok(())
            }
            Command::Select(index) => self.select_hero(index),
            Command::CursorMoved(point) => {
                self.set_cursor(Some(point));
                Ok(())
            }
        }
    }

    /// Spawns a projectile from the hero's rim, heading toward the opposing side.
    pub fn fire(&mut self, index: usize) -> Result<(), CommandError> {
        let hero = self.arena.hero(index)?;

        if self.config.enforce_fire_interval {
            if let Some(last) = hero.last_fired_tick {
                let elapsed_ms = self.config.ticks_to_ms(self.tick_count.saturating_sub(last));
                let interval_ms = hero.fire_interval_ms as f64;
                if elapsed_ms < interval_ms {
                    return Err(CommandError::FireOnCooldown {
                        hero: index,
                        remaining_ms: interval_ms - elapsed_ms,
                    });
                }
            }
        }

        let projectile = hero.spawn_projectile(self.config.hero_radius, self.config.projectile_radius);
        self.arena.hero_mut(index)?.last_fired_tick = Some(self.tick_count);
        self.arena.spawn_projectile(projectile);
        debug_command!(index, self.tick_count, "fired a {} projectile", projectile.color.name());
        Ok(())
    }

    /// Applies a partial update to a hero's projectile color, fire interval or speed.
    pub fn configure(&mut self, index: usize, patch: HeroPatch) -> Result<(), CommandError> {
        let hero = self.arena.hero_mut(index)?;
        hero.apply_patch(&patch)?;
        info!(
            "Hero {} configured: projectile {}, fire interval {} ms, speed {}",
            index,
            hero.projectile_color.name(),
            hero.fire_interval_ms,
            hero.speed
        );
        Ok(())
    }

    pub fn set_running(&mut self, running: bool) {
        if self.running != running {
            info!(
                "Simulation {} at Tick {}",
                if running { "resumed" } else { "paused" },
                self.tick_count
            );
        }
        self.running = running;
    }

    /// Marks the hero being edited in the configuration panel. No effect on the simulation.
    pub fn select_hero(&mut self, index: Option<usize>) -> Result<(), CommandError> {
        if let Some(index) = index {
            self.arena.hero(index)?;
        }
        self.selected_hero = index;
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick_count,
            running: self.running,
            selected_hero: self.selected_hero,
            cursor: self.cursor,
            heroes: self.arena.heroes.clone(),
            projectiles: self.arena.projectiles.clone(),
        }
    }

    /// Run the main loop: poll input, advance the clock, draw.
    pub async fn run(&mut self, renderer: &mut Renderer) {
        info!("Starting main loop...");

        while !Renderer::window_should_close() {
            let before = self.snapshot();
            for command in input::poll_commands(&before, &self.config) {
                self.queue(command);
            }

            self.advance(get_frame_time());

            renderer.draw_frame(&self.snapshot());
            next_frame().await;
        }

        info!("Exiting after {} ticks.", self.tick_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FIELD_WIDTH;
    use assert_approx_eq::assert_approx_eq;
    use proptest::prelude::*;

    fn game() -> Game {
        Game::new(SimConfig::default()).unwrap()
    }

    fn projectile(x: f64, y: f64, direction: Direction, owner: usize) -> Projectile {
        Projectile {
            position: Point::new(x, y),
            direction,
            radius: 5.0,
            color: PaletteColor::Blue,
            owner,
        }
    }

    #[test]
    fn test_new_game_starts_running() {
        let game = game();
        assert!(game.is_running());
        assert_eq!(game.tick_count(), 0);
        assert_eq!(game.selected_hero(), None);
        assert_eq!(game.cursor(), None);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimConfig::default().with_tick_ms(0);
        assert!(Game::new(config).is_err());
    }

    #[test]
    fn test_boundary_reflection_through_tick() {
        let mut game = game();
        game.arena.heroes[0].position.y = 0.0;
        game.arena.heroes[0].direction = Direction::Negative;
        game.tick();
        assert_eq!(game.arena.heroes[0].position.y, 0.0);
        assert_eq!(game.arena.heroes[0].direction, Direction::Positive);
    }

    #[test]
    fn test_evasion_trigger_through_tick() {
        let mut game = game();
        game.set_cursor(Some(Point::new(110.0, 300.0)));
        game.tick();
        assert_eq!(game.arena.heroes[0].direction, Direction::Negative);
        assert_approx_eq!(game.arena.heroes[0].position.y, 298.0);
        // The far hero is out of reach of the cursor
        assert_eq!(game.arena.heroes[1].direction, Direction::Positive);
    }

    #[test]
    fn test_projectile_lifetime() {
        let mut game = game();
        game.arena.spawn_projectile(projectile(790.0, 50.0, Direction::Positive, 0));
        let outcome = game.tick();
        assert_eq!(outcome.retired, 0);
        assert_approx_eq!(game.arena.projectiles[0].position.x, 795.0);
        let outcome = game.tick();
        assert_eq!(outcome.retired, 1);
        assert!(game.arena.projectiles.is_empty());
    }

    #[test]
    fn test_self_hit_exclusion() {
        let mut game = game();
        game.arena.heroes[0].speed = 1.0;
        for _ in 0..20 {
            let own = game.arena.heroes[0].position;
            // Park the projectile on its owner before every tick
            game.arena.projectiles = vec![projectile(own.x, own.y, Direction::Negative, 0)];
            game.arena.projectiles[0].position.x += 5.0;
            let outcome = game.tick();
            assert!(outcome.hits.is_empty());
        }
        assert_eq!(game.arena.heroes[0].score, 0);
        assert_eq!(game.arena.heroes[1].score, 0);
    }

    #[test]
    fn test_score_attribution() {
        let mut game = game();
        // Hero 0 moves to y=302 this tick; the projectile moves to x=110
        game.arena
            .spawn_projectile(projectile(115.0, 302.0, Direction::Negative, 1));
        let outcome = game.tick();
        assert_eq!(outcome.hits.len(), 1);
        assert_eq!(outcome.hits[0].owner, 1);
        assert_eq!(outcome.hits[0].target, 0);
        assert_eq!(game.arena.heroes[1].score, 1);
        assert_eq!(game.arena.heroes[0].score, 0);
        assert!(game.arena.projectiles.is_empty());
    }

    #[test]
    fn test_projectile_retired_at_edge_never_scores() {
        let config = SimConfig::default();
        let heroes = vec![
            Hero::new(0, Point::new(100.0, 300.0), PaletteColor::Red, PaletteColor::Blue, FIELD_WIDTH),
            Hero::new(1, Point::new(798.0, 300.0), PaletteColor::Blue, PaletteColor::Green, FIELD_WIDTH),
        ];
        let mut game = Game::with_arena(config, Arena::with_heroes(&SimConfig::default(), heroes)).unwrap();
        game.arena.spawn_projectile(projectile(796.0, 302.0, Direction::Positive, 0));
        let outcome = game.tick();
        assert_eq!(outcome.retired, 1);
        assert!(outcome.hits.is_empty());
        assert_eq!(game.arena.heroes[0].score, 0);
    }

    #[test]
    fn test_fire_spawns_from_rim() {
        let mut game = game();
        game.fire(0).unwrap();
        game.fire(1).unwrap();
        assert_eq!(game.arena.projectiles.len(), 2);

        let left = game.arena.projectiles[0];
        assert_approx_eq!(left.position.x, 115.0);
        assert_approx_eq!(left.position.y, 300.0);
        assert_eq!(left.direction, Direction::Positive);
        assert_eq!(left.color, PaletteColor::Blue);
        assert_eq!(left.owner, 0);

        let right = game.arena.projectiles[1];
        assert_approx_eq!(right.position.x, 685.0);
        assert_eq!(right.direction, Direction::Negative);
        assert_eq!(right.color, PaletteColor::Green);
        assert_eq!(right.owner, 1);
    }

    #[test]
    fn test_fire_unknown_hero_is_rejected() {
        let mut game = game();
        assert_eq!(
            game.fire(2),
            Err(CommandError::UnknownHero { index: 2, count: 2 })
        );
        assert!(game.arena.projectiles.is_empty());
    }

    #[test]
    fn test_fire_interval_not_enforced_by_default() {
        let mut game = game();
        for _ in 0..5 {
            game.fire(0).unwrap();
        }
        assert_eq!(game.arena.projectiles.len(), 5);
    }

    #[test]
    fn test_fire_interval_enforced_when_enabled() {
        let config = SimConfig {
            enforce_fire_interval: true,
            ..SimConfig::default().with_tick_ms(100)
        };
        let mut game = Game::new(config).unwrap();
        game.configure(0, HeroPatch::fire_interval_ms(500)).unwrap();

        game.fire(0).unwrap();
        match game.fire(0) {
            Err(CommandError::FireOnCooldown { hero, remaining_ms }) => {
                assert_eq!(hero, 0);
                assert_approx_eq!(remaining_ms, 500.0, 1e-3);
            }
            other => panic!("expected cooldown, got {:?}", other),
        }
        // The other hero has its own cooldown
        game.fire(1).unwrap();

        for _ in 0..5 {
            game.tick();
        }
        game.fire(0).unwrap();
    }

    #[test]
    fn test_fired_projectile_moves_on_next_tick() {
        let mut game = game();
        game.fire(0).unwrap();
        assert_approx_eq!(game.arena.projectiles[0].position.x, 115.0);
        game.tick();
        assert_approx_eq!(game.arena.projectiles[0].position.x, 120.0);
    }

    #[test]
    fn test_configure_is_idempotent() {
        let mut once = game();
        once.configure(0, HeroPatch::speed(5.0)).unwrap();

        let mut twice = game();
        twice.configure(0, HeroPatch::speed(5.0)).unwrap();
        twice.configure(0, HeroPatch::speed(5.0)).unwrap();

        assert_eq!(once.snapshot(), twice.snapshot());
        assert_eq!(twice.arena.heroes[0].position, Point::new(100.0, 300.0));
        assert_eq!(twice.arena.heroes[0].score, 0);
        assert_approx_eq!(twice.arena.heroes[0].speed, 5.0);
    }

    #[test]
    fn test_configure_rejects_bad_input() {
        let mut game = game();
        let before = game.snapshot();
        assert!(game.configure(3, HeroPatch::speed(4.0)).is_err());
        assert!(game.configure(0, HeroPatch::fire_interval_ms(3100)).is_err());
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_configure_while_paused_applies() {
        let mut game = game();
        game.set_running(false);
        game.configure(1, HeroPatch::projectile_color(PaletteColor::Yellow))
            .unwrap();
        assert_eq!(game.arena.heroes[1].projectile_color, PaletteColor::Yellow);
    }

    #[test]
    fn test_with_arena_clears_stale_fire_ticks() {
        let config = SimConfig {
            enforce_fire_interval: true,
            ..SimConfig::default()
        };
        let mut arena = Arena::new(&config);
        arena.heroes[0].last_fired_tick = Some(500);

        let mut game = Game::with_arena(config, arena).unwrap();
        assert_eq!(game.arena.heroes[0].last_fired_tick, None);
        game.fire(0).unwrap();
        assert_eq!(game.arena.heroes[0].last_fired_tick, Some(0));
    }

    #[test]
    fn test_fire_while_paused_waits_for_resume() {
        let mut game = game();
        game.set_running(false);
        game.fire(0).unwrap();
        assert_eq!(game.arena.projectiles.len(), 1);
        let spawned = game.arena.projectiles[0].position;

        for _ in 0..5 {
            game.tick();
        }
        assert_eq!(game.arena.projectiles[0].position, spawned);

        game.set_running(true);
        game.tick();
        assert_approx_eq!(game.arena.projectiles[0].position.x, spawned.x + 5.0);
    }

    #[test]
    fn test_pause_freezes_state() {
        let mut game = game();
        game.fire(0).unwrap();
        game.arena.heroes[1].score = 3;
        game.set_running(false);
        let before = game.snapshot();

        for _ in 0..10 {
            let outcome = game.tick();
            assert!(!outcome.applied);
        }
        assert_eq!(game.snapshot(), before);

        game.set_running(true);
        assert!(game.tick().applied);
        assert_eq!(game.tick_count(), 1);
    }

    #[test]
    fn test_select_hero() {
        let mut game = game();
        game.select_hero(Some(1)).unwrap();
        assert_eq!(game.selected_hero(), Some(1));
        assert!(game.select_hero(Some(5)).is_err());
        assert_eq!(game.selected_hero(), Some(1));
        game.select_hero(None).unwrap();
        assert_eq!(game.selected_hero(), None);
    }

    #[test]
    fn test_advance_runs_due_ticks() {
        let config = SimConfig::default().with_tick_ms(250);
        let mut game = Game::new(config).unwrap();
        assert_eq!(game.advance(0.625), 2);
        assert_eq!(game.tick_count(), 2);
        assert_eq!(game.advance(0.125), 1);
        assert_eq!(game.tick_count(), 3);
    }

    #[test]
    fn test_advance_while_paused_does_not_bank_time() {
        let config = SimConfig::default().with_tick_ms(250);
        let mut game = Game::new(config).unwrap();
        game.set_running(false);
        assert_eq!(game.advance(5.0), 0);
        game.set_running(true);
        assert_eq!(game.advance(0.125), 0);
        assert_eq!(game.tick_count(), 0);
    }

    #[test]
    fn test_queued_commands_apply_before_ticks() {
        let config = SimConfig::default().with_tick_ms(250);
        let mut game = Game::new(config).unwrap();
        game.queue(Command::Fire(0));
        game.queue(Command::Fire(9)); // Rejected and dropped
        game.queue(Command::CursorMoved(Point::new(100.0, 300.0)));
        game.queue(Command::Select(Some(0)));

        assert_eq!(game.advance(0.25), 1);
        assert_eq!(game.arena.projectiles.len(), 1);
        assert_approx_eq!(game.arena.projectiles[0].position.x, 120.0);
        assert_eq!(game.selected_hero(), Some(0));
        assert_eq!(game.arena.heroes[0].direction, Direction::Negative);
    }

    #[test]
    fn test_queued_pause_stops_ticks() {
        let config = SimConfig::default().with_tick_ms(250);
        let mut game = Game::new(config).unwrap();
        game.queue(Command::TogglePause);
        assert_eq!(game.advance(1.0), 0);
        assert!(!game.is_running());
        game.queue(Command::SetRunning(true));
        assert_eq!(game.advance(1.0), 4);
    }

    proptest! {
        #[test]
        fn prop_heroes_stay_on_field(
            speed in 1.0f64..=10.0,
            start_y in 0.0f64..=600.0,
            cursor_x in -50.0f64..850.0,
            cursor_y in -50.0f64..650.0,
            ticks in 1usize..400,
        ) {
            let mut game = game();
            game.configure(0, HeroPatch::speed(speed)).unwrap();
            game.arena.heroes[0].position.y = start_y;
            game.set_cursor(Some(Point::new(cursor_x, cursor_y)));
            for _ in 0..ticks {
                game.tick();
                for hero in &game.arena.heroes {
                    prop_assert!(hero.position.y >= 0.0 && hero.position.y <= 600.0);
                }
            }
        }

        #[test]
        fn prop_scores_never_decrease(fire_pattern in proptest::collection::vec(0usize..3, 1..200)) {
            let mut game = game();
            let mut previous = vec![0u32; 2];
            for (step, choice) in fire_pattern.into_iter().enumerate() {
                if choice < 2 {
                    game.fire(choice).unwrap();
                }
                if step % 7 == 0 {
                    game.set_cursor(Some(Point::new(100.0, 300.0)));
                }
                game.tick();
                for (hero, prev) in game.arena.heroes.iter().zip(previous.iter_mut()) {
                    prop_assert!(hero.score >= *prev);
                    *prev = hero.score;
                }
                for projectile in &game.arena.projectiles {
                    prop_assert!(projectile.owner < game.arena.heroes.len());
                    prop_assert!(projectile.position.x > 0.0 && projectile.position.x < FIELD_WIDTH);
                }
            }
        }

        #[test]
        fn prop_paused_ticks_change_nothing(n in 1usize..50, warmup in 0usize..50) {
            let mut game = game();
            game.fire(0).unwrap();
            game.fire(1).unwrap();
            for _ in 0..warmup {
                game.tick();
            }
            game.set_running(false);
            let before = game.snapshot();
            for _ in 0..n {
                game.tick();
            }
            prop_assert_eq!(game.snapshot(), before);
        }
    }
}
