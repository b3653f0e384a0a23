//! Input adapter: turns pointer and keyboard state into simulation commands.
//!
//! Stands in for the original control surface: click regions on the field
//! select a hero, keys replace the fire buttons, and the colour buttons and
//! sliders of the edit panel become number and arrow keys.

use crate::config::{self, SimConfig};
use crate::game::Snapshot;
use crate::hero::HeroPatch;
use crate::types::*;
use crate::utils;
use macroquad::prelude::{
    KeyCode, MouseButton, is_key_pressed, is_mouse_button_pressed, mouse_position,
};

/// Raw user actions, before they are mapped against the current selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    PointerMoved(Point),
    Click(Point),
    FireKey(usize),
    PauseKey,
    ColorKey(PaletteColor),
    SpeedStep(i32),
    FireIntervalStep(i32),
    CancelKey,
}

const FIRE_KEYS: [(KeyCode, usize); 2] = [(KeyCode::A, 0), (KeyCode::L, 1)];
const COLOR_KEYS: [(KeyCode, PaletteColor); 4] = [
    (KeyCode::Key1, PaletteColor::Red),
    (KeyCode::Key2, PaletteColor::Blue),
    (KeyCode::Key3, PaletteColor::Green),
    (KeyCode::Key4, PaletteColor::Yellow),
];

/// Maps a click on the field to the hero whose half was clicked.
/// The exact centre line and clicks outside the field select nothing.
pub fn hero_for_click(point: Point, field_width: f64, field_height: f64) -> Option<usize> {
    if point.y >= field_height || point.x >= field_width {
        return None;
    }
    let mid = field_width / 2.0;
    if point.x < mid {
        Some(0)
    } else if point.x > mid {
        Some(1)
    } else {
        None
    }
}

/// Moves a fire interval by whole slider steps, staying inside the accepted range.
pub fn step_fire_interval(current: u32, steps: i32) -> u32 {
    let stepped = current as i64 + steps as i64 * config::FIRE_INTERVAL_STEP_MS as i64;
    utils::clamp(
        stepped,
        config::FIRE_INTERVAL_MIN_MS as i64,
        config::FIRE_INTERVAL_MAX_MS as i64,
    ) as u32
}

/// Moves a speed by whole slider steps, staying inside the accepted range.
pub fn step_speed(current: f64, steps: i32) -> f64 {
    utils::clamp(
        current + steps as f64 * config::SPEED_STEP,
        config::SPEED_MIN,
        config::SPEED_MAX,
    )
}

/// Translates raw events into commands. Edits apply to the selected hero and
/// are ignored when nothing is selected.
pub fn commands_for(events: &[UiEvent], snapshot: &Snapshot, config: &SimConfig) -> Vec<Command> {
    let mut commands = Vec::new();
    let selected = snapshot
        .selected_hero
        .and_then(|index| snapshot.heroes.get(index));

    for event in events {
        match *event {
            UiEvent::PointerMoved(point) => {
                if snapshot.cursor != Some(point) {
                    commands.push(Command::CursorMoved(point));
                }
            }
            UiEvent::Click(point) => {
                if let Some(index) = hero_for_click(point, config.field_width, config.field_height) {
                    commands.push(Command::Select(Some(index)));
                }
            }
            UiEvent::FireKey(index) => commands.push(Command::Fire(index)),
            UiEvent::PauseKey => commands.push(Command::TogglePause),
            UiEvent::CancelKey => commands.push(Command::Select(None)),
            UiEvent::ColorKey(color) => {
                if let Some(hero) = selected {
                    // Picking a colour closes the edit panel
                    commands.push(Command::Configure(hero.index, HeroPatch::projectile_color(color)));
                    commands.push(Command::Select(None));
                }
            }
            UiEvent::SpeedStep(steps) => {
                if let Some(hero) = selected {
                    let speed = step_speed(hero.speed, steps);
                    commands.push(Command::Configure(hero.index, HeroPatch::speed(speed)));
                }
            }
            UiEvent::FireIntervalStep(steps) => {
                if let Some(hero) = selected {
                    let interval = step_fire_interval(hero.fire_interval_ms, steps);
                    commands.push(Command::Configure(hero.index, HeroPatch::fire_interval_ms(interval)));
                }
            }
        }
    }
    commands
}

/// Reads this frame's pointer and key presses from macroquad.
fn read_events() -> Vec<UiEvent> {
    let mut events = Vec::new();

    let (mx, my) = mouse_position();
    let pointer = Point::new(mx as f64, my as f64);
    events.push(UiEvent::PointerMoved(pointer));
    if is_mouse_button_pressed(MouseButton::Left) {
        events.push(UiEvent::Click(pointer));
    }

    for (key, hero) in FIRE_KEYS {
        if is_key_pressed(key) {
            events.push(UiEvent::FireKey(hero));
        }
    }
    for (key, color) in COLOR_KEYS {
        if is_key_pressed(key) {
            events.push(UiEvent::ColorKey(color));
        }
    }
    if is_key_pressed(KeyCode::Space) {
        events.push(UiEvent::PauseKey);
    }
    if is_key_pressed(KeyCode::C) {
        events.push(UiEvent::CancelKey);
    }
    if is_key_pressed(KeyCode::Up) {
        events.push(UiEvent::SpeedStep(1));
    }
    if is_key_pressed(KeyCode::Down) {
        events.push(UiEvent::SpeedStep(-1));
    }
    if is_key_pressed(KeyCode::Right) {
        events.push(UiEvent::FireIntervalStep(1));
    }
    if is_key_pressed(KeyCode::Left) {
        events.push(UiEvent::FireIntervalStep(-1));
    }
    events
}

/// Commands produced by the user since the previous frame.
pub fn poll_commands(snapshot: &Snapshot, config: &SimConfig) -> Vec<Command> {
    commands_for(&read_events(), snapshot, config)
}
