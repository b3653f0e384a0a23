use crate::hero::HeroPatch;

/// A position on the field, in distance units. Origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        crate::utils::distance(*self, *other)
    }
}

/// Sign of travel along an actor's single axis of movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Negative, // -1: up for heroes, left for projectiles
    Positive, // +1: down for heroes, right for projectiles
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Negative => -1.0,
            Direction::Positive => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Negative => Direction::Positive,
            Direction::Positive => Direction::Negative,
        }
    }
}

/// Which half of the field a hero defends. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Horizontal direction of projectiles fired from this side.
    pub fn firing_direction(self) -> Direction {
        match self {
            Side::Left => Direction::Positive,
            Side::Right => Direction::Negative,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl PaletteColor {
    pub const ALL: [PaletteColor; 4] = [
        PaletteColor::Red,
        PaletteColor::Blue,
        PaletteColor::Green,
        PaletteColor::Yellow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PaletteColor::Red => "red",
            PaletteColor::Blue => "blue",
            PaletteColor::Green => "green",
            PaletteColor::Yellow => "yellow",
        }
    }
}

/// A projectile in flight. Travels horizontally only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub position: Point,
    pub direction: Direction,
    pub radius: f64,
    pub color: PaletteColor,
    pub owner: usize, // Index of the hero that fired it
}

/// Requests from the input boundary, applied between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Fire(usize),
    Configure(usize, HeroPatch),
    SetRunning(bool),
    TogglePause,
    Select(Option<usize>),
    CursorMoved(Point),
}
