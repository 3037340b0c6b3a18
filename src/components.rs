#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow precision loss when casting between numeric types since exact precision isn't critical for layout
    clippy::cast_precision_loss,
    // Allow truncation and sign loss when converting clamped colour channels back to u8
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    // Allow more than 3 bools in structs for game states where bools represent distinct flags
    clippy::struct_excessive_bools
)]

use bevy_ecs::prelude::*;
use ratatui::style::Color;

use crate::game::{
    EDGE_DARKEN_PERCENT, MIN_TARGET_SIZE, PLAY_AREA_HEIGHT, PLAY_AREA_WIDTH, STARTING_LEVEL,
    STARTING_TIME_TENTHS, TARGET_COLORS, TARGET_SIZE_RANGE,
};
use crate::scheduler::TimerHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Square,
    Triangle,
}

impl Shape {
    #[must_use]
    pub fn random() -> Self {
        match fastrand::u8(0..3) {
            0 => Shape::Circle,
            1 => Shape::Square,
            _ => Shape::Triangle,
        }
    }

    /// Whether the point `(u, v)`, relative to the bounding box and scaled to `[0, 1]`, is inside the shape.
    #[must_use]
    pub fn contains_unit(self, u: f32, v: f32) -> bool {
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return false;
        }
        match self {
            Shape::Square => true,
            Shape::Circle => {
                let (du, dv) = (u - 0.5, v - 0.5);
                du * du + dv * dv <= 0.25
            }
            // Apex at the top centre, base along the bottom edge
            Shape::Triangle => v >= (u - 0.5).abs() * 2.0,
        }
    }
}

// Fixed style for triangles
pub const TRIANGLE_COLOR: Color = Color::Rgb(0xa2, 0x9b, 0xfe);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    Live,
    Hit,
    Missed,
}

#[derive(Component, Debug, Clone)]
pub struct Target {
    pub shape: Shape,
    pub size: f32,
    pub color: Option<Color>,
    pub status: TargetStatus,
    // Spawn order, later targets sit on top
    pub serial: u64,
    pub auto_miss: Option<TimerHandle>,
}

impl Target {
    #[must_use]
    pub fn new(shape: Shape, size: f32, color: Option<Color>, serial: u64) -> Self {
        Self {
            shape,
            size,
            color,
            status: TargetStatus::Live,
            serial,
            auto_miss: None,
        }
    }

    /// Random shape, size in `[40, 70)` and palette colour (triangles keep their fixed style).
    #[must_use]
    pub fn random(serial: u64) -> Self {
        let shape = Shape::random();
        let size = fastrand::f32() * TARGET_SIZE_RANGE + MIN_TARGET_SIZE;
        let color = if shape == Shape::Triangle {
            None
        } else {
            let hex = TARGET_COLORS[fastrand::usize(..TARGET_COLORS.len())];
            parse_hex_color(hex)
        };
        Self::new(shape, size, color, serial)
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.status == TargetStatus::Live
    }

    #[must_use]
    pub fn fill_color(&self) -> Color {
        self.color.unwrap_or(TRIANGLE_COLOR)
    }

    #[must_use]
    pub fn edge_color(&self) -> Color {
        darken(self.fill_color(), EDGE_DARKEN_PERCENT)
    }

    /// Hit test against a point in play-area coordinates.
    #[must_use]
    pub fn contains(&self, position: Position, x: f32, y: f32) -> bool {
        if self.size <= 0.0 {
            return false;
        }
        self.shape
            .contains_unit((x - position.x) / self.size, (y - position.y) / self.size)
    }
}

/// Top-left corner of an entity in play-area pixels.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

// Floating "+10" / "LEVEL 2!" text
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub text: String,
}

#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            width: PLAY_AREA_WIDTH,
            height: PLAY_AREA_HEIGHT,
        }
    }
}

impl PlayArea {
    /// Random top-left corner keeping a `size` box fully inside the area.
    #[must_use]
    pub fn random_position(&self, size: f32) -> Position {
        let max_x = (self.width - size).max(0.0);
        let max_y = (self.height - size).max(0.0);
        Position {
            x: fastrand::f32() * max_x,
            y: fastrand::f32() * max_y,
        }
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Start,
    Playing,
    Paused,
    GameOver,
}

/// Handles of the controller-owned timers, so they can be cancelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameTimers {
    pub ready: Option<TimerHandle>,
    pub countdown: Option<TimerHandle>,
    pub spawn: Option<TimerHandle>,
}

#[derive(Resource, Debug, Clone)]
pub struct GameState {
    pub score: u32,
    pub level: u32,
    // Tenths of a second; may go negative after a late miss penalty
    pub time_left_tenths: i32,
    pub active: bool,
    pub paused: bool,
    pub instruction: Option<&'static str>,
    pub new_record: bool,
    pub hits: u32,
    pub misses: u32,
    pub spawned: u64,
    pub timers: GameTimers,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            score: 0,
            level: STARTING_LEVEL,
            time_left_tenths: STARTING_TIME_TENTHS,
            active: false,
            paused: false,
            instruction: None,
            new_record: false,
            hits: 0,
            misses: 0,
            spawned: 0,
            timers: GameTimers::default(),
        }
    }
}

impl GameState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn time_left(&self) -> f32 {
        self.time_left_tenths as f32 / 10.0
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active && !self.paused
    }
}

/// Parses `#rrggbb` into an RGB colour.
#[must_use]
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    let [_, r, g, b] = value.to_be_bytes();
    Some(Color::Rgb(r, g, b))
}

/// Darkens each RGB channel by `percent` of full scale, clamping at zero.
///
/// Non-RGB colours are returned unchanged.
#[must_use]
pub fn darken(color: Color, percent: u8) -> Color {
    let Color::Rgb(r, g, b) = color else {
        return color;
    };
    let amount = (f32::from(percent.min(100)) * 2.55).round();
    let shade = |channel: u8| (f32::from(channel) - amount).clamp(0.0, 255.0) as u8;
    Color::Rgb(shade(r), shade(g), shade(b))
}
