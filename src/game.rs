#![warn(clippy::all, clippy::pedantic)]

// Play area (logical pixels, scaled to terminal cells when rendering)
pub const PLAY_AREA_WIDTH: f32 = 800.0;
pub const PLAY_AREA_HEIGHT: f32 = 480.0;

// Countdown, in tenths of a second so repeated ticks stay exact
pub const STARTING_TIME_TENTHS: i32 = 50; // 5.0 seconds
pub const MAX_TIME_TENTHS: i32 = 80; // hit bonus never pushes past 8.0 seconds
pub const TICK_TENTHS: i32 = 1;
pub const HIT_BONUS_TENTHS: i32 = 8;
pub const MISS_PENALTY_TENTHS: i32 = 3;
pub const TIMER_WARNING_TENTHS: i32 = 10;

// Timer delays in milliseconds
pub const TICK_INTERVAL_MS: u64 = 100;
pub const READY_DELAY_MS: u64 = 1000;
pub const HIT_REMOVAL_DELAY_MS: u64 = 300;
pub const MISS_REMOVAL_DELAY_MS: u64 = 500;
pub const POPUP_LIFETIME_MS: u64 = 1000;

// Spawn pacing: base - level * step, never below the floor
pub const SPAWN_DELAY_BASE_MS: u64 = 800;
pub const SPAWN_DELAY_STEP_MS: u64 = 50;
pub const SPAWN_DELAY_FLOOR_MS: u64 = 300;
pub const AUTO_MISS_DELAY_BASE_MS: u64 = 3000;
pub const AUTO_MISS_DELAY_STEP_MS: u64 = 100;
pub const AUTO_MISS_DELAY_FLOOR_MS: u64 = 1200;

// Scoring
pub const STARTING_LEVEL: u32 = 1;
pub const POINTS_PER_LEVEL: u32 = 10;
pub const SCORE_PER_LEVEL_UP: u32 = 100;

// Target sizes, in logical pixels
pub const MIN_TARGET_SIZE: f32 = 40.0;
pub const TARGET_SIZE_RANGE: f32 = 30.0;

// Colour palette for circles and squares
pub const TARGET_COLORS: [&str; 5] = ["#ff6b6b", "#4ecdc4", "#45b7d1", "#f9ca24", "#f0932b"];
pub const EDGE_DARKEN_PERCENT: u8 = 20;

pub const LEVEL_POPUP_OFFSET: f32 = 24.0; // level-up text sits above the "+N" popup
pub const GET_READY_TEXT: &str = "Get Ready...";

/// Delay before the spawn loop fires again at the given level.
#[must_use]
pub fn spawn_delay_ms(level: u32) -> u64 {
    SPAWN_DELAY_BASE_MS
        .saturating_sub(u64::from(level) * SPAWN_DELAY_STEP_MS)
        .max(SPAWN_DELAY_FLOOR_MS)
}

/// How long a target stays up before it counts as missed.
#[must_use]
pub fn auto_miss_delay_ms(level: u32) -> u64 {
    AUTO_MISS_DELAY_BASE_MS
        .saturating_sub(u64::from(level) * AUTO_MISS_DELAY_STEP_MS)
        .max(AUTO_MISS_DELAY_FLOOR_MS)
}

/// Points awarded for a hit at the given level.
#[must_use]
pub fn points_for_hit(level: u32) -> u32 {
    level.saturating_mul(POINTS_PER_LEVEL)
}

/// Number of `SCORE_PER_LEVEL_UP` boundaries passed when the score moves from `before` to `after`.
#[must_use]
pub fn level_ups_between(before: u32, after: u32) -> u32 {
    (after / SCORE_PER_LEVEL_UP).saturating_sub(before / SCORE_PER_LEVEL_UP)
}
