//! Brickfall - a brick-breaking arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, effects, levels)
//! - `runner`: Fixed-rate host loop (clock, input sampling, frame output)
//! - `settings`: Host configuration loaded from JSON
//! - `error`: Configuration errors
//!
//! Rendering, audio and windowing are left to the host: the core only exposes
//! read-only frames (see [`sim::Frame`]).

pub mod error;
pub mod runner;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
///
/// Velocities are in pixels per tick, durations in milliseconds.
pub mod consts {
    /// Fixed simulation rate
    pub const TICK_HZ: u32 = 60;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 110.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    pub const PADDLE_Y: f32 = FIELD_HEIGHT - 60.0;
    pub const PADDLE_SPEED: f32 = 7.0;
    /// Paddle speed gained per level (floored to whole pixels)
    pub const PADDLE_SPEED_INCREMENT: f32 = 0.6;
    /// Paddle width lost per level
    pub const PADDLE_WIDTH_DECREMENT: f32 = 8.0;
    pub const PADDLE_MIN_WIDTH: f32 = 70.0;
    /// Widen effect: step per pickup and cap
    pub const WIDEN_STEP: f32 = 0.35;
    pub const WIDEN_MAX: f32 = 1.8;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 16.0;
    pub const BALL_SPEED: f32 = 5.0;
    pub const BALL_SPEED_INCREMENT_LEVEL: f32 = 0.35;
    pub const BALL_SPEED_INCREMENT_BRICK: f32 = 0.15;
    /// Ball speed-up every N destroyed bricks
    pub const BRICKS_PER_SPEEDUP: u32 = 12;
    /// Spawn point (center) of a fresh ball
    pub const BALL_START_Y: f32 = FIELD_HEIGHT - 80.0;
    pub const MAX_BALLS: usize = 6;
    /// Slow effect speed multiplier
    pub const SLOW_FACTOR: f32 = 0.7;
    /// Multiball spread in degrees
    pub const MULTIBALL_ANGLE: f32 = 20.0;
    /// Cap on brick resolutions per ball per tick
    pub const MAX_BRICK_RESOLUTIONS: usize = 6;

    /// Brick grid
    pub const BRICK_ROWS: u32 = 6;
    pub const BRICK_MIN_ROWS: u32 = 4;
    pub const BRICK_COLUMNS: u32 = 10;
    pub const BRICK_WIDTH: f32 = 70.0;
    pub const BRICK_HEIGHT: f32 = 25.0;
    pub const BRICK_PADDING: f32 = 6.0;
    pub const BRICK_TOP_OFFSET: f32 = 80.0;
    pub const BRICK_LEFT_OFFSET: f32 = 40.0;
    /// Space kept free between the lowest brick row and the field bottom
    pub const BRICK_BOTTOM_CLEARANCE: f32 = 200.0;
    /// Chance a brick gets one bonus hit point
    pub const BONUS_HP_CHANCE: f32 = 0.08;
    pub const EXPLOSION_RADIUS: f32 = BRICK_WIDTH * 1.5;

    /// Power-ups
    pub const POWERUP_SIZE: f32 = 34.0;
    pub const POWERUP_FALL_SPEED: f32 = 3.0;
    pub const POWERUP_BASE_CHANCE: f32 = 0.18;
    pub const POWERUP_CHANCE_PER_LEVEL: f32 = 0.02;
    pub const POWERUP_MAX_LEVEL_BONUS: f32 = 0.12;

    /// Laser
    pub const LASER_WIDTH: f32 = 6.0;
    pub const LASER_HEIGHT: f32 = 20.0;
    pub const LASER_SPEED: f32 = 12.0;
    /// Horizontal inset of each barrel from the paddle edge
    pub const LASER_EDGE_INSET: f32 = 10.0;
    pub const LASER_COOLDOWN_MS: u64 = 350;

    /// Effect durations (ms)
    pub const SLOW_DURATION_MS: u64 = 8_000;
    pub const WIDEN_DURATION_MS: u64 = 10_000;
    pub const STICKY_DURATION_MS: u64 = 8_000;
    pub const LASER_DURATION_MS: u64 = 8_000;

    /// Session
    pub const INITIAL_LIVES: u32 = 3;
    pub const SCORE_PER_BRICK: u64 = 10;
}

/// RGB color
pub type Color = [u8; 3];

/// Rotate a vector by an angle in degrees (positive = clockwise on screen)
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Scale each channel of a color, saturating at 255
#[inline]
pub fn scale_color(color: Color, factor: f32) -> Color {
    color.map(|c| (c as f32 * factor).clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_degrees() {
        let v = rotate_degrees(Vec2::new(1.0, 0.0), 90.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_scale_color_saturates() {
        assert_eq!(scale_color([200, 100, 0], 1.5), [255, 150, 0]);
        assert_eq!(scale_color([200, 100, 50], 0.5), [100, 50, 25]);
    }
}
