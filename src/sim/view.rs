//! Read-only frame view for renderers
//!
//! The core never draws. Hosts take a [`Frame`] after each tick and switch on
//! [`BrickAppearance`] / [`PowerUpKind`] to pick shapes and colors.

use super::effects::EffectKind;
use super::rect::Rect;
use super::state::{Ball, Brick, GameEvent, GameState, LaserShot, PowerUp};
use crate::Color;

/// Color used for every permanent brick on screen
pub const PERMANENT_DISPLAY_COLOR: Color = [90, 90, 120];

/// How a brick should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickAppearance {
    Normal,
    /// Indestructible wall brick
    Permanent,
    /// Explosive brick (drawn with a core marker)
    Explosive,
}

impl Brick {
    pub fn appearance(&self) -> BrickAppearance {
        if !self.destructible {
            BrickAppearance::Permanent
        } else if self.explosive {
            BrickAppearance::Explosive
        } else {
            BrickAppearance::Normal
        }
    }

    pub fn display_color(&self) -> Color {
        match self.appearance() {
            BrickAppearance::Permanent => PERMANENT_DISPLAY_COLOR,
            _ => self.color,
        }
    }
}

/// Snapshot of everything a renderer needs for one frame
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub paddle: Rect,
    pub balls: &'a [Ball],
    pub bricks: &'a [Brick],
    pub power_ups: &'a [PowerUp],
    pub lasers: &'a [LaserShot],
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    /// Effects active at the frame's timestamp
    pub effects: Vec<EffectKind>,
    pub game_over: bool,
    /// Events raised by the tick that produced this frame
    pub events: &'a [GameEvent],
}

impl GameState {
    /// Borrow the current state as a frame
    pub fn frame(&self, now_ms: u64) -> Frame<'_> {
        Frame {
            paddle: self.paddle.rect,
            balls: &self.balls,
            bricks: &self.bricks,
            power_ups: &self.power_ups,
            lasers: &self.lasers,
            score: self.score,
            lives: self.lives,
            level: self.level,
            effects: self
                .effects
                .kinds()
                .filter(|&kind| self.effects.is_active(kind, now_ms))
                .collect(),
            game_over: self.is_game_over(),
            events: &self.events,
        }
    }
}
