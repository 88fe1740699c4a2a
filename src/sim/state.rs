//! Game state and core simulation types
//!
//! The session record owns every entity collection; entities carry no
//! references back to it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{ActiveEffects, EffectKind};
use super::level::generate_level;
use super::rect::Rect;
use crate::Color;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended, frame frozen until restart
    GameOver,
}

/// Ball state - attached to paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallState {
    /// Glued to the paddle, `offset` = ball center x minus paddle center x
    Attached { offset: f32 },
    /// Free-moving
    Free,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub rect: Rect,
    /// Velocity in pixels per tick (zero while attached)
    pub vel: Vec2,
    pub state: BallState,
}

impl Ball {
    /// A free ball centered at `center`
    pub fn new(center: Vec2, vel: Vec2) -> Self {
        Self {
            rect: Rect::centered(center, BALL_SIZE, BALL_SIZE),
            vel,
            state: BallState::Free,
        }
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        matches!(self.state, BallState::Attached { .. })
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Rescale velocity to `speed`, keeping direction (no-op when at rest)
    pub fn set_speed(&mut self, speed: f32) {
        if self.vel == Vec2::ZERO {
            return;
        }
        self.vel = self.vel.normalize() * speed;
    }

    /// Advance a free ball by one tick
    pub fn advance(&mut self) {
        if !self.is_attached() {
            self.rect.translate(self.vel);
        }
    }

    /// Glue to the paddle at the current horizontal offset
    pub fn attach_to(&mut self, paddle: &Paddle) {
        let offset = self.rect.center_x() - paddle.rect.center_x();
        self.state = BallState::Attached { offset };
        self.vel = Vec2::ZERO;
    }

    /// Keep an attached ball resting on the paddle
    pub fn follow(&mut self, paddle: &Paddle) {
        if let BallState::Attached { offset } = self.state {
            self.rect.set_center_x(paddle.rect.center_x() + offset);
            self.rect.set_bottom(paddle.rect.top() - 1.0);
        }
    }

    /// Launch an attached ball straight up
    pub fn release(&mut self, speed: f32) {
        if self.is_attached() {
            self.state = BallState::Free;
            self.vel = Vec2::new(0.0, -speed);
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    /// Horizontal speed in pixels per tick
    pub speed: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            rect: Rect::new(
                (FIELD_WIDTH - PADDLE_WIDTH) / 2.0,
                PADDLE_Y,
                PADDLE_WIDTH,
                PADDLE_HEIGHT,
            ),
            speed: PADDLE_SPEED,
        }
    }
}

impl Paddle {
    /// Move by `direction * speed` (direction in -1..=1) and clamp to the field
    pub fn move_by(&mut self, direction: f32) {
        self.rect.x += direction * self.speed;
        self.clamp_to_field();
    }

    pub fn clamp_to_field(&mut self) {
        self.rect.x = self.rect.x.clamp(0.0, (FIELD_WIDTH - self.rect.w).max(0.0));
    }

    /// Resize around the current center, keeping the paddle inside the field
    pub fn set_width(&mut self, width: f32) {
        let width = width.clamp(1.0, FIELD_WIDTH);
        let center = self.rect.center_x();
        self.rect.w = width;
        let half = width / 2.0;
        self.rect.set_center_x(center.clamp(half, FIELD_WIDTH - half));
    }

    pub fn recenter(&mut self) {
        self.rect.set_center_x(FIELD_WIDTH / 2.0);
        self.clamp_to_field();
    }
}

/// A brick entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    /// Index within the level layout
    pub id: u32,
    pub rect: Rect,
    pub color: Color,
    pub hit_points: u32,
    /// False for permanent wall bricks (never removed, never lose HP)
    pub destructible: bool,
    /// Detonates neighbours on destruction
    pub explosive: bool,
}

impl Brick {
    /// Still part of the field (permanent bricks are always alive)
    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.destructible || self.hit_points > 0
    }

    /// Must be destroyed to clear the level
    #[inline]
    pub fn counts_for_clear(&self) -> bool {
        self.destructible && self.hit_points > 0
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Slow,
    Widen,
    MultiBall,
    Sticky,
    Laser,
    ExtraLife,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Slow,
        PowerUpKind::Widen,
        PowerUpKind::MultiBall,
        PowerUpKind::Sticky,
        PowerUpKind::Laser,
        PowerUpKind::ExtraLife,
    ];

    /// Timed effect started by this power-up, if any
    pub fn effect(self) -> Option<EffectKind> {
        match self {
            PowerUpKind::Slow => Some(EffectKind::Slow),
            PowerUpKind::Widen => Some(EffectKind::Widen),
            PowerUpKind::Sticky => Some(EffectKind::Sticky),
            PowerUpKind::Laser => Some(EffectKind::Laser),
            PowerUpKind::MultiBall | PowerUpKind::ExtraLife => None,
        }
    }

    /// One-letter label drawn on the capsule
    pub fn label(self) -> char {
        match self {
            PowerUpKind::Slow => 'S',
            PowerUpKind::Widen => 'W',
            PowerUpKind::MultiBall => 'M',
            PowerUpKind::Sticky => 'C',
            PowerUpKind::Laser => 'L',
            PowerUpKind::ExtraLife => '1',
        }
    }

    pub fn color(self) -> Color {
        match self {
            PowerUpKind::Slow => [120, 200, 255],
            PowerUpKind::Widen => [255, 200, 80],
            PowerUpKind::MultiBall => [200, 255, 200],
            PowerUpKind::Sticky => [255, 120, 200],
            PowerUpKind::Laser => [255, 80, 80],
            PowerUpKind::ExtraLife => [120, 255, 120],
        }
    }
}

/// A falling power-up capsule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub rect: Rect,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, center: Vec2) -> Self {
        Self {
            kind,
            rect: Rect::centered(center, POWERUP_SIZE, POWERUP_SIZE),
        }
    }

    pub fn fall(&mut self) {
        self.rect.y += POWERUP_FALL_SPEED;
    }
}

/// A laser bolt travelling up from the paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaserShot {
    pub rect: Rect,
}

impl LaserShot {
    /// A shot whose bottom-center sits at `muzzle`
    pub fn new(muzzle: Vec2) -> Self {
        Self {
            rect: Rect::new(
                muzzle.x - LASER_WIDTH / 2.0,
                muzzle.y - LASER_HEIGHT,
                LASER_WIDTH,
                LASER_HEIGHT,
            ),
        }
    }

    pub fn advance(&mut self) {
        self.rect.y -= LASER_SPEED;
    }
}

/// Things that happened during the last tick (for audio/HUD hosts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BrickDestroyed { id: u32, points: u64 },
    Explosion { id: u32 },
    PowerUpSpawned(PowerUpKind),
    PowerUpCollected(PowerUpKind),
    EffectExpired(EffectKind),
    LaserFired,
    BallLost,
    LifeLost { lives_left: u32 },
    LevelCleared { level: u32 },
    GameOver { score: u64 },
    Restarted,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed mixed into level layouts and power-up drops
    pub seed: u64,
    /// Session RNG (power-up drops)
    pub(crate) rng: Pcg32,
    /// Lives granted on (re)start
    pub initial_lives: u32,
    pub lives: u32,
    pub score: u64,
    /// Current level (1-based)
    pub level: u32,
    pub phase: GamePhase,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub power_ups: Vec<PowerUp>,
    pub lasers: Vec<LaserShot>,
    pub effects: ActiveEffects,
    /// Level-scaled ball speed, before effect modifiers
    pub ball_speed: f32,
    /// Ball speed multiplier from effects (1.0 = neutral)
    pub speed_modifier: f32,
    /// Paddle width multiplier from effects (1.0 = neutral)
    pub width_modifier: f32,
    /// Level-scaled paddle width, before effect modifiers
    pub paddle_base_width: f32,
    /// Balls attach to the paddle on contact
    pub sticky: bool,
    /// Bricks destroyed on the current level
    pub bricks_destroyed: u32,
    /// Time of the last laser volley
    pub last_shot_ms: Option<u64>,
    /// Events raised during the last tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session at level 1 with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_lives(seed, INITIAL_LIVES)
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_lives(settings.seed, settings.initial_lives)
    }

    fn with_lives(seed: u64, initial_lives: u32) -> Self {
        let initial_lives = initial_lives.max(1);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            initial_lives,
            lives: initial_lives,
            score: 0,
            level: 1,
            phase: GamePhase::Playing,
            paddle: Paddle::default(),
            balls: Vec::new(),
            bricks: Vec::new(),
            power_ups: Vec::new(),
            lasers: Vec::new(),
            effects: ActiveEffects::new(),
            ball_speed: BALL_SPEED,
            speed_modifier: 1.0,
            width_modifier: 1.0,
            paddle_base_width: PADDLE_WIDTH,
            sticky: false,
            bricks_destroyed: 0,
            last_shot_ms: None,
            events: Vec::new(),
        };

        state.load_level();
        state.reset_balls();

        state
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Effective ball speed: level scaling times effect modifier
    #[inline]
    pub fn current_ball_speed(&self) -> f32 {
        self.ball_speed * self.speed_modifier
    }

    /// Bricks still to destroy before the level is cleared
    pub fn remaining_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.counts_for_clear()).count()
    }

    /// Generate the current level's layout and reset per-level state
    pub fn load_level(&mut self) {
        self.bricks = generate_level(self.level, self.seed);
        self.power_ups.clear();
        self.lasers.clear();
        self.bricks_destroyed = 0;
        self.apply_level_scaling();
        log::info!(
            "Level {}: {} bricks ({} to clear), ball speed {:.2}",
            self.level,
            self.bricks.len(),
            self.remaining_bricks(),
            self.ball_speed
        );
    }

    /// Set ball speed, paddle speed and paddle base width for the current level
    pub fn apply_level_scaling(&mut self) {
        let steps = self.level.saturating_sub(1) as f32;

        self.ball_speed = BALL_SPEED + steps * BALL_SPEED_INCREMENT_LEVEL;
        self.refresh_ball_speeds();

        self.paddle.speed = (PADDLE_SPEED + steps * PADDLE_SPEED_INCREMENT).floor();

        self.paddle_base_width = (PADDLE_WIDTH - steps * PADDLE_WIDTH_DECREMENT).max(PADDLE_MIN_WIDTH);
        self.apply_paddle_width();
    }

    /// Resize the paddle to base width times the widen modifier
    pub fn apply_paddle_width(&mut self) {
        self.paddle.set_width(self.paddle_base_width * self.width_modifier);
    }

    /// Rescale every free ball to the current effective speed
    pub fn refresh_ball_speeds(&mut self) {
        let speed = self.current_ball_speed();
        for ball in self.balls.iter_mut().filter(|b| !b.is_attached()) {
            ball.set_speed(speed);
        }
    }

    /// Replace the ball set with a single ball at the start position
    ///
    /// The ball launches straight up, or waits on the paddle in sticky mode.
    pub fn reset_balls(&mut self) {
        self.balls.clear();
        let mut ball = Ball::new(
            Vec2::new(FIELD_WIDTH / 2.0, BALL_START_Y),
            Vec2::new(0.0, -self.current_ball_speed()),
        );
        if self.sticky {
            // Rest on the paddle center wherever the paddle is
            ball.state = BallState::Attached { offset: 0.0 };
            ball.vel = Vec2::ZERO;
            ball.follow(&self.paddle);
        }
        self.balls.push(ball);
    }
}
