//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (velocities are pixels per tick)
//! - Time enters only as the `now_ms` sampled once per tick
//! - Seeded RNG only
//! - Stable iteration order (bricks by position in the level vector)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod level;
pub mod rect;
pub mod state;
pub mod tick;
pub mod view;

pub use collision::{WallContact, bounce_off_paddle, resolve_brick_contact, resolve_walls};
pub use effects::{ActiveEffects, EffectKind};
pub use level::{Pattern, generate_level};
pub use rect::{Penetration, Rect, Side};
pub use state::{
    Ball, BallState, Brick, GameEvent, GamePhase, GameState, LaserShot, Paddle, PowerUp,
    PowerUpKind,
};
pub use tick::{TickInput, tick};
pub use view::{BrickAppearance, Frame};
