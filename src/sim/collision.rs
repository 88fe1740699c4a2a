//! Collision detection and response
//!
//! Ball against walls, paddle and bricks, plus chained explosions and laser
//! hits. Geometry is all axis-aligned: responses are sign flips on the
//! separating axis, except the paddle, whose bounce angle depends on where the
//! ball struck it.

use glam::Vec2;
use rand::Rng;

use super::rect::{Rect, Side};
use super::state::{Ball, Brick, GameEvent, GameState, Paddle, PowerUp, PowerUpKind};
use crate::consts::*;

/// Outcome of a wall check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallContact {
    None,
    /// Bounced off left, right or top
    Bounced,
    /// Fell out through the bottom
    Lost,
}

/// Clamp a ball inside the left, right and top walls, pointing its velocity
/// back inward. The bottom is open: a ball whose top passes below the field is
/// lost.
pub fn resolve_walls(ball: &mut Ball, field_width: f32, field_height: f32) -> WallContact {
    let mut contact = WallContact::None;

    if ball.rect.left() <= 0.0 {
        ball.rect.x = 0.0;
        ball.vel.x = ball.vel.x.abs();
        contact = WallContact::Bounced;
    } else if ball.rect.right() >= field_width {
        ball.rect.set_right(field_width);
        ball.vel.x = -ball.vel.x.abs();
        contact = WallContact::Bounced;
    }

    if ball.rect.top() <= 0.0 {
        ball.rect.y = 0.0;
        ball.vel.y = ball.vel.y.abs();
        contact = WallContact::Bounced;
    }

    if ball.rect.top() > field_height {
        return WallContact::Lost;
    }

    contact
}

/// Normalized strike position on the paddle: -1 at the left edge, 0 at the
/// center, +1 at the right edge
pub fn paddle_offset(ball: &Rect, paddle: &Rect) -> f32 {
    let half = paddle.w / 2.0;
    if half <= 0.0 {
        return 0.0;
    }
    ((ball.center_x() - paddle.center_x()) / half).clamp(-1.0, 1.0)
}

/// Bounce a downward-moving ball off the paddle.
///
/// The outgoing direction is `(offset, -1)` normalized and scaled to `speed`,
/// so the angle varies continuously from steep left to straight up to steep
/// right. The ball is lifted just above the paddle; in sticky mode it attaches
/// instead. Returns whether a bounce happened.
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle, speed: f32, sticky: bool) -> bool {
    if ball.is_attached() || ball.vel.y <= 0.0 || !ball.rect.overlaps(&paddle.rect) {
        return false;
    }

    let offset = paddle_offset(&ball.rect, &paddle.rect);
    ball.vel = Vec2::new(offset, -1.0).normalize() * speed;
    ball.rect.set_bottom(paddle.rect.top() - 1.0);

    if sticky {
        ball.attach_to(paddle);
        ball.follow(paddle);
    }
    true
}

/// Push a ball out of a brick along the shallowest axis and point the
/// matching velocity component away from the brick. Returns the side hit.
pub fn resolve_brick_contact(ball: &mut Ball, brick: &Rect) -> Side {
    let side = ball.rect.penetration(brick).min_side();
    match side {
        Side::Left => {
            ball.rect.set_right(brick.left() - 1.0);
            ball.vel.x = -ball.vel.x.abs();
        }
        Side::Right => {
            ball.rect.x = brick.right() + 1.0;
            ball.vel.x = ball.vel.x.abs();
        }
        Side::Top => {
            ball.rect.set_bottom(brick.top() - 1.0);
            ball.vel.y = -ball.vel.y.abs();
        }
        Side::Bottom => {
            ball.rect.y = brick.bottom() + 1.0;
            ball.vel.y = ball.vel.y.abs();
        }
    }
    side
}

/// Indices of live destructible bricks whose centers lie within the blast
/// radius of `bricks[detonator]`
pub fn explosion_targets(bricks: &[Brick], detonator: usize, radius: f32) -> Vec<usize> {
    let Some(source) = bricks.get(detonator) else {
        return Vec::new();
    };
    let center = source.rect.center();
    bricks
        .iter()
        .enumerate()
        .filter(|&(idx, brick)| {
            idx != detonator
                && brick.destructible
                && brick.hit_points > 0
                && brick.rect.center().distance(center) <= radius
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// First live brick overlapping `rect`
fn find_overlapping(bricks: &[Brick], rect: &Rect) -> Option<usize> {
    bricks.iter().position(|b| b.is_alive() && b.rect.overlaps(rect))
}

/// Chance a destroyed brick drops a power-up on this level
pub fn drop_chance(level: u32) -> f32 {
    POWERUP_BASE_CHANCE + (POWERUP_CHANCE_PER_LEVEL * level as f32).min(POWERUP_MAX_LEVEL_BONUS)
}

impl GameState {
    /// Run the collision engine for every free ball
    ///
    /// Destroyed bricks and lost balls are marked during the pass and
    /// compacted afterwards. Losing the last ball costs a life.
    pub fn handle_collisions(&mut self) {
        let mut lost = Vec::new();

        for idx in 0..self.balls.len() {
            if self.balls[idx].is_attached() {
                continue;
            }
            let mut ball = self.balls[idx].clone();

            if resolve_walls(&mut ball, FIELD_WIDTH, FIELD_HEIGHT) == WallContact::Lost {
                lost.push(idx);
                continue;
            }

            bounce_off_paddle(&mut ball, &self.paddle, self.current_ball_speed(), self.sticky);

            let mut resolutions = 0;
            while resolutions < MAX_BRICK_RESOLUTIONS {
                let Some(hit) = find_overlapping(&self.bricks, &ball.rect) else {
                    break;
                };
                let brick_rect = self.bricks[hit].rect;
                resolve_brick_contact(&mut ball, &brick_rect);
                resolutions += 1;

                if self.damage_brick(hit) {
                    // Speed-up applied to the stored balls; keep this copy in step
                    ball.set_speed(self.current_ball_speed());
                }
            }
            if resolutions == MAX_BRICK_RESOLUTIONS && find_overlapping(&self.bricks, &ball.rect).is_some() {
                log::warn!("Ball still inside brick geometry after {} resolutions", resolutions);
            }

            self.balls[idx] = ball;
        }

        self.compact_bricks();

        if !lost.is_empty() {
            for &idx in lost.iter().rev() {
                self.balls.remove(idx);
                self.events.push(GameEvent::BallLost);
            }
            if self.balls.is_empty() {
                self.lose_life();
            }
        }
    }

    /// Apply one ball hit to a brick. Permanent bricks absorb it.
    ///
    /// Returns whether the ball speed changed as a result.
    fn damage_brick(&mut self, idx: usize) -> bool {
        let brick = &mut self.bricks[idx];
        if !brick.destructible || brick.hit_points == 0 {
            return false;
        }
        if brick.hit_points > 1 {
            brick.hit_points -= 1;
            false
        } else {
            self.destroy_brick(idx) > 0
        }
    }

    /// Destroy a brick and everything its explosion reaches.
    ///
    /// Each destroyed brick scores, counts toward the speed-up threshold and
    /// may drop a power-up. Bricks are marked (zero hit points), not removed;
    /// call [`GameState::compact_bricks`] afterwards. Returns the number of
    /// speed-ups triggered.
    pub fn destroy_brick(&mut self, idx: usize) -> u32 {
        // Already marked this tick (or permanent): nothing to score
        if !self.bricks.get(idx).is_some_and(Brick::counts_for_clear) {
            return 0;
        }
        let mut speedups = 0;
        let mut pending = vec![idx];

        while let Some(current) = pending.pop() {
            let Some(brick) = self.bricks.get_mut(current) else {
                debug_assert!(false, "brick index {} out of range", current);
                continue;
            };
            if !brick.destructible {
                continue;
            }
            brick.hit_points = 0;
            let id = brick.id;
            let explosive = brick.explosive;
            let center = brick.rect.center();

            let points = SCORE_PER_BRICK * self.level as u64;
            self.score += points;
            self.bricks_destroyed += 1;
            self.events.push(GameEvent::BrickDestroyed { id, points });

            if explosive {
                self.events.push(GameEvent::Explosion { id });
                let targets = explosion_targets(&self.bricks, current, EXPLOSION_RADIUS);
                for &target in &targets {
                    // Claim now so overlapping blasts don't count it twice
                    self.bricks[target].hit_points = 0;
                }
                pending.extend(targets);
            }

            if self.bricks_destroyed % BRICKS_PER_SPEEDUP == 0 {
                self.ball_speed += BALL_SPEED_INCREMENT_BRICK;
                self.refresh_ball_speeds();
                speedups += 1;
                log::debug!("Ball speed up to {:.2}", self.ball_speed);
            }

            self.maybe_spawn_power_up(center);
        }

        speedups
    }

    /// Drop bricks marked destroyed
    pub fn compact_bricks(&mut self) {
        self.bricks.retain(Brick::is_alive);
    }

    fn maybe_spawn_power_up(&mut self, center: Vec2) {
        if self.rng.random::<f32>() >= drop_chance(self.level) {
            return;
        }
        let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
        self.power_ups.push(PowerUp::new(kind, center));
        self.events.push(GameEvent::PowerUpSpawned(kind));
    }

    /// Move laser shots; each destroys the first destructible brick it touches
    pub fn update_lasers(&mut self) {
        let mut shots = std::mem::take(&mut self.lasers);
        shots.retain_mut(|shot| {
            shot.advance();
            if shot.rect.bottom() < 0.0 {
                return false;
            }
            let hit = self
                .bricks
                .iter()
                .position(|b| b.counts_for_clear() && b.rect.overlaps(&shot.rect));
            match hit {
                Some(idx) => {
                    self.destroy_brick(idx);
                    false
                }
                None => true,
            }
        });
        self.lasers = shots;
        self.compact_bricks();
    }
}
