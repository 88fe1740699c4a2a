//! Fixed-rate simulation tick
//!
//! Session controller: advances the game by one step in a fixed order and
//! owns the life/level/game-over transitions.

use glam::Vec2;

use super::effects::EffectKind;
use super::state::{GameEvent, GamePhase, GameState, LaserShot, PowerUpKind};
use crate::consts::*;
use crate::rotate_degrees;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Launch attached balls / fire lasers (held)
    pub fire: bool,
    /// Start a new run from the game-over screen
    pub restart: bool,
}

impl TickInput {
    /// Paddle direction: -1, 0 or +1
    pub fn direction(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Advance the game state by one tick.
///
/// `now_ms` is the host's monotonic clock, sampled once for the whole tick.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    state.events.clear();

    if state.phase == GamePhase::GameOver {
        if input.restart {
            state.restart();
        }
        return;
    }

    // 1. Effects due this tick revert before anything moves
    state.expire_effects(now_ms);

    // 2. Paddle
    state.paddle.move_by(input.direction());

    // 3. Launch
    if state.sticky && input.fire {
        let speed = state.current_ball_speed();
        for ball in state.balls.iter_mut() {
            ball.release(speed);
        }
    }

    // 4. Balls
    for ball in state.balls.iter_mut() {
        if ball.is_attached() {
            ball.follow(&state.paddle);
        } else {
            ball.advance();
        }
    }

    // 5. Collisions
    state.handle_collisions();
    if state.phase == GamePhase::GameOver {
        return;
    }

    // 6. Falling power-ups and lasers
    state.update_power_ups(now_ms);
    if input.fire {
        state.fire_lasers(now_ms);
    }
    state.update_lasers();

    // 7. Level clear
    if state.remaining_bricks() == 0 {
        state.advance_level();
    }
}

impl GameState {
    /// Revert every effect whose expiry has passed
    pub fn expire_effects(&mut self, now_ms: u64) {
        for kind in self.effects.take_expired(now_ms) {
            self.revert_effect(kind);
        }
    }

    fn revert_effect(&mut self, kind: EffectKind) {
        log::debug!("Effect {} expired", kind.as_str());
        match kind {
            EffectKind::Slow => {
                self.speed_modifier = 1.0;
                self.refresh_ball_speeds();
            }
            EffectKind::Widen => {
                self.width_modifier = 1.0;
                self.apply_paddle_width();
            }
            EffectKind::Sticky => {
                self.sticky = false;
                let speed = self.current_ball_speed();
                for ball in self.balls.iter_mut() {
                    ball.release(speed);
                }
            }
            EffectKind::Laser => {
                self.lasers.clear();
            }
        }
        self.events.push(GameEvent::EffectExpired(kind));
    }

    /// Apply a collected power-up
    pub fn apply_power_up(&mut self, kind: PowerUpKind, now_ms: u64) {
        log::debug!("Power-up {:?} collected", kind);
        match kind {
            PowerUpKind::Slow => {
                self.speed_modifier = SLOW_FACTOR;
                self.refresh_ball_speeds();
            }
            PowerUpKind::Widen => {
                self.width_modifier = (self.width_modifier + WIDEN_STEP).min(WIDEN_MAX);
                self.apply_paddle_width();
            }
            PowerUpKind::MultiBall => self.spawn_multiball(),
            PowerUpKind::Sticky => {
                self.sticky = true;
                let paddle = &self.paddle;
                for ball in self.balls.iter_mut() {
                    if !ball.is_attached() && ball.vel.y > 0.0 && ball.rect.overlaps(&paddle.rect) {
                        ball.attach_to(paddle);
                        ball.follow(paddle);
                    }
                }
            }
            PowerUpKind::Laser => {
                self.last_shot_ms = None;
            }
            PowerUpKind::ExtraLife => {
                self.lives += 1;
            }
        }
        if let Some(effect) = kind.effect() {
            self.effects.activate(effect, now_ms);
        }
    }

    /// Split the first ball into up to three, fanned out around its heading
    fn spawn_multiball(&mut self) {
        let speed = self.current_ball_speed();
        let Some(template) = self.balls.first_mut() else {
            return;
        };
        template.release(speed);
        let template = template.clone();

        for angle in [-MULTIBALL_ANGLE, MULTIBALL_ANGLE] {
            if self.balls.len() >= MAX_BALLS {
                break;
            }
            let mut ball = template.clone();
            ball.rect.x += if angle < 0.0 { -10.0 } else { 10.0 };
            let vel = rotate_degrees(template.vel, angle);
            ball.vel = if vel == Vec2::ZERO {
                Vec2::new(0.0, -speed)
            } else {
                vel.normalize() * speed
            };
            self.balls.push(ball);
        }
    }

    /// Drop falling power-ups; collect the ones caught by the paddle
    pub fn update_power_ups(&mut self, now_ms: u64) {
        let paddle = self.paddle.rect;
        let mut caught = Vec::new();
        self.power_ups.retain_mut(|power_up| {
            power_up.fall();
            if power_up.rect.top() > FIELD_HEIGHT {
                return false;
            }
            if power_up.rect.overlaps(&paddle) {
                caught.push(power_up.kind);
                return false;
            }
            true
        });
        for kind in caught {
            self.events.push(GameEvent::PowerUpCollected(kind));
            self.apply_power_up(kind, now_ms);
        }
    }

    /// Fire a pair of shots from the paddle edges if the laser is ready
    pub fn fire_lasers(&mut self, now_ms: u64) {
        if !self.effects.is_active(EffectKind::Laser, now_ms) {
            return;
        }
        let ready = self
            .last_shot_ms
            .is_none_or(|last| now_ms.saturating_sub(last) > LASER_COOLDOWN_MS);
        if !ready {
            return;
        }
        let paddle = self.paddle.rect;
        self.lasers.push(LaserShot::new(Vec2::new(paddle.left() + LASER_EDGE_INSET, paddle.top())));
        self.lasers.push(LaserShot::new(Vec2::new(paddle.right() - LASER_EDGE_INSET, paddle.top())));
        self.last_shot_ms = Some(now_ms);
        self.events.push(GameEvent::LaserFired);
    }

    /// The last ball is gone: lose a life, then respawn or end the run
    pub fn lose_life(&mut self) {
        debug_assert!(self.lives > 0, "life lost with no lives left");
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost { lives_left: self.lives });

        if self.lives == 0 {
            log::info!("Game over at level {} with score {}", self.level, self.score);
            self.phase = GamePhase::GameOver;
            self.balls.clear();
            self.events.push(GameEvent::GameOver { score: self.score });
            return;
        }

        log::info!("Life lost, {} left", self.lives);
        self.paddle.recenter();
        self.reset_balls();
    }

    /// Move to the next level with a fresh layout and a single ball
    pub fn advance_level(&mut self) {
        self.events.push(GameEvent::LevelCleared { level: self.level });
        self.level += 1;
        self.load_level();
        self.reset_balls();
    }

    /// Start a new run: level 1, full lives, no effects
    pub fn restart(&mut self) {
        log::info!("Restarting run (previous score {})", self.score);
        self.lives = self.initial_lives;
        self.score = 0;
        self.level = 1;
        self.phase = GamePhase::Playing;
        self.effects.clear();
        self.speed_modifier = 1.0;
        self.width_modifier = 1.0;
        self.sticky = false;
        self.last_shot_ms = None;
        self.paddle.recenter();
        self.load_level();
        self.reset_balls();
        self.events.push(GameEvent::Restarted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::generate_level;
    use crate::sim::state::{Ball, BallState, PowerUp};

    const DT_MS: u64 = 1000 / TICK_HZ as u64;

    /// Drop the single ball below the field
    fn lose_ball(state: &mut GameState) {
        state.balls = vec![Ball::new(Vec2::new(400.0, FIELD_HEIGHT + 20.0), Vec2::new(0.0, 5.0))];
    }

    #[test]
    fn test_input_direction() {
        let both = TickInput { move_left: true, move_right: true, ..Default::default() };
        assert_eq!(both.direction(), 0.0);
        let left = TickInput { move_left: true, ..Default::default() };
        assert_eq!(left.direction(), -1.0);
    }

    #[test]
    fn test_paddle_moves_and_clamps() {
        let mut state = GameState::new(1);
        state.balls.clear();
        let left = TickInput { move_left: true, ..Default::default() };
        for i in 0..200 {
            tick(&mut state, &left, i * DT_MS);
        }
        assert_eq!(state.paddle.rect.x, 0.0);

        let right = TickInput { move_right: true, ..Default::default() };
        for i in 0..200 {
            tick(&mut state, &right, i * DT_MS);
        }
        assert_eq!(state.paddle.rect.right(), FIELD_WIDTH);
    }

    #[test]
    fn test_life_loss_resets_single_ball() {
        let mut state = GameState::new(5);
        state.paddle.rect.x = 0.0;
        lose_ball(&mut state);
        tick(&mut state, &TickInput::default(), 0);

        assert_eq!(state.lives, INITIAL_LIVES - 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.balls[0].rect.center(), Vec2::new(FIELD_WIDTH / 2.0, BALL_START_Y));
        assert_eq!(state.paddle.rect.center_x(), FIELD_WIDTH / 2.0);
        assert!(state.events.contains(&GameEvent::LifeLost { lives_left: INITIAL_LIVES - 1 }));
    }

    #[test]
    fn test_losing_one_of_two_balls_keeps_lives() {
        let mut state = GameState::new(5);
        state.balls.push(Ball::new(Vec2::new(400.0, FIELD_HEIGHT + 20.0), Vec2::new(0.0, 5.0)));
        tick(&mut state, &TickInput::default(), 0);
        assert_eq!(state.lives, INITIAL_LIVES);
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_last_life_ends_run() {
        let mut state = GameState::new(5);
        state.lives = 1;
        lose_ball(&mut state);
        tick(&mut state, &TickInput::default(), 0);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.balls.is_empty());

        // Frozen until restart
        let bricks = state.bricks.clone();
        tick(&mut state, &TickInput { fire: true, ..Default::default() }, DT_MS);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.bricks, bricks);
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut state = GameState::new(11);
        state.level = 4;
        state.load_level();
        state.score = 1234;
        state.lives = 1;
        state.apply_power_up(PowerUpKind::Widen, 0);
        lose_ball(&mut state);
        tick(&mut state, &TickInput::default(), 0);
        assert!(state.is_game_over());

        tick(&mut state, &TickInput { restart: true, ..Default::default() }, DT_MS);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, INITIAL_LIVES);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.width_modifier, 1.0);
        assert!(state.effects.is_empty());
        assert_eq!(state.bricks, generate_level(1, 11));
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_level_clear_advances_once() {
        let mut state = GameState::new(2);
        // One brick left, ball about to clip its underside
        state.bricks.truncate(1);
        state.bricks[0].hit_points = 1;
        let target = state.bricks[0].rect;
        state.balls = vec![Ball::new(
            Vec2::new(target.center_x(), target.bottom() + 8.0 + 3.0),
            Vec2::new(0.0, -5.0),
        )];
        tick(&mut state, &TickInput::default(), 0);

        assert_eq!(state.level, 2);
        assert_eq!(state.bricks, generate_level(2, 2));
        assert!(!state.bricks.is_empty());
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.bricks_destroyed, 0);
        assert!(state.events.contains(&GameEvent::LevelCleared { level: 1 }));
    }

    #[test]
    fn test_permanent_bricks_do_not_block_clear() {
        let mut state = GameState::new(2);
        for brick in state.bricks.iter_mut() {
            brick.destructible = false;
        }
        tick(&mut state, &TickInput::default(), 0);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_widen_expires_exactly_once() {
        let mut state = GameState::new(1);
        state.apply_power_up(PowerUpKind::Widen, 0);
        assert!((state.paddle.rect.w - PADDLE_WIDTH * (1.0 + WIDEN_STEP)).abs() < 1e-3);

        tick(&mut state, &TickInput::default(), WIDEN_DURATION_MS - 1);
        assert!(state.width_modifier > 1.0);

        tick(&mut state, &TickInput::default(), WIDEN_DURATION_MS);
        assert_eq!(state.width_modifier, 1.0);
        assert_eq!(state.paddle.rect.w, PADDLE_WIDTH);
        assert!(state.events.contains(&GameEvent::EffectExpired(EffectKind::Widen)));

        tick(&mut state, &TickInput::default(), WIDEN_DURATION_MS + DT_MS);
        assert_eq!(state.paddle.rect.w, PADDLE_WIDTH);
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::EffectExpired(_))));
    }

    #[test]
    fn test_widen_caps() {
        let mut state = GameState::new(1);
        for _ in 0..5 {
            state.apply_power_up(PowerUpKind::Widen, 0);
        }
        assert_eq!(state.width_modifier, WIDEN_MAX);
        assert_eq!(state.effects.expiry(EffectKind::Widen), Some(WIDEN_DURATION_MS));
    }

    #[test]
    fn test_slow_scales_speed_and_reverts() {
        let mut state = GameState::new(1);
        state.apply_power_up(PowerUpKind::Slow, 0);
        assert!((state.balls[0].speed() - BALL_SPEED * SLOW_FACTOR).abs() < 1e-4);
        state.expire_effects(SLOW_DURATION_MS);
        assert_eq!(state.speed_modifier, 1.0);
        assert!((state.balls[0].speed() - BALL_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_multiball_caps_at_max() {
        let mut state = GameState::new(1);
        state.apply_power_up(PowerUpKind::MultiBall, 0);
        assert_eq!(state.balls.len(), 3);
        for ball in &state.balls {
            assert!((ball.speed() - BALL_SPEED).abs() < 1e-4);
        }
        // Fanned out ±20° around straight up
        assert!(state.balls[1].vel.x < 0.0);
        assert!(state.balls[2].vel.x > 0.0);

        state.apply_power_up(PowerUpKind::MultiBall, 0);
        state.apply_power_up(PowerUpKind::MultiBall, 0);
        assert_eq!(state.balls.len(), MAX_BALLS);
    }

    #[test]
    fn test_sticky_attach_release_and_expiry() {
        let mut state = GameState::new(1);
        state.apply_power_up(PowerUpKind::Sticky, 0);
        assert!(state.sticky);

        // Ball coming down onto the paddle attaches
        let paddle = state.paddle.rect;
        state.balls = vec![Ball::new(Vec2::new(paddle.center_x(), paddle.top() - 10.0), Vec2::new(0.0, 5.0))];
        tick(&mut state, &TickInput::default(), DT_MS);
        assert!(state.balls[0].is_attached());

        // Carried along with the paddle
        tick(&mut state, &TickInput { move_right: true, ..Default::default() }, 2 * DT_MS);
        assert_eq!(state.balls[0].rect.center_x(), state.paddle.rect.center_x());

        // Fire launches
        tick(&mut state, &TickInput { fire: true, ..Default::default() }, 3 * DT_MS);
        assert_eq!(state.balls[0].state, BallState::Free);
        assert!(state.balls[0].vel.y < 0.0);

        // Expiry releases any attached ball
        let paddle = state.paddle.clone();
        state.balls[0].attach_to(&paddle);
        tick(&mut state, &TickInput::default(), STICKY_DURATION_MS);
        assert!(!state.sticky);
        assert!(!state.balls[0].is_attached());
    }

    #[test]
    fn test_sticky_respawn_rides_paddle_center() {
        let mut state = GameState::new(1);
        state.apply_power_up(PowerUpKind::Sticky, 0);
        state.paddle.rect.set_right(FIELD_WIDTH);
        lose_ball(&mut state);
        tick(&mut state, &TickInput::default(), DT_MS);

        assert_eq!(state.lives, INITIAL_LIVES - 1);
        assert_eq!(state.balls[0].state, BallState::Attached { offset: 0.0 });
        assert_eq!(state.balls[0].rect.center_x(), state.paddle.rect.center_x());

        let left = TickInput { move_left: true, ..Default::default() };
        for i in 0..100 {
            tick(&mut state, &left, (i + 2) * DT_MS);
            let ball = &state.balls[0];
            assert!(ball.is_attached());
            assert!(ball.rect.left() >= 0.0, "attached ball left the field");
            assert_eq!(ball.rect.center_x(), state.paddle.rect.center_x());
        }
        assert_eq!(state.paddle.rect.x, 0.0);
    }

    #[test]
    fn test_sticky_ball_after_level_clear_sits_on_paddle() {
        let mut state = GameState::new(2);
        state.apply_power_up(PowerUpKind::Sticky, 0);
        state.paddle.rect.x = 0.0;
        state.advance_level();

        let ball = &state.balls[0];
        assert_eq!(ball.state, BallState::Attached { offset: 0.0 });
        assert_eq!(ball.rect.center_x(), state.paddle.rect.center_x());
        assert_eq!(ball.rect.bottom(), state.paddle.rect.top() - 1.0);
    }

    #[test]
    fn test_laser_pair_fires_from_paddle_edges() {
        let mut state = GameState::new(1);
        state.apply_power_up(PowerUpKind::Laser, 0);
        state.fire_lasers(DT_MS);

        let paddle = state.paddle.rect;
        assert_eq!(state.lasers.len(), 2);
        let (left, right) = (state.lasers[0].rect, state.lasers[1].rect);
        assert!((left.center_x() - (paddle.left() + LASER_EDGE_INSET)).abs() < 1e-4);
        assert!((right.center_x() - (paddle.right() - LASER_EDGE_INSET)).abs() < 1e-4);
        assert_eq!(left.bottom(), paddle.top());
        assert_eq!(right.bottom(), paddle.top());
        assert_eq!(state.events, vec![GameEvent::LaserFired]);
    }

    #[test]
    fn test_laser_fire_rate_and_expiry() {
        let mut state = GameState::new(1);
        let fire = TickInput { fire: true, ..Default::default() };

        // No laser effect: no shots
        tick(&mut state, &fire, 0);
        assert!(state.lasers.is_empty());

        state.apply_power_up(PowerUpKind::Laser, 0);
        tick(&mut state, &fire, DT_MS);
        assert_eq!(state.lasers.len(), 2);
        tick(&mut state, &fire, 2 * DT_MS);
        assert_eq!(state.lasers.len(), 2, "cooldown not respected");
        tick(&mut state, &fire, DT_MS + LASER_COOLDOWN_MS + 1);
        assert_eq!(state.lasers.len(), 4);

        tick(&mut state, &TickInput::default(), LASER_DURATION_MS);
        assert!(state.lasers.is_empty());
        tick(&mut state, &fire, LASER_DURATION_MS + DT_MS);
        assert!(state.lasers.is_empty());
    }

    #[test]
    fn test_power_up_pickup_and_miss() {
        let mut state = GameState::new(1);
        let paddle = state.paddle.rect;
        state.power_ups.push(PowerUp::new(PowerUpKind::ExtraLife, Vec2::new(paddle.center_x(), paddle.top() - 10.0)));
        state.power_ups.push(PowerUp::new(PowerUpKind::Slow, Vec2::new(20.0, FIELD_HEIGHT + 16.0)));
        state.update_power_ups(0);
        assert!(state.power_ups.is_empty());
        assert_eq!(state.lives, INITIAL_LIVES + 1);
        assert_eq!(state.speed_modifier, 1.0);
        assert_eq!(state.events, vec![GameEvent::PowerUpCollected(PowerUpKind::ExtraLife)]);
    }

    #[test]
    fn test_score_scales_with_level() {
        let mut state = GameState::new(1);
        state.level = 3;
        state.destroy_brick(0);
        assert_eq!(state.score, 30);
    }

    #[test]
    fn test_speedup_every_n_bricks() {
        let mut state = GameState::new(1);
        for idx in 0..BRICKS_PER_SPEEDUP as usize {
            state.destroy_brick(idx);
        }
        assert!((state.ball_speed - (BALL_SPEED + BALL_SPEED_INCREMENT_BRICK)).abs() < 1e-4);
        assert!((state.balls[0].speed() - state.ball_speed).abs() < 1e-4);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = GameState::new(99);
        let mut b = GameState::new(99);
        let inputs = [
            TickInput { move_left: true, ..Default::default() },
            TickInput { fire: true, ..Default::default() },
            TickInput { move_right: true, ..Default::default() },
        ];
        for i in 0..600u64 {
            let input = inputs[(i / 40) as usize % inputs.len()];
            tick(&mut a, &input, i * DT_MS);
            tick(&mut b, &input, i * DT_MS);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.bricks, b.bricks);
        assert_eq!(a.balls.len(), b.balls.len());
    }
}
