//! Brickfall entry point
//!
//! Runs a headless session driven by a simple autopilot. Pass a JSON settings
//! file as the first argument to override defaults; set `RUST_LOG=debug` to
//! see every gameplay event.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use brickfall::runner::{FrameSink, InputSource};
    use brickfall::sim::{BallState, Frame, GameEvent, TickInput};

    /// Dead zone around the paddle center before the autopilot moves
    const TRACK_SLACK: f32 = 6.0;

    /// Tracks the lowest descending ball and keeps fire held
    pub struct Autopilot {
        pub restarts_left: u32,
    }

    impl Autopilot {
        fn target_x(frame: &Frame<'_>) -> Option<f32> {
            let free = || {
                frame
                    .balls
                    .iter()
                    .filter(|ball| ball.state == BallState::Free)
            };
            free()
                .filter(|ball| ball.vel.y > 0.0)
                .max_by(|a, b| a.rect.y.total_cmp(&b.rect.y))
                .or_else(|| free().next())
                .map(|ball| ball.rect.center_x())
                .or_else(|| frame.power_ups.first().map(|p| p.rect.center_x()))
        }
    }

    impl InputSource for Autopilot {
        fn sample(&mut self, frame: &Frame<'_>) -> Option<TickInput> {
            if frame.game_over {
                if self.restarts_left == 0 {
                    return None;
                }
                self.restarts_left -= 1;
                log::info!("Autopilot restarting ({} restarts left)", self.restarts_left);
                return Some(TickInput {
                    restart: true,
                    ..Default::default()
                });
            }

            let mut input = TickInput {
                fire: true,
                ..Default::default()
            };
            if let Some(target) = Self::target_x(frame) {
                let paddle_x = frame.paddle.center_x();
                input.move_left = target < paddle_x - TRACK_SLACK;
                input.move_right = target > paddle_x + TRACK_SLACK;
            }
            Some(input)
        }
    }

    /// Logs gameplay events as they happen
    #[derive(Default)]
    pub struct EventLog {
        bricks: u64,
    }

    impl FrameSink for EventLog {
        fn present(&mut self, frame: &Frame<'_>) {
            for event in frame.events {
                match event {
                    GameEvent::BrickDestroyed { .. } => {
                        self.bricks += 1;
                        log::trace!("{:?} (total {})", event, self.bricks);
                    }
                    GameEvent::LevelCleared { .. } | GameEvent::GameOver { .. } => {
                        log::info!("{:?} (score {})", event, frame.score)
                    }
                    _ => log::debug!("{:?}", event),
                }
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use brickfall::Settings;
    use brickfall::runner::{GameLoop, MonotonicClock};

    env_logger::init();
    log::info!("Brickfall (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(2);
            }
        },
        None => Settings::default(),
    };

    let mut autopilot = headless::Autopilot {
        restarts_left: settings.autopilot_restarts,
    };
    let mut events = headless::EventLog::default();
    let mut clock = MonotonicClock::new();

    let mut game = GameLoop::new(settings);
    let summary = game.run(&mut autopilot, &mut events, &mut clock);

    println!(
        "ticks={} score={} level={} lives={} game_over={}",
        summary.ticks, summary.score, summary.level, summary.lives, summary.game_over
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives `brickfall::sim` directly; nothing to do here
}
