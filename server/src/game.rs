use crate::config::Config;
use log::debug;
use rand::Rng;
use shared::{Arena, Mode, StateFrame, Velocity};

pub const FAST_BALL_MULTIPLIER: f64 = 2.0;
pub const FAST_PADDLE_MULTIPLIER: f64 = 1.5;
pub const DOUBLE_BALL_MULTIPLIER: f64 = 0.8;

/// Maximum distance, in whole units, a single ball spawns away from centre.
const SPAWN_JITTER: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    /// +1 or -1
    pub dir_x: i8,
    /// +1 or -1
    pub dir_y: i8,
}

impl Ball {
    pub fn new(x: f64, y: f64, dir_x: i8, dir_y: i8) -> Self {
        Self { x, y, dir_x, dir_y }
    }
}

/// Authoritative state of one match.
///
/// Owned by the match loop for the whole match; the physics step mutates it
/// once per tick.
#[derive(Debug, Clone)]
pub struct GameState {
    pub mode: Mode,
    pub arena: Arena,
    pub tick_rate: u32,
    /// x of the left end of the top and bottom paddles
    pub horizontal: f64,
    /// y of the top end of the left and right paddles
    pub vertical: f64,
    pub balls: Vec<Ball>,
    /// Remaining ticks.
    pub countdown: i64,
    pub ball_velocity: Velocity,
    pub paddle_velocity: Velocity,
}

impl GameState {
    pub fn new(mode: Mode, config: &Config) -> Self {
        Self::with_rng(mode, config, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(mode: Mode, config: &Config, rng: &mut R) -> Self {
        let arena = config.arena;
        let (balls, ball_factor, paddle_factor) = match mode {
            Mode::Default => (vec![centred_ball(&arena, rng)], 1.0, 1.0),
            Mode::Fast => (
                vec![centred_ball(&arena, rng)],
                FAST_BALL_MULTIPLIER,
                FAST_PADDLE_MULTIPLIER,
            ),
            Mode::Double => (mirrored_balls(&arena, rng), DOUBLE_BALL_MULTIPLIER, 1.0),
        };

        let state = Self {
            mode,
            arena,
            tick_rate: config.tick_rate,
            horizontal: arena.max_horizontal() / 2.0,
            vertical: arena.max_vertical() / 2.0,
            balls,
            countdown: config.total_ticks(),
            ball_velocity: config.ball_velocity().scaled(ball_factor),
            paddle_velocity: config.paddle_velocity.scaled(paddle_factor),
        };
        debug!(
            "New {} game: {} ball(s) at {:?}",
            mode,
            state.balls.len(),
            state
                .balls
                .iter()
                .map(|b| (b.x, b.y))
                .collect::<Vec<_>>()
        );
        state
    }

    /// Whole seconds left on the clock, as shown to the player.
    pub fn seconds_left(&self) -> i64 {
        (self.countdown as f64 / self.tick_rate as f64 + 1.0) as i64
    }

    pub fn snapshot(&self) -> StateFrame {
        StateFrame {
            horizontal: self.horizontal as i64,
            vertical: self.vertical as i64,
            ball_x: self.balls.iter().map(|b| b.x as i64).collect(),
            ball_y: self.balls.iter().map(|b| b.y as i64).collect(),
            countdown: self.seconds_left(),
        }
    }
}

fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> i8 {
    if rng.gen_bool(0.5) {
        1
    } else {
        -1
    }
}

fn centred_ball<R: Rng + ?Sized>(arena: &Arena, rng: &mut R) -> Ball {
    let x = (arena.width / 2) as i32 + rng.gen_range(-SPAWN_JITTER..=SPAWN_JITTER);
    let y = (arena.height / 2) as i32 + rng.gen_range(-SPAWN_JITTER..=SPAWN_JITTER);
    Ball::new(x as f64, y as f64, random_sign(rng), random_sign(rng))
}

/// Two balls a quarter of the arena either side of centre, heading in
/// opposite directions.
fn mirrored_balls<R: Rng + ?Sized>(arena: &Arena, rng: &mut R) -> Vec<Ball> {
    let cx = arena.width as f64 / 2.0;
    let cy = arena.height as f64 / 2.0;
    let qx = arena.width as f64 / 4.0;
    let qy = arena.height as f64 / 4.0;
    let (sx, sy) = (random_sign(rng), random_sign(rng));

    vec![
        Ball::new(cx - qx, cy - qy, sx, sy),
        Ball::new(cx + qx, cy + qy, -sx, -sy),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(mode: Mode, seed: u64) -> GameState {
        GameState::with_rng(mode, &Config::default(), &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_default_game_layout() {
        for seed in 0..50 {
            let state = seeded(Mode::Default, seed);
            assert_eq!(state.mode, Mode::Default);
            assert_eq!(state.balls.len(), 1);
            assert_approx_eq!(state.horizontal, 17.0);
            assert_approx_eq!(state.vertical, 8.5);
            assert_eq!(state.countdown, 3600);

            let ball = state.balls[0];
            assert!((15.0..=21.0).contains(&ball.x), "x = {}", ball.x);
            assert!((6.0..=12.0).contains(&ball.y), "y = {}", ball.y);
            assert_eq!(ball.x.fract(), 0.0);
            assert!(ball.dir_x == 1 || ball.dir_x == -1);
            assert!(ball.dir_y == 1 || ball.dir_y == -1);
        }
    }

    #[test]
    fn test_mode_velocities() {
        let config = Config::default();

        let default = seeded(Mode::Default, 1);
        assert_eq!(default.ball_velocity, config.ball_velocity());
        assert_eq!(default.paddle_velocity, config.paddle_velocity);

        let fast = seeded(Mode::Fast, 1);
        assert_approx_eq!(fast.ball_velocity.x, config.ball_velocity().x * FAST_BALL_MULTIPLIER);
        assert_approx_eq!(fast.ball_velocity.y, config.ball_velocity().y * FAST_BALL_MULTIPLIER);
        assert_approx_eq!(
            fast.paddle_velocity.x,
            config.paddle_velocity.x * FAST_PADDLE_MULTIPLIER
        );
        assert_eq!(fast.balls.len(), 1);

        let double = seeded(Mode::Double, 1);
        assert_approx_eq!(
            double.ball_velocity.x,
            config.ball_velocity().x * DOUBLE_BALL_MULTIPLIER
        );
        assert_eq!(double.paddle_velocity, config.paddle_velocity);
    }

    #[test]
    fn test_double_balls_mirror_each_other() {
        for seed in 0..20 {
            let state = seeded(Mode::Double, seed);
            assert_eq!(state.balls.len(), 2);
            let (a, b) = (state.balls[0], state.balls[1]);

            assert_eq!(a.dir_x, -b.dir_x);
            assert_eq!(a.dir_y, -b.dir_y);

            assert_approx_eq!((a.x + b.x) / 2.0, 18.0);
            assert_approx_eq!((a.y + b.y) / 2.0, 9.0);
            assert_approx_eq!(a.x, 9.0);
            assert_approx_eq!(b.y, 13.5);
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = seeded(Mode::Default, 7);
        let b = seeded(Mode::Default, 7);
        assert_eq!(a.balls, b.balls);
    }

    #[test]
    fn test_new_uses_requested_mode() {
        let state = GameState::new(Mode::Double, &Config::default());
        assert_eq!(state.mode, Mode::Double);
        assert_eq!(state.balls.len(), 2);
    }

    #[test]
    fn test_snapshot_truncates() {
        let mut state = seeded(Mode::Double, 3);
        state.horizontal = 3.9;
        state.vertical = 0.5;
        state.countdown = 3599;

        let frame = state.snapshot();
        assert_eq!(frame.horizontal, 3);
        assert_eq!(frame.vertical, 0);
        assert_eq!(frame.ball_x, vec![9, 27]);
        assert_eq!(frame.ball_y, vec![4, 13]);
        assert_eq!(frame.countdown, 60);
    }

    #[test]
    fn test_seconds_left() {
        let mut state = seeded(Mode::Default, 0);
        state.countdown = 3600;
        assert_eq!(state.seconds_left(), 61);
        state.countdown = 59;
        assert_eq!(state.seconds_left(), 1);
        state.countdown = 0;
        assert_eq!(state.seconds_left(), 1);
    }
}
