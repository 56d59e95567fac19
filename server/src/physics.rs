//! One simulation tick: paddle movement, ball movement and bounces, the
//! countdown, and the terminal checks.

use crate::game::{Ball, GameState};
use shared::{Arena, Direction, Velocity};

/// Result of advancing the game by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Win,
    Lose,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Continue)
    }
}

/// Advances `state` by one tick with the command consumed for this tick.
pub fn step(state: &mut GameState, command: Option<Direction>) -> Outcome {
    move_paddles(state, command);

    let arena = state.arena;
    let paddles = Paddles {
        horizontal: state.horizontal,
        vertical: state.vertical,
    };
    let velocity = state.ball_velocity;

    let mut out_of_bounds = false;
    for ball in &mut state.balls {
        move_ball(ball, &arena, &paddles, velocity);
        out_of_bounds |= !arena.contains(ball.x, ball.y);
    }

    state.countdown -= 1;

    if state.countdown < 0 {
        Outcome::Win
    } else if out_of_bounds {
        Outcome::Lose
    } else {
        Outcome::Continue
    }
}

/// Moves exactly one paddle pair along one axis, clamped to the arena.
pub fn move_paddles(state: &mut GameState, command: Option<Direction>) {
    let arena = state.arena;
    let velocity = state.paddle_velocity;
    match command {
        Some(Direction::Up) => {
            state.vertical = (state.vertical - velocity.y).max(0.0);
        }
        Some(Direction::Down) => {
            state.vertical = (state.vertical + velocity.y).min(arena.max_vertical());
        }
        Some(Direction::Left) => {
            state.horizontal = (state.horizontal - velocity.x).max(0.0);
        }
        Some(Direction::Right) => {
            state.horizontal = (state.horizontal + velocity.x).min(arena.max_horizontal());
        }
        None => {}
    }
}

#[derive(Debug, Clone, Copy)]
struct Paddles {
    horizontal: f64,
    vertical: f64,
}

impl Paddles {
    fn covers_y(&self, arena: &Arena, y: f64) -> bool {
        self.vertical <= y && y <= self.vertical + arena.paddle_height as f64
    }

    fn covers_x(&self, arena: &Arena, x: f64) -> bool {
        self.horizontal <= x && x <= self.horizontal + arena.paddle_width as f64
    }
}

/// The x axis is resolved before the y axis, so the top/bottom paddles are
/// checked against the ball's new x.
fn move_ball(ball: &mut Ball, arena: &Arena, paddles: &Paddles, velocity: Velocity) {
    ball.x += ball.dir_x as f64 * velocity.x;
    let at_side = ball.x >= arena.right_line() || ball.x <= arena.left_line();
    if at_side && paddles.covers_y(arena, ball.y) {
        ball.dir_x = -ball.dir_x;
        ball.x = ball.x.clamp(arena.left_line(), arena.right_line());
    }

    ball.y += ball.dir_y as f64 * velocity.y;
    let at_end = ball.y >= arena.bottom_line() || ball.y <= arena.top_line();
    if at_end && paddles.covers_x(arena, ball.x) {
        ball.dir_y = -ball.dir_y;
        ball.y = ball.y.clamp(arena.top_line(), arena.bottom_line());
    }
}
