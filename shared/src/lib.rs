use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod protocol;

pub use protocol::{FrameDecoder, ProtocolError, ServerMessage, StateFrame};

pub const ARENA_WIDTH: u32 = 36;
pub const ARENA_HEIGHT: u32 = 18;
pub const PADDLE_WIDTH: u32 = 2;
pub const PADDLE_HEIGHT: u32 = 1;
pub const DEFAULT_PORT: u16 = 9393;

/// Playfield size and paddle dimensions.
///
/// The horizontal paddles run along the top and bottom edges and are
/// `paddle_width` wide; the vertical paddles run along the left and right
/// edges and are `paddle_height` tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    pub width: u32,
    pub height: u32,
    pub paddle_width: u32,
    pub paddle_height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("arena must be at least 1x1, got {width}x{height}")]
    Empty { width: u32, height: u32 },
    #[error("paddle width {paddle} must be smaller than arena width {arena}")]
    PaddleTooWide { paddle: u32, arena: u32 },
    #[error("paddle height {paddle} must be smaller than arena height {arena}")]
    PaddleTooTall { paddle: u32, arena: u32 },
}

impl Arena {
    pub const STANDARD: Arena = Arena {
        width: ARENA_WIDTH,
        height: ARENA_HEIGHT,
        paddle_width: PADDLE_WIDTH,
        paddle_height: PADDLE_HEIGHT,
    };

    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.width == 0 || self.height == 0 {
            return Err(ArenaError::Empty {
                width: self.width,
                height: self.height,
            });
        }
        if self.paddle_width >= self.width {
            return Err(ArenaError::PaddleTooWide {
                paddle: self.paddle_width,
                arena: self.width,
            });
        }
        if self.paddle_height >= self.height {
            return Err(ArenaError::PaddleTooTall {
                paddle: self.paddle_height,
                arena: self.height,
            });
        }
        Ok(())
    }

    /// Largest legal x-offset of the horizontal paddle.
    pub fn max_horizontal(&self) -> f64 {
        (self.width - self.paddle_width) as f64
    }

    /// Largest legal y-offset of the vertical paddle.
    pub fn max_vertical(&self) -> f64 {
        (self.height - self.paddle_height) as f64
    }

    pub fn left_line(&self) -> f64 {
        1.0
    }

    pub fn right_line(&self) -> f64 {
        self.width as f64 - 1.0
    }

    pub fn top_line(&self) -> f64 {
        1.0
    }

    pub fn bottom_line(&self) -> f64 {
        self.height as f64 - 1.0
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width as f64).contains(&x) && (0.0..=self.height as f64).contains(&y)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Arena::STANDARD
    }
}

/// Per-axis speed in arena units per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scaled(&self, factor: f64) -> Velocity {
        Velocity {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// Game variant picked by the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Default,
    Fast,
    Double,
}

impl Mode {
    /// Anything that is not `fast` or `double` plays the default game.
    pub fn from_token(token: &str) -> Mode {
        let token = token.trim();
        if token.eq_ignore_ascii_case("fast") {
            Mode::Fast
        } else if token.eq_ignore_ascii_case("double") {
            Mode::Double
        } else {
            Mode::Default
        }
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            Mode::Default => "default",
            Mode::Fast => "fast",
            Mode::Double => "double",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Paddle movement requested by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parses the text of a direction by substring. Anything that mentions
    /// none of `up`, `down` or `left` is `Right`.
    pub fn from_text(text: &str) -> Direction {
        if text.contains("up") {
            Direction::Up
        } else if text.contains("down") {
            Direction::Down
        } else if text.contains("left") {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_standard_arena_is_valid() {
        assert!(Arena::STANDARD.validate().is_ok());
        assert_eq!(Arena::default(), Arena::STANDARD);
    }

    #[test]
    fn test_arena_rejects_oversized_paddles() {
        let wide = Arena {
            paddle_width: 36,
            ..Arena::STANDARD
        };
        assert_eq!(
            wide.validate(),
            Err(ArenaError::PaddleTooWide {
                paddle: 36,
                arena: 36
            })
        );

        let tall = Arena {
            paddle_height: 20,
            ..Arena::STANDARD
        };
        assert!(matches!(
            tall.validate(),
            Err(ArenaError::PaddleTooTall { .. })
        ));

        let empty = Arena {
            width: 0,
            ..Arena::STANDARD
        };
        assert!(matches!(empty.validate(), Err(ArenaError::Empty { .. })));
    }

    #[test]
    fn test_arena_lines_and_ranges() {
        let arena = Arena::STANDARD;
        assert_approx_eq!(arena.left_line(), 1.0);
        assert_approx_eq!(arena.right_line(), 35.0);
        assert_approx_eq!(arena.top_line(), 1.0);
        assert_approx_eq!(arena.bottom_line(), 17.0);
        assert_approx_eq!(arena.max_horizontal(), 34.0);
        assert_approx_eq!(arena.max_vertical(), 17.0);
    }

    #[test]
    fn test_arena_contains_is_inclusive() {
        let arena = Arena::STANDARD;
        assert!(arena.contains(0.0, 0.0));
        assert!(arena.contains(36.0, 18.0));
        assert!(!arena.contains(-0.01, 5.0));
        assert!(!arena.contains(36.01, 5.0));
        assert!(!arena.contains(5.0, 18.5));
    }

    #[test]
    fn test_velocity_scaling() {
        let v = Velocity::new(0.5, 1.0).scaled(1.5);
        assert_approx_eq!(v.x, 0.75);
        assert_approx_eq!(v.y, 1.5);
    }

    #[test]
    fn test_mode_from_token() {
        assert_eq!(Mode::from_token("fast"), Mode::Fast);
        assert_eq!(Mode::from_token(" DOUBLE \n"), Mode::Double);
        assert_eq!(Mode::from_token("default"), Mode::Default);
        assert_eq!(Mode::from_token(""), Mode::Default);
        assert_eq!(Mode::from_token("faster"), Mode::Default);
        assert_eq!(Mode::from_token("hyper"), Mode::Default);
    }

    #[test]
    fn test_mode_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: Mode,
        }
        let parsed: Wrapper = toml::from_str("mode = \"double\"").unwrap();
        assert_eq!(parsed.mode, Mode::Double);
    }

    #[test]
    fn test_direction_from_text() {
        assert_eq!(Direction::from_text("up"), Direction::Up);
        assert_eq!(Direction::from_text("down\n"), Direction::Down);
        assert_eq!(Direction::from_text("left"), Direction::Left);
        assert_eq!(Direction::from_text("right"), Direction::Right);
        assert_eq!(Direction::from_text("sideways"), Direction::Right);
        assert_eq!(Direction::from_text(""), Direction::Right);
    }

    #[test]
    fn test_direction_text_roundtrip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_text(dir.as_str()), dir);
        }
    }
}
