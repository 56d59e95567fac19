//! Line protocol spoken between the game server and the terminal client.
//!
//! Every message is newline terminated text. The client opens with a
//! handshake line, then streams `Move: <direction>` lines whenever the player
//! presses a key. The server answers each tick with either a five line state
//! frame or a terminal `win`/`lose` line. Once per match it also slips a
//! `give me secret` line in front of a frame.

use crate::{Direction, Mode};
use std::fmt;
use thiserror::Error;

pub const START_MARKER: &str = "start";
pub const SECRET_REQUEST: &str = "give me secret";
pub const WIN: &str = "win";
pub const LOSE: &str = "lose";
pub const MOVE_PREFIX: &str = "Move";

const FIELD_NAMES: [&str; 5] = ["horizontal", "vertical", "ballx", "bally", "countdown"];

/// Builds the handshake line the client sends right after connecting.
pub fn encode_handshake(mode: Mode) -> String {
    format!("{} {}\n", START_MARKER, mode.as_token())
}

/// Reads the mode out of a handshake line. A missing marker or token falls
/// back to the default game.
pub fn parse_handshake(line: &str) -> Mode {
    let line = line.trim();
    let rest = line.strip_prefix(START_MARKER).unwrap_or(line);
    Mode::from_token(rest.split_whitespace().next().unwrap_or(""))
}

pub fn encode_command(direction: Direction) -> String {
    format!("{}: {}\n", MOVE_PREFIX, direction.as_str())
}

/// Parses a command line. Text without a `": "` separator is matched as a
/// whole, and unknown directions become `Right`.
pub fn parse_command(line: &str) -> Direction {
    let text = line.split_once(": ").map_or(line, |(_, direction)| direction);
    Direction::from_text(text)
}

/// Integer snapshot of one tick, as it travels on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateFrame {
    pub horizontal: i64,
    pub vertical: i64,
    pub ball_x: Vec<i64>,
    pub ball_y: Vec<i64>,
    /// Seconds remaining.
    pub countdown: i64,
}

fn join_values(values: &[i64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for StateFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "horizontal: {}", self.horizontal)?;
        writeln!(f, "vertical: {}", self.vertical)?;
        writeln!(f, "ballx: {}", join_values(&self.ball_x))?;
        writeln!(f, "bally: {}", join_values(&self.ball_y))?;
        writeln!(f, "countdown: {}", self.countdown)
    }
}

/// Anything the server may send during a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    State(StateFrame),
    SecretRequest,
    Win { reward: Option<String> },
    Lose,
}

impl ServerMessage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ServerMessage::Win { .. } | ServerMessage::Lose)
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::State(frame) => write!(f, "{}", frame),
            ServerMessage::SecretRequest => writeln!(f, "{}", SECRET_REQUEST),
            ServerMessage::Win { reward: None } => writeln!(f, "{}", WIN),
            ServerMessage::Win {
                reward: Some(token),
            } => writeln!(f, "{} {}", WIN, token),
            ServerMessage::Lose => writeln!(f, "{}", LOSE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("malformed line: {0:?}")]
    MalformedLine(String),
    #[error("expected field `{expected}`, found `{found}`")]
    UnexpectedField {
        expected: &'static str,
        found: String,
    },
    #[error("field `{field}` has a non-integer value {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("frame has {x} ball x values but {y} ball y values")]
    BallCountMismatch { x: usize, y: usize },
}

/// Reassembles server messages from individual lines.
///
/// State frames span five lines; terminal and secret lines can arrive between
/// any two of them. A decode error drops the partially assembled frame.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    partial: StateFrame,
    next_field: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one line (with or without its trailing newline).
    pub fn feed(&mut self, line: &str) -> Result<Option<ServerMessage>, ProtocolError> {
        let line = line.trim_end_matches(['\r', '\n']).replace('\0', "");

        if line == LOSE {
            self.reset();
            return Ok(Some(ServerMessage::Lose));
        }
        if line == WIN {
            self.reset();
            return Ok(Some(ServerMessage::Win { reward: None }));
        }
        if let Some(token) = line.strip_prefix("win ") {
            self.reset();
            return Ok(Some(ServerMessage::Win {
                reward: Some(token.to_string()),
            }));
        }
        if line == SECRET_REQUEST {
            return Ok(Some(ServerMessage::SecretRequest));
        }

        match self.accept_field(&line) {
            Ok(message) => Ok(message),
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    fn accept_field(&mut self, line: &str) -> Result<Option<ServerMessage>, ProtocolError> {
        let (key, value) = line
            .split_once(": ")
            .ok_or_else(|| ProtocolError::MalformedLine(line.to_string()))?;

        let expected = FIELD_NAMES[self.next_field];
        if key != expected {
            return Err(ProtocolError::UnexpectedField {
                expected,
                found: key.to_string(),
            });
        }

        match self.next_field {
            0 => self.partial.horizontal = parse_number(expected, value)?,
            1 => self.partial.vertical = parse_number(expected, value)?,
            2 => self.partial.ball_x = parse_list(expected, value)?,
            3 => self.partial.ball_y = parse_list(expected, value)?,
            _ => self.partial.countdown = parse_number(expected, value)?,
        }
        self.next_field += 1;

        if self.next_field < FIELD_NAMES.len() {
            return Ok(None);
        }

        let frame = std::mem::take(&mut self.partial);
        self.next_field = 0;
        if frame.ball_x.len() != frame.ball_y.len() {
            return Err(ProtocolError::BallCountMismatch {
                x: frame.ball_x.len(),
                y: frame.ball_y.len(),
            });
        }
        Ok(Some(ServerMessage::State(frame)))
    }

    fn reset(&mut self) {
        self.partial = StateFrame::default();
        self.next_field = 0;
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<i64, ProtocolError> {
    value
        .trim()
        .parse()
        .map_err(|_| ProtocolError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn parse_list(field: &'static str, value: &str) -> Result<Vec<i64>, ProtocolError> {
    value
        .split_whitespace()
        .map(|v| parse_number(field, v))
        .collect()
}
