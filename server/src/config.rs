//! Server configuration.
//!
//! A [`Config`] is built once at startup from defaults, an optional TOML file
//! and command line overrides, then shared read-only with every match.

use serde::Deserialize;
use shared::{Arena, ArenaError, Velocity, DEFAULT_PORT};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TICK_RATE: u32 = 60;
pub const DEFAULT_DURATION_SECS: u32 = 60;
pub const DEFAULT_SECRET_TIME_SECS: u32 = 15;
/// Fastest simulation the tick timer can drive.
pub const MAX_TICK_RATE: u32 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid arena: {0}")]
    Arena(#[from] ArenaError),
    #[error("tick rate must be greater than zero")]
    ZeroTickRate,
    #[error("tick rate {rate} is above the maximum of {max}")]
    TickRateTooHigh { rate: u32, max: u32 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    /// Simulation ticks per second.
    pub tick_rate: u32,
    /// Match length in seconds.
    pub duration_secs: u32,
    /// Seconds before the end of the match at which the secret request fires.
    pub secret_time_secs: u32,
    pub arena: Arena,
    /// Paddle distance per tick along each axis before mode scaling.
    pub paddle_velocity: Velocity,
    /// Ball distance per tick along each axis before mode scaling. When
    /// unset it follows the arena and tick rate, see [`Config::ball_velocity`].
    #[serde(rename = "ball_velocity")]
    pub ball_velocity_override: Option<Velocity>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            tick_rate: DEFAULT_TICK_RATE,
            duration_secs: DEFAULT_DURATION_SECS,
            secret_time_secs: DEFAULT_SECRET_TIME_SECS,
            arena: Arena::STANDARD,
            paddle_velocity: Velocity::new(0.5, 1.0),
            ball_velocity_override: None,
        }
    }
}

/// A ball crosses one and a half paddle lengths per second.
fn default_ball_velocity(arena: &Arena, tick_rate: u32) -> Velocity {
    Velocity::new(
        1.5 * arena.paddle_width as f64 / tick_rate as f64,
        1.5 * arena.paddle_height as f64 / tick_rate as f64,
    )
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.tick_rate > MAX_TICK_RATE {
            return Err(ConfigError::TickRateTooHigh {
                rate: self.tick_rate,
                max: MAX_TICK_RATE,
            });
        }
        self.arena.validate()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Ball speed for this arena and tick rate, unless one was set explicitly.
    pub fn ball_velocity(&self) -> Velocity {
        self.ball_velocity_override
            .unwrap_or_else(|| default_ball_velocity(&self.arena, self.tick_rate))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate
    }

    /// Ticks in a full match; the countdown starts here.
    pub fn total_ticks(&self) -> i64 {
        self.duration_secs as i64 * self.tick_rate as i64
    }

    /// Countdown value on the tick that carries the secret request.
    pub fn secret_tick(&self) -> i64 {
        self.secret_time_secs as i64 * self.tick_rate as i64 - 1
    }
}
