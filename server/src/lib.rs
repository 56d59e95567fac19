//! # Paddle Arena Server
//!
//! Authoritative server for a small terminal arcade game: one ball (or two)
//! bouncing inside a rectangular arena, four paddles steered by a single
//! player, and a countdown the player has to survive.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Simulation
//! The server owns the canonical game state. The client only draws what it
//! receives and sends movement commands back.
//!
//! ### One Match Per Connection
//! Each accepted TCP connection plays exactly one match with its own state
//! and its own command slot. Nothing is shared between matches except the
//! read-only configuration.
//!
//! ## Match Lifecycle
//!
//! 1. The client sends a handshake line, `start <mode>`.
//! 2. The match loop builds a [`game::GameState`] for that mode and spawns a
//!    command reader for the rest of the connection.
//! 3. Every tick the loop takes the latest command, runs
//!    [`physics::step`], and writes either a five line state frame or the
//!    final `win`/`lose` line.
//! 4. The match ends on `win`, `lose`, or the first I/O failure.
//!
//! ## Module Organization
//!
//! - `config`: startup configuration, TOML loading and validation
//! - `game`: game state and the per-mode factory
//! - `physics`: the per-tick simulation step
//! - `reward`: mode-specific tokens appended to `win`
//! - `command`: the shared command slot and the command reader
//! - `session`: the per-connection match loop
//! - `network`: the TCP accept loop
//! - `error`: error types for matches and the listener
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::Config;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind(Config::default()).await?;
//!     server.run().await;
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod game;
pub mod network;
pub mod physics;
pub mod reward;
pub mod session;
