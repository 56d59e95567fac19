//! # Paddle Arena Client
//!
//! Terminal client for the paddle arena server. The server runs the whole
//! game; the client shows whatever it receives and forwards keystrokes.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! The last state frame and the match status (playing, won, lost or
//! disconnected), kept behind a lock shared by the reader and the renderer.
//!
//! ### Input Module (`input`)
//! Reads raw key presses through crossterm and maps arrow keys, `w`/`a`/`s`/`d`,
//! `q`, Esc and Ctrl-C to actions.
//!
//! ### Network Module (`network`)
//! Opens the connection, sends the handshake and `Move:` lines, and decodes
//! incoming lines into frames. Secret requests from the server are logged
//! and otherwise ignored.
//!
//! ### Rendering Module (`rendering`)
//! Draws the arena as text: paddles as `-` and `|`, balls as `#`, the time
//! left, and a message box once the match is over. Also owns the raw mode
//! and alternate screen guard.

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
