//! Match loop for a single connection.
//!
//! A match reads one handshake line, then runs two tasks until it ends: the
//! tick loop in this module, which owns the [`GameState`] and writes every
//! message, and the command reader from [`crate::command`]. The match ends on
//! `win`, `lose`, a failed write, or a failed command read. A peer that only
//! closes its sending side keeps receiving frames until the match ends.

use crate::command::{ingest_commands, PendingCommand};
use crate::config::Config;
use crate::error::MatchError;
use crate::game::GameState;
use crate::physics::{self, Outcome};
use crate::reward::reward_token;
use log::{debug, info, trace};
use shared::protocol::parse_handshake;
use shared::{Mode, ServerMessage};
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// How a match that ran to completion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Won,
    Lost,
}

/// Waits for the handshake line and returns the requested mode.
pub async fn read_handshake<R>(reader: &mut R) -> Result<Mode, MatchError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    match reader.read_line(&mut line).await {
        Ok(0) => Err(MatchError::HandshakeClosed),
        Ok(_) => Ok(parse_handshake(&line)),
        Err(e) => Err(MatchError::HandshakeRead(e)),
    }
}

/// Plays one match over `stream`.
pub async fn run_match<S>(
    stream: S,
    peer: SocketAddr,
    config: &Config,
) -> Result<MatchResult, MatchError>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);

    let mode = read_handshake(&mut reader).await?;
    info!("Start game, remote = {}, mode = {}", peer, mode);

    let mut state = GameState::new(mode, config);
    let pending = PendingCommand::new();
    let mut ingestion = tokio::spawn(ingest_commands(reader, pending.clone()));

    let result = play(&mut state, &pending, &mut ingestion, &mut write_half, config).await;
    ingestion.abort();

    if result.is_ok() {
        // Best effort; the terminal line has already been written.
        let _ = write_half.shutdown().await;
    }
    result
}

async fn play<W>(
    state: &mut GameState,
    pending: &PendingCommand,
    ingestion: &mut JoinHandle<io::Result<()>>,
    writer: &mut W,
    config: &Config,
) -> Result<MatchResult, MatchError>
where
    W: AsyncWrite + Unpin,
{
    let mut ticker = interval(config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let secret_tick = config.secret_tick();

    // The first tick completes immediately
    ticker.tick().await;

    // A half-closed peer still receives frames; only writes can end it.
    let mut reading = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            joined = &mut *ingestion, if reading => {
                match joined {
                    Ok(Ok(())) => {
                        debug!("Command stream closed, playing on without input");
                        reading = false;
                        continue;
                    }
                    Ok(Err(e)) => return Err(MatchError::CommandRead(e)),
                    Err(_) => return Err(MatchError::CommandStreamClosed),
                }
            }
        }

        let command = pending.take();
        let outcome = physics::step(state, command);
        trace!(
            "Tick {}: command {:?}, outcome {:?}",
            state.countdown,
            command,
            outcome
        );

        if state.countdown == secret_tick {
            send(writer, &ServerMessage::SecretRequest).await?;
        }

        let message = match outcome {
            Outcome::Continue => ServerMessage::State(state.snapshot()),
            Outcome::Win => ServerMessage::Win {
                reward: reward_token(state.mode),
            },
            Outcome::Lose => ServerMessage::Lose,
        };
        send(writer, &message).await?;

        match outcome {
            Outcome::Continue => {}
            Outcome::Win => return Ok(MatchResult::Won),
            Outcome::Lose => return Ok(MatchResult::Lost),
        }
    }
}

async fn send<W>(writer: &mut W, message: &ServerMessage) -> Result<(), MatchError>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(message.encode().as_bytes())
        .await
        .map_err(MatchError::StateWrite)?;
    writer.flush().await.map_err(MatchError::StateWrite)
}
