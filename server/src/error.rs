use crate::config::ConfigError;
use std::io;
use thiserror::Error;

/// Why a match ended without reaching `win` or `lose`.
///
/// Every variant is a disconnect: the match is over and nothing more is
/// written to the peer.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("failed to read handshake: {0}")]
    HandshakeRead(#[source] io::Error),
    #[error("connection closed before the handshake")]
    HandshakeClosed,
    #[error("failed to read command: {0}")]
    CommandRead(#[source] io::Error),
    #[error("command reader stopped unexpectedly")]
    CommandStreamClosed,
    #[error("failed to write to peer: {0}")]
    StateWrite(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
