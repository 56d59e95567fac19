//! Player command intake.
//!
//! A reader task parses `Move:` lines off the connection and drops the
//! direction into a single shared slot. The match loop empties the slot once
//! per tick, so only the most recent command before a tick is applied.

use log::{debug, trace};
use shared::protocol::parse_command;
use shared::Direction;
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const EMPTY: u8 = 0;

fn encode(direction: Direction) -> u8 {
    match direction {
        Direction::Up => 1,
        Direction::Down => 2,
        Direction::Left => 3,
        Direction::Right => 4,
    }
}

fn decode(code: u8) -> Option<Direction> {
    match code {
        1 => Some(Direction::Up),
        2 => Some(Direction::Down),
        3 => Some(Direction::Left),
        4 => Some(Direction::Right),
        _ => None,
    }
}

/// Single-slot, last-write-wins command shared by the reader and the loop.
#[derive(Debug, Clone, Default)]
pub struct PendingCommand {
    slot: Arc<AtomicU8>,
}

impl PendingCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces whatever command is waiting.
    pub fn store(&self, direction: Direction) {
        self.slot.store(encode(direction), Ordering::Release);
    }

    /// Takes the waiting command and leaves the slot empty.
    pub fn take(&self) -> Option<Direction> {
        decode(self.slot.swap(EMPTY, Ordering::AcqRel))
    }
}

/// Reads command lines until the connection fails.
///
/// Returns `Ok(())` when the peer closes its side and the read error
/// otherwise. Malformed lines are never rejected; they parse as `Right`.
pub async fn ingest_commands<R>(mut reader: R, pending: PendingCommand) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                debug!("Command stream reached end of file");
                return Ok(());
            }
            Ok(_) => {
                let direction = parse_command(&line);
                trace!("Command {:?} -> {}", line.trim_end(), direction);
                pending.store(direction);
            }
            Err(e) => {
                debug!("Command stream failed: {}", e);
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[test]
    fn test_empty_slot() {
        let pending = PendingCommand::new();
        assert_eq!(pending.take(), None);
    }

    #[test]
    fn test_last_write_wins() {
        let pending = PendingCommand::new();
        pending.store(Direction::Up);
        pending.store(Direction::Left);
        assert_eq!(pending.take(), Some(Direction::Left));
    }

    #[test]
    fn test_take_resets_slot() {
        let pending = PendingCommand::new();
        pending.store(Direction::Down);
        assert_eq!(pending.take(), Some(Direction::Down));
        assert_eq!(pending.take(), None);
    }

    #[test]
    fn test_clones_share_the_slot() {
        let pending = PendingCommand::new();
        let writer = pending.clone();
        writer.store(Direction::Right);
        assert_eq!(pending.take(), Some(Direction::Right));
        assert_eq!(writer.take(), None);
    }

    #[test]
    fn test_code_roundtrip() {
        for direction in Direction::ALL {
            assert_eq!(decode(encode(direction)), Some(direction));
        }
        assert_eq!(decode(EMPTY), None);
        assert_eq!(decode(200), None);
    }

    #[tokio::test]
    async fn test_ingest_keeps_latest_command() {
        let input: &[u8] = b"Move: up\nMove: down\nMove: left\n";
        let pending = PendingCommand::new();

        let result = ingest_commands(BufReader::new(input), pending.clone()).await;

        assert!(result.is_ok());
        assert_eq!(pending.take(), Some(Direction::Left));
    }

    #[tokio::test]
    async fn test_ingest_defaults_unknown_text_to_right() {
        let input: &[u8] = b"Move: up\nhello there\n";
        let pending = PendingCommand::new();

        ingest_commands(BufReader::new(input), pending.clone())
            .await
            .unwrap();

        assert_eq!(pending.take(), Some(Direction::Right));
    }

    #[tokio::test]
    async fn test_ingest_reports_read_errors() {
        let mock = tokio_test::io::Builder::new()
            .read(b"Move: down\n")
            .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            .build();
        let pending = PendingCommand::new();

        let result = ingest_commands(BufReader::new(mock), pending.clone()).await;

        assert_eq!(
            result.unwrap_err().kind(),
            io::ErrorKind::ConnectionReset
        );
        assert_eq!(pending.take(), Some(Direction::Down));
    }
}
