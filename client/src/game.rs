//! The client's view of the match: the last full frame plus how it ended.

use log::debug;
use shared::{ServerMessage, StateFrame};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Playing,
    Won { reward: Option<String> },
    Lost,
    Disconnected,
}

/// Latest frame received from the server.
///
/// Only the network reader writes it; the renderer works from a clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub state: StateFrame,
    pub status: Status,
    pub frames_received: u64,
}

pub type SharedFrame = Arc<RwLock<Frame>>;

impl Default for Frame {
    fn default() -> Self {
        Self {
            state: StateFrame::default(),
            status: Status::Playing,
            frames_received: 0,
        }
    }
}

impl Frame {
    pub fn shared() -> SharedFrame {
        Arc::new(RwLock::new(Frame::default()))
    }

    pub fn is_over(&self) -> bool {
        self.status != Status::Playing
    }

    /// Applies a decoded message. Once the match is over the frame is frozen.
    pub fn apply(&mut self, message: ServerMessage) {
        if self.is_over() {
            debug!("Ignoring {:?} after the match ended", message);
            return;
        }

        match message {
            ServerMessage::State(state) => {
                self.state = state;
                self.frames_received += 1;
            }
            ServerMessage::Win { reward } => self.status = Status::Won { reward },
            ServerMessage::Lose => self.status = Status::Lost,
            ServerMessage::SecretRequest => {}
        }
    }

    /// Marks the connection as gone, unless a result already arrived.
    pub fn disconnect(&mut self) {
        if !self.is_over() {
            self.status = Status::Disconnected;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(countdown: i64) -> StateFrame {
        StateFrame {
            horizontal: 17,
            vertical: 8,
            ball_x: vec![18],
            ball_y: vec![9],
            countdown,
        }
    }

    #[test]
    fn test_state_replaces_previous_frame() {
        let mut frame = Frame::default();
        frame.apply(ServerMessage::State(state(59)));
        frame.apply(ServerMessage::State(state(58)));

        assert_eq!(frame.state.countdown, 58);
        assert_eq!(frame.frames_received, 2);
        assert_eq!(frame.status, Status::Playing);
    }

    #[test]
    fn test_win_freezes_frame() {
        let mut frame = Frame::default();
        frame.apply(ServerMessage::State(state(1)));
        frame.apply(ServerMessage::Win {
            reward: Some("token".to_string()),
        });
        frame.apply(ServerMessage::State(state(0)));
        frame.disconnect();

        assert_eq!(
            frame.status,
            Status::Won {
                reward: Some("token".to_string())
            }
        );
        assert_eq!(frame.state.countdown, 1);
    }

    #[test]
    fn test_secret_request_changes_nothing() {
        let mut frame = Frame::default();
        frame.apply(ServerMessage::SecretRequest);
        assert_eq!(frame, Frame::default());
    }

    #[test]
    fn test_disconnect_while_playing() {
        let mut frame = Frame::default();
        frame.disconnect();
        assert_eq!(frame.status, Status::Disconnected);
        assert!(frame.is_over());
    }

    #[tokio::test]
    async fn test_shared_frame_snapshot() {
        let shared = Frame::shared();
        shared.write().await.apply(ServerMessage::Lose);

        let snapshot = shared.read().await.clone();
        assert_eq!(snapshot.status, Status::Lost);
    }
}
