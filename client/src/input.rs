//! Keyboard input, read key by key from the terminal in raw mode

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use shared::Direction;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Move(Direction),
    Quit,
}

/// Maps a key press to an action. Arrow keys and `w`/`a`/`s`/`d` move;
/// `q`, Esc and Ctrl-C quit. Key releases are ignored.
pub fn map_key(key: &KeyEvent) -> Option<Input> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')).then_some(Input::Quit);
    }

    let input = match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Input::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Input::Move(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Input::Move(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Input::Move(Direction::Right),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Input::Quit,
        _ => return None,
    };
    Some(input)
}

/// Polls the terminal and forwards mapped keys until the receiving side is
/// dropped. Blocks, so it belongs on a blocking thread.
pub fn forward_keys(inputs: mpsc::UnboundedSender<Input>) -> io::Result<()> {
    while !inputs.is_closed() {
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if let Some(input) = map_key(&key) {
                if inputs.send(input).is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(map_key(&press(KeyCode::Up)), Some(Input::Move(Direction::Up)));
        assert_eq!(map_key(&press(KeyCode::Down)), Some(Input::Move(Direction::Down)));
        assert_eq!(map_key(&press(KeyCode::Left)), Some(Input::Move(Direction::Left)));
        assert_eq!(map_key(&press(KeyCode::Right)), Some(Input::Move(Direction::Right)));
    }

    #[test]
    fn test_wasd_keys() {
        assert_eq!(map_key(&press(KeyCode::Char('w'))), Some(Input::Move(Direction::Up)));
        assert_eq!(map_key(&press(KeyCode::Char('A'))), Some(Input::Move(Direction::Left)));
        assert_eq!(map_key(&press(KeyCode::Char('s'))), Some(Input::Move(Direction::Down)));
        assert_eq!(map_key(&press(KeyCode::Char('d'))), Some(Input::Move(Direction::Right)));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(map_key(&press(KeyCode::Char('q'))), Some(Input::Quit));
        assert_eq!(map_key(&press(KeyCode::Esc)), Some(Input::Quit));
        assert_eq!(
            map_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Input::Quit)
        );
    }

    #[test]
    fn test_ignored_keys() {
        assert_eq!(map_key(&press(KeyCode::Char(' '))), None);
        assert_eq!(map_key(&press(KeyCode::Enter)), None);
        assert_eq!(
            map_key(&KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(
            map_key(&KeyEvent::new_with_kind(
                KeyCode::Up,
                KeyModifiers::NONE,
                KeyEventKind::Release
            )),
            None
        );
    }

    #[test]
    fn test_forward_keys_stops_without_receiver() {
        let (inputs, receiver) = mpsc::unbounded_channel();
        drop(receiver);
        assert!(forward_keys(inputs).is_ok());
    }
}
