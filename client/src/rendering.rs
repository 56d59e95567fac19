use crate::game::{Frame, Status};
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, execute, queue, style};
use shared::Arena;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Raw mode plus the alternate screen for as long as it lives. Dropping it
/// puts the terminal back, also when unwinding from a panic.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Draws frames as plain text for an arena of known size.
pub struct Renderer {
    arena: Arena,
}

impl Renderer {
    pub fn new(arena: Arena) -> Self {
        Self { arena }
    }

    /// Redraws the whole screen from the top left corner. Lines are ended
    /// with cursor moves since raw mode does not translate `\n`.
    pub fn draw<W: Write>(&self, out: &mut W, frame: &Frame) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0), terminal::Clear(ClearType::All))?;
        for line in self.render(frame).lines() {
            queue!(out, style::Print(line), cursor::MoveToNextLine(1))?;
        }
        out.flush()
    }

    pub fn render(&self, frame: &Frame) -> String {
        let mut out = String::new();
        for row in self.board(frame) {
            out.extend(row);
            out.push('\n');
        }
        let _ = writeln!(out, "time: {:2}", frame.state.countdown);

        if let Some(message) = end_message(&frame.status) {
            let _ = writeln!(out, "+------------+");
            let _ = writeln!(out, "|{}|", message);
            let _ = writeln!(out, "+------------+");
        }
        if let Status::Won {
            reward: Some(reward),
        } = &frame.status
        {
            let _ = writeln!(out, "{}", reward);
        }
        out
    }

    fn board(&self, frame: &Frame) -> Vec<Vec<char>> {
        let width = self.arena.width as usize;
        let height = self.arena.height as usize;
        let mut board = vec![vec![' '; width + 1]; height + 1];
        let state = &frame.state;

        for offset in 0..self.arena.paddle_width as i64 {
            let x = state.horizontal + offset;
            put(&mut board, x, 0, '-');
            put(&mut board, x, height as i64 - 1, '-');
        }

        for offset in 0..self.arena.paddle_height as i64 {
            let y = state.vertical + offset;
            for x in [0, width as i64 - 1] {
                let mark = match cell(&board, x, y) {
                    Some('-') => '+',
                    _ => '|',
                };
                put(&mut board, x, y, mark);
            }
        }

        for (&x, &y) in state.ball_x.iter().zip(&state.ball_y) {
            put(&mut board, x, y, '#');
        }
        board
    }
}

fn cell(board: &[Vec<char>], x: i64, y: i64) -> Option<char> {
    let row = board.get(usize::try_from(y).ok()?)?;
    row.get(usize::try_from(x).ok()?).copied()
}

// Values outside the board are dropped; the server may report a ball that has
// already left.
fn put(board: &mut [Vec<char>], x: i64, y: i64, mark: char) {
    let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
        return;
    };
    if let Some(slot) = board.get_mut(y).and_then(|row| row.get_mut(x)) {
        *slot = mark;
    }
}

fn end_message(status: &Status) -> Option<&'static str> {
    match status {
        Status::Playing => None,
        Status::Won { .. } => Some("  You win!  "),
        Status::Lost => Some(" You lose!  "),
        Status::Disconnected => Some("Disconnected"),
    }
}
