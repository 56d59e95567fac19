use clap::Parser;
use client::game::{Frame, SharedFrame};
use client::input::{forward_keys, Input};
use client::network::{receive_frames, send_move, ClientError, Connection};
use client::rendering::{Renderer, TerminalGuard};
use log::{info, warn};
use shared::{Arena, Mode, DEFAULT_PORT};
use std::io;
use std::time::Duration;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::interval;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server host to connect to
    #[arg(short, long, default_value = "localhost")]
    addr: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Game mode: default, fast or double
    #[arg(short, long, default_value = "default")]
    mode: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Anything louder than warn would scribble over the arena.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let mode = Mode::from_token(&args.mode);
    let server = format!("{}:{}", args.addr, args.port);
    info!("Connecting to {} for a {} game", server, mode);

    let Connection { reader, mut writer } = Connection::open(&server, mode).await?;
    let frame = Frame::shared();
    let mut receiver = tokio::spawn(receive_frames(reader, frame.clone()));
    let renderer = Renderer::new(Arena::STANDARD);

    let result = match TerminalGuard::enter() {
        Ok(_terminal) => play(&renderer, &frame, &mut receiver, &mut writer).await,
        Err(e) => Err(e.into()),
    };
    receiver.abort();

    let snapshot = frame.read().await.clone();
    print!("{}", renderer.render(&snapshot));
    result
}

/// Runs the screen until the player quits. Arrow keys or `w`/`a`/`s`/`d`
/// move; `q`, Esc or Ctrl-C quit. The last frame stays up after the match.
async fn play(
    renderer: &Renderer,
    frame: &SharedFrame,
    receiver: &mut JoinHandle<Result<(), ClientError>>,
    writer: &mut OwnedWriteHalf,
) -> Result<(), Box<dyn std::error::Error>> {
    let (key_sender, mut keys) = mpsc::unbounded_channel();
    let key_reader = tokio::task::spawn_blocking(move || forward_keys(key_sender));

    let mut redraw = interval(Duration::from_millis(50));
    let mut stdout = io::stdout();
    let mut receiving = true;

    let outcome: Result<(), Box<dyn std::error::Error>> = loop {
        tokio::select! {
            _ = redraw.tick() => {
                let snapshot = frame.read().await.clone();
                if let Err(e) = renderer.draw(&mut stdout, &snapshot) {
                    break Err(e.into());
                }
            }
            key = keys.recv() => match key {
                Some(Input::Move(direction)) => {
                    if frame.read().await.is_over() {
                        continue;
                    }
                    if let Err(e) = send_move(writer, direction).await {
                        warn!("{}", e);
                        frame.write().await.disconnect();
                    }
                }
                Some(Input::Quit) | None => break Ok(()),
            },
            joined = &mut *receiver, if receiving => {
                receiving = false;
                if let Ok(Err(e)) = joined {
                    warn!("{}", e);
                }
            }
        }
    };

    drop(keys);
    key_reader.await??;
    outcome
}
