use crate::game::SharedFrame;
use log::{debug, info, warn};
use shared::protocol::{encode_command, encode_handshake};
use shared::{Direction, FrameDecoder, Mode, ServerMessage};
use std::io;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to send to server: {0}")]
    Send(#[source] io::Error),
    #[error("failed to read from server: {0}")]
    Receive(#[source] io::Error),
}

/// An open match: frames come in on `reader`, commands go out on `writer`.
pub struct Connection {
    pub reader: BufReader<OwnedReadHalf>,
    pub writer: OwnedWriteHalf,
}

impl Connection {
    /// Connects and asks the server to start a match in `mode`.
    pub async fn open(addr: &str, mode: Mode) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| ClientError::Connect {
                addr: addr.to_string(),
                source,
            })?;
        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY: {}", e);
        }
        info!("Connected to {}", addr);

        let (read, mut writer) = stream.into_split();
        send_handshake(&mut writer, mode).await?;

        Ok(Connection {
            reader: BufReader::new(read),
            writer,
        })
    }
}

pub async fn send_handshake<W>(writer: &mut W, mode: Mode) -> Result<(), ClientError>
where
    W: AsyncWrite + Unpin,
{
    write_line(writer, &encode_handshake(mode)).await
}

pub async fn send_move<W>(writer: &mut W, direction: Direction) -> Result<(), ClientError>
where
    W: AsyncWrite + Unpin,
{
    write_line(writer, &encode_command(direction)).await
}

async fn write_line<W>(writer: &mut W, line: &str) -> Result<(), ClientError>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(line.as_bytes())
        .await
        .map_err(ClientError::Send)?;
    writer.flush().await.map_err(ClientError::Send)
}

/// Reads server lines into `frame` until the match ends or the connection
/// drops. A dropped connection leaves the frame `Disconnected`.
pub async fn receive_frames<R>(mut reader: R, frame: SharedFrame) -> Result<(), ClientError>
where
    R: AsyncBufRead + Unpin,
{
    let mut decoder = FrameDecoder::new();
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                debug!("Server closed the connection");
                frame.write().await.disconnect();
                return Ok(());
            }
            Ok(_) => {}
            Err(e) => {
                frame.write().await.disconnect();
                return Err(ClientError::Receive(e));
            }
        }

        let message = match decoder.feed(&line) {
            Ok(Some(message)) => message,
            Ok(None) => continue,
            Err(e) => {
                warn!("Dropping frame: {}", e);
                continue;
            }
        };

        if message == ServerMessage::SecretRequest {
            info!("Server asked for a secret; ignoring");
            continue;
        }

        let terminal = message.is_terminal();
        frame.write().await.apply(message);
        if terminal {
            return Ok(());
        }
    }
}
