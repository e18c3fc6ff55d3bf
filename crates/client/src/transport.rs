use std::net::SocketAddr;

use anyhow::Context;
use log::{info, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use tallgrass::net::{frame_length, NetworkStats, FRAME_HEADER_LEN};
use tallgrass::{ClientIntent, ServerMessage};

#[derive(Debug)]
pub enum Inbound {
    Message { message: ServerMessage, bytes: usize },
    Disconnected,
}

/// A connected TCP stream split into a reader task and a writer task.
/// Frames are a 4-byte big-endian length followed by a compressed payload.
pub struct Transport {
    outgoing: UnboundedSender<Vec<u8>>,
    incoming: UnboundedReceiver<Inbound>,
    stats: NetworkStats,
    connected: bool,
}

pub async fn connect(addr: SocketAddr) -> anyhow::Result<Transport> {
    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("failed to connect to {addr}"))?;
    stream.set_nodelay(true)?;
    info!("connected to {addr}");

    let (reader, writer) = stream.into_split();
    let (to_app, incoming) = mpsc::unbounded_channel();
    let (outgoing, from_app) = mpsc::unbounded_channel();

    tokio::spawn(read_task(reader, to_app));
    tokio::spawn(write_task(writer, from_app));

    Ok(Transport {
        outgoing,
        incoming,
        stats: NetworkStats::default(),
        connected: true,
    })
}

async fn read_frame(reader: &mut OwnedReadHalf) -> anyhow::Result<(ServerMessage, usize)> {
    let mut header = [0u8; FRAME_HEADER_LEN];
    reader.read_exact(&mut header).await?;
    let len = frame_length(header)?;
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    let message = ServerMessage::decode_payload(&payload)?;
    Ok((message, FRAME_HEADER_LEN + len))
}

async fn read_task(mut reader: OwnedReadHalf, to_app: UnboundedSender<Inbound>) {
    loop {
        match read_frame(&mut reader).await {
            Ok((message, bytes)) => {
                if to_app.send(Inbound::Message { message, bytes }).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("connection lost: {e:#}");
                break;
            }
        }
    }
    let _ = to_app.send(Inbound::Disconnected);
}

async fn write_task(mut writer: OwnedWriteHalf, mut from_app: UnboundedReceiver<Vec<u8>>) {
    while let Some(frame) = from_app.recv().await {
        if let Err(e) = writer.write_all(&frame).await {
            warn!("failed to send frame: {e}");
            break;
        }
    }
    let _ = writer.shutdown().await;
}

impl Transport {
    pub fn send(&mut self, intent: &ClientIntent) -> anyhow::Result<()> {
        let frame = intent.encode_frame()?;
        self.stats.frames_sent += 1;
        self.stats.bytes_sent += frame.len() as u64;
        self.outgoing
            .send(frame)
            .map_err(|_| anyhow::anyhow!("writer task has stopped"))
    }

    /// Everything received since the last call, without waiting.
    pub fn poll(&mut self) -> Vec<ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(inbound) = self.incoming.try_recv() {
            match inbound {
                Inbound::Message { message, bytes } => {
                    self.stats.frames_received += 1;
                    self.stats.bytes_received += bytes as u64;
                    messages.push(message);
                }
                Inbound::Disconnected => self.connected = false,
            }
        }
        messages
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn stats(&self) -> &NetworkStats {
        &self.stats
    }
}
