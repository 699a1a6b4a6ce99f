use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::Mutex;

/// One live connection to the game server.
///
/// The read and write halves are locked independently so the inbound and
/// outbound tasks can use the socket at the same time. The only buffering is
/// what `BufReader` needs to assemble one line.
pub struct Connection {
    peer: SocketAddr,
    reader: Mutex<Lines<BufReader<OwnedReadHalf>>>,
    writer: Mutex<Option<OwnedWriteHalf>>,
    closed: AtomicBool,
}

impl Connection {
    pub async fn connect(address: impl ToSocketAddrs) -> Result<Self> {
        let socket = TcpStream::connect(address)
            .await
            .context("could not connect to server")?;
        let peer = socket.peer_addr()?;
        let (read_half, write_half) = socket.into_split();
        Ok(Self {
            peer,
            reader: Mutex::new(BufReader::new(read_half).lines()),
            writer: Mutex::new(Some(write_half)),
            closed: AtomicBool::new(false),
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Write one line plus terminator. The writer lock is held across the
    /// whole write, so concurrent sends never interleave mid-line.
    pub async fn send(&self, line: &str) -> Result<()> {
        if line.contains('\n') {
            bail!("payload holds an embedded line terminator");
        }
        let mut writer = self.writer.lock().await;
        let writer = writer.as_mut().context("connection is closed")?;
        writer
            .write_all(line.as_bytes())
            .await
            .context("could not send line to server")?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    /// Next complete line from the server, `None` once the stream ends.
    pub async fn next_line(&self) -> Result<Option<String>> {
        let mut reader = self.reader.lock().await;
        Ok(reader
            .next_line()
            .await
            .context("error reading from server")?)
    }

    /// Shut the stream down. Only the first call has any effect; later or
    /// concurrent calls observe the connection as already closed and return
    /// at once.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(mut writer) = self.writer.lock().await.take() {
            if let Err(err) = writer.shutdown().await {
                debug!("Error shutting down socket: {err}");
            }
        }
        info!("Connection to {} closed", self.peer);
    }
}
