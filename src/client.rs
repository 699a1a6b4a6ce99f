use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;

use crate::command::Command;
use crate::connection::Connection;
use crate::message::ServerMessage;

/// One game session over one connection, from connect to close.
pub struct Session {
    connection: Arc<Connection>,
}

impl Session {
    pub fn new(connection: Connection) -> Self {
        Self {
            connection: Arc::new(connection),
        }
    }

    /// Drive the session until the user quits or the server goes away.
    ///
    /// Two tasks share the connection: the inbound one drains server
    /// messages into `output`, the outbound one feeds entered commands from
    /// `input` to the server. The watch channel is the shared running flag;
    /// it is flipped to false exactly once, by whichever side hits a
    /// terminal condition first, and wakes the side still blocked on I/O.
    pub async fn run<I, O>(self, input: I, output: O) -> Result<()>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin + Send + 'static,
    {
        info!("Session with {} started", self.connection.peer_addr());
        let (running_tx, running_rx) = watch::channel(true);
        let running_tx = Arc::new(running_tx);

        let inbound = tokio::spawn(inbound_loop(
            Arc::clone(&self.connection),
            Arc::clone(&running_tx),
            running_rx.clone(),
            output,
        ));
        outbound_loop(
            Arc::clone(&self.connection),
            running_tx,
            running_rx,
            input,
        )
        .await;
        inbound.await?;
        info!("Session ended");
        Ok(())
    }
}

async fn inbound_loop<O>(
    connection: Arc<Connection>,
    running: Arc<watch::Sender<bool>>,
    mut shutdown: watch::Receiver<bool>,
    mut output: O,
) where
    O: AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            line = connection.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        debug!("Received: {line}");
                        let message = ServerMessage::classify(&line);
                        if let Err(err) = display(&mut output, &message).await {
                            warn!("Error writing status line: {err}");
                        }
                    }
                    Ok(None) => {
                        info!("Server closed the connection");
                        break;
                    }
                    Err(err) => {
                        error!("Error receiving message: {err}");
                        break;
                    }
                }
            }
        }
    }
    let _ = running.send(false);
    connection.close().await;
}

async fn display<O>(output: &mut O, message: &ServerMessage) -> std::io::Result<()>
where
    O: AsyncWrite + Unpin,
{
    output.write_all(format!("{message}\n").as_bytes()).await?;
    output.flush().await
}

async fn outbound_loop<I>(
    connection: Arc<Connection>,
    running: Arc<watch::Sender<bool>>,
    mut shutdown: watch::Receiver<bool>,
    input: I,
) where
    I: AsyncBufRead + Unpin,
{
    let mut commands = input.lines();
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            line = commands.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    // Local input ended, there is nothing left to send
                    Ok(None) => break,
                    Err(err) => {
                        error!("Error reading input: {err}");
                        break;
                    }
                };
                match Command::parse(&line) {
                    Command::Quit => break,
                    command => {
                        if let Some(encoded) = command.to_line() {
                            debug!("Sending: {encoded}");
                            if let Err(err) = connection.send(&encoded).await {
                                error!("Error sending command: {err}");
                                break;
                            }
                        }
                    }
                }
            }
        }
    }
    let _ = running.send(false);
    connection.close().await;
}
