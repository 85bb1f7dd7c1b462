//! Raw HTTP/1.1 transport over Tokio sockets.
//!
//! One task per connection reads a single request, dispatches it and closes
//! the connection after the response.

use std::io;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use super::errors::RequestError;
use super::request::read_request;
use super::router::{Reply, dispatch};
use crate::table::TableHandle;

/// Pause after an accept error that is not tied to a single connection,
/// such as running out of file descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_secs(1);

/// Serve connections forever. Only failing to read the listener's local
/// address returns an error; accept errors are logged and retried.
pub async fn run(listener: TcpListener, table: TableHandle) -> io::Result<()> {
    log::info!("Raw HTTP transport listening on {}", listener.local_addr()?);

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) if is_connection_error(&e) => {
                log::debug!("Connection dropped before accept: {e}");
                continue;
            }
            Err(e) => {
                log::warn!("Failed to accept connection: {e}");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };

        let table = table.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, &table).await {
                log::debug!("Connection from {peer} ended with error: {e}");
            }
        });
    }
}

/// Errors that end one pending connection but leave the listener usable.
fn is_connection_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
    )
}

async fn handle_connection(mut stream: TcpStream, table: &TableHandle) -> io::Result<()> {
    let reply = match read_request(&mut stream).await {
        Ok(request) => {
            log::debug!("{} {}", request.method, request.path);
            dispatch(table, &request).await
        }
        Err(RequestError::ConnectionClosed) => return Ok(()),
        Err(RequestError::Io(e)) => return Err(e),
        Err(e) => Reply::request_error(&e),
    };

    write_reply(&mut stream, &reply).await?;
    stream.shutdown().await
}

/// Write a complete `HTTP/1.1` response for `reply`.
pub async fn write_reply<W>(writer: &mut W, reply: &Reply) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reason_phrase(reply.status),
        reply.body.len()
    );
    writer.write_all(head.as_bytes()).await?;
    writer.write_all(&reply.body).await?;
    writer.flush().await
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        _ => "Internal Server Error",
    }
}
