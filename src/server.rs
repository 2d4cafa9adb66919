use std::fmt::Display;
use std::io;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::http::parser::parse;
use crate::http::{Request, Response, StatusCode};
use crate::middleware::{LogLayer, LogMiddleware};
use crate::router::Router;
use crate::service::{Service, ServiceBuilder};

/// Size of the single read that must hold the whole request.
///
/// Anything the client sends past this is never read.
pub const READ_BUFFER_SIZE: usize = 1024;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("reading request: {0}")]
    Read(#[source] io::Error),

    #[error("writing response: {0}")]
    Write(#[source] io::Error),
}

pub struct Server<S> {
    listener: TcpListener,
    service: S,
}

impl<S> Server<S>
where
    S: Service<Response = Response> + Send + Clone + 'static,
    S::Error: Display,
    S::Future: Send + 'static,
{
    pub async fn bind(address: SocketAddr, service: S) -> io::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        tracing::info!(address = %listener.local_addr()?, "listening");
        Ok(Server { listener, service })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever, one task per connection.
    pub async fn serve(self) -> io::Result<()> {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::error!(error = %e, "accepting connection failed");
                    continue;
                }
            };
            tracing::debug!(peer = %peer, "connection accepted");

            let service = self.service.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_client(stream, service).await {
                    tracing::error!(peer = %peer, error = %e, "connection failed");
                }
            });
        }
    }
}

/// Runs one request/response exchange over `stream`, then shuts it down.
///
/// Failures never leave this function other than as the returned error;
/// a request that cannot be parsed is still answered with a 502.
pub async fn handle_client<T, S>(mut stream: T, mut service: S) -> Result<(), ConnectionError>
where
    T: AsyncRead + AsyncWrite + Unpin,
    S: Service<Response = Response>,
    S::Error: Display,
{
    let mut buffer = [0u8; READ_BUFFER_SIZE];
    let bytes_read = match stream.read(&mut buffer).await {
        Ok(0) => {
            tracing::debug!("connection closed before a request was sent");
            return Ok(());
        }
        Ok(n) => n,
        Err(e) => {
            let response = error_response(&e);
            if let Err(write_err) = write_response(&mut stream, &response).await {
                tracing::debug!(error = %write_err, "could not report read failure");
            }
            return Err(ConnectionError::Read(e));
        }
    };

    let response = match parse(&buffer[..bytes_read]) {
        Ok(request) => dispatch(&mut service, request).await,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse request");
            error_response(&e)
        }
    };

    write_response(&mut stream, &response).await?;
    stream.shutdown().await.map_err(ConnectionError::Write)
}

async fn dispatch<S>(service: &mut S, request: Request) -> Response
where
    S: Service<Response = Response>,
    S::Error: Display,
{
    if let Err(e) = futures::future::poll_fn(|cx| service.poll_ready(cx)).await {
        tracing::error!(error = %e, "service not ready");
        return Response::new(StatusCode::BAD_GATEWAY);
    }

    match service.call(request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "error processing request");
            Response::new(StatusCode::BAD_GATEWAY)
        }
    }
}

/// A 502 carrying the error text as its body.
fn error_response(error: &dyn Display) -> Response {
    let mut response = Response::new(StatusCode::BAD_GATEWAY);
    response.set_body(error.to_string().into_bytes());
    response
}

async fn write_response<T>(stream: &mut T, response: &Response) -> Result<(), ConnectionError>
where
    T: AsyncWrite + Unpin,
{
    stream
        .write_all(&response.to_bytes())
        .await
        .map_err(ConnectionError::Write)
}

/// Binds a server that routes through `router` behind the logging layer.
pub async fn new_server(
    address: SocketAddr,
    router: Router,
) -> io::Result<Server<LogMiddleware<Router>>> {
    let service = ServiceBuilder::new(router).layer(LogLayer).build();
    Server::bind(address, service).await
}

#[cfg(test)]
mod tests {
    use tokio::io::duplex;

    use super::*;
    use crate::router::RouteError;
    use crate::service::service_fn;
    use crate::storage::FileStore;
    use crate::storage::tests::scratch_dir;

    async fn exchange<S>(raw: &[u8], service: S) -> Vec<u8>
    where
        S: Service<Response = Response>,
        S::Error: Display,
    {
        let (mut client, server) = duplex(4096);
        client.write_all(raw).await.unwrap();

        handle_client(server, service).await.unwrap();

        let mut out = Vec::new();
        client.read_to_end(&mut out).await.unwrap();
        out
    }

    fn router() -> Router {
        Router::new(FileStore::new(scratch_dir()))
    }

    #[tokio::test]
    async fn answers_root() {
        let out = exchange(b"GET / HTTP/1.1\r\n\r\n", router()).await;

        assert_eq!(out, b"HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\n\r\n");
    }

    #[tokio::test]
    async fn malformed_request_is_502_with_reason() {
        let out = exchange(b"GET /\r\n\r\n", router()).await;
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("HTTP/1.1 502 Bad Gateway\r\n"));
        assert!(text.contains("content-length: 29\r\n"));
        assert!(text.ends_with("\r\n\r\ninvalid request line parts: 2\r\n"));
    }

    #[tokio::test]
    async fn malformed_header_is_502_with_reason() {
        let out = exchange(b"GET / HTTP/1.1\r\nno colon here\r\n\r\n", router()).await;

        assert_eq!(
            out,
            b"HTTP/1.1 502 Bad Gateway\r\n\
              content-length: 34\r\n\r\n\
              invalid header line: no colon here\r\n"
        );
    }

    #[tokio::test]
    async fn service_error_is_empty_502() {
        let failing = service_fn(|_request: Request| async {
            Err::<Response, _>(RouteError::Compression(io::Error::other("boom")))
        });
        let out = exchange(b"GET /echo/x HTTP/1.1\r\n\r\n", failing).await;

        assert_eq!(out, b"HTTP/1.1 502 Bad Gateway\r\n\r\n");
    }

    #[tokio::test]
    async fn closed_peer_gets_no_response() {
        let (client, server) = duplex(64);
        drop(client);

        assert!(handle_client(server, router()).await.is_ok());
    }

    #[tokio::test]
    async fn only_the_first_read_is_seen() {
        let dir = scratch_dir();
        let store = FileStore::new(&dir);

        let mut raw = b"POST /files/big HTTP/1.1\r\nContent-Length: 2000\r\n\r\n".to_vec();
        let header_len = raw.len();
        raw.extend(std::iter::repeat_n(b'x', 2000));

        let out = exchange(&raw, Router::new(store)).await;
        assert!(out.starts_with(b"HTTP/1.1 201 Created\r\n"));

        let stored = std::fs::read(dir.join("big")).unwrap();
        assert_eq!(stored.len(), READ_BUFFER_SIZE - header_len);
    }
}
