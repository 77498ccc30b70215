use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{error, info, warn};

use crate::http::framing::{self, FramingError, FramingPolicy, ReadLimits};
use crate::http::parser::parse_http_request;
use crate::http::request::Request;
use crate::http::writer::{ResponseEncoder, ResponseWriter};
use crate::routes::{DirStore, Router};

/// State shared by every connection of a server.
pub struct ServiceContext {
    pub router: Router<DirStore>,
    pub encoder: ResponseEncoder,
    pub framing: FramingPolicy,
    pub limits: ReadLimits,
}

pub struct Connection<S = TcpStream> {
    stream: S,
    ctx: Arc<ServiceContext>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, ctx: Arc<ServiceContext>) -> Self {
        Self {
            stream,
            ctx,
            state: ConnectionState::Reading,
        }
    }

    /// Serves exactly one request, then closes.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    if let Some(req) = self.read_request().await? {
                        self.state = ConnectionState::Processing(req);
                    }
                }

                ConnectionState::Processing(req) => {
                    if let Some(writer) = self.process(req).await? {
                        self.state = ConnectionState::Writing(writer);
                    }
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    self.stream.shutdown().await?;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads and decodes one request. `None` means close without answering.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        let read = framing::read_request(&mut self.stream, self.ctx.framing, self.ctx.limits).await;
        let buf = match read {
            Ok(buf) => buf,
            Err(FramingError::Io(e)) => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "Unframeable request, closing connection");
                return Ok(None);
            }
        };

        if buf.is_empty() {
            // Client closed connection
            return Ok(None);
        }

        match parse_http_request(&buf) {
            Ok(req) => Ok(Some(req)),
            Err(e) => {
                warn!(error = %e, bytes = buf.len(), "Malformed request, closing connection");
                Ok(None)
            }
        }
    }

    async fn process(&self, req: Request) -> anyhow::Result<Option<ResponseWriter>> {
        let ctx = Arc::clone(&self.ctx);

        // File routes block on disk IO.
        let (req, response) = tokio::task::spawn_blocking(move || {
            let response = ctx.router.handle(&req);
            (req, response)
        })
        .await?;

        let encoded = match self.ctx.encoder.encode(&response) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, path = %req.path, "Handler produced an unencodable response");
                return Ok(None);
            }
        };

        info!(
            method = %req.method,
            path = %req.path,
            status = response.status().as_u16(),
            bytes = encoded.len(),
            "Request handled"
        );

        Ok(Some(ResponseWriter::new(encoded)))
    }
}
