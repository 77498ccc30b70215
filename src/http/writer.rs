use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response, StatusCode, StatusTable};
use crate::http::{APPLICATION_OCTET_STREAM, CONTENT_LENGTH, CONTENT_TYPE};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// A handler produced a status the table has no phrase for.
    #[error("no reason phrase for status code {}", .0.as_u16())]
    UnknownStatusCode(StatusCode),
}

/// Serializes responses to wire bytes using a shared status table.
#[derive(Debug, Clone)]
pub struct ResponseEncoder {
    statuses: Arc<StatusTable>,
}

impl ResponseEncoder {
    pub fn new(statuses: Arc<StatusTable>) -> Self {
        Self { statuses }
    }

    /// Encodes `resp` as status line, headers, blank line and body.
    ///
    /// Pure: encoding the same response twice yields identical bytes.
    pub fn encode(&self, resp: &Response) -> Result<Vec<u8>, EncodeError> {
        let reason = self
            .statuses
            .reason_phrase(resp.status())
            .ok_or(EncodeError::UnknownStatusCode(resp.status()))?;

        let mut buf = Vec::new();

        // Status line
        let status_line = format!(
            "{} {} {}\r\n",
            resp.version(),
            resp.status().as_u16(),
            reason
        );
        buf.extend_from_slice(status_line.as_bytes());

        // Headers
        for (k, v) in resp.headers() {
            write_header(&mut buf, k, v);
        }
        if let Some(length) = content_length(resp) {
            write_header(&mut buf, CONTENT_LENGTH, &length.to_string());
        }

        // Header/body separator
        buf.extend_from_slice(b"\r\n");

        // Body
        match resp.body() {
            Body::Empty => {}
            Body::Text(text) => buf.extend_from_slice(text.as_bytes()),
            Body::Raw(raw) => buf.extend_from_slice(raw),
        }

        Ok(buf)
    }
}

/// Derives Content-Length from the authoritative body.
///
/// Raw bodies count bytes. Text bodies count UTF-8 bytes when served as
/// `application/octet-stream` and characters otherwise. No body, no header.
pub fn content_length(resp: &Response) -> Option<usize> {
    match resp.body() {
        Body::Empty => None,
        Body::Raw(raw) => Some(raw.len()),
        Body::Text(text) if resp.header(CONTENT_TYPE) == Some(APPLICATION_OCTET_STREAM) => {
            Some(text.len())
        }
        Body::Text(text) => Some(text.chars().count()),
    }
}

fn write_header(buf: &mut Vec<u8>, name: &str, value: &str) {
    buf.extend_from_slice(name.as_bytes());
    buf.extend_from_slice(b": ");
    buf.extend_from_slice(value.as_bytes());
    buf.extend_from_slice(b"\r\n");
}

/// Writes an encoded response, tolerating partial writes.
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(buffer: Vec<u8>) -> Self {
        Self { buffer, written: 0 }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
