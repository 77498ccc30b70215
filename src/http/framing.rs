//! How many bytes of a connection make up one request.
//!
//! The parser treats everything after the blank line as body, so this module
//! alone decides where a request ends on the wire.

use bytes::{Bytes, BytesMut};
use serde::Deserialize;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::http::parser::parse_http_request;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FramingPolicy {
    /// One read of at most `buffer_size` bytes; the rest of the buffer is the body.
    #[default]
    SingleRead,
    /// Read until the headers end and `Content-Length` body bytes have arrived.
    ContentLength,
}

#[derive(Debug, Clone, Copy)]
pub struct ReadLimits {
    pub buffer_size: usize,
    pub max_request_size: usize,
}

/// A request that cannot be framed. The connection is closed without a response.
#[derive(Debug, Error)]
pub enum FramingError {
    #[error("request of {size} bytes exceeds limit of {limit}")]
    TooLarge { size: usize, limit: usize },
    #[error("peer closed after {received} of {expected} bytes")]
    Truncated { received: usize, expected: usize },
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads one request's worth of bytes. An empty result means the peer closed.
///
/// With [`FramingPolicy::ContentLength`] a request is either delivered whole
/// or rejected; it is never cut short.
pub async fn read_request<R>(
    stream: &mut R,
    policy: FramingPolicy,
    limits: ReadLimits,
) -> Result<Bytes, FramingError>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = BytesMut::with_capacity(limits.buffer_size);
    let mut temp = vec![0u8; limits.buffer_size.max(1)];

    loop {
        let n = stream.read(&mut temp).await?;
        buffer.extend_from_slice(&temp[..n]);

        if policy == FramingPolicy::SingleRead {
            break;
        }

        let total = framed_length(&buffer);

        if n == 0 {
            match total {
                Some(expected) if buffer.len() < expected => {
                    return Err(FramingError::Truncated {
                        received: buffer.len(),
                        expected,
                    });
                }
                _ => break,
            }
        }

        match total {
            Some(total) if total > limits.max_request_size => {
                return Err(FramingError::TooLarge {
                    size: total,
                    limit: limits.max_request_size,
                });
            }
            Some(total) if buffer.len() >= total => {
                buffer.truncate(total);
                break;
            }
            None if buffer.len() >= limits.max_request_size => {
                return Err(FramingError::TooLarge {
                    size: buffer.len(),
                    limit: limits.max_request_size,
                });
            }
            _ => {}
        }
    }

    Ok(buffer.freeze())
}

/// Total request length (headers, terminator and declared body) once the
/// header block is complete. The header block goes through the regular
/// decoder, so `Content-Length` is read exactly as [`Request::content_length`]
/// reads it.
///
/// [`Request::content_length`]: crate::http::request::Request::content_length
pub fn framed_length(buf: &[u8]) -> Option<usize> {
    let head_len = find_headers_end(buf)? + 4;

    let declared = parse_http_request(&buf[..head_len])
        .ok()
        .and_then(|req| req.content_length())
        .unwrap_or(0);

    Some(head_len + declared)
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
