use crate::http::request::{Method, Request};
use std::collections::HashMap;
use thiserror::Error;

/// Scanner position within a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Method,
    Path,
    Protocol,
    HeaderName,
    HeaderValue,
    Body,
}

/// Reasons a buffer cannot be decoded into a [`Request`].
///
/// Every variant means the request is malformed; the connection is closed
/// without a response.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty request buffer")]
    Empty,
    #[error("invalid method token")]
    InvalidMethod,
    #[error("request line ended while reading {0:?}")]
    Incomplete(ParseState),
    #[error("header line without ':' separator")]
    InvalidHeader,
}

/// Decodes one request from `buf` with a single left-to-right scan.
///
/// Line terminators are `\r\n`: the `\r` drives the transition and the `\n`
/// right after it is consumed. The body is whatever follows the blank line,
/// up to the end of the buffer, with leading `\n` bytes stripped. No
/// Content-Length framing happens here; see [`crate::http::framing`].
pub fn parse_http_request(buf: &[u8]) -> Result<Request, ParseError> {
    if buf.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut state = ParseState::Method;
    let mut line: Vec<u8> = Vec::new();
    let mut skip_lf = false;

    let mut method = None;
    let mut path = String::new();
    let mut version = String::new();
    let mut header_name = String::new();
    let mut headers = HashMap::new();
    let mut body = Vec::new();

    for &b in buf {
        if std::mem::take(&mut skip_lf) && b == b'\n' {
            continue;
        }

        match state {
            ParseState::Method => {
                if b == b' ' {
                    let token = String::from_utf8_lossy(&line);
                    method = Some(Method::from_token(&token).ok_or(ParseError::InvalidMethod)?);
                    line.clear();
                    state = ParseState::Path;
                } else {
                    line.push(b);
                }
            }

            ParseState::Path => {
                if b == b' ' {
                    path = take_text(&mut line);
                    state = ParseState::Protocol;
                } else {
                    line.push(b);
                }
            }

            ParseState::Protocol => {
                if b == b'\r' {
                    version = take_text(&mut line);
                    skip_lf = true;
                    state = ParseState::HeaderName;
                } else {
                    line.push(b);
                }
            }

            ParseState::HeaderName => {
                if b == b':' {
                    header_name = take_text(&mut line).trim().to_string();
                    state = ParseState::HeaderValue;
                } else if b == b'\r' {
                    if !line.iter().all(u8::is_ascii_whitespace) {
                        return Err(ParseError::InvalidHeader);
                    }
                    line.clear();
                    skip_lf = true;
                    state = ParseState::Body;
                } else {
                    line.push(b);
                }
            }

            ParseState::HeaderValue => {
                if b == b'\r' {
                    let value = take_text(&mut line).trim().to_string();
                    headers.insert(std::mem::take(&mut header_name), value);
                    skip_lf = true;
                    state = ParseState::HeaderName;
                } else {
                    line.push(b);
                }
            }

            ParseState::Body => body.push(b),
        }
    }

    let method = match state {
        ParseState::Method | ParseState::Path | ParseState::Protocol => {
            return Err(ParseError::Incomplete(state));
        }
        _ => method.ok_or(ParseError::Incomplete(ParseState::Method))?,
    };

    let leading = body.iter().take_while(|&&b| b == b'\n').count();
    body.drain(..leading);

    Ok(Request {
        method,
        path,
        version,
        headers,
        body,
    })
}

fn take_text(line: &mut Vec<u8>) -> String {
    let text = String::from_utf8_lossy(line).into_owned();
    line.clear();
    text
}
