use std::collections::HashMap;

use crate::http::CONTENT_LENGTH;

/// HTTP request methods.
///
/// Only GET and POST are routed. Any other well-formed method token is kept as
/// `Unsupported` so the router can answer it with 404 instead of dropping the
/// connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// Any other method token, as received
    Unsupported(String),
}

/// Represents a parsed HTTP request from a client.
///
/// Built once by the parser from a single receive buffer and never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, ...)
    pub method: Method,
    /// The request path (e.g., "/echo/abc"); empty only if the client sent none
    pub path: String,
    /// Protocol token (typically "HTTP/1.1"), echoed back verbatim
    pub version: String,
    /// Request headers, names as received, last value wins
    pub headers: HashMap<String, String>,
    /// Everything after the blank line, leading line feeds stripped
    pub body: Vec<u8>,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl Method {
    /// Parses an HTTP method token.
    ///
    /// Returns `None` when the token is empty or contains bytes that cannot
    /// appear in a method token. Recognised tokens are case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use minihttpd::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_token("PUT"), Some(Method::Unsupported("PUT".into())));
    /// assert_eq!(Method::from_token(""), None);
    /// ```
    pub fn from_token(s: &str) -> Option<Self> {
        if s.is_empty() || !s.bytes().all(is_token_byte) {
            return None;
        }

        Some(match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Unsupported(other.to_string()),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Unsupported(token) => token,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// RFC 9110 tchar
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}

impl Request {
    /// Retrieves a header value by its exact name.
    ///
    /// Header names are matched case-sensitively, as received.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(|v| v.as_str())
    }

    /// Returns the part of the path after `prefix`, if the path starts with it.
    pub fn path_suffix(&self, prefix: &str) -> Option<&str> {
        self.path.strip_prefix(prefix)
    }

    /// Parses the Content-Length header. Returns `None` if missing or not a number.
    pub fn content_length(&self) -> Option<usize> {
        self.header(CONTENT_LENGTH).and_then(|v| v.parse().ok())
    }
}
