use std::collections::HashMap;

use crate::http::CONTENT_LENGTH;

/// Numeric HTTP status code carried by a [`Response`].
///
/// The reason phrase is not part of the code; it is looked up in a
/// [`StatusTable`] when the response is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// 200 OK
    pub const OK: StatusCode = StatusCode(200);
    /// 201 Created
    pub const CREATED: StatusCode = StatusCode(201);
    /// 404 Not Found
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    /// 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use minihttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.as_u16(), 200);
    /// assert_eq!(StatusCode::NOT_FOUND.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

/// Read-only mapping from status code to reason phrase.
///
/// Built once at startup and shared by reference with every encoder.
#[derive(Debug, Clone)]
pub struct StatusTable {
    phrases: HashMap<u16, &'static str>,
}

impl StatusTable {
    /// The codes this server emits.
    pub fn standard() -> Self {
        let phrases = HashMap::from([
            (200, "OK"),
            (201, "Created"),
            (404, "Not Found"),
            (500, "Internal Server Error"),
        ]);
        Self { phrases }
    }

    /// Returns the reason phrase for `code`, if the table knows it.
    ///
    /// # Example
    ///
    /// ```
    /// # use minihttpd::http::response::{StatusCode, StatusTable};
    /// let table = StatusTable::standard();
    /// assert_eq!(table.reason_phrase(StatusCode::OK), Some("OK"));
    /// assert_eq!(table.reason_phrase(StatusCode(418)), None);
    /// ```
    pub fn reason_phrase(&self, code: StatusCode) -> Option<&'static str> {
        self.phrases.get(&code.0).copied()
    }
}

impl Default for StatusTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// The authoritative payload of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    /// Text payload, written as UTF-8
    Text(String),
    /// Already-encoded bytes (compressed or binary file contents)
    Raw(Vec<u8>),
}

impl Body {
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }
}

/// A complete HTTP response ready to be encoded.
///
/// Responses are immutable once built. Content-Length is never stored here;
/// the encoder derives it from the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    version: String,
    headers: Vec<(String, String)>,
    body: Body,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use minihttpd::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::OK, "HTTP/1.1")
///     .header("Content-Type", "text/plain")
///     .text("abc")
///     .build();
/// assert_eq!(response.header("Content-Type"), Some("text/plain"));
/// ```
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    status: StatusCode,
    version: String,
    headers: Vec<(String, String)>,
    text: Option<String>,
    raw: Option<Vec<u8>>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the status and the request's protocol version.
    pub fn new(status: StatusCode, version: impl Into<String>) -> Self {
        Self {
            status,
            version: version.into(),
            headers: Vec::new(),
            text: None,
            raw: None,
        }
    }

    /// Adds or replaces a header, keeping the position of the first insertion.
    ///
    /// Content-Length is derived at encoding time, so attempts to set it are ignored.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();

        if key.eq_ignore_ascii_case(CONTENT_LENGTH) {
            tracing::debug!(value = %value, "Ignoring explicit Content-Length");
            return self;
        }

        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets the text body.
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.text = Some(body.into());
        self
    }

    /// Sets the raw body. A non-empty raw body wins over the text body.
    pub fn raw(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.raw = Some(body.into());
        self
    }

    /// Builds the final Response, resolving which body is authoritative.
    pub fn build(self) -> Response {
        let body = match (self.raw, self.text) {
            (Some(raw), _) if !raw.is_empty() => Body::Raw(raw),
            (_, Some(text)) if !text.is_empty() => Body::Text(text),
            _ => Body::Empty,
        };

        Response {
            status: self.status,
            version: self.version,
            headers: self.headers,
            body,
        }
    }
}

impl Response {
    /// Creates a response with no headers and no body.
    pub fn empty(status: StatusCode, version: impl Into<String>) -> Self {
        ResponseBuilder::new(status, version).build()
    }

    /// Creates a 200 OK `text/plain` response.
    pub fn text_plain(version: impl Into<String>, body: impl Into<String>) -> Self {
        ResponseBuilder::new(StatusCode::OK, version)
            .header(crate::http::CONTENT_TYPE, crate::http::TEXT_PLAIN)
            .text(body)
            .build()
    }

    /// Creates a 404 Not Found response with no body.
    pub fn not_found(version: impl Into<String>) -> Self {
        Self::empty(StatusCode::NOT_FOUND, version)
    }

    /// Creates a 500 Internal Server Error response with no body.
    pub fn internal_error(version: impl Into<String>) -> Self {
        Self::empty(StatusCode::INTERNAL_SERVER_ERROR, version)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Headers in the order they were first set.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Reopens the response for modification, keeping every field.
    pub fn into_builder(self) -> ResponseBuilder {
        let (text, raw) = match self.body {
            Body::Empty => (None, None),
            Body::Text(text) => (Some(text), None),
            Body::Raw(raw) => (None, Some(raw)),
        };

        ResponseBuilder {
            status: self.status,
            version: self.version,
            headers: self.headers,
            text,
            raw,
        }
    }
}
