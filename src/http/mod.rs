//! HTTP protocol implementation.
//!
//! One request per connection: no keep-alive, no chunked encoding.
//!
//! # Architecture
//!
//! - **`framing`**: Decides how many bytes of the socket form one request
//! - **`parser`**: Byte-by-byte state machine turning a buffer into a [`request::Request`]
//! - **`request`**: HTTP request representation
//! - **`response`**: Immutable response value, builder and status table
//! - **`codec`**: gzip content negotiation
//! - **`writer`**: Serializes responses and writes them to the client
//! - **`connection`**: Per-connection driver tying the pieces together
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One framed read
//!        └──────┬──────┘
//!               │ Request parsed (malformed → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route and build the response
//!        └──────┬───────────┘
//!               │ Response encoded
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │
//!               └─ Closed
//! ```

pub mod codec;
pub mod connection;
pub mod framing;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const ACCEPT_ENCODING: &str = "Accept-Encoding";
pub const USER_AGENT: &str = "User-Agent";

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";
