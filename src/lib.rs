//! minihttpd - minimal HTTP/1.1 server
//!
//! Parses requests with an explicit byte-level state machine, routes them to
//! echo, file and user-agent handlers, and writes responses back, gzip
//! compressed when the client asks for it.

pub mod cli;
pub mod config;
pub mod http;
pub mod logging;
pub mod routes;
pub mod server;
