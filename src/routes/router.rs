use thiserror::Error;
use tracing::{debug, error, warn};

use crate::http::codec;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::http::{ACCEPT_ENCODING, APPLICATION_OCTET_STREAM, CONTENT_TYPE, USER_AGENT};
use crate::routes::fs::{FileStore, StoreError};

pub const ECHO_PREFIX: &str = "/echo/";
pub const FILES_PREFIX: &str = "/files/";

/// Failures that cannot be expressed as a normal response.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("file store failure: {0}")]
    Store(#[from] StoreError),
    #[error("gzip encoding failed: {0}")]
    Compress(#[source] std::io::Error),
}

/// Maps requests to responses. GET and POST are matched against their own
/// route lists, top to bottom, first match wins.
///
/// | Method | Path            | Result                                   |
/// |--------|-----------------|------------------------------------------|
/// | GET    | `/` or empty    | 200, no body                             |
/// | GET    | `/echo/{text}`  | 200 `text/plain`, gzip when accepted     |
/// | GET    | `/files/{name}` | 200 `application/octet-stream` or 404    |
/// | GET    | any, User-Agent | 200 `text/plain` with the agent string   |
/// | POST   | `/files/{name}` | body written to file, 201                |
/// | other  |                 | 404                                      |
pub struct Router<S> {
    store: S,
}

impl<S: FileStore> Router<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Routes `req`. Store IO failures propagate as [`DispatchError`].
    pub fn dispatch(&self, req: &Request) -> Result<Response, DispatchError> {
        match &req.method {
            Method::GET => self.get(req),
            Method::POST => self.post(req),
            Method::Unsupported(token) => {
                debug!(method = %token, path = %req.path, "Unsupported method");
                Ok(Response::not_found(&req.version))
            }
        }
    }

    /// Like [`Router::dispatch`], answering failures with 500.
    pub fn handle(&self, req: &Request) -> Response {
        self.dispatch(req).unwrap_or_else(|e| {
            error!(method = %req.method, path = %req.path, error = %e, "Request failed");
            Response::internal_error(&req.version)
        })
    }

    fn get(&self, req: &Request) -> Result<Response, DispatchError> {
        if req.path.is_empty() || req.path == "/" {
            return Ok(Response::empty(StatusCode::OK, &req.version));
        }

        if let Some(text) = req.path_suffix(ECHO_PREFIX) {
            let response = Response::text_plain(&req.version, text);
            return codec::maybe_compress(response, req.header(ACCEPT_ENCODING))
                .map_err(DispatchError::Compress);
        }

        if let Some(name) = req.path_suffix(FILES_PREFIX) {
            return self.read_file(req, name);
        }

        if let Some(agent) = req.header(USER_AGENT) {
            return Ok(Response::text_plain(&req.version, agent));
        }

        Ok(Response::not_found(&req.version))
    }

    fn post(&self, req: &Request) -> Result<Response, DispatchError> {
        let Some(name) = req.path_suffix(FILES_PREFIX) else {
            return Ok(Response::not_found(&req.version));
        };

        match self.store.write_all(name, &req.body) {
            Ok(()) => {
                debug!(file = name, bytes = req.body.len(), "File written");
                Ok(Response::empty(StatusCode::CREATED, &req.version))
            }
            Err(StoreError::Rejected(name)) => {
                warn!(file = %name, "Rejected file name");
                Ok(Response::not_found(&req.version))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn read_file(&self, req: &Request, name: &str) -> Result<Response, DispatchError> {
        if let Err(StoreError::Rejected(name)) = self.store.check_name(name) {
            warn!(file = %name, "Rejected file name");
            return Ok(Response::not_found(&req.version));
        }

        if !self.store.exists(name) {
            debug!(file = name, "File not found");
            return Ok(Response::not_found(&req.version));
        }

        let bytes = match self.store.read_all(name) {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound(_)) | Err(StoreError::Rejected(_)) => {
                return Ok(Response::not_found(&req.version));
            }
            Err(e) => return Err(e.into()),
        };

        let builder = ResponseBuilder::new(StatusCode::OK, &req.version)
            .header(CONTENT_TYPE, APPLICATION_OCTET_STREAM);

        // Text files go out as text; anything else is sent byte for byte.
        let builder = match String::from_utf8(bytes) {
            Ok(text) => builder.text(text),
            Err(e) => builder.raw(e.into_bytes()),
        };

        Ok(builder.build())
    }
}
