//! Content negotiation and gzip encoding of response bodies.

use std::io::{self, Write};

use flate2::{write::GzEncoder, Compression};

use crate::http::response::{Body, Response};
use crate::http::CONTENT_ENCODING;

/// The only encoding this server produces.
pub const GZIP: &str = "gzip";

/// Returns true when an `Accept-Encoding` value lists exactly `gzip` as one of
/// its comma-separated tokens. No quality values or wildcards are honoured.
///
/// # Example
///
/// ```
/// # use minihttpd::http::codec::accepts_gzip;
/// assert!(accepts_gzip(Some("deflate, gzip")));
/// assert!(!accepts_gzip(Some("identity, br")));
/// assert!(!accepts_gzip(None));
/// ```
pub fn accepts_gzip(accept_encoding: Option<&str>) -> bool {
    accept_encoding
        .map(|value| value.split(',').any(|token| token.trim() == GZIP))
        .unwrap_or(false)
}

/// Gzip-compresses `input` with the default compression level.
pub fn gzip(input: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(input)?;
    encoder.finish()
}

/// Compresses the text body of `response` when the client accepts gzip.
///
/// The compressed bytes move into the raw body slot and `Content-Encoding:
/// gzip` is set. Responses that already carry a raw body, or clients that do
/// not list gzip, pass through untouched.
pub fn maybe_compress(response: Response, accept_encoding: Option<&str>) -> io::Result<Response> {
    if !accepts_gzip(accept_encoding) {
        return Ok(response);
    }

    let text = match response.body() {
        Body::Raw(_) => None,
        Body::Text(text) => Some(text.clone()),
        Body::Empty => Some(String::new()),
    };
    let Some(text) = text else {
        return Ok(response);
    };

    let compressed = gzip(text.as_bytes())?;
    tracing::debug!(
        original = text.len(),
        compressed = compressed.len(),
        "Compressed response body"
    );

    Ok(response
        .into_builder()
        .header(CONTENT_ENCODING, GZIP)
        .raw(compressed)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn gzip_output_decodes_back() {
        let compressed = gzip(b"hello hello hello").unwrap();

        let mut decoded = String::new();
        GzDecoder::new(&compressed[..])
            .read_to_string(&mut decoded)
            .unwrap();

        assert_eq!(decoded, "hello hello hello");
    }

    #[test]
    fn gzip_token_is_case_sensitive() {
        assert!(!accepts_gzip(Some("GZIP")));
        assert!(!accepts_gzip(Some("gzip;q=1.0")));
        assert!(accepts_gzip(Some("  gzip  ")));
    }
}
