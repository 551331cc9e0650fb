//! Incoming HTTP request type.

use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::{HeaderMap, Method, Uri};

/// An incoming HTTP request with its body already collected.
///
/// Handlers and middleware only ever see it by shared reference, so a single
/// request can be inspected by extractors, filters and callbacks without
/// copying.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    pub(crate) fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        Self { method: parts.method, uri: parts.uri, headers: parts.headers, body }
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn uri(&self) -> &Uri { &self.uri }
    pub fn path(&self) -> &str { self.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    ///
    /// Returns `None` when the header is absent or its value is not visible
    /// ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Declared body length, falling back to the collected body's length when
    /// the `content-length` header is missing or malformed.
    pub fn content_length(&self) -> u64 {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(self.body.len() as u64)
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::from_parts(parts, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(builder: http::request::Builder, body: &'static str) -> Request {
        builder.body(Bytes::from_static(body.as_bytes())).unwrap().into()
    }

    #[test]
    fn exposes_method_and_path() {
        let req = request(http::Request::get("/health?verbose=1"), "");
        assert_eq!(req.method(), Method::GET);
        assert_eq!(req.path(), "/health");
        assert_eq!(req.uri().query(), Some("verbose=1"));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = request(http::Request::get("/").header("X-Request-Id", "abc"), "");
        assert_eq!(req.header("x-request-id"), Some("abc"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn content_length_prefers_the_header() {
        let req = request(http::Request::post("/").header("content-length", "10"), "abc");
        assert_eq!(req.content_length(), 10);
    }

    #[test]
    fn content_length_falls_back_to_body() {
        let req = request(http::Request::post("/").header("content-length", "nope"), "abc");
        assert_eq!(req.content_length(), 3);
        assert_eq!(request(http::Request::get("/"), "").content_length(), 0);
    }
}
