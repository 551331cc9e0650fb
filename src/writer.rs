//! The response sink handlers write into, and the in-memory sink the server
//! hands them.

use std::io::{self, Read, Write};

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;

use crate::error::Error;

// ── ResponseWriter ────────────────────────────────────────────────────────────

/// Where a handler sends its response: headers, a status line and body bytes.
///
/// The status is sent at most once. Either call [`write_header`] explicitly
/// or let the first [`write`] imply `200 OK`; header writes after that point
/// have no effect.
///
/// [`write_header`]: ResponseWriter::write_header
/// [`write`]: ResponseWriter::write
pub trait ResponseWriter {
    /// The header map that will be sent. Mutations after the first write are
    /// not observed by the peer.
    fn headers(&self) -> &HeaderMap;

    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Writes part of the body and returns how many bytes were accepted.
    ///
    /// Same contract as [`std::io::Write::write`]: a short count is a partial
    /// write, an error means nothing was written.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    fn write_header(&mut self, status: StatusCode);

    /// Asks whether the sink can hand over its raw connection.
    fn hijacker(&mut self) -> Option<&mut dyn Hijacker> {
        None
    }

    /// Writes the whole buffer, retrying short writes.
    fn write_all(&mut self, mut buf: &[u8]) -> io::Result<()> {
        while !buf.is_empty() {
            match self.write(buf) {
                Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                Ok(n) => buf = &buf[n..],
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

// ── Connection takeover ───────────────────────────────────────────────────────

/// A raw bidirectional connection taken over from a response sink.
pub trait Connection: Read + Write + Send {}

impl<T: Read + Write + Send> Connection for T {}

/// Optional sink capability: hand the underlying connection to the caller.
///
/// Once a hijack succeeds the HTTP exchange is over. Nothing written through
/// the sink afterwards is well-defined.
pub trait Hijacker {
    fn hijack(&mut self) -> Result<Box<dyn Connection>, Error>;
}

// ── BufferedResponse ──────────────────────────────────────────────────────────

/// A [`ResponseWriter`] that keeps the whole response in memory.
///
/// The server gives each request a fresh one and turns it into a hyper
/// response once the handler returns. Useful on its own for driving handlers
/// in tests.
#[derive(Debug, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// The status sent so far, `200 OK` if the handler never chose one.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_response(self) -> http::Response<Full<Bytes>> {
        let status = self.status();
        let mut res = http::Response::new(Full::new(self.body.freeze()));
        *res.status_mut() = status;
        *res.headers_mut() = self.headers;
        res
    }
}

impl ResponseWriter for BufferedResponse {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn write_header(&mut self, status: StatusCode) {
        self.status.get_or_insert(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_ok() {
        let mut res = BufferedResponse::new();
        assert_eq!(res.status(), StatusCode::OK);
        res.write_all(b"hello").unwrap();
        assert_eq!(res.body(), b"hello");
    }

    #[test]
    fn first_header_write_wins() {
        let mut res = BufferedResponse::new();
        res.write_header(StatusCode::CREATED);
        res.write_header(StatusCode::NOT_FOUND);
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[test]
    fn body_write_fixes_the_status() {
        let mut res = BufferedResponse::new();
        res.write(b"x").unwrap();
        res.write_header(StatusCode::IM_A_TEAPOT);
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[test]
    fn cannot_be_hijacked() {
        assert!(BufferedResponse::new().hijacker().is_none());
    }

    #[test]
    fn converts_into_hyper_response() {
        let mut res = BufferedResponse::new();
        res.headers_mut().insert("content-type", "text/plain".parse().unwrap());
        res.write_header(StatusCode::ACCEPTED);
        res.write_all(b"queued").unwrap();

        let res = res.into_response();
        assert_eq!(res.status(), StatusCode::ACCEPTED);
        assert_eq!(res.headers()["content-type"], "text/plain");
    }

    struct Trickle(Vec<u8>);

    impl ResponseWriter for Trickle {
        fn headers(&self) -> &HeaderMap { unreachable!() }
        fn headers_mut(&mut self) -> &mut HeaderMap { unreachable!() }
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.push(buf[0]);
            Ok(1)
        }
        fn write_header(&mut self, _: StatusCode) {}
    }

    #[test]
    fn write_all_retries_short_writes() {
        let mut sink = Trickle(Vec::new());
        sink.write_all(b"abc").unwrap();
        assert_eq!(sink.0, b"abc");
    }
}
