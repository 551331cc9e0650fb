//! Response interception.
//!
//! [`InterceptedResponse`] sits between a handler and the real sink. Every
//! call is forwarded unchanged; on the way through it remembers the status
//! that went out and how many body bytes the sink accepted.

use std::io;

use http::{HeaderMap, StatusCode};

use crate::error::Error;
use crate::request::Request;
use crate::writer::{Connection, Hijacker, ResponseWriter};

/// A decorating [`ResponseWriter`] that records what the handler sent.
///
/// Lives for exactly one request: middleware creates it around the real sink,
/// passes it to the next handler and reads it back once the handler returns.
/// It is meant for the single task serving that request and is not safe to
/// share between concurrent writers.
pub struct InterceptedResponse<'a> {
    inner: &'a mut dyn ResponseWriter,
    request: &'a Request,
    wrote_header: bool,
    status: Option<StatusCode>,
    written: u64,
}

impl<'a> InterceptedResponse<'a> {
    pub fn new(inner: &'a mut dyn ResponseWriter, request: &'a Request) -> Self {
        Self { inner, request, wrote_header: false, status: None, written: 0 }
    }

    /// The status the handler chose, or `200 OK` if it only wrote a body (or
    /// wrote nothing at all).
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Total body bytes accepted by the real sink.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// The request this response answers.
    pub fn request(&self) -> &'a Request {
        self.request
    }

    /// Takes over the underlying connection, if the real sink supports it.
    ///
    /// Fails with [`Error::Unsupported`] otherwise.
    pub fn hijack(&mut self) -> Result<Box<dyn Connection>, Error> {
        match self.inner.hijacker() {
            Some(h) => h.hijack(),
            None => Err(Error::Unsupported("hijack")),
        }
    }
}

impl ResponseWriter for InterceptedResponse<'_> {
    fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.wrote_header = true;
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn write_header(&mut self, status: StatusCode) {
        if self.wrote_header {
            return;
        }
        self.wrote_header = true;
        self.inner.write_header(status);
        self.status = Some(status);
    }

    /// Reports the capability only if the real sink has it, so wrapped
    /// handlers see the same answer as unwrapped ones.
    fn hijacker(&mut self) -> Option<&mut dyn Hijacker> {
        if self.inner.hijacker().is_none() {
            return None;
        }
        Some(self)
    }
}

impl Hijacker for InterceptedResponse<'_> {
    fn hijack(&mut self) -> Result<Box<dyn Connection>, Error> {
        InterceptedResponse::hijack(self)
    }
}
