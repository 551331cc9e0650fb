//! Extractors: functions that turn a request or an intercepted response into
//! one labeled log field.
//!
//! The logging middleware evaluates its extractors in list order, and that
//! order is the order of the fields in the emitted entry.
//!
//! ```rust
//! use tally::middleware::{extract, LoggingBuilder};
//!
//! let logging = LoggingBuilder::new()
//!     .request_extractor(extract::request::header("x-request-id"))
//!     .response_extractor(extract::response::header("content-type"))
//!     .build();
//! # let _ = logging;
//! ```

use std::sync::Arc;

use super::intercept::InterceptedResponse;
use super::sink::Field;
use crate::request::Request;

/// Produces one field from an inbound request.
pub type RequestExtractor = Arc<dyn Fn(&Request) -> Field + Send + Sync>;

/// Produces one field from a finished, intercepted response.
pub type ResponseExtractor = Arc<dyn Fn(&InterceptedResponse<'_>) -> Field + Send + Sync>;

/// `[method, path, size]`
pub fn default_request_extractors() -> Vec<RequestExtractor> {
    vec![request::method(), request::path(), request::size()]
}

/// `[status, body_size]`
pub fn default_response_extractors() -> Vec<ResponseExtractor> {
    vec![response::status(), response::body_size()]
}

pub mod request {
    use std::borrow::Cow;
    use std::sync::Arc;

    use super::RequestExtractor;
    use crate::middleware::sink::{Field, Value};
    use crate::request::Request;

    /// Wraps any closure as an extractor.
    pub fn from_fn<F>(f: F) -> RequestExtractor
    where
        F: Fn(&Request) -> Field + Send + Sync + 'static,
    {
        Arc::new(f)
    }

    /// `("method", "GET")`
    pub fn method() -> RequestExtractor {
        from_fn(|req| Field::new("method", req.method()))
    }

    /// `("path", "/users/42")`, query string excluded.
    pub fn path() -> RequestExtractor {
        from_fn(|req| Field::new("path", req.path()))
    }

    /// `("size", <content length>)`
    pub fn size() -> RequestExtractor {
        from_fn(|req| Field::new("size", req.content_length()))
    }

    /// The named header, keyed by the name as given. Absent → [`Value::Null`].
    pub fn header(name: impl Into<Cow<'static, str>>) -> RequestExtractor {
        let name = name.into();
        from_fn(move |req| Field::new(name.clone(), Value::from(req.header(&name))))
    }
}

pub mod response {
    use std::borrow::Cow;
    use std::sync::Arc;

    use super::ResponseExtractor;
    use crate::middleware::intercept::InterceptedResponse;
    use crate::middleware::sink::{Field, Value};
    use crate::writer::ResponseWriter;

    /// Wraps any closure as an extractor.
    pub fn from_fn<F>(f: F) -> ResponseExtractor
    where
        F: Fn(&InterceptedResponse<'_>) -> Field + Send + Sync + 'static,
    {
        Arc::new(f)
    }

    /// `("status", 200)`
    pub fn status() -> ResponseExtractor {
        from_fn(|res| Field::new("status", res.status()))
    }

    /// `("body_size", <bytes written>)`
    pub fn body_size() -> ResponseExtractor {
        from_fn(|res| Field::new("body_size", res.bytes_written()))
    }

    /// The named response header. Absent → [`Value::Null`].
    pub fn header(name: impl Into<Cow<'static, str>>) -> ResponseExtractor {
        let name = name.into();
        from_fn(move |res| {
            let value = res.headers().get(&*name).and_then(|v| v.to_str().ok());
            Field::new(name.clone(), Value::from(value))
        })
    }
}
