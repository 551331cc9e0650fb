//! Request/response logging middleware.
//!
//! Per request the middleware moves through
//!
//! ```text
//! Idle → [request logged] → dispatched → [response logged] → done
//! ```
//!
//! Either logging step can be switched off. With response logging off the
//! next handler receives the real sink and no interception happens at all.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::Level;

use super::extract::{
    RequestExtractor, ResponseExtractor, default_request_extractors, default_response_extractors,
};
use super::intercept::InterceptedResponse;
use super::sink::{Field, LogSink, default_sink};
use crate::handler::{BoxedHandler, Handler, Middleware};
use crate::request::Request;
use crate::writer::ResponseWriter;

pub const DEFAULT_REQUEST_MESSAGE: &str = "http request";
pub const DEFAULT_RESPONSE_MESSAGE: &str = "http response";

/// Everything a built [`Logging`] middleware needs. Never mutated once
/// wrapped in an `Arc`.
#[derive(Clone)]
struct LoggingConfig {
    sink: Arc<dyn LogSink>,
    level: Level,
    request_log: bool,
    response_log: bool,
    request_message: Cow<'static, str>,
    response_message: Cow<'static, str>,
    request_extractors: Vec<RequestExtractor>,
    response_extractors: Vec<ResponseExtractor>,
}

// ── LoggingBuilder ────────────────────────────────────────────────────────────

/// Configures a [`Logging`] middleware.
///
/// Defaults: both steps enabled, `INFO` level, messages `"http request"` and
/// `"http response"`, [`TracingSink`](super::TracingSink) as the sink, and the
/// default extractor lists (`method, path, size` / `status, body_size`).
///
/// ```rust
/// use tally::middleware::{extract, LoggingBuilder};
/// use tracing::Level;
///
/// let quiet = LoggingBuilder::new()
///     .level(Level::DEBUG)
///     .disable_request_log()
///     .clear_response_extractors()
///     .response_extractor(extract::response::status())
///     .build();
/// # let _ = quiet;
/// ```
#[derive(Clone)]
pub struct LoggingBuilder {
    config: LoggingConfig,
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggingConfig {
                sink: default_sink(),
                level: Level::INFO,
                request_log: true,
                response_log: true,
                request_message: Cow::Borrowed(DEFAULT_REQUEST_MESSAGE),
                response_message: Cow::Borrowed(DEFAULT_RESPONSE_MESSAGE),
                request_extractors: default_request_extractors(),
                response_extractors: default_response_extractors(),
            },
        }
    }

    pub fn sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.config.sink = Arc::new(sink);
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.config.level = level;
        self
    }

    pub fn request_message(mut self, msg: impl Into<Cow<'static, str>>) -> Self {
        self.config.request_message = msg.into();
        self
    }

    pub fn response_message(mut self, msg: impl Into<Cow<'static, str>>) -> Self {
        self.config.response_message = msg.into();
        self
    }

    pub fn disable_request_log(mut self) -> Self {
        self.config.request_log = false;
        self
    }

    /// Also skips interception: the next handler gets the real sink.
    pub fn disable_response_log(mut self) -> Self {
        self.config.response_log = false;
        self
    }

    pub fn clear_request_extractors(mut self) -> Self {
        self.config.request_extractors.clear();
        self
    }

    /// Appends one extractor. Duplicates are kept.
    pub fn request_extractor(mut self, extractor: RequestExtractor) -> Self {
        self.config.request_extractors.push(extractor);
        self
    }

    pub fn request_extractors(mut self, extractors: impl IntoIterator<Item = RequestExtractor>) -> Self {
        self.config.request_extractors.extend(extractors);
        self
    }

    pub fn clear_response_extractors(mut self) -> Self {
        self.config.response_extractors.clear();
        self
    }

    /// Appends one extractor. Duplicates are kept.
    pub fn response_extractor(mut self, extractor: ResponseExtractor) -> Self {
        self.config.response_extractors.push(extractor);
        self
    }

    pub fn response_extractors(
        mut self,
        extractors: impl IntoIterator<Item = ResponseExtractor>,
    ) -> Self {
        self.config.response_extractors.extend(extractors);
        self
    }

    /// Snapshots the current configuration, extractor lists included.
    ///
    /// The returned middleware owns its copy; later builder calls only affect
    /// middleware built after them.
    pub fn build(&self) -> Logging {
        Logging { config: Arc::new(self.config.clone()) }
    }
}

impl Default for LoggingBuilder {
    fn default() -> Self { Self::new() }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Built logging middleware.
#[derive(Clone)]
pub struct Logging {
    config: Arc<LoggingConfig>,
}

impl Default for Logging {
    /// Same as `LoggingBuilder::new().build()`.
    fn default() -> Self {
        LoggingBuilder::new().build()
    }
}

/// Logging middleware with every default in place.
pub fn default_logging() -> Logging {
    Logging::default()
}

impl Middleware for Logging {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(LoggingHandler { config: Arc::clone(&self.config), next })
    }
}

struct LoggingHandler {
    config: Arc<LoggingConfig>,
    next: BoxedHandler,
}

impl Handler for LoggingHandler {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        let c = &*self.config;

        if c.request_log {
            let fields: Vec<Field> = c.request_extractors.iter().map(|f| f(req)).collect();
            c.sink.log(c.level, &c.request_message, &fields);
        }

        if !c.response_log {
            return self.next.serve(w, req);
        }

        let mut ir = InterceptedResponse::new(w, req);
        self.next.serve(&mut ir, req);
        let fields: Vec<Field> = c.response_extractors.iter().map(|f| f(&ir)).collect();
        c.sink.log(c.level, &c.response_message, &fields);
    }
}
