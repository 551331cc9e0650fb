//! Middleware layer.
//!
//! Everything here is built on one primitive: [`InterceptedResponse`], a
//! response sink that forwards to the real one and remembers the status and
//! body size that went out. Two ready-made middlewares use it:
//!
//! - [`Logging`]: one structured entry per request and one per response,
//!   fields produced by ordered [`extract`]ors.
//! - [`Interceptor`]: caller-supplied filter, before- and after-callbacks.
//!
//! Both are configured through a builder and frozen by `build()`. The built
//! value is a [`Middleware`](crate::Middleware): it wraps a handler and
//! returns a handler.
//!
//! ```rust
//! use tally::middleware::LoggingBuilder;
//! use tally::{handler_fn, Handler, Middleware};
//!
//! let app = LoggingBuilder::new()
//!     .request_message("incoming")
//!     .build()
//!     .wrap(handler_fn(|w, _| { let _ = w.write_all(b"hi"); }).boxed());
//! # let _ = app;
//! ```

pub mod extract;
mod intercept;
mod interceptor;
mod logging;
mod sink;

pub use intercept::InterceptedResponse;
pub use interceptor::{Interceptor, InterceptorBuilder};
pub use logging::{
    DEFAULT_REQUEST_MESSAGE, DEFAULT_RESPONSE_MESSAGE, Logging, LoggingBuilder, default_logging,
};
pub use sink::{DisplayFields, Field, LogSink, TracingSink, Value, default_sink};
