//! # tally
//!
//! Observe what an HTTP handler answered without changing what it sends.
//!
//! ## The contract
//!
//! A handler writes into a [`ResponseWriter`]. Middleware in this crate slips
//! an [`InterceptedResponse`](middleware::InterceptedResponse) in front of the
//! real writer, lets the handler run, and reads back the status and body size.
//! Nothing is buffered, rewritten or swallowed on the way: write errors reach
//! the handler exactly as the transport reported them.
//!
//! On top of that primitive:
//!
//! - [`middleware::Logging`]: structured request/response log entries with
//!   pluggable, ordered field extractors. Defaults to `tracing`.
//! - [`middleware::Interceptor`]: filter plus before/after callbacks for
//!   anything else (metrics, audit trails, tests).
//!
//! Routing, TLS and request timeouts belong to whatever hosts the handler.
//! [`Server`] is a thin hyper host with graceful shutdown for when nothing
//! else does.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::StatusCode;
//! use tally::middleware::{InterceptorBuilder, LoggingBuilder};
//! use tally::{handler_fn, Handler, Middleware, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let hello = handler_fn(|w, req| {
//!         if req.path() != "/" {
//!             w.write_header(StatusCode::NOT_FOUND);
//!             return;
//!         }
//!         let _ = w.write_all(b"hello");
//!     });
//!
//!     let errors = InterceptorBuilder::new()
//!         .after(|res| {
//!             if res.status().is_server_error() {
//!                 tracing::warn!(path = res.request().path(), "handler failed");
//!             }
//!         })
//!         .build();
//!
//!     let app = LoggingBuilder::new().build().wrap(errors.wrap(hello.boxed()));
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//! ```

mod error;
mod handler;
mod request;
mod server;
mod writer;

pub mod middleware;

pub use error::Error;
pub use handler::{BoxedHandler, Handler, HandlerFn, Middleware, handler_fn};
pub use request::Request;
pub use server::Server;
pub use writer::{BufferedResponse, Connection, Hijacker, ResponseWriter};
