//! Handler and middleware traits.
//!
//! A handler answers one request by writing into a [`ResponseWriter`]. It
//! runs synchronously from start to finish: whatever blocking it does (socket
//! writes, disk-backed log sinks) occupies the calling task for that long.
//!
//! Handlers are shared across concurrent requests behind an `Arc`, which is
//! why the trait requires `Send + Sync`. Per-request state lives on the stack
//! of [`Handler::serve`], never inside the handler.
//!
//! ```text
//! |w, req| { … }                     ← user writes this
//!        ↓ handler_fn(…)
//! HandlerFn(closure)                 ← implements Handler
//!        ↓ .boxed()
//! Arc<dyn Handler>  (BoxedHandler)   ← what middleware wraps
//!        ↓ Middleware::wrap
//! Arc<dyn Handler>                   ← still a handler, wrap again or serve
//! ```

use std::sync::Arc;

use crate::request::Request;
use crate::writer::ResponseWriter;

/// Something that can answer a request.
pub trait Handler: Send + Sync + 'static {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request);

    /// Type-erases the handler so it can be wrapped by a [`Middleware`].
    fn boxed(self) -> BoxedHandler
    where
        Self: Sized,
    {
        Arc::new(self)
    }
}

/// A type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn Handler>;

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        (**self).serve(w, req)
    }
}

/// Newtype that lets a closure act as a [`Handler`]. Build one with
/// [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F>(F);

/// Turns a closure into a [`Handler`].
///
/// ```rust
/// use tally::{handler_fn, Handler, ResponseWriter, Request};
/// use http::StatusCode;
///
/// let health = handler_fn(|w: &mut dyn ResponseWriter, _req: &Request| {
///     w.write_header(StatusCode::OK);
///     let _ = w.write_all(b"ok");
/// });
/// let _boxed = health.boxed();
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut dyn ResponseWriter, &Request) + Send + Sync + 'static,
{
    HandlerFn(f)
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut dyn ResponseWriter, &Request) + Send + Sync + 'static,
{
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        (self.0)(w, req)
    }
}

/// A handler-wrapping function: takes the next handler and returns a handler
/// that runs around it.
///
/// Both built middlewares in [`crate::middleware`] implement this. A
/// middleware value holds only frozen configuration, so the same value can
/// wrap any number of handlers.
pub trait Middleware: Send + Sync {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}
