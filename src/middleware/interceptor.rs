//! Generic before/after callback middleware.
//!
//! For code that wants to know what a handler actually answered without
//! writing its own [`InterceptedResponse`] plumbing:
//!
//! ```rust
//! use tally::middleware::InterceptorBuilder;
//! use tally::{handler_fn, Handler, Middleware};
//!
//! let audit = InterceptorBuilder::new()
//!     .request_filter(|req| req.path() != "/healthz")
//!     .before(|req| tracing::debug!(path = req.path(), "dispatching"))
//!     .after(|res| tracing::debug!(status = %res.status(), "answered"))
//!     .build();
//!
//! let app = audit.wrap(handler_fn(|w, _| { let _ = w.write_all(b"ok"); }).boxed());
//! # let _ = app;
//! ```

use std::sync::Arc;

use super::intercept::InterceptedResponse;
use crate::handler::{BoxedHandler, Handler, Middleware};
use crate::request::Request;
use crate::writer::ResponseWriter;

type Filter = Arc<dyn Fn(&Request) -> bool + Send + Sync>;
type Before = Arc<dyn Fn(&Request) + Send + Sync>;
type After = Arc<dyn Fn(&InterceptedResponse<'_>) + Send + Sync>;

/// Frozen configuration shared by every handler an [`Interceptor`] wraps.
struct Callbacks {
    filter: Filter,
    before: Before,
    after: After,
}

/// Configures an [`Interceptor`].
///
/// Defaults: every request passes the filter and both callbacks do nothing.
#[derive(Clone)]
pub struct InterceptorBuilder {
    filter: Filter,
    before: Before,
    after: After,
}

impl InterceptorBuilder {
    pub fn new() -> Self {
        Self {
            filter: Arc::new(pass_all),
            before: Arc::new(ignore_request),
            after: Arc::new(ignore_response),
        }
    }

    /// Requests for which `f` returns `false` go straight to the next handler:
    /// no interception, no callbacks.
    ///
    /// The predicate runs once per request. A panicking predicate is not
    /// caught.
    pub fn request_filter<F>(mut self, f: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.filter = Arc::new(f);
        self
    }

    /// Called with the raw request right before the next handler runs.
    pub fn before<F>(mut self, f: F) -> Self
    where
        F: Fn(&Request) + Send + Sync + 'static,
    {
        self.before = Arc::new(f);
        self
    }

    /// Called with the finished response right after the next handler returns.
    pub fn after<F>(mut self, f: F) -> Self
    where
        F: Fn(&InterceptedResponse<'_>) + Send + Sync + 'static,
    {
        self.after = Arc::new(f);
        self
    }

    /// Freezes the current configuration. Changing the builder afterwards
    /// does not affect the returned middleware.
    pub fn build(&self) -> Interceptor {
        Interceptor {
            callbacks: Arc::new(Callbacks {
                filter: Arc::clone(&self.filter),
                before: Arc::clone(&self.before),
                after: Arc::clone(&self.after),
            }),
        }
    }
}

fn pass_all(_: &Request) -> bool { true }
fn ignore_request(_: &Request) {}
fn ignore_response(_: &InterceptedResponse<'_>) {}

impl Default for InterceptorBuilder {
    fn default() -> Self { Self::new() }
}

/// Built callback middleware. Cheap to clone; wraps any number of handlers.
#[derive(Clone)]
pub struct Interceptor {
    callbacks: Arc<Callbacks>,
}

impl Middleware for Interceptor {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(InterceptorHandler { callbacks: Arc::clone(&self.callbacks), next })
    }
}

struct InterceptorHandler {
    callbacks: Arc<Callbacks>,
    next: BoxedHandler,
}

impl Handler for InterceptorHandler {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) {
        let cb = &self.callbacks;
        if !(cb.filter)(req) {
            return self.next.serve(w, req);
        }

        (cb.before)(req);
        let mut ir = InterceptedResponse::new(w, req);
        self.next.serve(&mut ir, req);
        (cb.after)(&ir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use crate::writer::BufferedResponse;
    use bytes::Bytes;
    use http::StatusCode;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn get(path: &str) -> Request {
        http::Request::get(path).body(Bytes::new()).unwrap().into()
    }

    /// Identity of the sink a handler was given.
    fn sink_addr(w: &mut dyn ResponseWriter) -> usize {
        std::ptr::from_mut(w).cast::<()>() as usize
    }

    #[test]
    fn passing_requests_get_an_intercepting_sink() {
        let app = InterceptorBuilder::new()
            .build()
            .wrap(handler_fn(|w, _| {
                let addr = sink_addr(&mut *w);
                let _ = w.write_all(addr.to_string().as_bytes());
            }).boxed());

        let mut res = BufferedResponse::new();
        let raw = sink_addr(&mut res);
        app.serve(&mut res, &get("/"));
        assert_ne!(res.body(), raw.to_string().as_bytes());
    }

    fn created() -> BoxedHandler {
        handler_fn(|w, _| {
            w.write_header(StatusCode::CREATED);
            let _ = w.write_all(b"made");
        })
        .boxed()
    }

    #[test]
    fn callbacks_run_around_the_handler() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let (before, after) = (Arc::clone(&events), Arc::clone(&events));

        let app = InterceptorBuilder::new()
            .before(move |req| before.lock().unwrap().push(format!("before {}", req.path())))
            .after(move |res| {
                after.lock().unwrap().push(format!("after {} {}", res.status().as_u16(), res.bytes_written()))
            })
            .build()
            .wrap(created());

        let mut res = BufferedResponse::new();
        app.serve(&mut res, &get("/things"));

        assert_eq!(*events.lock().unwrap(), ["before /things", "after 201 4"]);
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.body(), b"made");
    }

    #[test]
    fn filtered_requests_skip_interception() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (before, after) = (Arc::clone(&calls), Arc::clone(&calls));

        let reports_sink = handler_fn(|w, _| {
            let addr = sink_addr(&mut *w);
            let _ = w.write_all(addr.to_string().as_bytes());
        });

        let app = InterceptorBuilder::new()
            .request_filter(|_| false)
            .before(move |_| { before.fetch_add(1, Ordering::SeqCst); })
            .after(move |_| { after.fetch_add(1, Ordering::SeqCst); })
            .build()
            .wrap(reports_sink.boxed());

        for _ in 0..3 {
            let mut res = BufferedResponse::new();
            let raw = sink_addr(&mut res);
            app.serve(&mut res, &get("/"));
            assert_eq!(res.body(), raw.to_string().as_bytes());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn filter_runs_once_per_request() {
        let evaluated = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&evaluated);

        let app = InterceptorBuilder::new()
            .request_filter(move |req| {
                counter.fetch_add(1, Ordering::SeqCst);
                req.path().starts_with("/api")
            })
            .build()
            .wrap(created());

        for path in ["/api/a", "/static/b", "/api/c"] {
            app.serve(&mut BufferedResponse::new(), &get(path));
        }
        assert_eq!(evaluated.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn built_interceptor_ignores_later_builder_changes() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        let builder = InterceptorBuilder::new()
            .after(move |_| { counter.fetch_add(1, Ordering::SeqCst); });
        let built = builder.build();
        let _builder = builder.request_filter(|_| false);

        built.wrap(created()).serve(&mut BufferedResponse::new(), &get("/"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[should_panic(expected = "bad predicate")]
    fn filter_panics_propagate() {
        let app = InterceptorBuilder::new()
            .request_filter(|_| panic!("bad predicate"))
            .build()
            .wrap(created());
        app.serve(&mut BufferedResponse::new(), &get("/"));
    }

    #[test]
    #[should_panic(expected = "before blew up")]
    fn before_panics_propagate() {
        let app = InterceptorBuilder::new()
            .before(|_| panic!("before blew up"))
            .build()
            .wrap(created());
        app.serve(&mut BufferedResponse::new(), &get("/"));
    }

    #[test]
    #[should_panic(expected = "after blew up")]
    fn after_panics_propagate() {
        let app = InterceptorBuilder::new()
            .after(|_| panic!("after blew up"))
            .build()
            .wrap(created());
        app.serve(&mut BufferedResponse::new(), &get("/"));
    }
}
