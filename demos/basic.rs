//! Minimal tally example: logged JSON endpoints plus an error watcher.
//!
//! Run with:
//!   cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl http://localhost:3000/boom

use http::{Method, StatusCode};
use tally::middleware::{InterceptorBuilder, LoggingBuilder, extract};
use tally::{Handler, Middleware, Request, ResponseWriter, Server, handler_fn};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let errors = InterceptorBuilder::new()
        .request_filter(|req| req.path() != "/healthz")
        .after(|res| {
            if res.status().is_server_error() {
                tracing::warn!(path = res.request().path(), status = %res.status(), "request failed");
            }
        })
        .build();

    let logging = LoggingBuilder::new()
        .request_extractor(extract::request::header("user-agent"))
        .response_extractor(extract::response::header("content-type"))
        .build();

    let app = logging.wrap(errors.wrap(handler_fn(route).boxed()));

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

fn route(w: &mut dyn ResponseWriter, req: &Request) {
    match (req.method(), req.path()) {
        (&Method::GET, "/healthz") => {
            let _ = w.write_all(b"ok");
        }
        (&Method::GET, path) if path.starts_with("/users/") => {
            // Numeric ids only; anything else would need JSON escaping.
            let id = &path["/users/".len()..];
            if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
                w.write_header(StatusCode::NOT_FOUND);
                return;
            }
            json(w, StatusCode::OK, format!(r#"{{"id":"{id}","name":"alice"}}"#));
        }
        (&Method::POST, "/users") => {
            if req.body().is_empty() {
                w.write_header(StatusCode::BAD_REQUEST);
                return;
            }
            w.headers_mut().insert("location", "/users/99".parse().unwrap());
            json(w, StatusCode::CREATED, r#"{"id":"99"}"#.to_owned());
        }
        (_, "/boom") => w.write_header(StatusCode::INTERNAL_SERVER_ERROR),
        _ => w.write_header(StatusCode::NOT_FOUND),
    }
}

fn json(w: &mut dyn ResponseWriter, status: StatusCode, body: String) {
    w.headers_mut().insert("content-type", "application/json".parse().unwrap());
    w.write_header(status);
    let _ = w.write_all(body.as_bytes());
}
