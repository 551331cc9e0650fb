//! Structured log sink used by the logging middleware.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use http::{Method, StatusCode};
use tracing::Level;

// ── Field / Value ─────────────────────────────────────────────────────────────

/// One labeled value of a structured log entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub key: Cow<'static, str>,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

/// A log value. Kept deliberately small: anything richer can be rendered to a
/// string by the extractor that produces it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Str(String),
    I64(i64),
    U64(u64),
    Bool(bool),
    /// Nothing to report, e.g. an absent header.
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::I64(n) => write!(f, "{n}"),
            Self::U64(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("-"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Self::Str(s.to_owned()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Self::Str(s) }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self { Self::I64(n) }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self { Self::U64(n) }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self { Self::U64(n as u64) }
}

impl From<u16> for Value {
    fn from(n: u16) -> Self { Self::U64(n.into()) }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Self::Bool(b) }
}

impl From<StatusCode> for Value {
    fn from(s: StatusCode) -> Self { Self::U64(s.as_u16().into()) }
}

impl From<&Method> for Value {
    fn from(m: &Method) -> Self { Self::Str(m.as_str().to_owned()) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Renders fields as `key=value` pairs separated by spaces, in order.
pub struct DisplayFields<'a>(pub &'a [Field]);

impl fmt::Display for DisplayFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", field.key, field.value)?;
        }
        Ok(())
    }
}

// ── LogSink ───────────────────────────────────────────────────────────────────

/// Destination for structured log entries: a level, a message and ordered
/// key/value fields.
pub trait LogSink: Send + Sync {
    fn log(&self, level: Level, message: &str, fields: &[Field]);
}

impl<S: LogSink + ?Sized> LogSink for Arc<S> {
    fn log(&self, level: Level, message: &str, fields: &[Field]) {
        (**self).log(level, message, fields)
    }
}

/// The process-wide default sink: forwards every entry to `tracing`.
///
/// Field names in a `tracing` event are fixed at compile time, so the ordered
/// fields travel as one `fields` value, e.g.
/// `http request fields=method=GET path=/health size=0`.
///
/// A JSON or otherwise structured subscriber therefore sees a single opaque
/// string, not one key per field. For machine-readable output implement
/// [`LogSink`] directly and pass it to `LoggingBuilder::sink`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: Level, message: &str, fields: &[Field]) {
        let fields = DisplayFields(fields);
        match level {
            Level::ERROR => tracing::error!(fields = %fields, "{message}"),
            Level::WARN => tracing::warn!(fields = %fields, "{message}"),
            Level::INFO => tracing::info!(fields = %fields, "{message}"),
            Level::DEBUG => tracing::debug!(fields = %fields, "{message}"),
            _ => tracing::trace!(fields = %fields, "{message}"),
        }
    }
}

/// Shared handle to the default sink, a [`TracingSink`].
///
/// All extracted fields are flattened into one `fields` string per event.
/// Install a custom [`LogSink`] when each field must stay a separate,
/// typed value.
pub fn default_sink() -> Arc<dyn LogSink> {
    Arc::new(TracingSink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Mutex;

    #[test]
    fn values_render_raw() {
        assert_eq!(Value::from("GET").to_string(), "GET");
        assert_eq!(Value::from(StatusCode::NOT_FOUND).to_string(), "404");
        assert_eq!(Value::from(-3i64).to_string(), "-3");
        assert_eq!(Value::from(None::<&str>).to_string(), "-");
        assert_eq!(Value::from(Some(true)), Value::Bool(true));
    }

    #[test]
    fn fields_render_in_order() {
        let fields = [Field::new("method", "GET"), Field::new("path", "/health")];
        assert_eq!(DisplayFields(&fields).to_string(), "method=GET path=/health");
        assert_eq!(DisplayFields(&[]).to_string(), "");
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    #[test]
    fn tracing_sink_emits_events() {
        let out = Capture::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingSink.log(
                Level::WARN,
                "http request",
                &[Field::new("method", "GET"), Field::new("size", 0u64)],
            );
        });

        let logged = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("WARN"), "{logged}");
        assert!(logged.contains("http request"), "{logged}");
        assert!(logged.contains("method=GET size=0"), "{logged}");
    }
}
