//! What the presentation layer gets back from every operation.
//!
//! - [`Transcript`]: append-only log, optionally streamed to a sink
//! - [`Report`]: success flag plus one human-readable status line

use parking_lot::Mutex;
use std::fmt::{self, Display};

type Sink = Box<dyn Fn(&str, &str) + Send + Sync>;

/// Append-only operation log.
///
/// Lines are stored as `[module] message`. When a sink is attached every
/// line is also forwarded as it is recorded, for streaming display.
#[derive(Default)]
pub struct Transcript {
    lines: Mutex<Vec<String>>,
    sink: Option<Sink>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward each recorded line to `sink(module, message)`.
    pub fn with_sink(sink: impl Fn(&str, &str) + Send + Sync + 'static) -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            sink: Some(Box::new(sink)),
        }
    }

    pub fn record(&self, module: &str, message: impl AsRef<str>) {
        let message = message.as_ref();
        self.lines.lock().push(format!("[{module}] {message}"));
        if let Some(sink) = &self.sink {
            sink(module, message);
        }
    }

    /// Snapshot of all lines recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|line| line.contains(needle))
    }
}

impl fmt::Debug for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript")
            .field("lines", &self.lines.lock().len())
            .field("streaming", &self.sink.is_some())
            .finish()
    }
}

/// Success flag and status line for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub ok: bool,
    pub status: String,
}

impl Report {
    pub fn from_result<T: Display, E: Display>(result: &Result<T, E>) -> Self {
        match result {
            Ok(value) => Self {
                ok: true,
                status: value.to_string(),
            },
            Err(err) => Self {
                ok: false,
                status: err.to_string(),
            },
        }
    }
}
