//! Logger: owns the sinks and dispatches records to them

use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::LoggerConfig;
use crate::error::{Error, Result};
use crate::level::LogLevel;
use crate::record::{CallSite, LogRecord};
use crate::sink::Sink;

struct Inner {
    verbosity: LogLevel,
    sinks: Vec<Box<dyn Sink>>,
    closed: bool,
}

/// A set of sinks sharing one verbosity threshold
///
/// All state sits behind a mutex, so a `Logger` can be shared between threads
/// (e.g. in an `Arc`). Every call writes synchronously to all sinks before
/// returning.
pub struct Logger {
    inner: Mutex<Inner>,
}

impl Logger {
    /// Create a logger from `config`, or from defaults when `None`
    ///
    /// Sinks are registered console first, then the rotating file.
    pub fn init(config: Option<LoggerConfig>) -> Result<Self> {
        let config = config.unwrap_or_default();
        let sinks = config.sinks().iter().map(|sink| sink.build()).collect();
        Self::with_sinks(config.verbosity, sinks)
    }

    /// Create a logger over caller-provided sinks, initializing each in order
    ///
    /// If any sink fails to initialize, the ones already initialized are closed
    /// again and `Error::Init` is returned.
    pub fn with_sinks(verbosity: LogLevel, mut sinks: Vec<Box<dyn Sink>>) -> Result<Self> {
        if sinks.is_empty() {
            return Err(Error::NoSinks);
        }

        let failure = sinks
            .iter_mut()
            .enumerate()
            .find_map(|(index, sink)| sink.init().err().map(|e| (index, e)));

        if let Some((index, err)) = failure {
            tracing::warn!("Sink #{} failed to initialize: {}", index, err);
            for sink in &mut sinks[..index] {
                if let Err(close_err) = sink.close() {
                    tracing::warn!("Failed to close {:?} sink during rollback: {}", sink.kind(), close_err);
                }
            }
            return Err(Error::Init(Box::new(err)));
        }

        Ok(Self {
            inner: Mutex::new(Inner {
                verbosity,
                sinks,
                closed: false,
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Sinks stay usable after a panic elsewhere; each write is self-contained
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Log a message
    ///
    /// Records less severe than the verbosity threshold are dropped without
    /// being formatted. Every sink is written even if one fails; the first
    /// failure is returned.
    pub fn log(&self, level: LogLevel, call_site: Option<CallSite>, args: fmt::Arguments<'_>) -> Result<()> {
        {
            let inner = self.lock();
            if inner.closed {
                return Err(Error::Closed);
            }
            if !level.admitted_by(inner.verbosity) {
                return Ok(());
            }
        }

        // Formatting runs user Display impls, which may log through this logger
        let line = LogRecord::new(level, call_site, args).render();

        let mut inner = self.lock();
        if inner.closed {
            return Err(Error::Closed);
        }
        let mut first_err = None;
        for sink in inner.sinks.iter_mut() {
            if let Err(e) = sink.write(&line) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Current verbosity threshold
    pub fn verbosity(&self) -> LogLevel {
        self.lock().verbosity
    }

    /// Replace the verbosity threshold for subsequent calls
    pub fn set_verbosity(&self, level: LogLevel) -> Result<()> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(Error::Closed);
        }
        inner.verbosity = level;
        Ok(())
    }

    /// Parse `level` (e.g. `"warn"`) and make it the threshold
    pub fn set_verbosity_str(&self, level: &str) -> Result<()> {
        self.set_verbosity(level.parse()?)
    }

    /// Path of the log file currently written, if a file sink is open
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.lock()
            .sinks
            .iter()
            .find_map(|sink| sink.path().map(|p| p.to_path_buf()))
    }

    /// Flush every sink
    pub fn flush(&self) -> Result<()> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(Error::Closed);
        }

        let mut first_err = None;
        for sink in inner.sinks.iter_mut() {
            if let Err(e) = sink.flush() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Close every sink in registration order
    ///
    /// All sinks are closed even if one fails; the first failure is returned
    /// as `Error::Close`. Afterwards the logger rejects further use with
    /// `Error::Closed`. Closing twice is a no-op.
    pub fn close(&self) -> Result<()> {
        let mut inner = self.lock();
        if inner.closed {
            return Ok(());
        }
        inner.closed = true;

        let mut first_err = None;
        for sink in inner.sinks.iter_mut() {
            if let Err(e) = sink.close() {
                tracing::warn!("Failed to close {:?} sink: {}", sink.kind(), e);
                first_err.get_or_insert(e);
            }
        }
        inner.sinks.clear();

        match first_err {
            Some(e) => Err(Error::Close(Box::new(e))),
            None => Ok(()),
        }
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (verbosity, kinds, closed) = {
            let inner = self.lock();
            let kinds: Vec<_> = inner.sinks.iter().map(|s| s.kind()).collect();
            (inner.verbosity, kinds, inner.closed)
        };
        f.debug_struct("Logger")
            .field("verbosity", &verbosity)
            .field("sinks", &kinds)
            .field("closed", &closed)
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("Error closing logger on drop: {}", e);
        }
    }
}
