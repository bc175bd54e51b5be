//! Console sink

use std::io::{self, Write};

use crate::error::{Error, Result};

use super::{Sink, SinkKind};

/// Writes each line to standard output, or to any injected writer
pub struct ConsoleSink {
    out: Box<dyn Write + Send>,
}

impl ConsoleSink {
    /// Sink writing to the process's standard output
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Sink writing to `out` instead of stdout
    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self { out: Box::new(out) }
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink").finish_non_exhaustive()
    }
}

impl Sink for ConsoleSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Console
    }

    fn write(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line).map_err(|e| Error::io("Failed to write to console", e))
    }

    fn flush(&mut self) -> Result<()> {
        self.out
            .flush()
            .map_err(|e| Error::io("Failed to flush console", e))
    }

    fn close(&mut self) -> Result<()> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Writer sharing its bytes with the test
    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_console_lines_are_newline_terminated() {
        let shared = Shared::default();
        let mut sink = ConsoleSink::with_writer(shared.clone());

        sink.init().unwrap();
        sink.write("first").unwrap();
        sink.write("second").unwrap();
        sink.close().unwrap();

        let out = String::from_utf8(shared.0.lock().unwrap().clone()).unwrap();
        assert_eq!(out, "first\nsecond\n");
    }

    #[test]
    fn test_console_has_no_path() {
        assert!(ConsoleSink::stdout().path().is_none());
        assert_eq!(ConsoleSink::stdout().kind(), SinkKind::Console);
    }
}
