//! Rotating file sink
//!
//! Every `init` starts a new numbered file in the log directory, applying the
//! retention rules in [`super::retention`] first.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::retention::prepare_log_file;
use super::{Sink, SinkKind};

enum State {
    Uninitialized,
    Open { writer: BufWriter<File>, path: PathBuf },
    Closed,
}

/// Sink writing to `{directory}/{base_name}.{n}.log`
pub struct RotatingFileSink {
    directory: PathBuf,
    base_name: String,
    max_files: usize,
    state: State,
}

impl RotatingFileSink {
    /// Create an uninitialized sink; nothing touches the disk until `init`
    pub fn new(directory: impl Into<PathBuf>, base_name: impl Into<String>, max_files: usize) -> Self {
        Self {
            directory: directory.into(),
            base_name: base_name.into(),
            max_files,
            state: State::Uninitialized,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    fn writer(&mut self) -> Result<&mut BufWriter<File>> {
        match &mut self.state {
            State::Open { writer, .. } => Ok(writer),
            State::Uninitialized => Err(Error::NotOpen),
            State::Closed => Err(Error::Closed),
        }
    }
}

impl std::fmt::Debug for RotatingFileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            State::Uninitialized => "uninitialized",
            State::Open { .. } => "open",
            State::Closed => "closed",
        };
        f.debug_struct("RotatingFileSink")
            .field("directory", &self.directory)
            .field("base_name", &self.base_name)
            .field("max_files", &self.max_files)
            .field("state", &state)
            .finish()
    }
}

impl Sink for RotatingFileSink {
    fn kind(&self) -> SinkKind {
        SinkKind::RotatingFile
    }

    fn init(&mut self) -> Result<()> {
        match self.state {
            State::Uninitialized => {}
            State::Open { .. } => return Ok(()),
            State::Closed => return Err(Error::Closed),
        }

        let report = prepare_log_file(&self.directory, &self.base_name, self.max_files)?;
        if !report.removed.is_empty() {
            tracing::debug!(
                "Removed {} old log file(s) from {}",
                report.removed.len(),
                self.directory.display()
            );
        }

        // create_new: a concurrent logger that picked the same number makes this fail
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&report.path)
            .map_err(|e| {
                Error::io(format!("Failed to open log file {}", report.path.display()), e)
            })?;

        tracing::debug!("Logging to {}", report.path.display());
        self.state = State::Open {
            writer: BufWriter::new(file),
            path: report.path,
        };
        Ok(())
    }

    fn write(&mut self, line: &str) -> Result<()> {
        let writer = self.writer()?;
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.write_all(b"\n"))
            .map_err(|e| Error::io("Failed to write to log file", e))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer()?
            .flush()
            .map_err(|e| Error::io("Failed to flush log file", e))
    }

    fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Open { writer, path } => {
                let file = writer.into_inner().map_err(|e| {
                    Error::io(format!("Failed to flush {}", path.display()), e.into_error())
                })?;
                file.sync_all()
                    .map_err(|e| Error::io(format!("Failed to close {}", path.display()), e))
            }
            // Closing twice, or closing a never-opened sink, is a no-op
            State::Uninitialized | State::Closed => Ok(()),
        }
    }

    fn path(&self) -> Option<&Path> {
        match &self.state {
            State::Open { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_first_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = RotatingFileSink::new(temp_dir.path(), "app", 0);

        sink.init().unwrap();

        let expected = temp_dir.path().join("app.0.log");
        assert_eq!(sink.path(), Some(expected.as_path()));
        assert!(expected.exists());
    }

    #[test]
    fn test_init_skips_directory_with_log_name() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("app.0.log")).unwrap();
        let mut sink = RotatingFileSink::new(temp_dir.path(), "app", 1);

        sink.init().unwrap();

        let expected = temp_dir.path().join("app.1.log");
        assert_eq!(sink.path(), Some(expected.as_path()));
        assert!(expected.is_file());
    }

    #[test]
    fn test_lines_written_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = RotatingFileSink::new(temp_dir.path(), "app", 0);
        sink.init().unwrap();

        for i in 0..10 {
            sink.write(&format!("line {}", i)).unwrap();
        }
        let path = sink.path().unwrap().to_path_buf();
        sink.close().unwrap();

        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "line 0");
        assert_eq!(lines[9], "line 9");
    }

    #[test]
    fn test_each_init_rotates_to_next_file() {
        let temp_dir = TempDir::new().unwrap();

        for expected in 0..4 {
            let mut sink = RotatingFileSink::new(temp_dir.path(), "app", 3);
            sink.init().unwrap();
            let name = sink.path().unwrap().file_name().unwrap().to_owned();
            assert_eq!(name.to_str().unwrap(), format!("app.{}.log", expected));
            sink.close().unwrap();
        }

        let count = fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(count, 3);
        assert!(!temp_dir.path().join("app.0.log").exists());
    }

    #[test]
    fn test_init_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = RotatingFileSink::new(temp_dir.path().join("missing"), "app", 0);

        assert!(matches!(sink.init(), Err(Error::PathNotFound { .. })));
        assert!(sink.path().is_none());
    }

    #[test]
    fn test_write_before_init() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = RotatingFileSink::new(temp_dir.path(), "app", 0);

        assert!(matches!(sink.write("early"), Err(Error::NotOpen)));
    }

    #[test]
    fn test_closed_is_terminal() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = RotatingFileSink::new(temp_dir.path(), "app", 0);
        sink.init().unwrap();
        sink.close().unwrap();

        // Second close is a no-op
        sink.close().unwrap();
        assert!(matches!(sink.write("late"), Err(Error::Closed)));
        assert!(matches!(sink.init(), Err(Error::Closed)));
        assert!(sink.path().is_none());
    }

    #[test]
    fn test_flush_makes_lines_visible() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = RotatingFileSink::new(temp_dir.path(), "app", 0);
        sink.init().unwrap();

        sink.write("buffered").unwrap();
        sink.flush().unwrap();

        let content = fs::read_to_string(sink.path().unwrap()).unwrap();
        assert_eq!(content, "buffered\n");
    }
}
