//! Log output destinations
//!
//! A sink receives already-rendered lines. Each sink goes through the same
//! lifecycle: constructed inert, `init`, any number of `write`s, then `close`.

mod console;
mod file_writer;
mod retention;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use console::ConsoleSink;
pub use file_writer::RotatingFileSink;
pub use retention::{extract_sequence, log_file_name, prepare_log_file, RotationReport};

/// Kind of a sink, used for display and for deciding init order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Console,
    RotatingFile,
    Custom,
}

/// A log output destination
pub trait Sink: Send {
    /// The kind of this sink
    fn kind(&self) -> SinkKind;

    /// Prepare the sink for writing (open files etc.)
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Write one rendered line; the sink adds the line terminator
    fn write(&mut self, line: &str) -> Result<()>;

    /// Push buffered output to the destination
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Flush and release resources
    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    /// Path of the file being written, for file-backed sinks
    fn path(&self) -> Option<&Path> {
        None
    }
}

/// Description of a sink to build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkConfig {
    /// Standard output
    Console,
    /// Numbered files `{base_name}.{n}.log` in `directory`
    RotatingFile {
        directory: PathBuf,
        base_name: String,
        /// Maximum number of files kept, 0 for unlimited
        max_files: usize,
    },
}

impl SinkConfig {
    /// Construct the (uninitialized) sink this config describes
    pub fn build(&self) -> Box<dyn Sink> {
        match self {
            SinkConfig::Console => Box::new(ConsoleSink::stdout()),
            SinkConfig::RotatingFile {
                directory,
                base_name,
                max_files,
            } => Box::new(RotatingFileSink::new(
                directory.clone(),
                base_name.clone(),
                *max_files,
            )),
        }
    }
}
