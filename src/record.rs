//! Log records and line rendering

use std::fmt::{self, Write};

use chrono::{DateTime, Utc};

use crate::level::LogLevel;

/// Size of the message buffer, in bytes, including one reserved byte
pub const MAX_LOG_LINE_LEN: usize = 1024;

/// Maximum number of message bytes kept in a rendered line
pub const MAX_MESSAGE_LEN: usize = MAX_LOG_LINE_LEN - 1;

/// Appended to a line whose message was cut at [`MAX_MESSAGE_LEN`]
pub const TRUNCATION_SUFFIX: &str = "... !!! WARNING !!! Message was truncated!";

/// Timestamp layout: sortable, millisecond precision, always UTC
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Where a log call was made from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub function: &'static str,
}

impl CallSite {
    pub fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// File name without its directory prefix
    pub fn file_name(&self) -> &'static str {
        self.file.rsplit(['/', '\\']).next().unwrap_or(self.file)
    }

    /// Last segment of the function path, ignoring closure frames
    pub fn function_name(&self) -> &'static str {
        let mut path = self.function;
        while let Some(outer) = path.strip_suffix("::{{closure}}") {
            path = outer;
        }
        path.rsplit("::").next().unwrap_or(path)
    }
}

/// A single log call, formatted once and shared by every sink
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// When the call was made
    pub timestamp: DateTime<Utc>,
    /// Severity
    pub level: LogLevel,
    /// Call site, if the caller supplied one
    pub call_site: Option<CallSite>,
    /// Message text, at most [`MAX_MESSAGE_LEN`] bytes
    pub message: String,
    /// Whether the message was cut to fit
    pub truncated: bool,
}

impl LogRecord {
    /// Format `args` into a bounded message stamped with the current time
    pub fn new(level: LogLevel, call_site: Option<CallSite>, args: fmt::Arguments<'_>) -> Self {
        Self::with_timestamp(Utc::now(), level, call_site, args)
    }

    pub fn with_timestamp(
        timestamp: DateTime<Utc>,
        level: LogLevel,
        call_site: Option<CallSite>,
        args: fmt::Arguments<'_>,
    ) -> Self {
        let mut buf = BoundedBuf::new(MAX_MESSAGE_LEN);
        // BoundedBuf never fails; a Display impl returning Err leaves what it wrote so far
        let _ = buf.write_fmt(args);

        Self {
            timestamp,
            level,
            call_site,
            message: buf.text,
            truncated: buf.truncated,
        }
    }

    /// Render the record as a single line, without the trailing newline
    pub fn render(&self) -> String {
        let mut line = String::with_capacity(self.message.len() + 96);
        let timestamp = self.timestamp.format(TIMESTAMP_FORMAT);

        // Writing into a String cannot fail
        let _ = match self.call_site {
            Some(site) => write!(
                line,
                "{} [{:<5}] {{{}:{}}} {{{}()}} {}",
                timestamp,
                self.level,
                site.file_name(),
                site.line,
                site.function_name(),
                self.message
            ),
            None => write!(
                line,
                "{} {}: {}",
                timestamp,
                self.level.as_str(),
                self.message
            ),
        };

        if self.truncated {
            line.push_str(TRUNCATION_SUFFIX);
        }
        line
    }
}

/// Accumulates formatted text up to a byte limit, cutting on a char boundary
struct BoundedBuf {
    text: String,
    limit: usize,
    truncated: bool,
}

impl BoundedBuf {
    fn new(limit: usize) -> Self {
        Self {
            text: String::new(),
            limit,
            truncated: false,
        }
    }
}

impl fmt::Write for BoundedBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }

        let room = self.limit - self.text.len();
        if s.len() <= room {
            self.text.push_str(s);
            return Ok(());
        }

        let mut cut = room;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.text.push_str(&s[..cut]);
        self.truncated = true;
        Ok(())
    }
}
