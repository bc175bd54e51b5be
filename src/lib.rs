//! rotalog - leveled logging to the console and to rotating log files
//!
//! A [`Logger`] owns an ordered set of sinks (console, then a numbered log
//! file) and a verbosity threshold. Each new logger starts a fresh
//! `{base_name}.{n}.log` file, deleting the oldest files of the same family
//! when a retention cap is configured.

mod macros;

pub mod config;
pub mod error;
pub mod level;
pub mod logger;
pub mod record;
pub mod sink;

pub use config::LoggerConfig;
pub use error::{Error, Result};
pub use level::LogLevel;
pub use logger::Logger;
pub use record::{CallSite, LogRecord};
pub use sink::{Sink, SinkConfig, SinkKind};
