//! Logging macros
//!
//! Each macro captures the call site (file, line, enclosing function) and
//! evaluates to the `Result<()>` returned by [`Logger::log`](crate::Logger::log).
//!
//! ```no_run
//! use rotalog::{LogLevel, Logger};
//!
//! let logger = Logger::init(None)?;
//! rotalog::info!(logger, "listening on port {}", 8080)?;
//! rotalog::log!(logger, LogLevel::Notice, "cache warmed")?;
//! logger.close()?;
//! # Ok::<(), rotalog::Error>(())
//! ```

/// Path of the enclosing function, e.g. `my_crate::server::run`
#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// [`CallSite`](crate::CallSite) of the macro invocation
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(file!(), line!(), $crate::__function_path!())
    };
}

/// Log at an explicit level
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, Some($crate::call_site!()), format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => { $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+) };
}

#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => { $crate::log!($logger, $crate::LogLevel::Alert, $($arg)+) };
}

#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => { $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+) };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => { $crate::log!($logger, $crate::LogLevel::Error, $($arg)+) };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => { $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+) };
}

#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => { $crate::log!($logger, $crate::LogLevel::Notice, $($arg)+) };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => { $crate::log!($logger, $crate::LogLevel::Info, $($arg)+) };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => { $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+) };
}

#[cfg(test)]
mod tests {
    use crate::sink::ConsoleSink;
    use crate::{LogLevel, Logger};
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

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

    fn output(shared: &Shared) -> String {
        String::from_utf8(shared.0.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn test_call_site_captures_location() {
        let site = crate::call_site!();
        assert_eq!(site.file_name(), "macros.rs");
        assert_eq!(site.function_name(), "test_call_site_captures_location");
        assert!(site.line > 0);
    }

    #[test]
    fn test_level_macros_render_call_site() {
        let shared = Shared::default();
        let logger = Logger::with_sinks(
            LogLevel::Debug,
            vec![Box::new(ConsoleSink::with_writer(shared.clone()))],
        )
        .unwrap();

        crate::error!(logger, "Message: {}, {}, {:.3}", "string", 42, 2.718281828).unwrap();
        crate::debug!(&logger, "plain").unwrap();
        crate::log!(logger, LogLevel::NotSet, "filtered").unwrap();

        let out = output(&shared);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[ERROR] {macros.rs:"));
        assert!(lines[0].ends_with("{test_level_macros_render_call_site()} Message: string, 42, 2.718"));
        assert!(lines[1].ends_with("plain"));
    }
}
