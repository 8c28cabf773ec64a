//! FILENAME: model/src/logging.rs
// PURPOSE: Category-tagged logging macros over the `log` facade.
// The category becomes the log target, e.g. "FILTER" or "STORE".
// No logger is installed here; the host application picks one.

pub use log::Level;

/// Write a log line under a category. Skips formatting when the level is off.
pub fn write_log(level: log::Level, category: &str, message: std::fmt::Arguments<'_>) {
    if log::log_enabled!(target: category, level) {
        log::log!(target: category, level, "{}", message);
    }
}

#[macro_export]
macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Debug, $cat, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Info, $cat, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Warn, $cat, format_args!($($arg)*))
    };
}
