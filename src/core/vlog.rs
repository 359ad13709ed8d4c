//! A verbosity log for controlled output logging.
//! This will log any log messages that are less than or equal to the logging level.
//! Log level 0 is considered off and can not be logged to.
//! This always logs at the info level of logging using the log crate.
use std::sync::atomic::{AtomicUsize, Ordering};

static LOG_LEVEL: AtomicUsize = AtomicUsize::new(0);

/// Logs to the Verbosity Log at the given level.
macro_rules! vlog {
    ($level: expr, $($arg:tt)*) => {
        if $level > 0 && $level <= $crate::core::vlog::get_log_level() {
            info!($($arg)*);
        }
    };
}

pub fn set_log_level(level: usize) {
    LOG_LEVEL.store(level, Ordering::Relaxed);
}

pub fn get_log_level() -> usize {
    LOG_LEVEL.load(Ordering::Relaxed)
}
