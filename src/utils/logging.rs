//! Conditional logging macros that check a module-level `ENABLE_LOGS` flag.
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//! use crate::{log_info, log_warn, log_error};
//!
//! log_info!("fitted {} centroids", count);
//! ```

/// Info logging, skipped when the calling module sets `ENABLE_LOGS = false`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn logging, skipped when the calling module sets `ENABLE_LOGS = false`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Error logging, skipped when the calling module sets `ENABLE_LOGS = false`.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}

/// Debug logging, skipped when the calling module sets `ENABLE_LOGS = false`.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}
