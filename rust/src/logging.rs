//! Verbosity-gated logging macros for the planner.
//!
//! Nothing is formatted when the configured verbosity is below the macro's level.
//! - 0: SILENT
//! - 1: PROGRESS (phase cuts, makespan, hospital deadline verdict)
//! - 2: DECISIONS (frontier picks, task dispatches)
//! - 3: TRACE (frontier pushes, tasks waiting on an energized endpoint)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_PROGRESS: u8 = 1;
pub const VERBOSITY_DECISIONS: u8 = 2;
pub const VERBOSITY_TRACE: u8 = 3;

/// Log at PROGRESS level (verbosity >= 1).
#[macro_export]
macro_rules! log_progress {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_PROGRESS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DECISIONS level (verbosity >= 2).
#[macro_export]
macro_rules! log_decisions {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DECISIONS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at TRACE level (verbosity >= 3).
#[macro_export]
macro_rules! log_trace {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_TRACE {
            eprintln!($($arg)*);
        }
    };
}
