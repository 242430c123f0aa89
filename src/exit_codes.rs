/// Exit codes for htmlcheck
///
/// These exit codes let CI systems tell checker findings apart from failures
/// to run the checker at all.
/// Success - No error-severity findings
pub const SUCCESS: i32 = 0;

/// Errors found - The checker reported one or more error-severity findings
pub const ERRORS_FOUND: i32 = 1;

/// Tool error - Checker missing or crashed, unreadable output, settings or platform problem
pub const TOOL_ERROR: i32 = 2;

/// Helper functions for consistent exit behavior
pub mod exit {
    use super::{ERRORS_FOUND, SUCCESS, TOOL_ERROR};

    /// Exit with success code (0)
    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    /// Exit with errors found code (1)
    pub fn errors_found() -> ! {
        std::process::exit(ERRORS_FOUND);
    }

    /// Exit with tool error code (2)
    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
