//! Unified error interface for HFM.
//!
//! Every error type in the workspace implements [`ErrorCode`] so that
//! callers can branch on a stable machine-readable code and decide
//! whether rebuilding and re-running a program is worthwhile.
//!
//! # Example
//!
//! ```
//! use hfm_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum OvenError {
//!     Cold,
//!     Broken,
//! }
//!
//! impl ErrorCode for OvenError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Cold => "OVEN_COLD",
//!             Self::Broken => "OVEN_BROKEN",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Cold)
//!     }
//! }
//!
//! let err = OvenError::Cold;
//! assert_eq!(err.code(), "OVEN_COLD");
//! assert!(err.is_recoverable());
//! ```

/// Machine-readable error code interface.
///
/// # Code Format
///
/// - **UPPER_SNAKE_CASE**: e.g. `"EXECUTION_CANCELLED"`
/// - **Prefixed by layer**: `CONSTRUCTION_`, `INTERPRETER_`, `BINDING_`,
///   `EXECUTION_`, `CONFIG_`
/// - **Stable**: codes are part of the public contract
///
/// # Recoverability
///
/// An error is recoverable when rebuilding the program and running it
/// again may succeed (transient interpreter trouble). Invalid payloads,
/// missing bindings and exhausted budgets are not.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether a retry may succeed.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows HFM conventions.
///
/// # Panics
///
/// Panics if the code is empty, lacks `expected_prefix`, or is not
/// UPPER_SNAKE_CASE.
///
/// # Example
///
/// ```
/// use hfm_types::{ErrorCode, assert_error_code};
///
/// struct Burnt;
///
/// impl ErrorCode for Burnt {
///     fn code(&self) -> &'static str { "OVEN_BURNT" }
///     fn is_recoverable(&self) -> bool { false }
/// }
///
/// assert_error_code(&Burnt, "OVEN_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{}' must start with prefix '{}'",
        code,
        expected_prefix
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{}' must be UPPER_SNAKE_CASE",
        code
    );
}

/// Validates every error in `errors` with [`assert_error_code`].
///
/// Pass one value per enum variant to cover the whole type.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
