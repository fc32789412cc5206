//! Exit codes for the lsr-core CLI.
//!
//! Exit code ranges:
//! - 0-1: Operational outcomes (parse outcome from code, not output)
//! - 10-19: User/input errors (recoverable by user action)
//! - 20-29: Internal and I/O errors

use lsr_common::Error;

/// Exit codes for lsr-core commands.
///
/// These codes are a stable contract for scripts driving the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Report generated (or command completed)
    Clean = 0,

    /// Report body is empty because a lower-level selection is missing
    IncompleteSelection = 1,

    /// Invalid arguments or findings input
    ArgsError = 10,

    /// Process type missing or unrecognized
    MissingSelection = 11,

    /// Settings file could not be loaded or failed validation
    ConfigError = 12,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error (reading findings, writing the export)
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Check if this exit code is a user/input error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Error code name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::IncompleteSelection => "OK_INCOMPLETE",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::MissingSelection => "ERR_MISSING_SELECTION",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::MissingRequiredSelection { .. } => ExitCode::MissingSelection,
            Error::UnknownField(_)
            | Error::InvalidAssignment(_)
            | Error::DerivedField(_)
            | Error::Json(_) => ExitCode::ArgsError,
            Error::Config(_) => ExitCode::ConfigError,
            Error::EmptyReport => ExitCode::ArgsError,
            Error::Io(_) => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let missing = Error::MissingRequiredSelection {
            field: "process-type",
            found: None,
        };
        assert_eq!(ExitCode::from(&missing), ExitCode::MissingSelection);
        assert_eq!(ExitCode::from(&missing).as_i32(), 11);
        assert_eq!(
            ExitCode::from(&Error::UnknownField("cd99".into())),
            ExitCode::ArgsError
        );
        assert_eq!(
            ExitCode::from(&Error::Io(std::io::Error::other("disk full"))),
            ExitCode::IoError
        );
    }

    #[test]
    fn test_ranges() {
        assert!(ExitCode::Clean.is_success());
        assert!(!ExitCode::IncompleteSelection.is_success());
        assert!(ExitCode::MissingSelection.is_user_error());
        assert!(!ExitCode::IoError.is_user_error());
        assert_eq!(ExitCode::ConfigError.to_string(), "ERR_CONFIG (12)");
    }
}
