// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

use std::fmt;

pub const EXIT_CODE_USAGE: i32 = 2;
pub const EXIT_CODE_OTHER: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    InvalidArgument,
    ExternalProcess,
    LocalError,
    InternalError,
}

impl ErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorType::InvalidArgument => "INVALID_ARGUMENT",
            ErrorType::ExternalProcess => "EXTERNAL_PROCESS",
            ErrorType::LocalError => "LOCAL_ERROR",
            ErrorType::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn default_exit_code(self) -> i32 {
        match self {
            ErrorType::InvalidArgument => EXIT_CODE_USAGE,
            _ => EXIT_CODE_OTHER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub kind: ErrorType,
    pub message: String,
    pub exit_code: i32,
}

impl AppError {
    pub fn new(kind: ErrorType, message: impl Into<String>) -> Self {
        let message = message.into();
        let exit_code = kind.default_exit_code();
        Self {
            kind,
            message,
            exit_code,
        }
    }

    pub fn with_exit_code(kind: ErrorType, message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            kind,
            message: message.into(),
            exit_code,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorType::InvalidArgument, message)
    }

    pub fn external_process(message: impl Into<String>) -> Self {
        Self::new(ErrorType::ExternalProcess, message)
    }

    pub fn local_error(message: impl Into<String>) -> Self {
        Self::new(ErrorType::LocalError, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorType::InternalError, message)
    }

    pub fn is_usage(&self) -> bool {
        self.kind == ErrorType::InvalidArgument
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

/// Exit code for an error bubbling out of `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(app) => app.exit_code,
        None => EXIT_CODE_OTHER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_exit_with_code_two() {
        let err = AppError::invalid_argument("empty script");
        assert_eq!(err.exit_code, EXIT_CODE_USAGE);
        assert!(err.is_usage());
        assert_eq!(err.kind.as_str(), "INVALID_ARGUMENT");
    }

    #[test]
    fn exit_code_for_downcasts_app_errors() {
        let err: anyhow::Error =
            AppError::with_exit_code(ErrorType::ExternalProcess, "sbatch failed", 7).into();
        assert_eq!(exit_code_for(&err), 7);

        let other = anyhow::anyhow!("boom");
        assert_eq!(exit_code_for(&other), EXIT_CODE_OTHER);
    }
}
