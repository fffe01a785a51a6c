// masked-fastmail/src/output.rs
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::io::IsTerminal;

/// Output format option
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable on a terminal, JSON otherwise
    Auto,
    /// Force JSON output
    Json,
    /// Force human-readable output
    Human,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        match self {
            Self::Json => true,
            Self::Human => false,
            Self::Auto => !std::io::stdout().is_terminal(),
        }
    }
}

/// Trait for types that can be formatted for output
pub trait Formattable {
    /// Format as JSON string
    fn to_json(&self) -> String;

    /// Format as human-readable string
    fn to_human(&self) -> String;
}

/// Format output based on the specified format
pub fn format_output<T: Formattable>(data: &T, format: OutputFormat) -> String {
    if format.is_json() {
        data.to_json()
    } else {
        data.to_human()
    }
}

/// Standard JSON response envelope
#[derive(Debug, Serialize)]
pub struct Response<T> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorResponse>,
}

impl<T: Serialize> Response<T> {
    pub fn ok(result: T) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"ok":false,"error":{{"type":"internal","message":"{}"}}}}"#, e)
        })
    }
}

impl Response<()> {
    pub fn error(error: ErrorResponse) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    type_: &'static str,
    message: String,
    retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn not_found(message: String) -> Self {
        Self {
            type_: "not_found",
            message,
            retryable: false,
            details: None,
        }
    }

    pub fn validation_failed(message: String) -> Self {
        Self {
            type_: "validation_failed",
            message,
            retryable: false,
            details: None,
        }
    }

    pub fn transport(message: String) -> Self {
        Self {
            type_: "transport_error",
            message,
            retryable: true,
            details: None,
        }
    }

    pub fn api_error(message: String, details: Option<serde_json::Value>) -> Self {
        Self {
            type_: "api_error",
            message,
            retryable: false,
            details,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.retryable {
            ExitCode::TransientError
        } else {
            ExitCode::PermanentError
        }
    }
}

/// Exit codes for scripts driving the tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    TransientError = 1,
    PermanentError = 2,
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::TransientError => write!(f, "transient_error"),
            Self::PermanentError => write!(f, "permanent_error"),
        }
    }
}

impl ExitCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

/// Print a styled error message
pub fn print_error(message: &str) {
    let term = console::Term::stderr();
    let _ = term.write_line(&format!("{} {}", console::style("Error:").red(), message));
}

/// Print a styled warning message
pub fn print_warning(message: &str) {
    let term = console::Term::stderr();
    let _ = term.write_line(&format!("{} {}", console::style("Warning:").yellow(), message));
}
