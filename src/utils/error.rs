use thiserror::Error;

/// One field-level validation problem. Problems are collected, not
/// short-circuited, so a caller can surface all of them at once.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Quote assembly failed: {message}")]
    Assembly { message: String },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Document rendering failed: {message}")]
    Render { message: String },

    #[error("Document store unavailable: {message}")]
    Storage { message: String },

    #[error("Configuration error: {field}: {message}")]
    Config { field: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Assembly,
    Rendering,
    Storage,
    Configuration,
    System,
}

impl QuoteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            QuoteError::Validation(_) => ErrorCategory::Validation,
            QuoteError::Assembly { .. } | QuoteError::InvalidTransition { .. } => {
                ErrorCategory::Assembly
            }
            QuoteError::Render { .. } => ErrorCategory::Rendering,
            QuoteError::Storage { .. } => ErrorCategory::Storage,
            QuoteError::Config { .. } => ErrorCategory::Configuration,
            QuoteError::Io(_) | QuoteError::Serialization(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Recoverable by re-prompting the user.
            QuoteError::Validation(_) | QuoteError::Assembly { .. } => ErrorSeverity::Low,
            QuoteError::InvalidTransition { .. } => ErrorSeverity::Medium,
            // The cache degrades to render-fresh, so storage alone never fails a request.
            QuoteError::Storage { .. } => ErrorSeverity::Medium,
            QuoteError::Render { .. } | QuoteError::Config { .. } => ErrorSeverity::High,
            QuoteError::Io(_) | QuoteError::Serialization(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            QuoteError::Validation(errors) => format!(
                "Correct the listed fields and retry ({} problem(s))",
                errors.len()
            ),
            QuoteError::Assembly { .. } => {
                "Check that the estimate has at least one item and a positive total".to_string()
            }
            QuoteError::InvalidTransition { from, .. } => {
                format!("'{}' quotes cannot change status; create a new quote", from)
            }
            QuoteError::Render { .. } => {
                "Retry rendering or fall back to a pre-formatted contact message".to_string()
            }
            QuoteError::Storage { .. } => {
                "The document cache is unavailable; documents are rendered fresh".to_string()
            }
            QuoteError::Config { field, .. } => {
                format!("Fix the '{}' entry in the request file", field)
            }
            QuoteError::Io(_) => "Check file paths and permissions".to_string(),
            QuoteError::Serialization(_) => "Check the input file format".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            QuoteError::Validation(errors) => {
                let mut msg = String::from("The request could not be priced:");
                for e in errors {
                    msg.push_str(&format!("\n  - {}", e));
                }
                msg
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuoteError>;
