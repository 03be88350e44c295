use crate::core::notice::Lang;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("HTTP request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Backend rejected {operation} on {table} (status {status}): {message}")]
    BackendError {
        table: String,
        operation: String,
        status: u16,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed {table} record: {message}")]
    MalformedRecord { table: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Conflict: {message}")]
    ConflictError { message: String },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, DeskError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Transport,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DeskError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        DeskError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        DeskError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DeskError::ValidationError { .. } | DeskError::InvalidTransition { .. } => {
                ErrorCategory::Validation
            }
            DeskError::ConflictError { .. } => ErrorCategory::Conflict,
            DeskError::NotFound { .. } => ErrorCategory::NotFound,
            DeskError::TransportError(_) | DeskError::BackendError { .. } => {
                ErrorCategory::Transport
            }
            DeskError::SerializationError(_) | DeskError::MalformedRecord { .. } => {
                ErrorCategory::Data
            }
            DeskError::IoError(_)
            | DeskError::ConfigError { .. }
            | DeskError::InvalidConfigValueError { .. }
            | DeskError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Conflict | ErrorCategory::NotFound => {
                ErrorSeverity::Low
            }
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 給使用者看的訊息，不含後端細節
    pub fn user_friendly_message(&self, lang: Lang) -> String {
        match (self, lang) {
            (DeskError::ValidationError { .. }, Lang::En) => {
                "Please fill out all fields.".to_string()
            }
            (DeskError::ValidationError { .. }, Lang::Ta) => {
                "தயவுசெய்து அனைத்து விவரங்களையும் நிரப்பவும்.".to_string()
            }
            (DeskError::ConflictError { .. }, Lang::En) => {
                "This category is still being used by one or more quotes.".to_string()
            }
            (DeskError::ConflictError { .. }, Lang::Ta) => {
                "இந்த வகை இன்னும் ஒன்று அல்லது அதற்கு மேற்பட்ட மேற்கோள்களில் பயன்படுத்தப்படுகிறது."
                    .to_string()
            }
            (DeskError::NotFound { entity, .. }, Lang::En) => {
                format!("The requested {} no longer exists.", entity)
            }
            (DeskError::NotFound { .. }, Lang::Ta) => {
                "கோரப்பட்ட பதிவு இப்போது இல்லை.".to_string()
            }
            (DeskError::InvalidTransition { from, to }, Lang::En) => {
                format!("A {} quote cannot be moved to {}.", from, to)
            }
            (DeskError::InvalidTransition { .. }, Lang::Ta) => {
                "இந்த நிலை மாற்றம் அனுமதிக்கப்படவில்லை.".to_string()
            }
            (_, Lang::En) => format!("Something went wrong: {}", self),
            (_, Lang::Ta) => format!("ஏதோ தவறு நடந்தது: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Check the submitted fields and try again",
            ErrorCategory::Conflict => "Move or delete the quotes using this category first",
            ErrorCategory::NotFound => "Refresh the listing; the record may have been removed",
            ErrorCategory::Transport => "Check the backend URL and network, then retry the action",
            ErrorCategory::Data => "The backend schema may not match; inspect the offending rows",
            ErrorCategory::Configuration => "Fix the configuration file and restart",
        }
    }
}
