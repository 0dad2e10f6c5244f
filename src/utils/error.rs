use thiserror::Error;

/// 實體自身檢查失敗時回傳的錯誤
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Illegal vote: {reason}")]
    IllegalVote { reason: String },

    #[error("Illegal user: {message}")]
    IllegalUser { message: String },
}

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("{message}")]
    IllegalUser { message: String },

    #[error("Users not found: {}", .usernames.join(", "))]
    UserNotFound { usernames: Vec<String> },

    #[error("Meeting not found: {id}")]
    MeetingNotFound { id: String },

    #[error("Forbidden operation: {source}")]
    ForbiddenOperation {
        #[source]
        source: DomainError,
    },

    #[error("Password does not match")]
    InvalidPassword,

    #[error("Validation error in '{field}': {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHashError(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    HashTaskError(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Conflict,
    NotFound,
    Forbidden,
    Credentials,
    Validation,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SchedulerError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IllegalUser { .. } => ErrorCategory::Conflict,
            Self::UserNotFound { .. } | Self::MeetingNotFound { .. } => ErrorCategory::NotFound,
            Self::ForbiddenOperation { .. } => ErrorCategory::Forbidden,
            Self::InvalidPassword => ErrorCategory::Credentials,
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_)
            | Self::SerializationError(_)
            | Self::PasswordHashError(_)
            | Self::HashTaskError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Conflict
            | ErrorCategory::NotFound
            | ErrorCategory::Forbidden
            | ErrorCategory::Credentials => ErrorSeverity::Low,
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 對應的 HTTP 狀態碼，供網頁層使用
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UserNotFound { .. } | Self::MeetingNotFound { .. } => 404,
            Self::IllegalUser { .. } => 409,
            Self::ValidationError { .. } => 422,
            Self::ForbiddenOperation { .. } => 403,
            Self::InvalidPassword => 401,
            _ => 500,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::IllegalUser { .. } => "Choose a different username or email".to_string(),
            Self::UserNotFound { usernames } => {
                format!("Register these users first: {}", usernames.join(", "))
            }
            Self::MeetingNotFound { .. } => "Check the meeting id".to_string(),
            Self::ForbiddenOperation { .. } => {
                "Only attendees may vote and only the organizer may open or close voting"
                    .to_string()
            }
            Self::InvalidPassword => "Check the password and try again".to_string(),
            Self::ValidationError { field, .. } => format!("Fix the value of '{}'", field),
            Self::ConfigError { .. } => "Check the scenario file and CLI flags".to_string(),
            Self::IoError(_) => "Check file paths and permissions".to_string(),
            Self::SerializationError(_) => "Check the input data format".to_string(),
            Self::PasswordHashError(_) => "Check the bcrypt cost setting".to_string(),
            Self::HashTaskError(_) => "Retry the request".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Conflict => format!("Already taken: {}", self),
            ErrorCategory::NotFound => format!("Not found: {}", self),
            ErrorCategory::Forbidden => format!("Not allowed: {}", self),
            ErrorCategory::Credentials => "Invalid credentials".to_string(),
            ErrorCategory::Validation => format!("Invalid input: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("Internal error: {}", self),
        }
    }
}

impl From<DomainError> for SchedulerError {
    fn from(source: DomainError) -> Self {
        Self::ForbiddenOperation { source }
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
