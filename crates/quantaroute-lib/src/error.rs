use thiserror::Error;

/// Convenient result alias for the gateway library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level gateway error type.
///
/// The backend-facing variants (`Authentication`, `RateLimited`, `Backend`,
/// `Transport`) are produced only by [`crate::transport::classify_status`] and the
/// transports; both front-ends map them without re-inspecting status codes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// An input contract was violated. Raised before any backend call.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Raised when tool arguments are not a JSON object.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Neither the request nor the process configuration supplied an API key.
    #[error(
        "API key is required. Set QUANTAROUTE_API_KEY environment variable or provide x-api-key header"
    )]
    MissingCredential,

    /// Backend answered HTTP 401.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Backend answered HTTP 429.
    #[error("Rate limit exceeded: {message}")]
    RateLimited { message: String },

    /// Backend answered with any other non-success status.
    #[error("API error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// No response was received (connect failure, timeout, unreadable body).
    #[error("Request failed: {message}")]
    Transport { message: String },

    /// The operation is declared but switched off in the operation table.
    #[error(
        "The {operation} feature is not yet implemented in the backend API. \
         The endpoint {backend_path} needs to be implemented first. This feature is coming soon."
    )]
    NotImplemented {
        operation: &'static str,
        backend_path: &'static str,
    },

    /// Raised when an endpoint or tool name matches no operation.
    #[error("Unknown operation: {name}")]
    UnknownOperation { name: String },

    /// Raised at startup when configuration values cannot be used.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

/// Coarse error classification shared by metrics labels and transport mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    InvalidArguments,
    Authentication,
    RateLimited,
    Backend,
    Transport,
    NotImplemented,
    UnknownOperation,
    Configuration,
}

impl ErrorKind {
    /// Stable snake_case label.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::InvalidArguments => "invalid_arguments",
            ErrorKind::Authentication => "authentication",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Backend => "backend",
            ErrorKind::Transport => "transport",
            ErrorKind::NotImplemented => "not_implemented",
            ErrorKind::UnknownOperation => "unknown_operation",
            ErrorKind::Configuration => "configuration",
        }
    }
}

impl Error {
    /// Build a validation error for `field`.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::InvalidArguments(_) => ErrorKind::InvalidArguments,
            Error::MissingCredential | Error::Authentication { .. } => ErrorKind::Authentication,
            Error::RateLimited { .. } => ErrorKind::RateLimited,
            Error::Backend { .. } => ErrorKind::Backend,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::NotImplemented { .. } => ErrorKind::NotImplemented,
            Error::UnknownOperation { .. } => ErrorKind::UnknownOperation,
            Error::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Name of the offending input field for validation failures.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
