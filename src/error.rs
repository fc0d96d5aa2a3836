//! Error types for the admin client core.

/// Fallback shown when the server gives us nothing usable.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Top-level error type for the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from the HTTP/API layer.
///
/// `Unauthorized`, `SessionExpired`, and `RateLimited` are distinct because
/// the interceptor treats them differently: only a plain `Unauthorized` on a
/// first attempt with a real token enters the refresh path.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Http(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Session expired, re-authentication required")]
    SessionExpired,

    #[error("Rate limited")]
    RateLimited,

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether this is a 5xx-class server failure.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { status, .. } if *status >= 500)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Onboarding flow errors.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Cannot advance from step {step}: {reason}")]
    InvalidTransition { step: String, reason: String },

    #[error("Step {step} requires a payload: {missing}")]
    MissingPayload { step: String, missing: String },

    #[error("Unknown subscription plan: {0}")]
    UnknownPlan(String),
}

/// Extract a user-facing message from a server error body.
///
/// Prefers the JSON `message` field (a string, or the first element of an
/// array of strings — both shapes occur in the wild), falling back to
/// [`GENERIC_ERROR_MESSAGE`].
pub fn server_message(body: &serde_json::Value) -> String {
    match body.get("message") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .find_map(|v| v.as_str())
            .unwrap_or(GENERIC_ERROR_MESSAGE)
            .to_string(),
        _ => GENERIC_ERROR_MESSAGE.to_string(),
    }
}

/// Result type alias for the client.
pub type Result<T> = std::result::Result<T, Error>;
