//! Error types for the shopchat core library.
//!
//! Uses `thiserror` for public API error types with structured error variants
//! covering catalog loading, completion calls, configuration, and sessions.

use std::path::PathBuf;

/// Top-level error type for the shopchat core library.
#[derive(Debug, thiserror::Error)]
pub enum ShopChatError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),
}

/// Errors from loading the product catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog file not found at {path}")]
    Unavailable { path: PathBuf },

    #[error("Catalog is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("Malformed catalog row at line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from completion provider interactions.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// Errors from decoding a session cookie.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session cookie is malformed")]
    Malformed,

    #[error("Session signature mismatch")]
    BadSignature,

    #[error("Session payload could not be decoded: {message}")]
    Payload { message: String },
}

/// A type alias for results using the top-level `ShopChatError`.
pub type Result<T> = std::result::Result<T, ShopChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_catalog_unavailable() {
        let err = ShopChatError::Catalog(CatalogError::Unavailable {
            path: PathBuf::from("/srv/sample_data.csv"),
        });
        assert_eq!(
            err.to_string(),
            "Catalog error: Catalog file not found at /srv/sample_data.csv"
        );
    }

    #[test]
    fn test_error_display_llm() {
        let err = ShopChatError::Llm(LlmError::ApiRequest {
            message: "connection refused".into(),
        });
        assert_eq!(
            err.to_string(),
            "LLM error: API request failed: connection refused"
        );
    }

    #[test]
    fn test_error_display_missing_column() {
        let err = CatalogError::MissingColumn {
            column: "price".into(),
        };
        assert_eq!(err.to_string(), "Catalog is missing required column 'price'");
    }

    #[test]
    fn test_catalog_io_error_wraps() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ShopChatError = CatalogError::from(io_err).into();
        assert!(matches!(err, ShopChatError::Catalog(CatalogError::Io(_))));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_session() {
        let err: ShopChatError = SessionError::BadSignature.into();
        assert_eq!(err.to_string(), "Session error: Session signature mismatch");
    }

    #[test]
    fn test_llm_rate_limited_display() {
        let err = LlmError::RateLimited {
            retry_after_secs: 20,
        };
        assert_eq!(err.to_string(), "Rate limited by provider, retry after 20s");
    }
}
