/// Custom error type for gogs_build_hook operations
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("missing or empty X-Gogs-Event header")]
    MissingEvent,

    #[error("missing or empty X-Gogs-Delivery header")]
    MissingDeliveryId,

    #[error("failed to read request body: {0}")]
    BodyRead(String),

    #[error("failed to decode push payload: {0}")]
    PayloadDecode(#[from] serde_json::Error),

    #[error("payload secret does not match the configured secret")]
    AuthenticationFailed,

    #[error("push event contains no commits")]
    NoCommits,

    #[error("build failed: {0}")]
    BuildFailure(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Helper type for Results that use HookError
pub type Result<T> = std::result::Result<T, HookError>;
