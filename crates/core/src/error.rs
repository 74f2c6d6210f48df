use thiserror::Error;

/// Failure taxonomy shared by all four request handlers.
///
/// Handlers never panic and never leak a raw provider/store error to the
/// transport layer; everything funnels through one of these variants so
/// callers can branch on `code()` instead of matching message text.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    #[error("User must be authenticated")]
    AuthenticationRequired,
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Transaction sync did not finish within {0} pages")]
    SyncOverflow(usize),
}

impl HandlerError {
    /// Stable machine-readable tag for the wire format.
    pub fn code(&self) -> &'static str {
        match self {
            HandlerError::AuthenticationRequired => "authentication_required",
            HandlerError::MissingParameter(_) => "missing_parameter",
            HandlerError::Provider(_) => "provider_error",
            HandlerError::Store(_) => "store_error",
            HandlerError::SyncOverflow(_) => "sync_overflow",
        }
    }
}
