use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// The rate limiter needs the peer address but the connection did not carry one.
    ///
    /// Happens when the router is served without `into_make_service_with_connect_info`.
    /// Results in a 500 Internal Server Error.
    #[error("Client address unavailable for rate limiting")]
    MissingClientAddress,

    /// A stored column could not be decoded into its domain type.
    #[error("Failed to decode {column}: {reason}")]
    Decode {
        /// Column that held the bad value
        column: &'static str,
        /// Decoder message
        reason: String,
    },

    /// Password hashing or verification failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// A blocking helper task could not be joined.
    #[error("Blocking task failed: {0}")]
    BlockingTask(#[from] tokio::task::JoinError),
}
