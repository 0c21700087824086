use thiserror::Error;

/// Game API client errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameApiError {
    /// The game ID provided is empty.
    #[error("Invalid game ID. It must not be empty.")]
    InvalidGameId,
    /// The private key provided is empty.
    #[error("Invalid private key. It must not be empty.")]
    InvalidPrivateKey,
    /// The API version must be 1 or higher.
    #[error("Invalid API version. Must be 1 or higher.")]
    InvalidApiVersion,

    /// A configuration value could not be read from the environment.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The transport failed to fetch the URL (IO error, connection refused,
    /// non-success HTTP status...).
    #[error("Failed to send a request to the game API: {0}")]
    Transport(String),

    /// The response header line did not report success.
    #[error("The game API rejected the request.")]
    RequestRejected,

    /// The response could not be decoded into the expected fields.
    #[error("Malformed game API response: {0}")]
    MalformedResponse(String),

    /// The operation needs a verified user and none is set.
    /// Raised before any network call is made.
    #[error("No verified user. Call verify_user() first.")]
    NotVerified,

    /// The requested entity does not exist, or the API refused to return it.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A decoded record does not carry the requested key.
    #[error("Record has no key \"{0}\".")]
    MissingKey(String),
}
