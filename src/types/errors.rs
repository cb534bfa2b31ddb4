use thiserror::Error;

// === StoreError ===

/// Errors raised by a durable key-value slot store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused the write because it is full.
    #[error("Storage quota exceeded for key: {0}")]
    QuotaExceeded(String),
    /// The store cannot be used in this environment.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    /// An I/O error occurred while reading or writing a slot.
    #[error("Storage I/O error: {0}")]
    Io(String),
    /// A slot could not be (de)serialized.
    #[error("Storage serialization error: {0}")]
    Serialization(String),
}

// === DocumentError ===

/// Errors related to markdown document operations.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Document with the given ID was not found.
    #[error("Markdown not found: {0}")]
    NotFound(String),
    /// Document content is missing or empty.
    #[error("Content is required")]
    MissingContent,
    /// Database operation failed.
    #[error("Markdown database error: {0}")]
    Database(#[from] rusqlite::Error),
}

// === GroupError ===

/// Errors related to shared group operations.
#[derive(Debug, Error)]
pub enum GroupError {
    /// Group with the given ID was not found.
    #[error("Group not found: {0}")]
    NotFound(String),
    /// Group title is missing or empty.
    #[error("Title is required")]
    MissingTitle,
    /// Database operation failed.
    #[error("Group database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Loading the referenced documents failed.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

// === VisitorError ===

/// Errors related to visitor identity operations.
#[derive(Debug, Error)]
pub enum VisitorError {
    /// Visitor with the given ID was not found.
    #[error("Visitor not found: {0}")]
    NotFound(String),
    /// Database operation failed.
    #[error("Visitor database error: {0}")]
    Database(#[from] rusqlite::Error),
}

// === CommentError ===

/// Errors related to comment operations.
#[derive(Debug, Error)]
pub enum CommentError {
    /// Content or visitor id was not supplied.
    #[error("Content and visitorId are required")]
    MissingField,
    /// The commenting visitor does not exist.
    #[error("Visitor not found: {0}")]
    VisitorNotFound(String),
    /// The commented document does not exist.
    #[error("Markdown not found: {0}")]
    MarkdownNotFound(String),
    /// Database operation failed.
    #[error("Comment database error: {0}")]
    Database(#[from] rusqlite::Error),
}

// === ReactionError ===

/// Errors related to reaction operations.
#[derive(Debug, Error)]
pub enum ReactionError {
    /// Visitor id was not supplied.
    #[error("VisitorId is required")]
    MissingVisitor,
    /// The reaction type is not one of the supported kinds.
    #[error("Invalid reaction type: {0}")]
    InvalidType(String),
    /// The reacting visitor does not exist.
    #[error("Visitor not found: {0}")]
    VisitorNotFound(String),
    /// The target document does not exist.
    #[error("Markdown not found: {0}")]
    MarkdownNotFound(String),
    /// Database operation failed.
    #[error("Reaction database error: {0}")]
    Database(#[from] rusqlite::Error),
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// An environment override carries an unusable value.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === ClientError ===

/// Errors returned by the HTTP API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with an error envelope.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// The server answered successfully but without a payload.
    #[error("Empty response from {0}")]
    EmptyResponse(String),
    /// A local file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// An operation needs a resolved visitor identity first.
    #[error("No visitor identity resolved")]
    NoVisitor,
}

impl ClientError {
    /// Returns the HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
