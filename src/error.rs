use thiserror::Error;

/// Errors returned by banner store backends.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// No banner exists with the given id
    #[error("Banner not found: {id}")]
    NotFound { id: u64 },

    /// Another banner already owns the slug
    #[error("Slug already in use: {slug}")]
    SlugTaken { slug: String },

    /// Reading or writing the backing file failed
    #[error("Storage I/O error: {0}")]
    Io(String),

    /// The backing file exists but could not be decoded
    #[error("Corrupt banner data: {0}")]
    Corrupt(String),
}

/// Validation failures for an admin save request.
///
/// Messages are shown to the administrator as-is, so they are phrased as
/// instructions rather than diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Name or slug (or both) are empty after trimming
    #[error("Name and slug are required")]
    MissingNameOrSlug,

    /// Slug contains characters outside `[a-z0-9_-]`
    #[error("Slug must contain only lowercase letters, digits, '-' and '_': {0}")]
    InvalidSlug(String),

    /// The slide list is empty
    #[error("Please add at least one slide")]
    NoSlides,

    /// A slide has no image URL
    #[error("Slide {position} is missing an image")]
    SlideMissingImage { position: usize },

    /// The slides payload is not a JSON array of slides
    #[error("Invalid slides data: {0}")]
    InvalidSlides(String),

    /// The settings payload is not a JSON object of settings
    #[error("Invalid settings data: {0}")]
    InvalidSettings(String),
}

/// Errors surfaced by the admin RPC surface.
#[derive(Debug, Clone, Error)]
pub enum AdminError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Nonce(#[from] NonceError),
}

/// Admin anti-forgery token failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonceError {
    /// No token was sent
    Missing,

    /// Token is not `<expiry>.<hex signature>`
    Malformed,

    /// Token lifetime has passed
    Expired {
        /// When the token expired
        expired_at: u64,
        /// Current time
        current_time: u64,
    },

    /// Signature does not match
    Invalid,
}

impl std::fmt::Display for NonceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NonceError::Missing => write!(f, "Missing security token"),
            NonceError::Malformed => write!(f, "Malformed security token"),
            NonceError::Expired {
                expired_at,
                current_time,
            } => write!(
                f,
                "Security token expired at {} (current time: {})",
                expired_at, current_time
            ),
            NonceError::Invalid => write!(f, "Invalid security token"),
        }
    }
}

impl std::error::Error for NonceError {}
