//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`CatalogueError`], [`ConfigError`]), while CLI/main uses `anyhow`
//! for convenient error propagation.
//!
//! [`CatalogueError`]: crate::catalogue::CatalogueError
//! [`ConfigError`]: crate::config::ConfigError

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Catalogue or service directory failure
    #[error("Catalogue error: {0}")]
    Catalogue(#[from] crate::catalogue::CatalogueError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Whether this is (or wraps) a "nothing found" outcome.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Catalogue(e) => e.is_not_found(),
            Error::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, crate::catalogue::CatalogueError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Catalogue(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, crate::config::ConfigError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Config(e).context(ctx))
    }
}
