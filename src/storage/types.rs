use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The database file is locked by another process
    #[error("The catalog database is locked by another process. Please try again.")]
    Locked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_error(&err.to_string()) {
            return DatabaseError::Locked;
        }
        DatabaseError::Other(err)
    }
}

/// SQLITE_BUSY / SQLITE_LOCKED surface only through the message text.
pub(crate) fn is_lock_error(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("sqlite_busy")
        || message.contains("sqlite_locked")
}

// ============================================================================
// Row Types
// ============================================================================

/// `(id, name, price, stock_quantity, published, short_description, full_description)`
pub(crate) type ProductRow = (
    i64,
    String,
    String,
    i64,
    bool,
    Option<String>,
    Option<String>,
);

/// `(id, mime_type, seo_filename)`
pub(crate) type PictureRow = (i64, String, Option<String>);

/// `(product_id, linked_id)` ordered by display order
pub(crate) type LinkRow = (i64, i64);
