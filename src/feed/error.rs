use thiserror::Error;

/// Errors raised while producing or reading a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Missing or unusable input, such as an unknown store id.
    #[error("Invalid feed input: {0}")]
    Validation(String),

    /// The output sink could not be opened or written.
    #[error("Failed to write feed: {0}")]
    Io(#[from] std::io::Error),

    /// XML encoding or decoding failed.
    #[error("XML error: {0}")]
    Xml(String),

    /// A collaborator the feed needs is unavailable (settings not installed,
    /// catalog cannot be loaded).
    #[error("Feed dependency unavailable: {0}")]
    Dependency(String),
}

impl From<quick_xml::Error> for FeedError {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(io) => {
                FeedError::Io(std::io::Error::new(io.kind(), io.to_string()))
            }
            other => FeedError::Xml(other.to_string()),
        }
    }
}
