use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::error::FeedError;

/// Product identifiers of a generated feed, in document order.
///
/// Only the text of `<identifier>` elements is collected. quick-xml never
/// expands custom entities, so a hostile file cannot pull in external content.
///
/// # Errors
///
/// - [`FeedError::Xml`] if the document is malformed, has no `<shop>` root or
///   an identifier is not an integer
pub fn read_identifiers(xml: &str) -> Result<Vec<i64>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut identifiers = Vec::new();
    let mut saw_shop = false;
    let mut in_identifier = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"shop" => saw_shop = true,
            Event::Start(e) if e.name().as_ref() == b"identifier" => in_identifier = true,
            Event::End(e) if e.name().as_ref() == b"identifier" => in_identifier = false,
            Event::Text(text) if in_identifier => {
                let value = text
                    .unescape()
                    .map_err(|e| FeedError::Xml(e.to_string()))?;
                let id = value.trim().parse::<i64>().map_err(|_| {
                    FeedError::Xml(format!("identifier '{}' is not an integer", value))
                })?;
                identifiers.push(id);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_shop {
        return Err(FeedError::Xml("document has no <shop> root".to_string()));
    }

    Ok(identifiers)
}

/// Reads a feed file from disk and returns its product identifiers.
pub fn read_feed_file(path: &Path) -> Result<Vec<i64>, FeedError> {
    let content = std::fs::read_to_string(path)?;
    read_identifiers(&content)
}
