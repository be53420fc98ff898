use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use super::error::FeedError;
use super::generator::{FeedGenerator, FeedSummary};
use crate::catalog::Store;

/// Directory under the web root that serves exported files.
const EXPORT_DIR: [&str; 2] = ["files", "exportimport"];

/// Destination of a feed file: `<web_root>/files/exportimport/<file_name>`.
///
/// # Errors
///
/// Returns [`FeedError::Validation`] if `file_name` is empty or is not a
/// plain file name (contains a separator or `..`).
pub fn feed_path(web_root: &Path, file_name: &str) -> Result<PathBuf, FeedError> {
    let is_plain = !file_name.is_empty()
        && file_name != "."
        && file_name != ".."
        && !file_name.contains(['/', '\\']);
    if !is_plain {
        return Err(FeedError::Validation(format!(
            "feed file name '{}' must be a plain file name",
            file_name
        )));
    }

    let mut path = web_root.to_path_buf();
    path.extend(EXPORT_DIR);
    path.push(file_name);
    Ok(path)
}

/// Per-store variant of a feed file name: `pazaruvaj.xml` → `pazaruvaj_2.xml`.
pub fn store_file_name(file_name: &str, store_id: i64) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, store_id, ext),
        _ => format!("{}_{}", file_name, store_id),
    }
}

/// Generates the feed for `store` straight into the file at `path`.
///
/// Missing parent directories are created. The file is truncated and written
/// in place, so a failure halfway leaves a partial file behind. The handle is
/// closed on every return path.
pub fn generate_static_file(
    generator: &FeedGenerator<'_>,
    store: &Store,
    path: &Path,
) -> Result<FeedSummary, FeedError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    let summary = generator.generate(store, BufWriter::new(file))?;
    tracing::info!(path = %path.display(), store_id = store.id, "Feed file written");
    Ok(summary)
}
