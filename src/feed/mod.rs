//! Pazaruvaj feed generation.
//!
//! - `generator` walks the catalog and writes the `<shop><products>` document
//! - `fields` holds the per-product rules: name capitalization, category
//!   breadcrumb, description fallback, price formatting
//! - `export` places the feed under the web root
//! - `reader` reads a written feed back (used by `check`)
//!
//! # Example
//!
//! ```ignore
//! let generator = FeedGenerator::from_snapshot(&snapshot, &settings);
//! let path = feed_path(&config.web_root, &settings.feed_file_name)?;
//! let summary = generate_static_file(&generator, &store, &path)?;
//! ```

mod error;
mod export;
mod fields;
mod generator;
mod reader;

pub use error::FeedError;
pub use export::{feed_path, generate_static_file, store_file_name};
pub use fields::{
    capitalize_manufacturer_prefix, category_breadcrumb, format_price, image_element_name,
    product_description, title_case,
};
pub use generator::{FeedGenerator, FeedSummary};
pub use reader::{read_feed_file, read_identifiers};
