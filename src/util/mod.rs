//! Small helpers shared by the feed and admin layers.
//!
//! - **Store location**: normalizes a store's configured URL into the
//!   non-secure base that product and picture URLs are built from

mod store_url;

pub use store_url::{store_location, StoreUrlError};
