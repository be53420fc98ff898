//! Read-only views of the host catalog.
//!
//! The feed generator never talks to a database directly. It receives the
//! query traits below, each mirroring one catalog service: products,
//! manufacturers, pictures, categories and stores. [`CatalogSnapshot`]
//! implements all of them over data loaded up front.

mod pictures;
mod snapshot;
mod types;

pub use pictures::{default_picture_url, picture_url};
pub use snapshot::CatalogSnapshot;
pub use types::{Category, Manufacturer, Picture, Product, Store};

/// Product query.
pub trait ProductCatalog {
    /// All products in the catalog's native order.
    fn products(&self) -> Vec<Product>;
}

/// Manufacturer associations and lookup.
pub trait ManufacturerDirectory {
    /// Manufacturer ids linked to a product, in association order.
    fn manufacturer_ids_for_product(&self, product_id: i64) -> Vec<i64>;

    fn manufacturer_by_id(&self, manufacturer_id: i64) -> Option<Manufacturer>;
}

/// Picture associations and URL resolution.
pub trait PictureDirectory {
    /// Pictures linked to a product, in display order.
    fn pictures_for_product(&self, product_id: i64) -> Vec<Picture>;

    /// Absolute URL of `picture` under `store_location`.
    fn picture_url(&self, picture: &Picture, store_location: &str) -> String {
        picture_url(picture, store_location)
    }

    /// Placeholder URL for products without pictures.
    fn default_picture_url(&self, store_location: &str) -> String {
        default_picture_url(store_location)
    }
}

/// Category associations and lookup.
pub trait CategoryDirectory {
    /// Category ids linked to a product, in association order.
    fn category_ids_for_product(&self, product_id: i64) -> Vec<i64>;

    fn category_by_id(&self, category_id: i64) -> Option<Category>;
}

/// Store lookup.
pub trait StoreDirectory {
    fn store_by_id(&self, store_id: i64) -> Option<Store>;

    /// Every store, ordered by id.
    fn all_stores(&self) -> Vec<Store>;
}
