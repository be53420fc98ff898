use std::collections::HashMap;

use super::types::{Category, Manufacturer, Picture, Product, Store};
use super::{
    CategoryDirectory, ManufacturerDirectory, PictureDirectory, ProductCatalog, StoreDirectory,
};

/// In-memory copy of the catalog tables the feed reads.
///
/// Association lists keep insertion order, so whoever fills the snapshot
/// decides the "first manufacturer" and picture order. The SQLite loader
/// inserts by `display_order, id`.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    stores: Vec<Store>,
    products: Vec<Product>,
    manufacturers: HashMap<i64, Manufacturer>,
    product_manufacturers: HashMap<i64, Vec<i64>>,
    pictures: HashMap<i64, Picture>,
    product_pictures: HashMap<i64, Vec<i64>>,
    categories: HashMap<i64, Category>,
    product_categories: HashMap<i64, Vec<i64>>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_store(&mut self, store: Store) -> &mut Self {
        self.stores.push(store);
        self.stores.sort_by_key(|s| s.id);
        self
    }

    /// Appends a product; iteration order is insertion order.
    pub fn add_product(&mut self, product: Product) -> &mut Self {
        self.products.push(product);
        self
    }

    pub fn add_manufacturer(&mut self, manufacturer: Manufacturer) -> &mut Self {
        self.manufacturers.insert(manufacturer.id, manufacturer);
        self
    }

    pub fn add_picture(&mut self, picture: Picture) -> &mut Self {
        self.pictures.insert(picture.id, picture);
        self
    }

    pub fn add_category(&mut self, category: Category) -> &mut Self {
        self.categories.insert(category.id, category);
        self
    }

    pub fn link_manufacturer(&mut self, product_id: i64, manufacturer_id: i64) -> &mut Self {
        self.product_manufacturers
            .entry(product_id)
            .or_default()
            .push(manufacturer_id);
        self
    }

    pub fn link_picture(&mut self, product_id: i64, picture_id: i64) -> &mut Self {
        self.product_pictures
            .entry(product_id)
            .or_default()
            .push(picture_id);
        self
    }

    pub fn link_category(&mut self, product_id: i64, category_id: i64) -> &mut Self {
        self.product_categories
            .entry(product_id)
            .or_default()
            .push(category_id);
        self
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}

impl ProductCatalog for CatalogSnapshot {
    fn products(&self) -> Vec<Product> {
        self.products.clone()
    }
}

impl ManufacturerDirectory for CatalogSnapshot {
    fn manufacturer_ids_for_product(&self, product_id: i64) -> Vec<i64> {
        self.product_manufacturers
            .get(&product_id)
            .cloned()
            .unwrap_or_default()
    }

    fn manufacturer_by_id(&self, manufacturer_id: i64) -> Option<Manufacturer> {
        self.manufacturers.get(&manufacturer_id).cloned()
    }
}

impl PictureDirectory for CatalogSnapshot {
    fn pictures_for_product(&self, product_id: i64) -> Vec<Picture> {
        self.product_pictures
            .get(&product_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.pictures.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl CategoryDirectory for CatalogSnapshot {
    fn category_ids_for_product(&self, product_id: i64) -> Vec<i64> {
        self.product_categories
            .get(&product_id)
            .cloned()
            .unwrap_or_default()
    }

    fn category_by_id(&self, category_id: i64) -> Option<Category> {
        self.categories.get(&category_id).cloned()
    }
}

impl StoreDirectory for CatalogSnapshot {
    fn store_by_id(&self, store_id: i64) -> Option<Store> {
        self.stores.iter().find(|s| s.id == store_id).cloned()
    }

    fn all_stores(&self) -> Vec<Store> {
        self.stores.clone()
    }
}
