use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::schema::Database;
use super::types::{LinkRow, PictureRow, ProductRow};
use crate::catalog::{CatalogSnapshot, Category, Manufacturer, Picture, Product, Store};

impl Database {
    // ========================================================================
    // Catalog Snapshot
    // ========================================================================

    /// Read every table the feed needs into a [`CatalogSnapshot`].
    ///
    /// Deleted products, manufacturers and categories are left out, as are
    /// associations pointing at them. Products come back ordered by
    /// `display_order, id`; association lists by `display_order, id` per
    /// product.
    pub async fn load_catalog(&self) -> Result<CatalogSnapshot> {
        let mut snapshot = CatalogSnapshot::new();

        let stores: Vec<(i64, String, String)> =
            sqlx::query_as("SELECT id, name, url FROM store ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .context("Failed to load stores")?;
        for (id, name, url) in stores {
            snapshot.add_store(Store { id, name, url });
        }

        let products: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id, name, CAST(price AS TEXT), stock_quantity, published,
                   short_description, full_description
            FROM product
            WHERE deleted = 0
            ORDER BY display_order, id
        "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load products")?;
        for (id, name, price, stock_quantity, published, short_description, full_description) in
            products
        {
            let price = parse_price(&price)
                .with_context(|| format!("Product {} has an invalid price '{}'", id, price))?;
            snapshot.add_product(Product {
                id,
                name,
                price,
                stock_quantity,
                published,
                short_description,
                full_description,
            });
        }

        let manufacturers: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM manufacturer WHERE deleted = 0")
                .fetch_all(&self.pool)
                .await
                .context("Failed to load manufacturers")?;
        for (id, name) in manufacturers {
            snapshot.add_manufacturer(Manufacturer { id, name });
        }

        let links: Vec<LinkRow> = sqlx::query_as(
            r#"
            SELECT pm.product_id, pm.manufacturer_id
            FROM product_manufacturer pm
            JOIN manufacturer m ON m.id = pm.manufacturer_id
            WHERE m.deleted = 0
            ORDER BY pm.product_id, pm.display_order, pm.id
        "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load product manufacturers")?;
        for (product_id, manufacturer_id) in links {
            snapshot.link_manufacturer(product_id, manufacturer_id);
        }

        let pictures: Vec<PictureRow> =
            sqlx::query_as("SELECT id, mime_type, seo_filename FROM picture")
                .fetch_all(&self.pool)
                .await
                .context("Failed to load pictures")?;
        for (id, mime_type, seo_filename) in pictures {
            snapshot.add_picture(Picture {
                id,
                mime_type,
                seo_filename,
            });
        }

        let links: Vec<LinkRow> = sqlx::query_as(
            r#"
            SELECT product_id, picture_id
            FROM product_picture
            ORDER BY product_id, display_order, id
        "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load product pictures")?;
        for (product_id, picture_id) in links {
            snapshot.link_picture(product_id, picture_id);
        }

        let categories: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM category WHERE deleted = 0")
                .fetch_all(&self.pool)
                .await
                .context("Failed to load categories")?;
        for (id, name) in categories {
            snapshot.add_category(Category { id, name });
        }

        let links: Vec<LinkRow> = sqlx::query_as(
            r#"
            SELECT pc.product_id, pc.category_id
            FROM product_category pc
            JOIN category c ON c.id = pc.category_id
            WHERE c.deleted = 0
            ORDER BY pc.product_id, pc.display_order, pc.id
        "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load product categories")?;
        for (product_id, category_id) in links {
            snapshot.link_category(product_id, category_id);
        }

        tracing::debug!(products = snapshot.product_count(), "Catalog snapshot loaded");
        Ok(snapshot)
    }
}

/// Prices written by other tools may be REAL; SQLite renders those in
/// scientific notation when very small or large.
fn parse_price(text: &str) -> Result<Decimal, rust_decimal::Error> {
    let text = text.trim();
    Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text))
}
