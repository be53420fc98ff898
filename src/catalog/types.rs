use rust_decimal::Decimal;

// ============================================================================
// Catalog Entities
// ============================================================================

/// A storefront whose URL scopes product and picture links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    pub id: i64,
    pub name: String,
    /// Base URL as configured by the host, e.g. `https://shop.example.com/`.
    pub url: String,
}

/// A catalog product as returned by the product query.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    /// Negative values are possible when backorders are allowed.
    pub stock_quantity: i64,
    pub published: bool,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
}

impl Product {
    /// Whether the product belongs in the feed: in (or below) stock and published.
    pub fn is_listed(&self) -> bool {
        self.stock_quantity != 0 && self.published
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manufacturer {
    pub id: i64,
    pub name: String,
}

/// Picture metadata needed to build its thumbnail URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub id: i64,
    pub mime_type: String,
    pub seo_filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
