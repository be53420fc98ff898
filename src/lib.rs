//! Pazaruvaj price-comparison feed exporter.
//!
//! Reads a store's catalog, keeps the published in-stock products and writes
//! them as the `<shop><products>` XML document Pazaruvaj imports.

pub mod admin;
pub mod catalog;
pub mod config;
pub mod feed;
pub mod settings;
pub mod storage;
pub mod util;
