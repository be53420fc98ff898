use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::error::FeedError;
use super::fields::{
    capitalize_manufacturer_prefix, category_breadcrumb, format_price, image_element_name,
    product_description,
};
use crate::catalog::{
    CatalogSnapshot, CategoryDirectory, ManufacturerDirectory, PictureDirectory, Product,
    ProductCatalog, Store,
};
use crate::settings::FeedSettings;
use crate::util::store_location;

/// Counts reported after a feed has been written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    /// `<product>` elements written.
    pub written: usize,
    /// Products left out because they are out of stock or unpublished.
    pub skipped: usize,
}

/// Writes the Pazaruvaj XML feed for one store.
///
/// Every collaborator is passed in explicitly; the generator holds no state
/// of its own, so the same catalog always yields the same bytes.
pub struct FeedGenerator<'a> {
    products: &'a dyn ProductCatalog,
    manufacturers: &'a dyn ManufacturerDirectory,
    pictures: &'a dyn PictureDirectory,
    categories: &'a dyn CategoryDirectory,
    settings: &'a FeedSettings,
}

impl<'a> FeedGenerator<'a> {
    pub fn new(
        products: &'a dyn ProductCatalog,
        manufacturers: &'a dyn ManufacturerDirectory,
        pictures: &'a dyn PictureDirectory,
        categories: &'a dyn CategoryDirectory,
        settings: &'a FeedSettings,
    ) -> Self {
        Self {
            products,
            manufacturers,
            pictures,
            categories,
            settings,
        }
    }

    /// Generator backed entirely by one snapshot.
    pub fn from_snapshot(snapshot: &'a CatalogSnapshot, settings: &'a FeedSettings) -> Self {
        Self::new(snapshot, snapshot, snapshot, snapshot, settings)
    }

    /// Writes the complete feed for `store` into `sink`.
    ///
    /// The sink is flushed before returning. On error the sink may hold a
    /// partial document; discarding it is up to the caller.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Validation`] if the store URL cannot be resolved
    /// - [`FeedError::Io`] if the sink rejects a write or flush
    pub fn generate<W: Write>(&self, store: &Store, sink: W) -> Result<FeedSummary, FeedError> {
        let location = store_location(&store.url).map_err(|e| {
            FeedError::Validation(format!("store {} ({}): {}", store.id, store.name, e))
        })?;

        tracing::info!(store_id = store.id, store = %store.name, "Generating Pazaruvaj feed");

        let mut writer = Writer::new_with_indent(sink, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new("shop")))?;
        writer.write_event(Event::Start(BytesStart::new("products")))?;

        let mut summary = FeedSummary::default();
        for product in self.products.products() {
            if !product.is_listed() {
                tracing::debug!(
                    product_id = product.id,
                    stock = product.stock_quantity,
                    published = product.published,
                    "Skipping unlisted product"
                );
                summary.skipped += 1;
                continue;
            }

            self.write_product(&mut writer, &location, &product)?;
            summary.written += 1;
        }

        writer.write_event(Event::End(BytesEnd::new("products")))?;
        writer.write_event(Event::End(BytesEnd::new("shop")))?;

        let mut sink = writer.into_inner();
        sink.flush()?;

        tracing::info!(
            store_id = store.id,
            products = summary.written,
            skipped = summary.skipped,
            "Pazaruvaj feed generated"
        );
        Ok(summary)
    }

    fn write_product<W: Write>(
        &self,
        writer: &mut Writer<W>,
        location: &str,
        product: &Product,
    ) -> Result<(), FeedError> {
        let manufacturer = self.manufacturer_name(product.id);
        let name = capitalize_manufacturer_prefix(&product.name, &manufacturer);
        let product_url = format!("{}{}", location, product.name);
        let image_urls = self.image_urls(product.id, location);
        let price = format_price(product.price);
        let description = product_description(product);
        let breadcrumb = category_breadcrumb(&self.category_names(product.id), self.settings);

        writer.write_event(Event::Start(BytesStart::new("product")))?;

        let id = product.id;
        write_text_element(writer, id, "identifier", &id.to_string())?;
        write_text_element(writer, id, "manufacturer", &manufacturer)?;
        write_text_element(writer, id, "category", &breadcrumb)?;
        write_text_element(writer, id, "name", &name)?;
        write_text_element(writer, id, "product_url", &product_url)?;
        write_text_element(writer, id, "price", &price)?;
        for (index, url) in image_urls.iter().enumerate() {
            write_text_element(writer, id, &image_element_name(index), url)?;
        }
        write_text_element(writer, id, "description", description)?;
        write_text_element(
            writer,
            id,
            "delivery_time",
            &self.settings.delivery_time_days.to_string(),
        )?;
        write_text_element(writer, id, "delivery_cost", &self.settings.delivery_cost)?;

        writer.write_event(Event::End(BytesEnd::new("product")))?;
        Ok(())
    }

    /// Name of the first associated manufacturer, or empty.
    fn manufacturer_name(&self, product_id: i64) -> String {
        let Some(&manufacturer_id) = self
            .manufacturers
            .manufacturer_ids_for_product(product_id)
            .first()
        else {
            return String::new();
        };

        match self.manufacturers.manufacturer_by_id(manufacturer_id) {
            Some(manufacturer) => manufacturer.name,
            None => {
                tracing::warn!(
                    product_id,
                    manufacturer_id,
                    "Product references a missing manufacturer"
                );
                String::new()
            }
        }
    }

    fn image_urls(&self, product_id: i64, location: &str) -> Vec<String> {
        let pictures = self.pictures.pictures_for_product(product_id);
        if pictures.is_empty() {
            return vec![self.pictures.default_picture_url(location)];
        }
        pictures
            .iter()
            .map(|picture| self.pictures.picture_url(picture, location))
            .collect()
    }

    fn category_names(&self, product_id: i64) -> Vec<String> {
        self.categories
            .category_ids_for_product(product_id)
            .into_iter()
            .filter_map(|id| self.categories.category_by_id(id))
            .map(|category| category.name)
            .collect()
    }
}

/// Characters allowed in an XML 1.0 document.
///
/// Surrogates cannot occur in a `char`, so only C0 controls and the two
/// noncharacters at the end of the BMP need excluding.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    product_id: i64,
    name: &str,
    text: &str,
) -> Result<(), FeedError> {
    if let Some(bad) = text.chars().find(|c| !is_xml_char(*c)) {
        return Err(FeedError::Xml(format!(
            "product {}: <{}> contains character U+{:04X} not allowed in XML",
            product_id, name, bad as u32
        )));
    }

    writer
        .create_element(name)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Manufacturer, Picture};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn store() -> Store {
        Store {
            id: 1,
            name: "Main".to_string(),
            url: "https://shop.example.com/".to_string(),
        }
    }

    fn product(id: i64, name: &str, stock: i64, published: bool) -> Product {
        Product {
            id,
            name: name.to_string(),
            price: Decimal::new(199_99, 2),
            stock_quantity: stock,
            published,
            short_description: None,
            full_description: Some(format!("About {}", name)),
        }
    }

    fn generate(snapshot: &CatalogSnapshot) -> (String, FeedSummary) {
        let settings = FeedSettings::default();
        let generator = FeedGenerator::from_snapshot(snapshot, &settings);
        let mut out = Vec::new();
        let summary = generator.generate(&store(), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn test_empty_catalog_writes_skeleton() {
        let (xml, summary) = generate(&CatalogSnapshot::new());
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<shop>"));
        assert!(xml.contains("<products>"));
        assert!(xml.contains("</products>"));
        assert!(xml.trim_end().ends_with("</shop>"));
        assert_eq!(summary, FeedSummary::default());
    }

    #[test]
    fn test_full_product_element() {
        let mut snapshot = CatalogSnapshot::new();
        snapshot
            .add_product(product(5, "rolex submariner", 3, true))
            .add_manufacturer(Manufacturer {
                id: 1,
                name: "rolex".to_string(),
            })
            .link_manufacturer(5, 1)
            .add_category(Category {
                id: 1,
                name: "Men".to_string(),
            })
            .link_category(5, 1)
            .add_picture(Picture {
                id: 10,
                mime_type: "image/jpeg".to_string(),
                seo_filename: Some("sub".to_string()),
            })
            .link_picture(5, 10);

        let (xml, summary) = generate(&snapshot);
        assert_eq!(summary.written, 1);

        let expected = "\
    <product>
      <identifier>5</identifier>
      <manufacturer>rolex</manufacturer>
      <category>Watches &gt; Men</category>
      <name>Rolex submariner</name>
      <product_url>http://shop.example.com/rolex submariner</product_url>
      <price>199.99</price>
      <image_url>http://shop.example.com/images/thumbs/0000010_sub.jpeg</image_url>
      <description>About rolex submariner</description>
      <delivery_time>1</delivery_time>
      <delivery_cost>Free</delivery_cost>
    </product>";
        assert!(xml.contains(expected), "unexpected product element:\n{}", xml);
    }

    #[test]
    fn test_unlisted_products_skipped() {
        let mut snapshot = CatalogSnapshot::new();
        snapshot
            .add_product(product(1, "In stock", 5, true))
            .add_product(product(2, "Sold out", 0, true))
            .add_product(product(3, "Hidden", 5, false))
            .add_product(product(4, "Backordered", -2, true));

        let (xml, summary) = generate(&snapshot);
        assert_eq!(summary, FeedSummary { written: 2, skipped: 2 });
        assert!(xml.contains("<identifier>1</identifier>"));
        assert!(xml.contains("<identifier>4</identifier>"));
        assert!(!xml.contains("Sold out"));
        assert!(!xml.contains("Hidden"));
    }

    #[test]
    fn test_placeholder_image_when_no_pictures() {
        let mut snapshot = CatalogSnapshot::new();
        snapshot.add_product(product(1, "Casio", 1, true));

        let (xml, _) = generate(&snapshot);
        assert_eq!(xml.matches("<image_url").count(), 1);
        assert!(xml.contains(
            "<image_url>http://shop.example.com/images/thumbs/default-image.png</image_url>"
        ));
    }

    #[test]
    fn test_indexed_image_elements() {
        let mut snapshot = CatalogSnapshot::new();
        snapshot.add_product(product(1, "Casio", 1, true));
        for id in 1..=3 {
            snapshot
                .add_picture(Picture {
                    id,
                    mime_type: "image/png".to_string(),
                    seo_filename: None,
                })
                .link_picture(1, id);
        }

        let (xml, _) = generate(&snapshot);
        let first = xml.find("<image_url>").unwrap();
        let second = xml.find("<image_url_1>").unwrap();
        let third = xml.find("<image_url_2>").unwrap();
        assert!(first < second && second < third);
        assert!(xml.contains("<image_url_2>http://shop.example.com/images/thumbs/0000003.png</image_url_2>"));
        assert!(!xml.contains("<image_url_3>"));
    }

    #[test]
    fn test_first_manufacturer_wins() {
        let mut snapshot = CatalogSnapshot::new();
        snapshot
            .add_product(product(1, "Watch", 1, true))
            .add_manufacturer(Manufacturer {
                id: 1,
                name: "Seiko".to_string(),
            })
            .add_manufacturer(Manufacturer {
                id: 2,
                name: "Orient".to_string(),
            })
            .link_manufacturer(1, 1)
            .link_manufacturer(1, 2);

        let (xml, _) = generate(&snapshot);
        assert!(xml.contains("<manufacturer>Seiko</manufacturer>"));
    }

    #[test]
    fn test_missing_manufacturer_record_yields_empty() {
        let mut snapshot = CatalogSnapshot::new();
        snapshot
            .add_product(product(1, "Watch", 1, true))
            .link_manufacturer(1, 99);

        let (xml, _) = generate(&snapshot);
        assert!(
            xml.contains("<manufacturer></manufacturer>") || xml.contains("<manufacturer/>"),
            "expected empty manufacturer:\n{}",
            xml
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let mut snapshot = CatalogSnapshot::new();
        let mut p = product(1, "Tom & Jerry <kids>", 1, true);
        p.full_description = None;
        snapshot.add_product(p);

        let (xml, _) = generate(&snapshot);
        assert!(xml.contains("<description>Tom &amp; Jerry &lt;kids&gt;</description>"));
    }

    #[test]
    fn test_invalid_store_url_is_validation_error() {
        let settings = FeedSettings::default();
        let snapshot = CatalogSnapshot::new();
        let generator = FeedGenerator::from_snapshot(&snapshot, &settings);
        let bad_store = Store {
            url: String::new(),
            ..store()
        };

        let result = generator.generate(&bad_store, Vec::new());
        assert!(matches!(result, Err(FeedError::Validation(_))));
    }

    #[test]
    fn test_generation_is_idempotent() {
        let mut snapshot = CatalogSnapshot::new();
        snapshot
            .add_product(product(1, "A", 1, true))
            .add_product(product(2, "B", 1, true));

        let (first, _) = generate(&snapshot);
        let (second, _) = generate(&snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn test_control_character_in_description_rejected() {
        let mut snapshot = CatalogSnapshot::new();
        let mut p = product(7, "Casio", 1, true);
        p.full_description = Some("tab\u{b}vt".to_string());
        snapshot.add_product(p);

        let settings = FeedSettings::default();
        let generator = FeedGenerator::from_snapshot(&snapshot, &settings);
        let result = generator.generate(&store(), Vec::new());

        match result {
            Err(FeedError::Xml(msg)) => {
                assert!(msg.contains("product 7"), "message: {}", msg);
                assert!(msg.contains("<description>"), "message: {}", msg);
                assert!(msg.contains("U+000B"), "message: {}", msg);
            }
            other => panic!("expected Xml error, got {:?}", other),
        }
    }

    #[test]
    fn test_control_character_in_name_rejected() {
        let mut snapshot = CatalogSnapshot::new();
        snapshot.add_product(product(3, "Casio\u{1}", 1, true));

        let settings = FeedSettings::default();
        let generator = FeedGenerator::from_snapshot(&snapshot, &settings);
        let result = generator.generate(&store(), Vec::new());
        assert!(matches!(result, Err(FeedError::Xml(_))));
    }

    #[test]
    fn test_whitespace_controls_are_allowed() {
        let mut snapshot = CatalogSnapshot::new();
        let mut p = product(1, "Casio", 1, true);
        p.full_description = Some("line one\n\tline two\r".to_string());
        snapshot.add_product(p);

        let (_, summary) = generate(&snapshot);
        assert_eq!(summary.written, 1);
    }

    #[test]
    fn test_is_xml_char() {
        assert!(is_xml_char('a'));
        assert!(is_xml_char('\t'));
        assert!(is_xml_char('Ч'));
        assert!(is_xml_char('\u{1F600}'));
        assert!(!is_xml_char('\u{0}'));
        assert!(!is_xml_char('\u{1}'));
        assert!(!is_xml_char('\u{B}'));
        assert!(!is_xml_char('\u{FFFE}'));
        assert!(!is_xml_char('\u{FFFF}'));
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_is_io_error() {
        let settings = FeedSettings::default();
        let snapshot = CatalogSnapshot::new();
        let generator = FeedGenerator::from_snapshot(&snapshot, &settings);

        let result = generator.generate(&store(), FailingSink);
        assert!(matches!(result, Err(FeedError::Io(_))));
    }
}
