//! Derived values written into each `<product>` element.
use std::borrow::Cow;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::catalog::Product;
use crate::settings::FeedSettings;

/// Normalizes a leading manufacturer name in `product_name` to title case.
///
/// The rest of the name is kept verbatim. Names that do not start with the
/// manufacturer (compared case-insensitively), or already start with the
/// title-cased form, are returned unchanged.
///
/// # Examples
///
/// ```
/// use pazaruvaj_feed::feed::capitalize_manufacturer_prefix;
///
/// assert_eq!(capitalize_manufacturer_prefix("rolex submariner", "rolex"), "Rolex submariner");
/// assert_eq!(capitalize_manufacturer_prefix("Rolex Submariner", "rolex"), "Rolex Submariner");
/// assert_eq!(capitalize_manufacturer_prefix("Submariner", "rolex"), "Submariner");
/// ```
pub fn capitalize_manufacturer_prefix<'a>(
    product_name: &'a str,
    manufacturer_name: &str,
) -> Cow<'a, str> {
    let prefix_chars = manufacturer_name.chars().count();
    // Byte offset right after the first `prefix_chars` characters
    let Some(split) = product_name
        .char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(product_name.len()))
        .nth(prefix_chars)
    else {
        return Cow::Borrowed(product_name);
    };

    let (head, rest) = product_name.split_at(split);
    if head.to_lowercase() != manufacturer_name.to_lowercase() {
        return Cow::Borrowed(product_name);
    }

    let capitalized = title_case(manufacturer_name);
    if product_name.starts_with(&capitalized) {
        return Cow::Borrowed(product_name);
    }

    Cow::Owned(format!("{}{}", capitalized, rest))
}

/// Upper-cases the first letter of every whitespace-separated word and
/// lower-cases the rest. Uses Unicode case mapping, not a locale.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for c in s.chars() {
        if c.is_whitespace() {
            out.push(c);
            word_start = true;
        } else if word_start {
            out.extend(c.to_lowercase().flat_map(char::to_uppercase));
            word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Builds `<top><separator>[Men|Women]` from a product's category names.
///
/// The men label wins when a product is tagged with both.
pub fn category_breadcrumb(category_names: &[String], settings: &FeedSettings) -> String {
    let mut breadcrumb = String::new();
    breadcrumb.push_str(&settings.top_category);
    breadcrumb.push_str(&settings.breadcrumb_separator);

    let has = |label: &str| {
        let label = label.to_lowercase();
        category_names.iter().any(|name| name.to_lowercase() == label)
    };

    if has(&settings.men_category) {
        breadcrumb.push_str(&settings.men_category);
    } else if has(&settings.women_category) {
        breadcrumb.push_str(&settings.women_category);
    }

    breadcrumb
}

/// First non-empty of full description, short description, name.
pub fn product_description(product: &Product) -> &str {
    [
        product.full_description.as_deref(),
        product.short_description.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find(|s| !s.is_empty())
    .unwrap_or(&product.name)
}

/// Two decimal places, `.` separator, no grouping. Halves round away from zero.
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

/// `image_url` for the first image, `image_url_<index>` after that.
pub fn image_element_name(index: usize) -> Cow<'static, str> {
    if index == 0 {
        Cow::Borrowed("image_url")
    } else {
        Cow::Owned(format!("image_url_{}", index))
    }
}
