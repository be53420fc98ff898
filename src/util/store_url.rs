use thiserror::Error;
use url::Url;

/// Errors raised while turning a store's configured URL into a location.
#[derive(Error, Debug, PartialEq)]
pub enum StoreUrlError {
    /// The store has no URL configured.
    #[error("Store URL is empty")]
    Empty,
    /// The URL string could not be parsed.
    #[error("Invalid store URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL parsed but carries no host.
    #[error("Store URL has no host")]
    MissingHost,
}

/// Resolves the non-secure location of a store.
///
/// The result always uses the `http` scheme, drops any query or fragment and
/// ends with a `/`, so relative paths such as a product name or
/// `images/thumbs/...` can be appended directly.
///
/// A URL without a scheme (`shop.example.com`) is treated as `http://`.
///
/// # Examples
///
/// ```
/// use pazaruvaj_feed::util::store_location;
///
/// assert_eq!(
///     store_location("https://shop.example.com/bg").unwrap(),
///     "http://shop.example.com/bg/"
/// );
/// ```
pub fn store_location(url_str: &str) -> Result<String, StoreUrlError> {
    let trimmed = url_str.trim();
    if trimmed.is_empty() {
        return Err(StoreUrlError::Empty);
    }

    let mut url = if trimmed.contains("://") {
        Url::parse(trimmed)?
    } else {
        Url::parse(&format!("http://{}", trimmed))?
    };

    match url.scheme() {
        "http" => {}
        "https" => {
            // Switching between special schemes cannot fail
            let _ = url.set_scheme("http");
        }
        scheme => return Err(StoreUrlError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(StoreUrlError::MissingHost);
    }

    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url.to_string())
}
