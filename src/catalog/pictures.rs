use super::types::Picture;

/// Directory, relative to the store location, that serves thumbnails.
const THUMBS_PATH: &str = "images/thumbs/";

/// File served when a product has no pictures.
const DEFAULT_IMAGE_FILE: &str = "default-image.png";

/// Absolute thumbnail URL of a picture under `store_location`.
///
/// `store_location` must end with `/` (see [`crate::util::store_location`]).
/// The file name is the zero-padded id, the SEO name when present and an
/// extension derived from the MIME type: `0000042_rolex-submariner.jpeg`.
pub fn picture_url(picture: &Picture, store_location: &str) -> String {
    let extension = extension_for_mime(&picture.mime_type);
    match picture.seo_filename.as_deref().filter(|s| !s.is_empty()) {
        Some(seo) => format!(
            "{}{}{:07}_{}.{}",
            store_location, THUMBS_PATH, picture.id, seo, extension
        ),
        None => format!(
            "{}{}{:07}.{}",
            store_location, THUMBS_PATH, picture.id, extension
        ),
    }
}

/// Placeholder URL used when a product has no pictures.
pub fn default_picture_url(store_location: &str) -> String {
    format!("{}{}{}", store_location, THUMBS_PATH, DEFAULT_IMAGE_FILE)
}

fn extension_for_mime(mime_type: &str) -> &str {
    let subtype = mime_type.rsplit('/').next().unwrap_or_default().trim();
    match subtype {
        "" => "jpeg",
        "pjpeg" => "jpg",
        "x-png" => "png",
        "x-icon" => "ico",
        "svg+xml" => "svg",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picture(id: i64, mime: &str, seo: Option<&str>) -> Picture {
        Picture {
            id,
            mime_type: mime.to_string(),
            seo_filename: seo.map(str::to_string),
        }
    }

    #[test]
    fn test_picture_url_with_seo_name() {
        let url = picture_url(
            &picture(42, "image/jpeg", Some("rolex-submariner")),
            "http://shop.example.com/",
        );
        assert_eq!(
            url,
            "http://shop.example.com/images/thumbs/0000042_rolex-submariner.jpeg"
        );
    }

    #[test]
    fn test_picture_url_without_seo_name() {
        let url = picture_url(&picture(7, "image/png", None), "http://shop.example.com/");
        assert_eq!(url, "http://shop.example.com/images/thumbs/0000007.png");
    }

    #[test]
    fn test_empty_seo_name_ignored() {
        let url = picture_url(&picture(7, "image/png", Some("")), "http://s/");
        assert_eq!(url, "http://s/images/thumbs/0000007.png");
    }

    #[test]
    fn test_legacy_mime_types_mapped() {
        assert_eq!(extension_for_mime("image/pjpeg"), "jpg");
        assert_eq!(extension_for_mime("image/x-png"), "png");
        assert_eq!(extension_for_mime("image/svg+xml"), "svg");
        assert_eq!(extension_for_mime(""), "jpeg");
    }

    #[test]
    fn test_default_picture_url() {
        assert_eq!(
            default_picture_url("http://shop.example.com/"),
            "http://shop.example.com/images/thumbs/default-image.png"
        );
    }
}
