//! Header helpers for the poster API.

use axum::http::{header, HeaderMap, HeaderValue};

/// Extension trait for convenient header parsing.
pub trait HeaderMapExt {
    /// Get a header value as a string, returning None if missing or not ASCII.
    fn get_str(&self, name: impl header::AsHeaderName) -> Option<&str>;

    /// The declared `Content-Type`, if any.
    fn content_type(&self) -> Option<&str>;
}

impl HeaderMapExt for HeaderMap {
    fn get_str(&self, name: impl header::AsHeaderName) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }

    fn content_type(&self) -> Option<&str> {
        self.get_str(header::CONTENT_TYPE)
    }
}

/// `Content-Disposition` for a download.
///
/// Quotes are dropped from the name; names that cannot be sent as a header
/// fall back to a bare `attachment`.
pub fn attachment(file_name: &str) -> HeaderValue {
    let name: String = file_name.chars().filter(|c| *c != '"').collect();
    HeaderValue::from_str(&format!("attachment; filename=\"{name}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderName;

    fn make_headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            // HTTP header names are case-insensitive
            let header_name = HeaderName::try_from(*name).unwrap();
            headers.insert(header_name, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn test_get_str_present() {
        let headers = make_headers(&[("x-product", "Orbit")]);
        assert_eq!(headers.get_str("x-product"), Some("Orbit"));
    }

    #[test]
    fn test_get_str_missing() {
        let headers = HeaderMap::new();
        assert_eq!(headers.get_str("x-product"), None);
    }

    #[test]
    fn test_content_type_case_insensitive() {
        let headers = make_headers(&[("Content-Type", "image/png")]);
        assert_eq!(headers.content_type(), Some("image/png"));
    }

    #[test]
    fn test_attachment_quotes_name() {
        assert_eq!(
            attachment("lumen-arc.png").to_str().unwrap(),
            "attachment; filename=\"lumen-arc.png\""
        );
    }

    #[test]
    fn test_attachment_strips_quotes() {
        assert_eq!(
            attachment("the-\"best\".png").to_str().unwrap(),
            "attachment; filename=\"the-best.png\""
        );
    }

    #[test]
    fn test_attachment_control_chars_fall_back() {
        assert_eq!(attachment("bad\nname.png").to_str().unwrap(), "attachment");
    }
}
