// figma-report-service/src/figma/url.rs

use crate::error::{ReportError, Result};
use regex::Regex;
use std::sync::OnceLock;

fn key_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"figma\.com/(?:file|design|proto)/([a-zA-Z0-9]+)").unwrap(),
            Regex::new(r"figma\.com/community/file/(\d+)").unwrap(),
        ]
    })
}

/// Extract the file key from a Figma URL.
///
/// Accepts the `/file/`, `/design/`, `/proto/` and `/community/file/` path
/// shapes, with or without a trailing `:version` suffix on the key.
pub fn extract_file_key(figma_url: &str) -> Result<String> {
    for pattern in key_patterns() {
        if let Some(captures) = pattern.captures(figma_url) {
            let key = &captures[1];
            // Drop a version suffix if one slipped through (e.g. ABC123:45)
            let key = key.split(':').next().unwrap_or(key);
            return Ok(key.to_string());
        }
    }

    Err(ReportError::InvalidReference(format!(
        "could not extract a file key from '{}'",
        figma_url
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_key_from_file_url() {
        let key = extract_file_key("https://www.figma.com/file/aBc123XyZ/My-App").unwrap();
        assert_eq!(key, "aBc123XyZ");
    }

    #[test]
    fn extracts_key_from_design_url_and_strips_version() {
        let key = extract_file_key("https://www.figma.com/design/ABC123:45/My-App").unwrap();
        assert_eq!(key, "ABC123");
    }

    #[test]
    fn extracts_key_from_proto_url() {
        let key = extract_file_key("https://www.figma.com/proto/Xyz789/Prototype?node-id=1").unwrap();
        assert_eq!(key, "Xyz789");
    }

    #[test]
    fn extracts_numeric_key_from_community_url() {
        let key = extract_file_key("https://www.figma.com/community/file/1234567890/Kit").unwrap();
        assert_eq!(key, "1234567890");
    }

    #[test]
    fn community_key_must_be_numeric() {
        // /community/file/ with a non-numeric key matches neither pattern
        let result = extract_file_key("https://www.figma.com/community/file/notdigits/Kit");
        assert!(matches!(result, Err(ReportError::InvalidReference(_))));
    }

    #[test]
    fn rejects_non_figma_url() {
        let result = extract_file_key("https://example.com/not-figma");
        assert!(matches!(result, Err(ReportError::InvalidReference(_))));
    }
}
