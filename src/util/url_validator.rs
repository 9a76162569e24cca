use thiserror::Error;
use url::Url;

/// Errors that can occur while validating the configured site URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
    /// The URL carries a query string or fragment, which would break path joining.
    #[error("Site URL must not contain a query or fragment: {0}")]
    QueryOrFragment(String),
}

/// Validates and normalizes a site base URL.
///
/// Every item link in the feed is built as `base + href`, so the base must be an
/// absolute http(s) URL with a host and nothing after the path. Trailing slashes
/// are stripped so the join never produces `//`.
///
/// # Examples
///
/// ```
/// use towerfeed::util::validate_site_url;
///
/// let base = validate_site_url("https://www.cyberlorekeeper.com/").unwrap();
/// assert_eq!(base, "https://www.cyberlorekeeper.com");
///
/// // Rejects non-HTTP schemes
/// assert!(validate_site_url("ftp://example.com").is_err());
/// ```
pub fn validate_site_url(url_str: &str) -> Result<String, UrlValidationError> {
    let trimmed = url_str.trim();
    let url = Url::parse(trimmed)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(UrlValidationError::QueryOrFragment(trimmed.to_owned()));
    }

    // Keep the caller's spelling (Url::parse would add a trailing slash to bare hosts)
    Ok(trimmed.trim_end_matches('/').to_owned())
}

/// Returns true when `href` already carries an absolute http(s) scheme.
pub fn is_absolute_http(href: &str) -> bool {
    let lower = href.get(..8).unwrap_or(href).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_site_urls() {
        assert_eq!(
            validate_site_url("https://example.com").unwrap(),
            "https://example.com"
        );
        assert_eq!(
            validate_site_url("http://news.example.org/blog/").unwrap(),
            "http://news.example.org/blog"
        );
    }

    #[test]
    fn test_trailing_slashes_stripped() {
        assert_eq!(
            validate_site_url("https://example.com///").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_invalid_schemes() {
        assert!(matches!(
            validate_site_url("file:///srv/site"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(validate_site_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_relative_url_rejected() {
        assert!(matches!(
            validate_site_url("/just/a/path"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_query_and_fragment_rejected() {
        assert!(validate_site_url("https://example.com/?a=1").is_err());
        assert!(validate_site_url("https://example.com/#top").is_err());
    }

    #[test]
    fn test_localhost_allowed_for_previews() {
        assert_eq!(
            validate_site_url("http://localhost:8080").unwrap(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_is_absolute_http() {
        assert!(is_absolute_http("https://example.com/a"));
        assert!(is_absolute_http("HTTP://example.com"));
        assert!(!is_absolute_http("/chronicles/a.html"));
        assert!(!is_absolute_http("chronicles/http.html"));
        assert!(!is_absolute_http("mailto:someone@example.com"));
        assert!(!is_absolute_http(""));
    }
}
