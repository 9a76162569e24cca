//! Utility functions shared by the feed builder and configuration layer.
//!
//! - **URL validation**: checks the configured site base URL and recognizes
//!   hrefs that are already absolute.
//!
//! # Examples
//!
//! ```
//! use towerfeed::util::{is_absolute_http, validate_site_url};
//!
//! let base = validate_site_url("https://example.com/").unwrap();
//! assert_eq!(base, "https://example.com");
//! assert!(is_absolute_http("https://elsewhere.org/post"));
//! ```

mod url_validator;

pub use url_validator::{is_absolute_http, validate_site_url, UrlValidationError};
