//! RSS feed generation from the chronicles index.
//!
//! - **Selection**: only released, dated chronicles, newest effective date first
//! - **Projection**: each chronicle becomes a [`FeedItem`] with resolved links,
//!   an RFC 822 `pubDate`, categories and the custom `tower:` fields
//! - **Series**: serial parts link back to the previous part, found across the
//!   whole index; [`validate_series`] reports gaps and duplicates
//! - **Output**: a single RSS 2.0 document, written atomically
//!
//! # Architecture
//!
//! - [`format`] - Escaping, date and display-string formatting
//! - [`series`] - Previous-part lookup and series validation
//! - [`item`] - Chronicle to feed item projection
//! - [`builder`] - Item selection/ordering and XML serialization via `quick-xml`
//! - [`output`] - Atomic file write
//!
//! # Example
//!
//! ```ignore
//! use crate::feed::{build_feed, write_feed};
//!
//! let xml = build_feed(&records, &config, chrono::Utc::now())?;
//! write_feed(&xml, &config.output_path)?;
//! ```

mod builder;
mod format;
mod item;
mod output;
mod series;

pub use builder::{build_feed, collect_items, render_feed};
pub use format::{
    escape_xml, format_featuring, format_read_time, format_rss_date, parse_chronicle_date,
    resolve_url,
};
pub use item::{display_title, FeedItem, SerialInfo, VendorFields};
pub use output::write_feed;
pub use series::{validate_series, SeriesIndex, SeriesIssue};
