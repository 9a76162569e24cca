//! The chronicles index: article records as published by the site.
//!
//! - [`record`] - The typed [`ChronicleRecord`] with lenient field decoding
//! - [`index`] - Reading the JSON index from disk

mod index;
mod record;

pub use index::{load_chronicles, parse_chronicles, LoadError};
pub use record::{ChronicleRecord, Featuring, ReadTime, SerialPosition};
