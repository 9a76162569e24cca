use chrono::{DateTime, Utc};

use super::format::{format_featuring, format_read_time, format_rss_date, resolve_url};
use super::series::SeriesIndex;
use crate::chronicle::ChronicleRecord;

/// One `<item>` of the feed, fully projected from a chronicle.
///
/// All strings are unescaped; escaping happens when the item is written.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    /// RFC 822 timestamp, absent when the chronicle's date does not parse.
    pub pub_date: Option<String>,
    pub categories: Vec<String>,
    pub vendor: VendorFields,
    pub serial: SerialInfo,
}

/// Custom `tower:` fields consumed by the mailing automation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorFields {
    pub theme: Option<String>,
    pub threat: Option<String>,
    pub featuring: Option<String>,
    pub read_time: Option<String>,
    pub has_analysis: bool,
    pub lorekeeper_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SerialInfo {
    Standalone,
    Part {
        part: u32,
        total_parts: u32,
        series_id: String,
        part_title: Option<String>,
        serial_context: Option<String>,
        previous_part_url: Option<String>,
    },
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

impl FeedItem {
    /// Projects a chronicle into a feed item.
    ///
    /// `published` is the chronicle's parsed effective date. Missing display data
    /// degrades to empty values; it never drops the item.
    pub fn from_record(
        record: &ChronicleRecord,
        published: Option<&DateTime<Utc>>,
        series: &SeriesIndex<'_>,
        site_url: &str,
    ) -> Self {
        let link = resolve_url(record.href(), site_url);
        let serial = match record.serial_position() {
            None => SerialInfo::Standalone,
            Some(pos) => SerialInfo::Part {
                part: pos.part,
                total_parts: pos.total_parts,
                series_id: pos.series_id.to_string(),
                part_title: record.part_title().map(str::to_string),
                serial_context: record.serial_context().map(str::to_string),
                previous_part_url: series
                    .previous_part(record)
                    .map(|previous| resolve_url(previous.href(), site_url)),
            },
        };

        Self {
            title: display_title(record),
            link,
            description: record.description().to_string(),
            pub_date: published.map(format_rss_date),
            categories: record.categories().into_iter().map(str::to_string).collect(),
            vendor: VendorFields {
                theme: record.theme().map(str::to_string),
                threat: record.threat().map(str::to_string),
                featuring: non_empty(format_featuring(record.featuring.as_ref())),
                read_time: non_empty(format_read_time(record.read_time.as_ref())),
                has_analysis: record.has_analysis(),
                lorekeeper_note: record.lorekeeper_note().map(str::to_string),
            },
            serial,
        }
    }

    pub fn is_serial(&self) -> bool {
        matches!(self.serial, SerialInfo::Part { .. })
    }
}

/// Standalone chronicles keep their title; serial parts read
/// `"<title> \u{2014} Part <n>: <part title>"` (the part title is optional).
pub fn display_title(record: &ChronicleRecord) -> String {
    let title = record.title();
    match record.serial_position() {
        None => title.to_string(),
        Some(pos) => match record.part_title() {
            Some(part_title) => format!("{} \u{2014} Part {}: {}", title, pos.part, part_title),
            None => format!("{} \u{2014} Part {}", title, pos.part),
        },
    }
}
