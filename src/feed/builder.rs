use std::io::Cursor;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::format::{escape_xml, format_rss_date, parse_chronicle_date, resolve_url};
use super::item::{FeedItem, SerialInfo};
use super::series::SeriesIndex;
use crate::chronicle::ChronicleRecord;
use crate::config::Config;

const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Builds the complete RSS 2.0 document for the chronicles index.
///
/// `now` becomes the channel's `lastBuildDate`; everything else is a pure
/// function of `records` and `config`.
pub fn build_feed(records: &[ChronicleRecord], config: &Config, now: DateTime<Utc>) -> Result<String> {
    let items = collect_items(records, &config.site_url);
    render_feed(&items, config, now)
}

/// Selects released, dated chronicles and projects them into feed items,
/// newest effective date first.
///
/// Items whose date does not parse keep their relative input order and sort
/// after every dated item.
pub fn collect_items(records: &[ChronicleRecord], site_url: &str) -> Vec<FeedItem> {
    let series = SeriesIndex::new(records);

    let mut eligible: Vec<(Option<DateTime<Utc>>, &ChronicleRecord)> = records
        .iter()
        .filter(|r| r.is_eligible())
        .map(|r| (r.effective_date().and_then(parse_chronicle_date), r))
        .collect();
    // Stable: equal dates keep input order
    eligible.sort_by(|a, b| b.0.cmp(&a.0));

    eligible
        .into_iter()
        .map(|(published, record)| {
            if published.is_none() {
                tracing::warn!(
                    title = %record.title(),
                    date = record.effective_date().unwrap_or(""),
                    "Unparseable chronicle date, omitting pubDate"
                );
            }
            FeedItem::from_record(record, published.as_ref(), &series, site_url)
        })
        .collect()
}

/// Serializes feed items into the RSS document.
pub fn render_feed(items: &[FeedItem], config: &Config, now: DateTime<Utc>) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .context("Failed to write XML declaration")?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:atom", ATOM_NAMESPACE));
    rss.push_attribute(("xmlns:tower", config.namespace_url.as_str()));
    writer
        .write_event(Event::Start(rss))
        .context("Failed to write rss element")?;
    start(&mut writer, "channel")?;

    text_element(&mut writer, "title", &config.feed.title)?;
    text_element(&mut writer, "link", &config.site_url)?;
    text_element(&mut writer, "description", &config.feed.description)?;
    text_element(&mut writer, "language", &config.feed.language)?;
    text_element(&mut writer, "lastBuildDate", &format_rss_date(&now))?;

    let self_link = config.self_link();
    let mut atom_link = BytesStart::new("atom:link");
    atom_link.push_attribute(("href", self_link.as_str()));
    atom_link.push_attribute(("rel", "self"));
    atom_link.push_attribute(("type", "application/rss+xml"));
    writer
        .write_event(Event::Empty(atom_link))
        .context("Failed to write atom:link element")?;

    if let Some(image) = config.feed.image_path() {
        start(&mut writer, "image")?;
        text_element(&mut writer, "url", &resolve_url(Some(image), &config.site_url))?;
        text_element(&mut writer, "title", &config.feed.title)?;
        text_element(&mut writer, "link", &config.site_url)?;
        end(&mut writer, "image")?;
    }

    for item in items {
        write_item(&mut writer, item)
            .with_context(|| format!("Failed to write item '{}'", item.title))?;
    }

    end(&mut writer, "channel")?;
    end(&mut writer, "rss")?;

    let mut bytes = writer.into_inner().into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).context("Generated feed contains invalid UTF-8")
}

fn write_item<W: std::io::Write>(writer: &mut Writer<W>, item: &FeedItem) -> Result<()> {
    start(writer, "item")?;

    text_element(writer, "title", &item.title)?;
    text_element(writer, "link", &item.link)?;
    text_element(writer, "description", &item.description)?;
    if let Some(pub_date) = &item.pub_date {
        text_element(writer, "pubDate", pub_date)?;
    }

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "true"));
    writer
        .write_event(Event::Start(guid))
        .context("Failed to write guid element")?;
    text(writer, &item.link)?;
    end(writer, "guid")?;

    for category in &item.categories {
        text_element(writer, "category", category)?;
    }

    let vendor = &item.vendor;
    optional_element(writer, "tower:theme", vendor.theme.as_deref())?;
    optional_element(writer, "tower:threat", vendor.threat.as_deref())?;
    optional_element(writer, "tower:featuring", vendor.featuring.as_deref())?;
    optional_element(writer, "tower:readTime", vendor.read_time.as_deref())?;
    text_element(writer, "tower:hasAnalysis", bool_text(vendor.has_analysis))?;
    optional_element(writer, "tower:lorekeeperNote", vendor.lorekeeper_note.as_deref())?;

    match &item.serial {
        SerialInfo::Standalone => {
            text_element(writer, "tower:isSerial", "false")?;
        }
        SerialInfo::Part {
            part,
            total_parts,
            series_id,
            part_title,
            serial_context,
            previous_part_url,
        } => {
            text_element(writer, "tower:isSerial", "true")?;
            text_element(writer, "tower:part", &part.to_string())?;
            text_element(writer, "tower:totalParts", &total_parts.to_string())?;
            text_element(writer, "tower:seriesId", series_id)?;
            optional_element(writer, "tower:partTitle", part_title.as_deref())?;
            optional_element(writer, "tower:serialContext", serial_context.as_deref())?;
            optional_element(writer, "tower:previousPartUrl", previous_part_url.as_deref())?;
        }
    }

    end(writer, "item")
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn start<W: std::io::Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .with_context(|| format!("Failed to write {} element", name))?;
    Ok(())
}

fn end<W: std::io::Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .with_context(|| format!("Failed to write {} end", name))?;
    Ok(())
}

fn text<W: std::io::Write>(writer: &mut Writer<W>, content: &str) -> Result<()> {
    // Escaped here so all five reserved characters become entities
    let escaped = escape_xml(content);
    writer
        .write_event(Event::Text(BytesText::from_escaped(escaped)))
        .context("Failed to write text content")?;
    Ok(())
}

/// `<name>content</name>`, or `<name/>` when the content is empty.
fn text_element<W: std::io::Write>(writer: &mut Writer<W>, name: &str, content: &str) -> Result<()> {
    if content.is_empty() {
        writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .with_context(|| format!("Failed to write {} element", name))?;
        return Ok(());
    }
    start(writer, name)?;
    text(writer, content)?;
    end(writer, name)
}

fn optional_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    content: Option<&str>,
) -> Result<()> {
    match content {
        Some(content) => text_element(writer, name, content),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use quick_xml::Reader;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<ChronicleRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 20, 18, 30, 0).unwrap()
    }

    /// Text content of every `name` element, in document order.
    fn texts_of(xml: &str, name: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        let mut out = Vec::new();
        let mut inside = false;
        let mut current = String::new();
        loop {
            match reader.read_event().expect("generated feed must be well-formed") {
                Event::Start(e) if e.name().as_ref() == name.as_bytes() => {
                    inside = true;
                    current.clear();
                }
                Event::Text(t) if inside => current.push_str(&t.unescape().unwrap()),
                Event::End(e) if e.name().as_ref() == name.as_bytes() => {
                    inside = false;
                    out.push(current.clone());
                }
                Event::Eof => break,
                _ => {}
            }
        }
        out
    }

    #[test]
    fn test_only_released_dated_records_included() {
        let input = records(json!([
            {"title": "Released", "released": true, "date": "2024-01-01"},
            {"title": "Draft", "released": false, "date": "2024-02-01"},
            {"title": "Undated", "released": true},
            {"title": "Stringly", "released": "true", "date": "2024-03-01"}
        ]));
        let items = collect_items(&input, "https://example.com");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Released");
    }

    #[test]
    fn test_items_sorted_newest_first_by_effective_date() {
        let input = records(json!([
            {"title": "Old", "released": true, "date": "2024-01-01"},
            {"title": "Rescheduled", "released": true, "date": "2023-06-01", "publishDate": "2024-06-01"},
            {"title": "Mid", "released": true, "date": "2024-03-01"},
            {"title": "Broken", "released": true, "date": "someday"}
        ]));
        let titles: Vec<String> = collect_items(&input, "https://example.com")
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["Rescheduled", "Mid", "Old", "Broken"]);
    }

    #[test]
    fn test_equal_dates_keep_input_order() {
        let input = records(json!([
            {"title": "A", "released": true, "date": "2024-01-01"},
            {"title": "B", "released": true, "date": "2024-01-01"},
            {"title": "C", "released": true, "date": "2024-01-01"}
        ]));
        let titles: Vec<String> = collect_items(&input, "https://example.com")
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_channel_envelope() {
        let config = Config::default();
        let xml = build_feed(&[], &config, now()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("xmlns:atom=\"http://www.w3.org/2005/Atom\""));
        assert!(xml.contains("xmlns:tower=\"https://www.cyberlorekeeper.com/rss/tower\""));
        assert!(xml.contains(
            "<atom:link href=\"https://www.cyberlorekeeper.com/rss.xml\" rel=\"self\" type=\"application/rss+xml\"/>"
        ));
        assert!(xml.ends_with("</rss>\n"));
        assert_eq!(
            texts_of(&xml, "lastBuildDate"),
            vec!["Mon, 20 Jan 2025 18:30:00 GMT"]
        );
        assert_eq!(
            texts_of(&xml, "url"),
            vec!["https://www.cyberlorekeeper.com/images/favicon-96x96.png"]
        );
        assert!(texts_of(&xml, "item").is_empty());
    }

    #[test]
    fn test_image_block_omitted_when_disabled() {
        let mut config = Config::default();
        config.feed.image = None;
        let xml = build_feed(&[], &config, now()).unwrap();
        assert!(!xml.contains("<image>"));
    }

    #[test]
    fn test_item_fields_written_and_escaped() {
        let input = records(json!([{
            "href": "/chronicles/merchant.html",
            "title": "The Merchant's Journey <Part of the Saga>",
            "blurb": "Cloud & caravans",
            "type": "Chronicle",
            "tags": ["cloud", "third-party"],
            "released": true,
            "date": "2024-12-16",
            "theme": "Cloud Migration",
            "featuring": "The Lorekeeper & friends",
            "readTime": "variable",
            "lorekeeperNote": "Escorts \"matter\"",
            "realWorldParallels": ["Capital One breach"]
        }]));
        let xml = build_feed(&input, &Config::default(), now()).unwrap();

        assert!(xml.contains("The Merchant&apos;s Journey &lt;Part of the Saga&gt;"));
        assert!(xml.contains("<description>Cloud &amp; caravans</description>"));
        assert!(xml.contains(
            "<guid isPermaLink=\"true\">https://www.cyberlorekeeper.com/chronicles/merchant.html</guid>"
        ));
        assert!(xml.contains("<pubDate>Mon, 16 Dec 2024 00:00:00 GMT</pubDate>"));
        assert_eq!(
            texts_of(&xml, "category"),
            vec!["Chronicle", "cloud", "third-party"]
        );
        assert!(xml.contains("<tower:theme>Cloud Migration</tower:theme>"));
        assert!(!xml.contains("<tower:threat>"));
        assert!(xml.contains("<tower:featuring>The Lorekeeper &amp; friends</tower:featuring>"));
        assert!(xml.contains("<tower:readTime>variable</tower:readTime>"));
        assert!(xml.contains("<tower:hasAnalysis>true</tower:hasAnalysis>"));
        assert!(xml.contains("<tower:lorekeeperNote>Escorts &quot;matter&quot;</tower:lorekeeperNote>"));
        assert!(xml.contains("<tower:isSerial>false</tower:isSerial>"));
        assert!(!xml.contains("<tower:part>"));
    }

    #[test]
    fn test_has_analysis_always_emitted() {
        let input = records(json!([{"title": "Bare", "released": true, "date": "2024-01-01"}]));
        let xml = build_feed(&input, &Config::default(), now()).unwrap();
        assert_eq!(texts_of(&xml, "tower:hasAnalysis"), vec!["false"]);
        assert!(!xml.contains("<tower:readTime>"));
        assert!(!xml.contains("<tower:featuring>"));
        assert!(!xml.contains("<tower:lorekeeperNote>"));
    }

    #[test]
    fn test_unparseable_date_omits_pub_date() {
        let input = records(json!([{"title": "Soon", "released": true, "date": "TBD"}]));
        let xml = build_feed(&input, &Config::default(), now()).unwrap();
        assert_eq!(texts_of(&xml, "title").len(), 3); // channel, image, item
        assert!(!xml.contains("<pubDate>"));
    }

    #[test]
    fn test_serial_block() {
        let input = records(json!([
            {"href": "/arc1/1.html", "title": "Arc", "seriesId": "arc1", "part": 1, "totalParts": 3,
             "released": true, "date": "2024-01-01"},
            {"href": "/arc1/2.html", "title": "Arc", "partTitle": "The Return", "seriesId": "arc1",
             "part": 2, "totalParts": 3, "serialContext": "Last time...", "released": true,
             "date": "2024-02-01"}
        ]));
        let xml = build_feed(&input, &Config::default(), now()).unwrap();

        assert_eq!(texts_of(&xml, "tower:isSerial"), vec!["true", "true"]);
        assert_eq!(texts_of(&xml, "tower:part"), vec!["2", "1"]);
        assert_eq!(texts_of(&xml, "tower:totalParts"), vec!["3", "3"]);
        assert_eq!(texts_of(&xml, "tower:seriesId"), vec!["arc1", "arc1"]);
        assert_eq!(texts_of(&xml, "tower:partTitle"), vec!["The Return"]);
        assert_eq!(texts_of(&xml, "tower:serialContext"), vec!["Last time..."]);
        assert_eq!(
            texts_of(&xml, "tower:previousPartUrl"),
            vec!["https://www.cyberlorekeeper.com/arc1/1.html"]
        );
    }
}
