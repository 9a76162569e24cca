use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One article from the chronicles index.
///
/// Every field is optional and decoded leniently: a value of the wrong JSON type
/// is treated as absent instead of failing the whole index. Empty and
/// whitespace-only strings are also treated as absent by the accessors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChronicleRecord {
    #[serde(deserialize_with = "lenient")]
    pub href: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub series_id: Option<String>,

    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub part_title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub blurb: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub subtitle: Option<String>,
    /// Chronicle category (`type` in the index).
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "string_list")]
    pub tags: Vec<String>,

    /// Only a literal JSON `true` publishes a chronicle.
    #[serde(deserialize_with = "strictly_true")]
    pub released: bool,
    #[serde(deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub publish_date: Option<String>,

    #[serde(deserialize_with = "lenient")]
    pub theme: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub threat: Option<String>,
    #[serde(deserialize_with = "featuring")]
    pub featuring: Option<Featuring>,
    #[serde(deserialize_with = "read_time")]
    pub read_time: Option<ReadTime>,
    #[serde(deserialize_with = "lenient")]
    pub lorekeeper_note: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub real_world_parallels: Option<Vec<Value>>,

    #[serde(deserialize_with = "count")]
    pub part: Option<u32>,
    #[serde(deserialize_with = "count")]
    pub total_parts: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub serial_context: Option<String>,
}

/// Who appears in a chronicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Featuring {
    Names(Vec<String>),
    /// Already joined by the author; emitted unchanged.
    Preformatted(String),
}

/// Estimated reading time.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadTime {
    /// Kept as a JSON number so `15` and `7.5` render the way they were written.
    Minutes(serde_json::Number),
    Text(String),
}

/// Where a chronicle sits inside a multi-part series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialPosition<'a> {
    pub series_id: &'a str,
    pub part: u32,
    pub total_parts: u32,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

impl ChronicleRecord {
    pub fn href(&self) -> Option<&str> {
        present(&self.href).map(str::trim)
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn part_title(&self) -> Option<&str> {
        present(&self.part_title)
    }

    pub fn date(&self) -> Option<&str> {
        present(&self.date).map(str::trim)
    }

    pub fn publish_date(&self) -> Option<&str> {
        present(&self.publish_date).map(str::trim)
    }

    /// `publishDate` when present, otherwise `date`.
    pub fn effective_date(&self) -> Option<&str> {
        self.publish_date().or_else(|| self.date())
    }

    /// Released and dated.
    pub fn is_eligible(&self) -> bool {
        self.released && self.date().is_some()
    }

    /// `blurb`, then `subtitle`, then empty.
    pub fn description(&self) -> &str {
        present(&self.blurb)
            .or_else(|| present(&self.subtitle))
            .unwrap_or("")
    }

    /// The `type` value followed by the tags, in input order.
    pub fn categories(&self) -> Vec<&str> {
        present(&self.kind)
            .into_iter()
            .chain(
                self.tags
                    .iter()
                    .map(String::as_str)
                    .filter(|t| !t.trim().is_empty()),
            )
            .collect()
    }

    pub fn theme(&self) -> Option<&str> {
        present(&self.theme)
    }

    pub fn threat(&self) -> Option<&str> {
        present(&self.threat)
    }

    pub fn lorekeeper_note(&self) -> Option<&str> {
        present(&self.lorekeeper_note)
    }

    pub fn serial_context(&self) -> Option<&str> {
        present(&self.serial_context)
    }

    pub fn series_id(&self) -> Option<&str> {
        present(&self.series_id).map(str::trim)
    }

    /// True when `realWorldParallels` is a non-empty list.
    pub fn has_analysis(&self) -> bool {
        self.real_world_parallels
            .as_ref()
            .is_some_and(|p| !p.is_empty())
    }

    /// Series placement, if this record is one part of a multi-part series.
    ///
    /// Requires a non-empty series id, `part >= 1` and `totalParts > 1`.
    pub fn serial_position(&self) -> Option<SerialPosition<'_>> {
        let series_id = self.series_id()?;
        let part = self.part.filter(|p| *p >= 1)?;
        let total_parts = self.total_parts.filter(|t| *t > 1)?;
        Some(SerialPosition {
            series_id,
            part,
            total_parts,
        })
    }
}

// ============================================================================
// Lenient field decoders
// ============================================================================

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn strictly_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Positive integers, integral floats, and numeric strings such as `"2"`.
fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn featuring<'de, D>(deserializer: D) -> Result<Option<Featuring>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(Featuring::Names(
            items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        )),
        Value::String(s) => Some(Featuring::Preformatted(s)),
        _ => None,
    })
}

fn read_time<'de, D>(deserializer: D) -> Result<Option<ReadTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => Some(ReadTime::Minutes(n)),
        Value::String(s) => Some(ReadTime::Text(s)),
        _ => None,
    })
}
