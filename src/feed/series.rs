use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::chronicle::ChronicleRecord;

/// Lookup of serial parts by `(series id, part number)`.
///
/// Built over the whole index, released or not, so a published part can link
/// back to its predecessor even when the predecessor itself is filtered out.
/// When a part number is duplicated the first record in input order wins.
pub struct SeriesIndex<'a> {
    parts: HashMap<&'a str, HashMap<u32, &'a ChronicleRecord>>,
}

impl<'a> SeriesIndex<'a> {
    pub fn new(records: &'a [ChronicleRecord]) -> Self {
        let mut parts: HashMap<&'a str, HashMap<u32, &'a ChronicleRecord>> = HashMap::new();
        for record in records {
            if let Some(pos) = record.serial_position() {
                parts
                    .entry(pos.series_id)
                    .or_default()
                    .entry(pos.part)
                    .or_insert(record);
            }
        }
        Self { parts }
    }

    /// The part immediately before `record` in its series, if any.
    ///
    /// Standalone records and first parts have no predecessor.
    pub fn previous_part(&self, record: &ChronicleRecord) -> Option<&'a ChronicleRecord> {
        let pos = record.serial_position()?;
        if pos.part <= 1 {
            return None;
        }
        self.parts.get(pos.series_id)?.get(&(pos.part - 1)).copied()
    }
}

/// A data-quality problem in a series. Reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesIssue {
    DuplicatePart { series_id: String, part: u32 },
    /// Parts `from..=to` are absent below the highest part present.
    MissingParts { series_id: String, from: u32, to: u32 },
    PartBeyondTotal { series_id: String, part: u32, total_parts: u32 },
    InconsistentTotal { series_id: String, totals: Vec<u32> },
}

impl fmt::Display for SeriesIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePart { series_id, part } => {
                write!(f, "series '{}' has more than one part {}", series_id, part)
            }
            Self::MissingParts { series_id, from, to } if from == to => {
                write!(f, "series '{}' is missing part {}", series_id, from)
            }
            Self::MissingParts { series_id, from, to } => {
                write!(f, "series '{}' is missing parts {}-{}", series_id, from, to)
            }
            Self::PartBeyondTotal {
                series_id,
                part,
                total_parts,
            } => write!(
                f,
                "series '{}' part {} exceeds its total of {} parts",
                series_id, part, total_parts
            ),
            Self::InconsistentTotal { series_id, totals } => write!(
                f,
                "series '{}' disagrees on total parts: {:?}",
                series_id, totals
            ),
        }
    }
}

/// Checks every series in the index for duplicated, missing or out-of-range parts.
///
/// Issues come back ordered by series id. Gaps below the highest part present
/// are reported as ranges, one issue per gap.
pub fn validate_series(records: &[ChronicleRecord]) -> Vec<SeriesIssue> {
    let mut by_series: BTreeMap<&str, Vec<(u32, u32)>> = BTreeMap::new();
    for record in records {
        if let Some(pos) = record.serial_position() {
            by_series
                .entry(pos.series_id)
                .or_default()
                .push((pos.part, pos.total_parts));
        }
    }

    let mut issues = Vec::new();
    for (series_id, mut entries) in by_series {
        let mut totals: Vec<u32> = entries.iter().map(|(_, total)| *total).collect();
        totals.sort_unstable();
        totals.dedup();
        if totals.len() > 1 {
            issues.push(SeriesIssue::InconsistentTotal {
                series_id: series_id.to_string(),
                totals,
            });
        }

        entries.sort_unstable();
        for (part, total_parts) in &entries {
            if part > total_parts {
                issues.push(SeriesIssue::PartBeyondTotal {
                    series_id: series_id.to_string(),
                    part: *part,
                    total_parts: *total_parts,
                });
            }
        }

        let mut parts: Vec<u32> = entries.iter().map(|(part, _)| *part).collect();
        let before = parts.len();
        parts.dedup();
        if parts.len() != before {
            let mut seen = HashSet::new();
            let mut reported = HashSet::new();
            for (part, _) in &entries {
                if !seen.insert(*part) && reported.insert(*part) {
                    issues.push(SeriesIssue::DuplicatePart {
                        series_id: series_id.to_string(),
                        part: *part,
                    });
                }
            }
        }

        let mut expected = 1;
        for part in parts {
            if part > expected {
                issues.push(SeriesIssue::MissingParts {
                    series_id: series_id.to_string(),
                    from: expected,
                    to: part - 1,
                });
            }
            expected = part.saturating_add(1);
        }
    }

    for issue in &issues {
        tracing::warn!(issue = %issue, "Series data-quality issue");
    }
    issues
}
