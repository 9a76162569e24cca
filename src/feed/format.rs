use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::chronicle::{Featuring, ReadTime};
use crate::util::is_absolute_http;

/// Escapes the five reserved XML characters (`&`, `<`, `>`, `"`, `'`).
///
/// Returns the input borrowed when nothing needs escaping.
///
/// # Examples
///
/// ```
/// use towerfeed::feed::escape_xml;
///
/// assert_eq!(escape_xml("A & B <C>"), "A &amp; B &lt;C&gt;");
/// assert_eq!(escape_xml("Queen's \"Guard\""), "Queen&apos;s &quot;Guard&quot;");
/// ```
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Joins the cast of a chronicle for display.
///
/// One name is returned as-is, two are joined with `" & "`, and three or more
/// become `"A, B & C"`. Preformatted strings pass through unchanged.
///
/// # Examples
///
/// ```
/// use towerfeed::chronicle::Featuring;
/// use towerfeed::feed::format_featuring;
///
/// let cast = Featuring::Names(vec!["The Lorekeeper".into(), "Queen Lyra".into(), "Valdris".into()]);
/// assert_eq!(format_featuring(Some(&cast)), "The Lorekeeper, Queen Lyra & Valdris");
/// assert_eq!(format_featuring(None), "");
/// ```
pub fn format_featuring(featuring: Option<&Featuring>) -> String {
    match featuring {
        None => String::new(),
        Some(Featuring::Preformatted(text)) => text.clone(),
        Some(Featuring::Names(names)) => join_names(names),
    }
}

fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} & {}", first, second),
        [rest @ .., last] => format!("{} & {}", rest.join(", "), last),
    }
}

/// Renders a read time for display.
///
/// Numbers become `"<n> minutes"`, with whole numbers written without a
/// fractional part. Strings pass through unchanged. Zero and empty strings
/// count as absent and render empty.
///
/// # Examples
///
/// ```
/// use towerfeed::chronicle::ReadTime;
/// use towerfeed::feed::format_read_time;
///
/// assert_eq!(format_read_time(Some(&ReadTime::Minutes(15.into()))), "15 minutes");
/// assert_eq!(format_read_time(Some(&ReadTime::Text("variable".into()))), "variable");
/// assert_eq!(format_read_time(Some(&ReadTime::Minutes(0.into()))), "");
///
/// let whole = serde_json::Number::from_f64(15.0).unwrap();
/// assert_eq!(format_read_time(Some(&ReadTime::Minutes(whole))), "15 minutes");
/// ```
pub fn format_read_time(read_time: Option<&ReadTime>) -> String {
    match read_time {
        Some(ReadTime::Minutes(n)) => match minutes(n) {
            Some(m) => format!("{} minutes", m),
            None => String::new(),
        },
        Some(ReadTime::Text(text)) => text.clone(),
        None => String::new(),
    }
}

// `f64`'s Display drops the `.0` that `Number`'s Display keeps for floats
fn minutes(n: &serde_json::Number) -> Option<String> {
    if n.is_f64() {
        n.as_f64().filter(|m| *m != 0.0).map(|m| m.to_string())
    } else if n.as_f64() == Some(0.0) {
        None
    } else {
        Some(n.to_string())
    }
}

/// Parses a chronicle date.
///
/// Accepts RFC 3339 timestamps, naive date-times (taken as UTC), plain
/// `YYYY-MM-DD` dates (midnight UTC) and RFC 2822 timestamps. Returns `None`
/// for anything else.
pub fn parse_chronicle_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Formats an instant the way RSS 2.0 expects: `Mon, 16 Dec 2024 12:00:00 GMT`.
pub fn format_rss_date(instant: &DateTime<Utc>) -> String {
    instant.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Resolves a chronicle href against the site base URL.
///
/// Absolute http(s) hrefs pass through; anything else is joined to `site_url`
/// with exactly one slash. An absent href resolves to the site root.
pub fn resolve_url(href: Option<&str>, site_url: &str) -> String {
    match href {
        None => site_url.to_string(),
        Some(href) if is_absolute_http(href) => href.to_string(),
        Some(href) if href.starts_with('/') => format!("{}{}", site_url, href),
        Some(href) => format!("{}/{}", site_url, href),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn names(list: &[&str]) -> Featuring {
        Featuring::Names(list.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_escape_xml_all_five() {
        assert_eq!(
            escape_xml(r#"A & B <C> "D" 'E'"#),
            "A &amp; B &lt;C&gt; &quot;D&quot; &apos;E&apos;"
        );
    }

    #[test]
    fn test_escape_xml_borrows_clean_text() {
        assert!(matches!(escape_xml("Plain text"), Cow::Borrowed(_)));
        assert_eq!(escape_xml(""), "");
    }

    #[test]
    fn test_escape_xml_no_double_escape_of_input_order() {
        // Ampersands introduced by escaping must not be escaped again
        assert_eq!(escape_xml("<&>"), "&lt;&amp;&gt;");
    }

    #[test]
    fn test_format_featuring() {
        assert_eq!(format_featuring(Some(&names(&["A"]))), "A");
        assert_eq!(format_featuring(Some(&names(&["A", "B"]))), "A & B");
        assert_eq!(format_featuring(Some(&names(&["A", "B", "C"]))), "A, B & C");
        assert_eq!(
            format_featuring(Some(&names(&["A", "B", "C", "D"]))),
            "A, B, C & D"
        );
        assert_eq!(format_featuring(Some(&names(&[]))), "");
        assert_eq!(format_featuring(None), "");
    }

    #[test]
    fn test_format_featuring_preformatted_passthrough() {
        let cast = Featuring::Preformatted("The Council, in full".to_string());
        assert_eq!(format_featuring(Some(&cast)), "The Council, in full");
    }

    #[test]
    fn test_format_read_time() {
        assert_eq!(
            format_read_time(Some(&ReadTime::Minutes(15.into()))),
            "15 minutes"
        );
        assert_eq!(
            format_read_time(Some(&ReadTime::Minutes(1.into()))),
            "1 minutes"
        );
        assert_eq!(
            format_read_time(Some(&ReadTime::Text("variable".into()))),
            "variable"
        );
        assert_eq!(format_read_time(None), "");
    }

    #[test]
    fn test_format_read_time_fractional_minutes() {
        let n = serde_json::Number::from_f64(7.5).unwrap();
        assert_eq!(format_read_time(Some(&ReadTime::Minutes(n))), "7.5 minutes");
    }

    #[test]
    fn test_format_read_time_zero_is_absent() {
        assert_eq!(format_read_time(Some(&ReadTime::Minutes(0.into()))), "");
        let zero = serde_json::Number::from_f64(0.0).unwrap();
        assert_eq!(format_read_time(Some(&ReadTime::Minutes(zero))), "");
        assert_eq!(format_read_time(Some(&ReadTime::Text(String::new()))), "");
    }

    #[test]
    fn test_format_read_time_whole_float_and_negative() {
        let whole = serde_json::Number::from_f64(15.0).unwrap();
        assert_eq!(
            format_read_time(Some(&ReadTime::Minutes(whole))),
            "15 minutes"
        );
        assert_eq!(
            format_read_time(Some(&ReadTime::Minutes((-3).into()))),
            "-3 minutes"
        );
    }

    #[test]
    fn test_parse_plain_date_is_midnight_utc() {
        assert_eq!(
            parse_chronicle_date("2024-12-16"),
            Some(Utc.with_ymd_and_hms(2024, 12, 16, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        assert_eq!(
            parse_chronicle_date("2024-12-16T12:00:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 12, 16, 10, 0, 0).unwrap())
        );
        assert_eq!(
            parse_chronicle_date("2024-12-16T12:00:00Z"),
            Some(Utc.with_ymd_and_hms(2024, 12, 16, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_naive_datetime() {
        assert_eq!(
            parse_chronicle_date("2024-12-16T08:15:30"),
            Some(Utc.with_ymd_and_hms(2024, 12, 16, 8, 15, 30).unwrap())
        );
        assert_eq!(
            parse_chronicle_date("2024-12-16 08:15:30"),
            Some(Utc.with_ymd_and_hms(2024, 12, 16, 8, 15, 30).unwrap())
        );
    }

    #[test]
    fn test_parse_rfc2822() {
        assert_eq!(
            parse_chronicle_date("Mon, 16 Dec 2024 12:00:00 GMT"),
            Some(Utc.with_ymd_and_hms(2024, 12, 16, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert_eq!(parse_chronicle_date("soon"), None);
        assert_eq!(parse_chronicle_date("2024-13-45"), None);
    }

    #[test]
    fn test_format_rss_date() {
        let instant = Utc.with_ymd_and_hms(2024, 12, 16, 12, 0, 0).unwrap();
        assert_eq!(format_rss_date(&instant), "Mon, 16 Dec 2024 12:00:00 GMT");

        let instant = Utc.with_ymd_and_hms(2025, 3, 2, 7, 5, 9).unwrap();
        assert_eq!(format_rss_date(&instant), "Sun, 02 Mar 2025 07:05:09 GMT");
    }

    #[test]
    fn test_resolve_url() {
        let site = "https://www.cyberlorekeeper.com";
        assert_eq!(
            resolve_url(Some("/chronicles/a.html"), site),
            "https://www.cyberlorekeeper.com/chronicles/a.html"
        );
        assert_eq!(
            resolve_url(Some("chronicles/a.html"), site),
            "https://www.cyberlorekeeper.com/chronicles/a.html"
        );
        assert_eq!(
            resolve_url(Some("https://elsewhere.org/post"), site),
            "https://elsewhere.org/post"
        );
        assert_eq!(resolve_url(None, site), site);
    }

    proptest! {
        #[test]
        fn prop_escape_xml_leaves_no_raw_specials(text in ".*") {
            let escaped = escape_xml(&text).into_owned();
            prop_assert!(!escaped.contains(['<', '>', '"', '\'']));
            // Every remaining '&' starts one of the five entities
            for (i, _) in escaped.match_indices('&') {
                let rest = &escaped[i..];
                prop_assert!(
                    ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"]
                        .iter()
                        .any(|entity| rest.starts_with(entity))
                );
            }
        }

        #[test]
        fn prop_featuring_keeps_every_name(list in proptest::collection::vec("[A-Za-z]{1,8}", 1..6)) {
            let joined = format_featuring(Some(&Featuring::Names(list.clone())));
            prop_assert!(joined.ends_with(list.last().unwrap().as_str()));
            prop_assert_eq!(joined.matches(" & ").count(), if list.len() > 1 { 1 } else { 0 });
            for name in &list {
                prop_assert!(joined.contains(name.as_str()));
            }
        }

        #[test]
        fn prop_rooted_href_joins_exactly_once(path in "/[a-z0-9/-]{0,20}") {
            let site = "https://www.cyberlorekeeper.com";
            let url = resolve_url(Some(path.as_str()), site);
            prop_assert_eq!(&url, &format!("{}{}", site, path));
            prop_assert!(!url["https://".len()..].starts_with('/'));
        }
    }
}
