//! Flexible date parsing and token-based formatting.
//!
//! Source records carry dates in whatever shape the upstream system used;
//! parsing tries a fixed list of common formats. Output formatting uses
//! the `YYYY`, `MM`, `DD`, `HH`, `mm`, `ss` token vocabulary.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// A parsed date plus whether the input carried a time component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedDate {
    pub datetime: NaiveDateTime,
    pub has_time: bool,
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d-%b-%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%Y%m%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Parses a date/datetime string against the known formats. An ISO string
/// with a trailing timezone designator is accepted by dropping the zone.
pub fn parse_flexible(value: &str) -> Option<ParsedDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(ParsedDate {
                datetime,
                has_time: true,
            });
        }
    }
    // ISO 8601 with zone suffix: take the naive local part
    if let Some(t_pos) = trimmed.find('T') {
        let zone_start = trimmed[t_pos..]
            .find(['Z', '+'])
            .or_else(|| trimmed[t_pos + 1..].find('-').map(|p| p + 1))
            .map(|p| p + t_pos);
        if let Some(zone_start) = zone_start {
            let naive = &trimmed[..zone_start];
            for format in DATETIME_FORMATS {
                if let Ok(datetime) = NaiveDateTime::parse_from_str(naive, format) {
                    return Some(ParsedDate {
                        datetime,
                        has_time: true,
                    });
                }
            }
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(ParsedDate {
                datetime: date.and_time(NaiveTime::MIN),
                has_time: false,
            });
        }
    }
    None
}

impl ParsedDate {
    /// ISO 8601 with the input's precision: date-only stays date-only.
    pub fn to_iso8601(&self) -> String {
        if self.has_time {
            self.datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
        } else {
            self.datetime.date().format("%Y-%m-%d").to_string()
        }
    }
}

/// Substitutes `YYYY`, `MM`, `DD`, `HH`, `mm`, `ss` tokens in `format`.
/// Replacement values are digits, so earlier substitutions never collide
/// with later tokens.
pub fn format_tokens(datetime: &NaiveDateTime, format: &str) -> String {
    let date = datetime.date();
    format
        .replace("YYYY", &format!("{:04}", chrono::Datelike::year(&date)))
        .replace("MM", &format!("{:02}", chrono::Datelike::month(&date)))
        .replace("DD", &format!("{:02}", chrono::Datelike::day(&date)))
        .replace("HH", &format!("{:02}", datetime.hour()))
        .replace("mm", &format!("{:02}", datetime.minute()))
        .replace("ss", &format!("{:02}", datetime.second()))
}
