use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::shared::error::PipelineError;

/// Timestamp layouts accepted from the order source, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
];

/// The timezone order timestamps are recorded in.
///
/// Source files carry naive wall-clock time; this wrapper interprets it in
/// the configured zone and produces the UTC instant. Conversion happens
/// exactly once per timestamp: values that already carry an offset are
/// refused instead of being shifted a second time.
#[derive(Debug, Clone, Copy)]
pub struct SourceTimezone {
    tz: Tz,
}

impl SourceTimezone {
    pub fn new(name: &str) -> Result<Self, PipelineError> {
        let tz = name
            .parse::<Tz>()
            .map_err(|_| PipelineError::UnknownTimezone(name.to_string()))?;
        Ok(Self { tz })
    }

    pub fn name(&self) -> &'static str {
        self.tz.name()
    }

    /// Parse a naive local timestamp and convert it to UTC.
    ///
    /// Returns both the parsed local value and the UTC instant; the
    /// original is kept alongside the converted one. Fails on timestamps
    /// that fall into a DST gap or overlap of the source zone.
    pub fn to_utc(&self, text: &str) -> Result<(NaiveDateTime, DateTime<Utc>), PipelineError> {
        let trimmed = text.trim();
        if has_explicit_offset(trimmed) {
            return Err(PipelineError::TimezoneConversion(format!(
                "timestamp '{}' already carries a UTC offset; source timestamps must be naive local time",
                trimmed
            )));
        }
        let local = parse_naive(trimmed).ok_or_else(|| {
            PipelineError::Parse(format!("unrecognized timestamp '{}'", trimmed))
        })?;
        match self.tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => Ok((local, dt.with_timezone(&Utc))),
            LocalResult::Ambiguous(_, _) => Err(PipelineError::TimezoneConversion(format!(
                "timestamp '{}' is ambiguous in {} (DST overlap)",
                trimmed,
                self.tz.name()
            ))),
            LocalResult::None => Err(PipelineError::TimezoneConversion(format!(
                "timestamp '{}' does not exist in {} (DST gap)",
                trimmed,
                self.tz.name()
            ))),
        }
    }
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }
    // date-only values are taken as local midnight
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Detects a trailing `Z` or `+HH:MM` / `+HHMM` style offset.
fn has_explicit_offset(text: &str) -> bool {
    if text.ends_with('Z') || text.ends_with('z') {
        return true;
    }
    let bytes = text.as_bytes();
    let suffix_is_offset = |tail: &[u8], colon: bool| -> bool {
        if tail[0] != b'+' && tail[0] != b'-' {
            return false;
        }
        let digits = if colon {
            if tail[3] != b':' {
                return false;
            }
            [tail[1], tail[2], tail[4], tail[5]]
        } else {
            [tail[1], tail[2], tail[3], tail[4]]
        };
        digits.iter().all(u8::is_ascii_digit)
    };
    if bytes.len() >= 6 && suffix_is_offset(&bytes[bytes.len() - 6..], true) {
        return true;
    }
    bytes.len() >= 5 && suffix_is_offset(&bytes[bytes.len() - 5..], false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kolkata_offset() {
        let tz = SourceTimezone::new("Asia/Kolkata").unwrap();
        let (local, utc) = tz.to_utc("2024-01-15 12:00:00").unwrap();
        assert_eq!(local.to_string(), "2024-01-15 12:00:00");
        // IST is UTC+05:30
        assert_eq!(utc.to_rfc3339(), "2024-01-15T06:30:00+00:00");
    }

    #[test]
    fn test_iso_t_separator_and_fraction() {
        let tz = SourceTimezone::new("Asia/Kolkata").unwrap();
        let (_, utc) = tz.to_utc("2024-01-15T12:00:00.500").unwrap();
        assert_eq!(utc.timestamp_millis(), 1_705_300_200_500);
    }

    #[test]
    fn test_date_only_is_midnight() {
        let tz = SourceTimezone::new("Asia/Kolkata").unwrap();
        let (local, _) = tz.to_utc("2024-01-15").unwrap();
        assert_eq!(local.to_string(), "2024-01-15 00:00:00");
    }

    #[test]
    fn test_offset_carrying_input_is_refused() {
        let tz = SourceTimezone::new("Asia/Kolkata").unwrap();
        assert!(tz.to_utc("2024-01-15T12:00:00Z").is_err());
        assert!(tz.to_utc("2024-01-15 12:00:00+05:30").is_err());
        assert!(tz.to_utc("2024-01-15 12:00:00+0530").is_err());
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let tz = SourceTimezone::new("Asia/Kolkata").unwrap();
        assert!(matches!(
            tz.to_utc("not a timestamp"),
            Err(PipelineError::Parse(_))
        ));
    }

    #[test]
    fn test_dst_gap_fails() {
        // 2024-03-10 02:30 never happened in New York (spring forward)
        let tz = SourceTimezone::new("America/New_York").unwrap();
        assert!(matches!(
            tz.to_utc("2024-03-10 02:30:00"),
            Err(PipelineError::TimezoneConversion(_))
        ));
    }

    #[test]
    fn test_dst_overlap_fails() {
        // 2024-11-03 01:30 happened twice in New York (fall back)
        let tz = SourceTimezone::new("America/New_York").unwrap();
        assert!(matches!(
            tz.to_utc("2024-11-03 01:30:00"),
            Err(PipelineError::TimezoneConversion(_))
        ));
    }

    #[test]
    fn test_unknown_timezone_name() {
        assert!(matches!(
            SourceTimezone::new("Asia/Atlantis"),
            Err(PipelineError::UnknownTimezone(_))
        ));
    }
}
