use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer};

/// Punctuation allowed in on-disk identifiers besides alphanumerics.
const ALLOWED_PUNCTUATION: &str = " _-()";

/// Display name used when a folder or community name is blank.
pub const UNNAMED: &str = "Unnamed";

/// Converts a display name into a filesystem-safe identifier.
///
/// Keeps alphanumerics plus space, `_`, `-`, `(` and `)`, then trims trailing
/// whitespace. The result may be empty; callers that turn it into a directory
/// name must check for that.
pub fn safe_filename(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || ALLOWED_PUNCTUATION.contains(*c))
        .collect();
    kept.trim_end().to_string()
}

/// Trims a user-supplied display name, substituting [`UNNAMED`] when blank.
pub fn normalize_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        UNNAMED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Compact sortable id: year through microsecond with no separators.
pub fn timestamp_id(at: &DateTime<Utc>) -> String {
    at.format("%Y%m%d%H%M%S%6f").to_string()
}

/// Parses an ISO-8601 timestamp. Values without an offset are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Serde `deserialize_with` for timestamps written with or without an offset.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 timestamp: {}", raw)))
}

/// Optional variant of [`deserialize_timestamp`]; `null` stays `None`.
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 timestamp: {}", raw))),
        None => Ok(None),
    }
}

// Helper for bounded most-recent-first lists
pub fn push_front_unique(list: &mut Vec<String>, item: &str, limit: usize) -> bool {
    if list.iter().any(|existing| existing == item) {
        return false;
    }
    list.insert(0, item.to_string());
    list.truncate(limit);
    true
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn safe_filename_drops_illegal_characters() {
        assert_eq!(safe_filename("Work/Notes: 2024?"), "WorkNotes 2024");
        assert_eq!(safe_filename("my_folder (old)-1"), "my_folder (old)-1");
        assert_eq!(safe_filename("trailing   "), "trailing");
        assert_eq!(safe_filename("  leading"), "  leading");
        assert_eq!(safe_filename("???"), "");
    }

    #[test]
    fn safe_filename_keeps_unicode_letters() {
        assert_eq!(safe_filename("Café ñ"), "Café ñ");
    }

    #[test]
    fn normalize_name_defaults_blank_input() {
        assert_eq!(normalize_name("   "), UNNAMED);
        assert_eq!(normalize_name(" Work "), "Work");
    }

    #[test]
    fn timestamp_id_is_compact_and_sortable() {
        let early = Utc
            .with_ymd_and_hms(2024, 3, 9, 7, 5, 1)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(42))
            .unwrap();
        let later = early + chrono::Duration::microseconds(1);

        assert_eq!(timestamp_id(&early), "20240309070501000042");
        assert!(timestamp_id(&later) > timestamp_id(&early));
    }

    #[test]
    fn parse_timestamp_accepts_offset_and_naive_forms() {
        let expected = Utc
            .with_ymd_and_hms(2024, 3, 9, 7, 5, 1)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(42))
            .unwrap();

        assert_eq!(parse_timestamp("2024-03-09T07:05:01.000042Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-09T09:05:01.000042+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-09T07:05:01.000042"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-03-09T07:05:01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn push_front_unique_caps_and_skips_duplicates() {
        let mut list = vec!["b".to_string(), "c".to_string()];
        assert!(push_front_unique(&mut list, "a", 2));
        assert_eq!(list, vec!["a", "b"]);

        assert!(!push_front_unique(&mut list, "b", 2));
        assert_eq!(list, vec!["a", "b"]);
    }
}
