//! Display helpers shared by list and detail views.

use chrono::{DateTime, Utc};

/// Uppercase the first character.
pub fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Long-form date used in the list and detail views, e.g. "May 1, 2024".
pub fn date_stamp(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_capitalise() {
        assert_eq!(capitalise("active"), "Active");
        assert_eq!(capitalise("a"), "A");
        assert_eq!(capitalise(""), "");
        assert_eq!(capitalise("émile"), "Émile");
    }

    #[test]
    fn test_date_stamp() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 0).unwrap();
        assert_eq!(date_stamp(&at), "May 1, 2024");
    }

    #[test]
    fn test_date_stamp_two_digit_day() {
        let at = Utc.with_ymd_and_hms(2023, 12, 25, 8, 0, 0).unwrap();
        assert_eq!(date_stamp(&at), "December 25, 2023");
    }
}
