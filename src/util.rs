use chrono::{DateTime, Local};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Fuzzy address lookup; a blank query matches nothing.
pub fn address_matches(matcher: &SkimMatcherV2, address: &str, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return false;
    }

    matcher.fuzzy_match(address, query).is_some()
        || matcher
            .fuzzy_match(&address.to_ascii_lowercase(), &query.to_ascii_lowercase())
            .is_some()
}

/// `0x1234567890abcdef` -> `0x1234...cdef`; short values pass through.
pub fn truncate_address(address: &str) -> String {
    const HEAD: usize = 6;
    const TAIL: usize = 4;

    let chars = address.chars().count();
    if chars <= HEAD + TAIL + 3 {
        return address.to_owned();
    }

    let head = address.chars().take(HEAD).collect::<String>();
    let tail = address.chars().skip(chars - TAIL).collect::<String>();
    format!("{head}...{tail}")
}

pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

pub fn format_local_time(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|time| {
            time.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|_| timestamp.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_addresses() {
        assert_eq!(
            truncate_address("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234...5678"
        );
        assert_eq!(truncate_address("0xabc"), "0xabc");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn local_time_formatting() {
        assert_eq!(format_local_time("not a time"), "not a time");
        assert_eq!(format_local_time("2024-05-01T12:00:00.000Z").len(), 19);
    }

    #[test]
    fn fuzzy_address_matching() {
        let matcher = SkimMatcherV2::default();
        assert!(address_matches(&matcher, "0xAbCdEf0123", "abcd"));
        assert!(address_matches(&matcher, "0xabcdef0123", "0x123"));
        assert!(!address_matches(&matcher, "0xabcdef0123", "zz"));
        assert!(!address_matches(&matcher, "0xabcdef0123", "  "));
    }
}
