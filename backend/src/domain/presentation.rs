//! Deterministic presentation helpers baked into page props.
//!
//! The portal renders avatars and relative timestamps server-side so pages
//! receive ready-to-display strings. All three helpers are pure: the same
//! input always yields the same output.

use chrono::{DateTime, Utc};

/// Fixed avatar palette. Order matters: changing it re-colours every avatar.
pub const AVATAR_PALETTE: [&str; 8] = [
    "#e11d48", "#ea580c", "#ca8a04", "#16a34a", "#0d9488", "#2563eb", "#7c3aed", "#db2777",
];

/// Pick a stable palette colour for a display name.
///
/// Folds the name's bytes into an index so the same name always maps to the
/// same colour regardless of where it is rendered.
pub fn avatar_color(name: &str) -> &'static str {
    let sum = name
        .bytes()
        .fold(0_usize, |acc, byte| acc.wrapping_add(usize::from(byte)));
    AVATAR_PALETTE[sum % AVATAR_PALETTE.len()]
}

/// Extract up to two initials from a display name.
///
/// Takes the first letter of the first two whitespace-separated tokens,
/// uppercased. Single-token names yield one letter; blank input yields `"?"`.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "?".to_owned()
    } else {
        letters
    }
}

/// Render a relative "time ago" string for a timestamp.
///
/// Timestamps in the future (or within the last minute) render "just now".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "just now".to_owned();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return pluralise(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return pluralise(hours, "hour");
    }
    let days = hours / 24;
    if days < 7 {
        return pluralise(days, "day");
    }
    if days < 30 {
        return pluralise(days / 7, "week");
    }
    if days < 365 {
        return pluralise(days / 30, "month");
    }
    pluralise(days / 365, "year")
}

fn pluralise(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    #[rstest]
    fn avatar_color_is_deterministic_and_in_palette() {
        let first = avatar_color("Ada Lovelace");
        let second = avatar_color("Ada Lovelace");
        assert_eq!(first, second);
        assert!(AVATAR_PALETTE.contains(&first));
    }

    #[rstest]
    fn avatar_color_varies_across_names() {
        let colours: std::collections::HashSet<_> = ["Ada", "Grace", "Edsger", "Barbara", "Alan"]
            .iter()
            .map(|name| avatar_color(name))
            .collect();
        assert!(colours.len() > 1);
    }

    #[rstest]
    #[case("Ada Lovelace", "AL")]
    #[case("ada lovelace", "AL")]
    #[case("Ada", "A")]
    #[case("Ada Augusta Lovelace", "AA")]
    #[case("  Ada   Lovelace  ", "AL")]
    #[case("", "?")]
    #[case("   ", "?")]
    fn initials_take_first_two_tokens(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(initials(name), expected);
    }

    #[rstest]
    #[case(Duration::seconds(0), "just now")]
    #[case(Duration::seconds(59), "just now")]
    #[case(Duration::seconds(-30), "just now")]
    #[case(Duration::minutes(1), "1 minute ago")]
    #[case(Duration::minutes(5), "5 minutes ago")]
    #[case(Duration::hours(3), "3 hours ago")]
    #[case(Duration::days(1), "1 day ago")]
    #[case(Duration::days(2), "2 days ago")]
    #[case(Duration::days(14), "2 weeks ago")]
    #[case(Duration::days(60), "2 months ago")]
    #[case(Duration::days(730), "2 years ago")]
    fn time_ago_formats_each_bucket(#[case] elapsed: Duration, #[case] expected: &str) {
        let now = Utc::now();
        assert_eq!(time_ago(now - elapsed, now), expected);
    }
}
