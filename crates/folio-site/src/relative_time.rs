//! "5m ago" style timestamps for the comment list.

use chrono::{DateTime, Utc};

/// Formats `created_at` relative to `now`.
///
/// A pending comment (no server timestamp yet) renders as an empty string and
/// a timestamp ahead of `now` as "Just now". Anything a week or older shows
/// the calendar date, e.g. "Mar 4, 2025", in UTC.
pub fn format_relative(now: DateTime<Utc>, created_at: Option<DateTime<Utc>>) -> String {
    let Some(created_at) = created_at else {
        return String::new();
    };

    let minutes = (now - created_at).num_minutes();
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = hours / 24;
    if days < 7 {
        return format!("{days}d ago");
    }
    created_at.format("%b %-d, %Y").to_string()
}
