//! Relative timestamps as the comment list shows them.

use chrono::{Duration, TimeZone, Utc};

use folio_site::format_relative;

#[test]
fn test_comment_list_labels() {
    let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
    let cases = [
        (Duration::seconds(10), "Just now"),
        (Duration::minutes(42), "42m ago"),
        (Duration::hours(5), "5h ago"),
        (Duration::days(3), "3d ago"),
        (Duration::days(30), "Dec 1, 2024"),
    ];
    for (age, expected) in cases {
        assert_eq!(format_relative(now, Some(now - age)), expected);
    }
}

#[test]
fn test_pending_comment_has_no_label() {
    assert_eq!(format_relative(Utc::now(), None), "");
}
