//! Rendering instants as wall-clock text in a named zone

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use shiftclock_domain::constants::DEFAULT_LOCAL_FORMAT;
use tracing::debug;

/// Parse an IANA identifier such as `Europe/Berlin`.
pub fn parse_zone(zone: &str) -> Option<Tz> {
    zone.trim().parse::<Tz>().ok()
}

/// The instant as seen in `zone`, if the zone is known.
pub fn to_local(instant: DateTime<Utc>, zone: &str) -> Option<DateTime<Tz>> {
    parse_zone(zone).map(|tz| instant.with_timezone(&tz))
}

/// Render `instant` as wall-clock text in `zone` using a strftime `pattern`.
///
/// An unknown zone renders in UTC instead of failing. An invalid pattern is
/// replaced by [`DEFAULT_LOCAL_FORMAT`].
pub fn format_in_timezone(instant: DateTime<Utc>, zone: &str, pattern: &str) -> String {
    let items = pattern_items(pattern);
    match parse_zone(zone) {
        Some(tz) => render(&instant.with_timezone(&tz), &items),
        None => {
            debug!(zone, "unknown timezone, rendering in UTC");
            render(&instant, &items)
        }
    }
}

fn pattern_items(pattern: &str) -> Vec<Item<'_>> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        debug!(pattern, "invalid format pattern, using default");
        return StrftimeItems::new(DEFAULT_LOCAL_FORMAT).collect();
    }
    items
}

fn render<Z: TimeZone>(instant: &DateTime<Z>, items: &[Item<'_>]) -> String
where
    Z::Offset: std::fmt::Display,
{
    instant.format_with_items(items.iter()).to_string()
}
