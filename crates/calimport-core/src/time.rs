//! Wall-clock parsing and timezone localization.
//!
//! Event times in the events file are written as naive wall-clock strings
//! (`2024/01/10 09:00 AM`). They are parsed into [`NaiveDateTime`] during
//! validation and only attached to a timezone when the provider payload is
//! built, via [`localize`].

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDateTime, Offset, ParseResult,
    SecondsFormat, TimeZone,
};
use chrono_tz::Tz;

/// The format every `event start time` / `event end time` value must follow.
pub const WALL_CLOCK_FORMAT: &str = "%Y/%m/%d %I:%M %p";

/// Parses a wall-clock string in [`WALL_CLOCK_FORMAT`].
pub fn parse_wall_clock(input: &str) -> ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, WALL_CLOCK_FORMAT)
}

/// Parses an IANA timezone name such as `America/Chicago`.
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.parse::<Tz>().ok()
}

/// Attaches `tz` to a naive wall-clock time.
///
/// Ambiguous times (the repeated hour when clocks go back) resolve to the
/// earlier instant. Times that fall inside a gap (clocks go forward) keep
/// their wall-clock value and take the offset in force before the gap.
pub fn localize(naive: NaiveDateTime, tz: &Tz) -> Option<DateTime<FixedOffset>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.fixed_offset()),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.fixed_offset()),
        LocalResult::None => {
            let before_gap = tz.offset_from_utc_datetime(&(naive - Duration::days(1))).fix();
            before_gap.from_local_datetime(&naive).single()
        }
    }
}

/// Formats a zoned time as RFC 3339 with whole seconds and a numeric offset,
/// e.g. `2024-01-10T09:00:00-06:00`.
pub fn to_zoned_timestamp(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}
