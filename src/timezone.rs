//! Helpers for working with the server's configured local timezone.

use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset for a canonical timezone name, e.g. "Pacific/Auckland".
///
/// Returns `None` if `canonical_timezone` is not a known timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The current wall-clock time in `local_offset`, without the offset.
///
/// Transaction dates are stored as local times, so comparisons against "now"
/// must also happen in local time.
pub fn local_now(local_offset: UtcOffset) -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc().to_offset(local_offset);

    PrimitiveDateTime::new(now.date(), now.time())
}

#[cfg(test)]
mod tests {
    use super::get_local_offset;

    #[test]
    fn resolves_canonical_timezone() {
        assert!(get_local_offset("Etc/UTC").is_some());
        assert!(get_local_offset("America/Sao_Paulo").is_some());
    }

    #[test]
    fn rejects_unknown_timezone() {
        assert_eq!(get_local_offset("Middle/Earth"), None);
    }
}
