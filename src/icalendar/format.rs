//! ICS value formatting: timestamps, durations, UTC offsets.

use chrono::{Duration, NaiveDateTime};

const ICS_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Formats `t` as an ICS date-time value. `t` is always wall-clock fields,
/// never adjusted for zone. Without a timezone id this produces a trailing
/// `Z` (the value is UTC); with one, a `;TZID=...` prefix using `sep`
/// (`:` for `DTSTART`/`DTEND`, `=` for `RRULE;UNTIL`).
#[must_use]
pub fn time_to_ics(t: NaiveDateTime, tzid: Option<&str>, sep: &str) -> String {
    let ts = t.format(ICS_TIME_FORMAT);
    match tzid {
        None => format!("{sep}{ts}Z"),
        Some(id) => format!(";TZID={id}{sep}{ts}"),
    }
}

/// Formats a [`Duration`] as an ISO-8601 duration (`[-]P[nD][T[nH][nM][nS]]`),
/// zero as `PT0S`. Used for `VALARM`'s `TRIGGER`.
#[must_use]
pub fn duration_to_ics(d: Duration) -> String {
    if d.is_zero() {
        return "PT0S".to_string();
    }

    let negative = d < Duration::zero();
    let d = if negative { -d } else { d };

    let total_seconds = d.num_seconds();
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('P');
    if days > 0 {
        out.push_str(&format!("{days}D"));
    }
    if hours > 0 || minutes > 0 || seconds > 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{hours}H"));
        }
        if minutes > 0 {
            out.push_str(&format!("{minutes}M"));
        }
        if seconds > 0 {
            out.push_str(&format!("{seconds}S"));
        }
    }
    out
}

/// Parses an ICS duration back into a [`Duration`]. The inverse of
/// [`duration_to_ics`], used by the round-trip test.
#[must_use]
pub fn duration_from_ics(s: &str) -> Option<Duration> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let rest = rest.strip_prefix('P')?;
    if rest == "0S" {
        return Some(Duration::zero());
    }

    let (date_part, time_part) = match rest.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (rest, None),
    };

    let mut seconds: i64 = 0;
    if let Some(days) = date_part.strip_suffix('D') {
        seconds += days.parse::<i64>().ok()? * 86_400;
    } else if !date_part.is_empty() {
        return None;
    }

    if let Some(time_part) = time_part {
        let mut remainder = time_part;
        if let Some(idx) = remainder.find('H') {
            seconds += remainder[..idx].parse::<i64>().ok()? * 3_600;
            remainder = &remainder[idx + 1..];
        }
        if let Some(idx) = remainder.find('M') {
            seconds += remainder[..idx].parse::<i64>().ok()? * 60;
            remainder = &remainder[idx + 1..];
        }
        if let Some(idx) = remainder.find('S') {
            seconds += remainder[..idx].parse::<i64>().ok()?;
            remainder = &remainder[idx + 1..];
        }
        if !remainder.is_empty() {
            return None;
        }
    }

    let duration = Duration::seconds(seconds);
    Some(if negative { -duration } else { duration })
}

/// Formats a whole-hour UTC offset (`Z` for none, else `+HH00`).
#[must_use]
pub fn offset_to_ics(hours: i64) -> String {
    if hours == 0 {
        "Z".to_string()
    } else {
        format!("+{hours:02}00")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_is_pt0s() {
        assert_eq!(duration_to_ics(Duration::zero()), "PT0S");
    }

    #[test]
    fn formats_days_hours_minutes() {
        let d = Duration::days(1) + Duration::hours(2) + Duration::minutes(3);
        assert_eq!(duration_to_ics(d), "P1DT2H3M");
    }

    #[test]
    fn negative_duration_gets_leading_dash() {
        let d = Duration::minutes(-28);
        assert_eq!(duration_to_ics(d), "-PT28M");
    }

    #[test]
    fn duration_round_trip_for_non_negative() {
        for d in [
            Duration::zero(),
            Duration::minutes(28),
            Duration::hours(1),
            Duration::hours(24),
            Duration::days(7),
            Duration::days(1) + Duration::hours(2) + Duration::minutes(3) + Duration::seconds(4),
        ] {
            let formatted = duration_to_ics(d);
            assert_eq!(duration_from_ics(&formatted), Some(d), "round trip of {formatted}");
        }
    }

    #[test]
    fn duration_round_trip_for_negative() {
        let d = Duration::hours(-3);
        let formatted = duration_to_ics(d);
        assert!(formatted.starts_with('-'));
        assert_eq!(duration_from_ics(&formatted), Some(d));
    }

    #[test]
    fn offset_zero_is_z() {
        assert_eq!(offset_to_ics(0), "Z");
    }

    #[test]
    fn offset_eight_hours_shanghai() {
        assert_eq!(offset_to_ics(8), "+0800");
    }
}
