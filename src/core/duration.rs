// ISO-8601 durations (`[-]P[nY][nM][nW][nD][T[nH][nM][n[.f]S]]`) over `time::Duration`.
use std::fmt::Write as _;

use time::Duration;

use crate::core::error::{Error, ErrorKind};

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const SECOND: i128 = NANOS_PER_SECOND;
const MINUTE: i128 = 60 * SECOND;
const HOUR: i128 = 60 * MINUTE;
const DAY: i128 = 24 * HOUR;

/// Writes days and a time part; zero is `PT0S`.
pub fn format_iso8601(duration: Duration) -> String {
    let mut out = String::new();
    if duration.is_negative() {
        out.push('-');
    }
    out.push('P');

    // `Duration::abs` saturates at `Duration::MIN`; unsigned parts do not.
    let total = duration.whole_seconds().unsigned_abs();
    let nanos = duration.subsec_nanoseconds().unsigned_abs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    if days > 0 {
        let _ = write!(out, "{days}D");
    }
    let has_time = hours > 0 || minutes > 0 || seconds > 0 || nanos > 0;
    if has_time || days == 0 {
        out.push('T');
        if hours > 0 {
            let _ = write!(out, "{hours}H");
        }
        if minutes > 0 {
            let _ = write!(out, "{minutes}M");
        }
        if seconds > 0 || nanos > 0 || !has_time {
            let _ = write!(out, "{seconds}");
            if nanos > 0 {
                let fraction = format!("{nanos:09}");
                out.push('.');
                out.push_str(fraction.trim_end_matches('0'));
            }
            out.push('S');
        }
    }
    out
}

pub fn parse_iso8601(text: &str) -> Result<Duration, Error> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let mut rest = rest.strip_prefix('P').ok_or_else(|| malformed(text))?;

    let mut in_time = false;
    let mut last_rank = None;
    let mut total: i128 = 0;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('T') {
            if in_time || after.is_empty() {
                return Err(malformed(text));
            }
            in_time = true;
            rest = after;
            continue;
        }

        let end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| malformed(text))?;
        if end == 0 {
            return Err(malformed(text));
        }
        let number = &rest[..end];
        let designator = rest[end..].chars().next().ok_or_else(|| malformed(text))?;
        rest = &rest[end + designator.len_utf8()..];

        let (unit, rank) = match (in_time, designator) {
            (false, 'Y') => (365 * DAY, 0),
            (false, 'M') => (30 * DAY, 1),
            (false, 'W') => (7 * DAY, 2),
            (false, 'D') => (DAY, 3),
            (true, 'H') => (HOUR, 4),
            (true, 'M') => (MINUTE, 5),
            (true, 'S') => (SECOND, 6),
            _ => return Err(malformed(text)),
        };
        if last_rank.is_some_and(|last| rank <= last) {
            return Err(malformed(text));
        }
        last_rank = Some(rank);

        let component = match number.split_once('.') {
            Some((whole, fraction)) => {
                if designator != 'S' || whole.is_empty() || fraction.is_empty() {
                    return Err(malformed(text));
                }
                let whole: i128 = whole.parse().map_err(|_| malformed(text))?;
                whole
                    .checked_mul(unit)
                    .and_then(|nanos| nanos.checked_add(fraction_nanos(fraction)?))
            }
            None => number
                .parse::<i128>()
                .ok()
                .and_then(|whole| whole.checked_mul(unit)),
        }
        .ok_or_else(|| malformed(text))?;
        total = total.checked_add(component).ok_or_else(|| malformed(text))?;
    }
    if last_rank.is_none() {
        return Err(malformed(text));
    }

    // The sign is applied before narrowing so `Duration::MIN` stays representable.
    let total = if negative { -total } else { total };
    let seconds = i64::try_from(total / NANOS_PER_SECOND).map_err(|_| malformed(text))?;
    let nanos = (total % NANOS_PER_SECOND) as i32;
    Ok(Duration::new(seconds, nanos))
}

// Digits beyond nanosecond precision are truncated.
fn fraction_nanos(fraction: &str) -> Option<i128> {
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut digits: String = fraction.chars().take(9).collect();
    while digits.len() < 9 {
        digits.push('0');
    }
    digits.parse().ok()
}

fn malformed(text: &str) -> Error {
    Error::new(ErrorKind::MalformedValue)
        .with_message(format!("{text:?} is not an ISO-8601 duration"))
        .with_expected("duration")
}
