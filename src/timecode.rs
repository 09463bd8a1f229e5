//! Conversion between human-entered timecodes and seconds.
//!
//! Timecodes are displayed as `m:ss.t` below one hour and `h:mm:ss.t` above it,
//! always with a single tenths digit. Parsing is deliberately forgiving: the
//! input usually comes from a text field the user is still typing into, so any
//! malformed piece simply counts as zero instead of producing an error.

/// Format a position in seconds as `m:ss.t` or `h:mm:ss.t`.
///
/// The value is rounded to the nearest tenth first, so a tenths digit that
/// would round up to 10 carries into the seconds field (`59.96` becomes
/// `1:00.0`, not `0:59.10`). Negative and non-finite inputs format as `0:00.0`.
pub fn format(seconds: f64) -> String {
    let seconds = if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    };

    let total_tenths = (seconds * 10.0).round() as u64;
    let tenths = total_tenths % 10;
    let total_seconds = total_tenths / 10;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}.{tenths}")
    } else {
        format!("{minutes}:{secs:02}.{tenths}")
    }
}

/// Parse a timecode into seconds. Never fails; unreadable input yields `0.0`.
///
/// Accepted shapes:
/// * `""` → `0.0`
/// * plain decimal seconds such as `45.5`
/// * `ss`, `mm:ss` or `hh:mm:ss`, each optionally followed by `.fraction`
pub fn parse(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    if !text.contains(':') {
        return text
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .unwrap_or(0.0);
    }

    let (integer_part, fraction) = match text.split_once('.') {
        Some((integer, digits)) => (integer, parse_fraction(digits)),
        None => (text, 0.0),
    };

    let components: Vec<u64> = integer_part.split(':').map(parse_component).collect();
    let whole = match components.as_slice() {
        [ss] => Some(*ss),
        [mm, ss] => sum_scaled(&[(*mm, 60), (*ss, 1)]),
        [hh, mm, ss] => sum_scaled(&[(*hh, 3600), (*mm, 60), (*ss, 1)]),
        _ => None,
    };

    // Out-of-range components are as unreadable as any other garbage
    whole.map_or(0.0, |whole| whole as f64 + fraction)
}

fn sum_scaled(parts: &[(u64, u64)]) -> Option<u64> {
    parts.iter().try_fold(0u64, |total, &(value, scale)| {
        value.checked_mul(scale)?.checked_add(total)
    })
}

fn parse_component(component: &str) -> u64 {
    component.trim().parse().unwrap_or(0)
}

fn parse_fraction(digits: &str) -> f64 {
    let digits = digits.trim();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return 0.0;
    }
    format!("0.{digits}").parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_under_an_hour() {
        assert_eq!(format(65.0), "1:05.0");
        assert_eq!(format(0.0), "0:00.0");
        assert_eq!(format(9.25), "0:09.3");
        assert_eq!(format(754.4), "12:34.4");
    }

    #[test]
    fn test_format_with_hours() {
        assert_eq!(format(3661.0), "1:01:01.0");
        assert_eq!(format(3600.0), "1:00:00.0");
        assert_eq!(format(359_999.9), "99:59:59.9");
    }

    #[test]
    fn test_format_carries_tenths_overflow() {
        assert_eq!(format(59.96), "1:00.0");
        assert_eq!(format(3599.97), "1:00:00.0");
        assert_eq!(format(12.99), "0:13.0");
    }

    #[test]
    fn test_format_rejects_garbage_input() {
        assert_eq!(format(-4.0), "0:00.0");
        assert_eq!(format(f64::NAN), "0:00.0");
        assert_eq!(format(f64::INFINITY), "0:00.0");
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(parse(""), 0.0);
        assert_eq!(parse("abc"), 0.0);
        assert_eq!(parse("1:30"), 90.0);
        assert_eq!(parse("1:01:30.5"), 3690.5);
        assert_eq!(parse("45.5"), 45.5);
    }

    #[test]
    fn test_parse_is_tolerant() {
        // Partially typed or mangled components count as zero
        assert_eq!(parse("1:"), 60.0);
        assert_eq!(parse(":30"), 30.0);
        assert_eq!(parse("x:30"), 30.0);
        assert_eq!(parse("1:30.x"), 90.0);
        assert_eq!(parse("1:2:3:4"), 0.0);
        assert_eq!(parse("inf"), 0.0);
        assert_eq!(parse("  2:05.5 "), 125.5);
    }

    #[test]
    fn test_parse_out_of_range_numbers_read_as_zero() {
        assert_eq!(parse("999999999999999999:00"), 0.0);
        assert_eq!(parse("9999999999999999999:00:00"), 0.0);
        assert_eq!(parse("0:0:99999999999999999999"), 0.0);
        assert_eq!(parse("1e400"), 0.0);
        assert_eq!(parse("-1e400"), 0.0);

        // Large but representable values still parse
        assert_eq!(parse("5124095576030431:00:00"), 5_124_095_576_030_431.0 * 3600.0);
        assert_eq!(parse("1e300"), 1e300);
    }

    #[test]
    fn test_parse_fraction_keeps_all_digits() {
        assert!((parse("0:03:25.125") - 205.125).abs() < 1e-9);
    }

    #[test]
    fn test_format_then_parse_recovers_value() {
        let mut x = 0.0;
        while x <= 359_999.0 {
            let recovered = parse(&format(x));
            assert!(
                (recovered - x).abs() <= 0.05 + 1e-6,
                "{x} formatted as {} parsed back as {recovered}",
                format(x)
            );
            x += 37.37;
        }
    }
}
