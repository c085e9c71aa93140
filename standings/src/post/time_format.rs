use thiserror::Error;

/// Highest number of decimal places that is supported when formatting times.
pub const MAX_DECIMAL_PLACES: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFormatError {
    #[error("Invalid time '{0}', expected M:SS.mmm or plain seconds")]
    InvalidTimeFormat(String),
}

/// format_time converts a duration in seconds into M:SS.mmm. Minutes are omitted if they are zero,
/// e.g. 9.5s with two decimal places results in 9.50. The fraction is rounded to the given number
/// of decimal places.
pub fn format_time(seconds: f64, decimal_places: usize) -> String {
    if !seconds.is_finite() {
        return String::from("-.---");
    }

    if seconds < 0.0 {
        let formatted = format_time(-seconds, decimal_places);
        // avoid "-0.000" for values that round to zero
        return if formatted.chars().all(|c| c == '0' || c == '.' || c == ':') {
            formatted
        } else {
            format!("-{}", formatted)
        };
    }

    let decimal_places = decimal_places.min(MAX_DECIMAL_PLACES);
    let scale = 10u64.pow(decimal_places as u32);
    let tot_units = (seconds * scale as f64).round() as u64;

    let whole_secs = tot_units / scale;
    let frac = tot_units % scale;
    let mins = whole_secs / 60;
    let secs = whole_secs % 60;

    let frac_str = if decimal_places > 0 {
        format!(".{:0width$}", frac, width = decimal_places)
    } else {
        String::new()
    };

    if mins > 0 {
        format!("{}:{:02}{}", mins, secs, frac_str)
    } else {
        format!("{}{}", secs, frac_str)
    }
}

/// parse_time is the inverse of format_time. It accepts M:SS.mmm as well as plain seconds.
pub fn parse_time(text: &str) -> Result<f64, TimeFormatError> {
    let invalid = || TimeFormatError::InvalidTimeFormat(text.to_owned());
    let trimmed = text.trim();

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let seconds = match unsigned.split_once(':') {
        Some((mins_str, secs_str)) => {
            if mins_str.is_empty() || !mins_str.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            let mins: u64 = mins_str.parse().map_err(|_| invalid())?;
            let secs = parse_seconds(secs_str).ok_or_else(invalid)?;
            if secs >= 60.0 {
                return Err(invalid());
            }
            mins as f64 * 60.0 + secs
        }
        None => parse_seconds(unsigned).ok_or_else(invalid)?,
    };

    Ok(if negative { -seconds } else { seconds })
}

fn parse_seconds(text: &str) -> Option<f64> {
    // only digits and a single decimal point, which excludes inf, NaN and exponents
    if text.is_empty()
        || text.starts_with('.')
        || text.matches('.').count() > 1
        || !text.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        return None;
    }
    text.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn formats_with_and_without_minutes() {
        assert_eq!(format_time(83.456, 3), "1:23.456");
        assert_eq!(format_time(9.5, 2), "9.50");
        assert_eq!(format_time(0.0, 3), "0.000");
        assert_eq!(format_time(3600.0, 1), "60:00.0");
        assert_eq!(format_time(61.05, 0), "1:01");
    }

    #[test]
    fn rounding_carries_into_minutes() {
        assert_eq!(format_time(59.9996, 3), "1:00.000");
        assert_eq!(format_time(1.999, 2), "2.00");
    }

    #[test]
    fn formats_negative_times() {
        assert_eq!(format_time(-1.25, 2), "-1.25");
        assert_eq!(format_time(-0.0001, 3), "0.000");
    }

    #[test]
    fn parses_both_notations() {
        assert_abs_diff_eq!(parse_time("1:23.456").unwrap(), 83.456, epsilon = 1e-9);
        assert_abs_diff_eq!(parse_time("83.456").unwrap(), 83.456, epsilon = 1e-9);
        assert_abs_diff_eq!(parse_time(" 9.50 ").unwrap(), 9.5, epsilon = 1e-9);
        assert_abs_diff_eq!(parse_time("-1.25").unwrap(), -1.25, epsilon = 1e-9);
        assert_abs_diff_eq!(parse_time("2:05").unwrap(), 125.0, epsilon = 1e-9);
    }

    #[test]
    fn rejects_garbage() {
        for text in ["", "abc", "1:", ":12.3", "1:75.000", "1:2:3", "NaN", "inf", "1e3", "1..2"] {
            assert_eq!(
                parse_time(text),
                Err(TimeFormatError::InvalidTimeFormat(text.to_owned()))
            );
        }
    }

    #[test]
    fn round_trip_to_milliseconds() {
        let formatted = format_time(83.456, 3);
        assert_abs_diff_eq!(parse_time(&formatted).unwrap(), 83.456, epsilon = 1e-9);
    }
}
