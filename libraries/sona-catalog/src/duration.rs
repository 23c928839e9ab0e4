//! ISO-8601 duration parsing for `contentDetails.duration`

/// Parse a YouTube duration such as `PT1H2M3S` into whole seconds
///
/// Accepts an optional day component (`P1DT2H`). Returns `None` for anything
/// that is not a time duration, including week and month forms.
pub fn parse_iso8601_duration(value: &str) -> Option<u32> {
    let rest = value.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => (date, time),
        None => (rest, ""),
    };

    let mut total: u32 = 0;
    let mut saw_component = false;

    for (part, units) in [(date_part, &[('D', 86_400)][..]), (time_part, &[('H', 3600), ('M', 60), ('S', 1)][..])] {
        let mut digits = String::new();
        let mut allowed = units.iter();
        for c in part.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            // Units must appear in order, each at most once
            let (_, scale) = allowed.find(|(unit, _)| *unit == c)?;
            let amount: u32 = digits.parse().ok()?;
            total = total.checked_add(amount.checked_mul(*scale)?)?;
            digits.clear();
            saw_component = true;
        }
        if !digits.is_empty() {
            return None;
        }
    }

    saw_component.then_some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_time_components() {
        assert_eq!(parse_iso8601_duration("PT3M33S"), Some(213));
        assert_eq!(parse_iso8601_duration("PT1H2M3S"), Some(3723));
        assert_eq!(parse_iso8601_duration("PT45S"), Some(45));
        assert_eq!(parse_iso8601_duration("PT2H"), Some(7200));
        assert_eq!(parse_iso8601_duration("PT10M"), Some(600));
    }

    #[test]
    fn parses_days() {
        assert_eq!(parse_iso8601_duration("P1DT1S"), Some(86_401));
        assert_eq!(parse_iso8601_duration("P1D"), Some(86_400));
    }

    #[test]
    fn live_streams_report_zero() {
        assert_eq!(parse_iso8601_duration("P0D"), Some(0));
        assert_eq!(parse_iso8601_duration("PT0S"), Some(0));
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(parse_iso8601_duration(""), None);
        assert_eq!(parse_iso8601_duration("PT"), None);
        assert_eq!(parse_iso8601_duration("3M33S"), None);
        assert_eq!(parse_iso8601_duration("PT3S3M"), None);
        assert_eq!(parse_iso8601_duration("PT12"), None);
        assert_eq!(parse_iso8601_duration("P1W"), None);
    }
}
