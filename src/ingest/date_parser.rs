use chrono::NaiveDate;

/// Parse a date cell against the fixed accepted format set.
///
/// Fast path: `YYYY-MM-DD` or `YYYY/MM/DD`, with any trailing time component
/// (`" HH:MM:SS"`, `"T.."`) ignored. Fallback: `DD/MM/YYYY`, then
/// `MM/DD/YYYY`. First format that parses wins, so ambiguous slash dates
/// resolve day-first.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let b = s.as_bytes();

    // minimal length + separator + digit checks before slicing
    if b.len() >= 10
        && (b[4] == b'-' || b[4] == b'/')
        && b[7] == b[4]
        && (b.len() == 10 || b[10] == b' ' || b[10] == b'T')
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[8..10].iter().all(u8::is_ascii_digit)
    {
        let year: i32 = s[0..4].parse().ok()?;
        let month: u32 = s[5..7].parse().ok()?;
        let day: u32 = s[8..10].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    const DAY_FIRST: &str = "%d/%m/%Y";
    const MONTH_FIRST: &str = "%m/%d/%Y";
    for fmt in [DAY_FIRST, MONTH_FIRST] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}
