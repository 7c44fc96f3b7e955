//! Calendar dates for metadata display.
//!
//! Only the date portion of an ISO 8601 string is interpreted; a trailing
//! time and offset (`T10:00:00Z`, `T10:00:00+05:00`) is accepted and ignored.
//!
//! ```ignore
//! let date = CalendarDate::parse("2024-06-15").unwrap();
//! assert_eq!(date.to_display(), "Jun 15, 2024");
//! ```

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A validated year/month/day triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl CalendarDate {
    /// Build a date, returning `None` when the day does not exist.
    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Option<Self> {
        if month < 1 || month > 12 {
            return None;
        }
        if day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(Self { year, month, day })
    }

    /// Parse from "YYYY-MM-DD", optionally followed by a `T` time part.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let bytes = s.as_bytes();

        if bytes.len() < 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }
        if bytes.len() > 10 && bytes[10] != b'T' && bytes[10] != b' ' {
            return None;
        }

        let year = parse_u16(&bytes[0..4])?;
        let month = parse_u8(&bytes[5..7])?;
        let day = parse_u8(&bytes[8..10])?;
        Self::from_ymd(year, month, day)
    }

    /// Format as `Mon D, YYYY` (e.g. `Jun 15, 2024`).
    pub fn to_display(self) -> String {
        format!(
            "{} {}, {:04}",
            MONTHS[(self.month - 1) as usize],
            self.day,
            self.year
        )
    }
}

/// Display form of a raw date string, falling back to the input verbatim.
pub fn display_date(raw: &str) -> String {
    CalendarDate::parse(raw).map_or_else(|| raw.to_string(), CalendarDate::to_display)
}

#[inline]
#[allow(clippy::manual_is_multiple_of)] // Manual impl for const fn
const fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[inline]
const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + u16::from(d);
    }
    Some(result)
}
