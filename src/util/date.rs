use chrono::{Datelike, NaiveDateTime};

/// Weekday, day and month of the RFC 822 layout used by RSS 2.0.
///
/// chrono renders `%a` and `%b` with fixed English names, so the output does
/// not depend on the host locale.
const DAY_FORMAT: &str = "%a, %d %b";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Formats a timestamp as an RFC 822 date string.
///
/// The timestamp is taken to already be in GMT. No timezone conversion is
/// performed; callers holding a `DateTime<Tz>` should pass
/// `dt.naive_utc()`.
///
/// The year is written as a plain zero-padded number (`%04d`), so years past
/// 9999 carry no `+` sign.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use rssforge::util::rfc822;
///
/// let date = NaiveDate::from_ymd_opt(2014, 11, 13)
///     .unwrap()
///     .and_hms_opt(8, 0, 0)
///     .unwrap();
/// assert_eq!(rfc822(&date), "Thu, 13 Nov 2014 08:00:00 GMT");
/// ```
pub fn rfc822(date: &NaiveDateTime) -> String {
    format!(
        "{} {:04} {} GMT",
        date.format(DAY_FORMAT),
        date.year(),
        date.format(TIME_FORMAT)
    )
}

/// Optional variant of [`rfc822`]: an absent date stays absent.
pub fn format_date(date: Option<&NaiveDateTime>) -> Option<String> {
    date.map(rfc822)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_known_dates() {
        assert_eq!(rfc822(&at(2014, 11, 13, 8, 0, 0)), "Thu, 13 Nov 2014 08:00:00 GMT");
        assert_eq!(rfc822(&at(2014, 12, 1, 10, 22, 15)), "Mon, 01 Dec 2014 10:22:15 GMT");
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(rfc822(&at(2021, 1, 3, 4, 5, 6)), "Sun, 03 Jan 2021 04:05:06 GMT");
    }

    #[test]
    fn test_five_digit_year_has_no_sign() {
        assert_eq!(rfc822(&at(10000, 1, 3, 4, 5, 6)), "Mon, 03 Jan 10000 04:05:06 GMT");
        assert_eq!(rfc822(&at(999, 1, 3, 4, 5, 6)), "Thu, 03 Jan 0999 04:05:06 GMT");
    }

    #[test]
    fn test_absent_date_stays_absent() {
        assert_eq!(format_date(None), None);
        assert_eq!(
            format_date(Some(&at(2014, 11, 13, 8, 0, 0))).as_deref(),
            Some("Thu, 13 Nov 2014 08:00:00 GMT")
        );
    }

    const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    proptest! {
        #[test]
        fn prop_matches_field_by_field_layout(
            secs in 0i64..400_000_000_000i64,
        ) {
            let date = chrono::DateTime::from_timestamp(secs, 0).unwrap().naive_utc();
            let expected = format!(
                "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
                WEEKDAYS[date.weekday().num_days_from_monday() as usize],
                date.day(),
                MONTHS[date.month0() as usize],
                date.year(),
                date.hour(),
                date.minute(),
                date.second(),
            );
            prop_assert_eq!(rfc822(&date), expected);
        }
    }
}
