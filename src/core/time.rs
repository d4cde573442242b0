use time::{format_description::well_known::Rfc3339, OffsetDateTime};

pub(crate) fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

pub(crate) fn format_offset(value: OffsetDateTime) -> String {
    value.format(&Rfc3339).unwrap_or_else(|_| value.to_string())
}

pub(crate) fn unix_millis(value: OffsetDateTime) -> i128 {
    value.unix_timestamp_nanos() / 1_000_000
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, PrimitiveDateTime, Time, UtcOffset};

    fn sample() -> OffsetDateTime {
        let date = Date::from_calendar_date(2025, time::Month::January, 2).unwrap();
        let time = Time::from_hms_milli(10, 20, 30, 250).unwrap();
        PrimitiveDateTime::new(date, time).assume_utc()
    }

    #[test]
    fn format_offset_outputs_utc_z() {
        let value = sample().replace_millisecond(0).unwrap();
        assert_eq!(format_offset(value), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn format_offset_preserves_offset() {
        let offset = UtcOffset::from_hms(3, 0, 0).unwrap();
        let date = Date::from_calendar_date(2025, time::Month::January, 2).unwrap();
        let time = Time::from_hms(10, 20, 30).unwrap();
        let shifted = PrimitiveDateTime::new(date, time).assume_utc().to_offset(offset);
        assert_eq!(format_offset(shifted), "2025-01-02T13:20:30+03:00");
    }

    #[test]
    fn unix_millis_truncates_nanos() {
        assert_eq!(unix_millis(sample()), 1_735_813_230_250);
    }
}
