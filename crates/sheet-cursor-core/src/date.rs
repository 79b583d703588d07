//! Conversion between dates and spreadsheet day numbers

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const SECONDS_PER_DAY: f64 = 86_400.0;
const MICROS_PER_DAY: f64 = 86_400_000_000.0;

/// Day numbers beyond this are rejected when converting back to dates
const MAX_DAY_NUMBER: f64 = 10_000_000.0;

/// The document's date system.
///
/// Spreadsheets store dates as the number of days since a "null date";
/// the fractional part is the time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateSystem {
    null_date: NaiveDate,
}

impl DateSystem {
    /// Create a date system with the given null date
    pub fn new(null_date: NaiveDate) -> Self {
        Self { null_date }
    }

    /// The date represented by day number 0
    pub fn null_date(&self) -> NaiveDate {
        self.null_date
    }

    fn null_datetime(&self) -> NaiveDateTime {
        self.null_date.and_time(NaiveTime::default())
    }

    /// Convert a date to a whole day number
    pub fn date_to_number(&self, date: NaiveDate) -> f64 {
        (date - self.null_date).num_days() as f64
    }

    /// Convert a date and time to a fractional day number (sub-second precision is dropped)
    pub fn datetime_to_number(&self, datetime: NaiveDateTime) -> f64 {
        (datetime - self.null_datetime()).num_seconds() as f64 / SECONDS_PER_DAY
    }

    /// Convert a time of day to a fraction of a day
    pub fn time_to_number(&self, time: NaiveTime) -> f64 {
        ((f64::from(time.second()) / 60.0 + f64::from(time.minute())) / 60.0
            + f64::from(time.hour()))
            / 24.0
    }

    /// Convert a day number back to a date and time.
    ///
    /// Returns `None` for non-finite or out-of-range numbers.
    pub fn number_to_datetime(&self, value: f64) -> Option<NaiveDateTime> {
        if !value.is_finite() || value.abs() > MAX_DAY_NUMBER {
            return None;
        }
        let micros = (value * MICROS_PER_DAY).round() as i64;
        self.null_datetime()
            .checked_add_signed(Duration::microseconds(micros))
    }

    /// Convert a day number to the time of day it carries, to whole seconds
    pub fn number_to_time(&self, value: f64) -> Option<NaiveTime> {
        let datetime = self.number_to_datetime(value)?;
        NaiveTime::from_num_seconds_from_midnight_opt(datetime.num_seconds_from_midnight(), 0)
    }
}

impl Default for DateSystem {
    /// 1899-12-30, the LibreOffice and Excel (1900 system) default
    fn default() -> Self {
        Self {
            null_date: NaiveDate::from_ymd_opt(1899, 12, 30).expect("1899-12-30 is a valid date"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_numbers() {
        let dates = DateSystem::default();
        let date = NaiveDate::from_ymd_opt(1985, 5, 6).unwrap();
        assert_eq!(dates.date_to_number(date), 31173.0);
        assert_eq!(dates.date_to_number(dates.null_date()), 0.0);
    }

    #[test]
    fn test_datetime_round_trip() {
        let dates = DateSystem::default();
        let datetime = NaiveDate::from_ymd_opt(1985, 5, 6)
            .unwrap()
            .and_hms_opt(23, 55, 0)
            .unwrap();
        let number = dates.datetime_to_number(datetime);
        assert_eq!(dates.number_to_datetime(number).unwrap(), datetime);
    }

    #[test]
    fn test_time_round_trip() {
        let dates = DateSystem::default();
        let time = NaiveTime::from_hms_opt(23, 55, 1).unwrap();
        let number = dates.time_to_number(time);
        assert!(number > 0.99 && number < 1.0);
        assert_eq!(dates.number_to_time(number).unwrap(), time);
    }

    #[test]
    fn test_custom_null_date() {
        let dates = DateSystem::new(NaiveDate::from_ymd_opt(1904, 1, 1).unwrap());
        let date = NaiveDate::from_ymd_opt(1904, 1, 2).unwrap();
        assert_eq!(dates.date_to_number(date), 1.0);
    }

    #[test]
    fn test_invalid_numbers() {
        let dates = DateSystem::default();
        assert_eq!(dates.number_to_datetime(f64::NAN), None);
        assert_eq!(dates.number_to_datetime(f64::INFINITY), None);
        assert_eq!(dates.number_to_datetime(1e12), None);
    }
}
