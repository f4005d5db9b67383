use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

pub const STANDARD_DAY_HOURS: u8 = 8;
pub const MAX_DAILY_HOURS: u8 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAttendance {
    pub date: NaiveDate,
    pub hours_worked: u8,
    pub time_off: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAttendance {
    pub month: &'static str,
    pub hours_worked: u32,
    pub workdays: u32,
    pub time_off: u32,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PersonalLogError {
    #[error("{date} is outside the {year} attendance log")]
    DateOutOfRange { date: NaiveDate, year: i32 },
    #[error("{field} must be between 0 and 24 hours, got {value}")]
    HoursOutOfRange { field: &'static str, value: u32 },
}

/// Day-by-day attendance for the signed-in user, seeded with a standard
/// working year and edited one day at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalAttendanceLog {
    year: i32,
    days: Vec<DailyAttendance>,
}

impl PersonalAttendanceLog {
    /// Eight hours on weekdays, nothing at weekends, no time off.
    pub fn synthetic(year: i32) -> Self {
        let days = NaiveDate::from_ymd_opt(year, 1, 1)
            .into_iter()
            .flat_map(|first| first.iter_days())
            .take_while(|date| date.year() == year)
            .map(|date| DailyAttendance {
                date,
                hours_worked: if is_weekend(date) { 0 } else { STANDARD_DAY_HOURS },
                time_off: 0,
            })
            .collect();

        Self { year, days }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn days(&self) -> &[DailyAttendance] {
        &self.days
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DailyAttendance> {
        self.days.iter().find(|day| day.date == date)
    }

    pub fn log(
        &mut self,
        date: NaiveDate,
        hours_worked: u32,
        time_off: u32,
    ) -> Result<DailyAttendance, PersonalLogError> {
        let hours_worked = daily_hours("hours_worked", hours_worked)?;
        let time_off = daily_hours("time_off", time_off)?;
        let year = self.year;

        let day = self
            .days
            .iter_mut()
            .find(|day| day.date == date)
            .ok_or(PersonalLogError::DateOutOfRange { date, year })?;
        day.hours_worked = hours_worked;
        day.time_off = time_off;
        Ok(*day)
    }

    /// Per-month totals; workdays are hours over a standard day, rounded
    /// half to even.
    pub fn monthly_summary(&self) -> Vec<MonthlyAttendance> {
        let mut months: Vec<MonthlyAttendance> = Vec::with_capacity(12);

        for day in &self.days {
            let label = month_abbreviation(day.date.month());
            if months.last().map(|month| month.month) != Some(label) {
                months.push(MonthlyAttendance {
                    month: label,
                    hours_worked: 0,
                    workdays: 0,
                    time_off: 0,
                });
            }
            if let Some(month) = months.last_mut() {
                month.hours_worked += u32::from(day.hours_worked);
                month.time_off += u32::from(day.time_off);
            }
        }

        for month in &mut months {
            let days = f64::from(month.hours_worked) / f64::from(STANDARD_DAY_HOURS);
            month.workdays = days.round_ties_even() as u32;
        }

        months
    }
}

fn daily_hours(field: &'static str, value: u32) -> Result<u8, PersonalLogError> {
    u8::try_from(value)
        .ok()
        .filter(|hours| *hours <= MAX_DAILY_HOURS)
        .ok_or(PersonalLogError::HoursOutOfRange { field, value })
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn month_abbreviation(month: u32) -> &'static str {
    const ABBREVIATIONS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    ABBREVIATIONS[(month as usize).saturating_sub(1) % 12]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, month, day).expect("valid date")
    }

    #[test]
    fn synthetic_year_has_weekday_hours() {
        let log = PersonalAttendanceLog::synthetic(2023);
        assert_eq!(log.days().len(), 365);
        // 2023-01-01 was a Sunday.
        assert_eq!(log.day(date(1, 1)).map(|day| day.hours_worked), Some(0));
        assert_eq!(log.day(date(1, 2)).map(|day| day.hours_worked), Some(8));
        assert_eq!(PersonalAttendanceLog::synthetic(2024).days().len(), 366);
    }

    #[test]
    fn monthly_summary_counts_workdays() {
        let summary = PersonalAttendanceLog::synthetic(2023).monthly_summary();
        assert_eq!(summary.len(), 12);
        assert_eq!(summary[0].month, "Jan");
        assert_eq!(summary[0].hours_worked, 22 * 8);
        assert_eq!(summary[0].workdays, 22);
        assert_eq!(summary[1].month, "Feb");
        assert_eq!(summary[1].workdays, 20);
    }

    #[test]
    fn logging_updates_one_day() {
        let mut log = PersonalAttendanceLog::synthetic(2023);
        let updated = log.log(date(1, 2), 4, 4).expect("log accepted");
        assert_eq!(updated.hours_worked, 4);
        assert_eq!(updated.time_off, 4);

        let january = &log.monthly_summary()[0];
        assert_eq!(january.hours_worked, 22 * 8 - 4);
        assert_eq!(january.time_off, 4);
        // 172 / 8 = 21.5 rounds to the even 22.
        assert_eq!(january.workdays, 22);
    }

    #[test]
    fn half_days_round_to_even() {
        let mut log = PersonalAttendanceLog::synthetic(2023);
        log.log(date(1, 2), 0, 8).expect("log accepted");
        log.log(date(1, 3), 4, 4).expect("log accepted");
        // 164 / 8 = 20.5 rounds down to 20.
        assert_eq!(log.monthly_summary()[0].workdays, 20);
    }

    #[test]
    fn rejects_out_of_range_input() {
        let mut log = PersonalAttendanceLog::synthetic(2023);
        assert_eq!(
            log.log(date(1, 2), 25, 0),
            Err(PersonalLogError::HoursOutOfRange {
                field: "hours_worked",
                value: 25
            })
        );

        let next_year = NaiveDate::from_ymd_opt(2024, 1, 2).expect("valid date");
        assert_eq!(
            log.log(next_year, 8, 0),
            Err(PersonalLogError::DateOutOfRange {
                date: next_year,
                year: 2023
            })
        );
    }
}
