use chrono::NaiveDate;
use continuum::auth::CredentialVerifier;
use continuum::workflows::assistant::{Assistant, ChatCompletion};
use continuum::workflows::attendance::{
    AttendanceDataset, DailyAttendance, MonthlyAttendance, PersonalAttendanceLog,
    PersonalLogError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared, read-mostly state behind every dashboard route.
pub(crate) struct DashboardState<C> {
    pub(crate) dataset: Arc<AttendanceDataset>,
    pub(crate) assistant: Arc<Assistant<C>>,
    pub(crate) credentials: Arc<dyn CredentialVerifier>,
    pub(crate) personal_log: InMemoryPersonalLog,
}

impl<C> Clone for DashboardState<C> {
    fn clone(&self) -> Self {
        Self {
            dataset: self.dataset.clone(),
            assistant: self.assistant.clone(),
            credentials: self.credentials.clone(),
            personal_log: self.personal_log.clone(),
        }
    }
}

impl<C: ChatCompletion> DashboardState<C> {
    pub(crate) fn new(
        dataset: Arc<AttendanceDataset>,
        assistant: Assistant<C>,
        credentials: Arc<dyn CredentialVerifier>,
        attendance_year: i32,
    ) -> Self {
        Self {
            dataset,
            assistant: Arc::new(assistant),
            credentials,
            personal_log: InMemoryPersonalLog::synthetic(attendance_year),
        }
    }
}

/// The signed-in user's daily log; one writer per request.
#[derive(Clone)]
pub(crate) struct InMemoryPersonalLog {
    log: Arc<Mutex<PersonalAttendanceLog>>,
}

impl InMemoryPersonalLog {
    pub(crate) fn synthetic(year: i32) -> Self {
        Self {
            log: Arc::new(Mutex::new(PersonalAttendanceLog::synthetic(year))),
        }
    }

    pub(crate) fn record(
        &self,
        date: NaiveDate,
        hours_worked: u32,
        time_off: u32,
    ) -> Result<DailyAttendance, PersonalLogError> {
        let mut guard = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        guard.log(date, hours_worked, time_off)
    }

    pub(crate) fn view(&self, profile: &PersonalProfile) -> PersonalAttendanceView {
        let guard = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        PersonalAttendanceView {
            name: profile.name,
            job_title: profile.job_title,
            year: guard.year(),
            monthly_summary: guard.monthly_summary(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PersonalProfile {
    pub(crate) name: &'static str,
    pub(crate) job_title: &'static str,
}

pub(crate) fn default_profile() -> PersonalProfile {
    PersonalProfile {
        name: "Zhalae Daneshvari",
        job_title: "Innovative Technology Consultant",
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PersonalAttendanceView {
    pub(crate) name: &'static str,
    pub(crate) job_title: &'static str,
    pub(crate) year: i32,
    pub(crate) monthly_summary: Vec<MonthlyAttendance>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_reports_bad_input() {
        assert_eq!(
            parse_date(" 2023-02-14 "),
            Ok(NaiveDate::from_ymd_opt(2023, 2, 14).expect("valid date"))
        );
        let error = parse_date("02/14/2023").expect_err("us format rejected");
        assert!(error.contains("YYYY-MM-DD"));
    }

    #[test]
    fn personal_log_view_reflects_updates() {
        let log = InMemoryPersonalLog::synthetic(2023);
        let date = NaiveDate::from_ymd_opt(2023, 3, 1).expect("valid date");
        let logged = log.record(date, 6, 2).expect("log accepted");
        assert_eq!(logged.hours_worked, 6);

        let view = log.view(&default_profile());
        assert_eq!(view.year, 2023);
        assert_eq!(view.monthly_summary[2].month, "Mar");
        assert_eq!(view.monthly_summary[2].time_off, 2);
    }
}
