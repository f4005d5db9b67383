use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Format used by the project log export for every `Date` cell.
pub const PROJECT_LOG_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeOffRecord {
    #[serde(rename = "Employee")]
    pub employee: String,
    #[serde(rename = "Time Off Days")]
    pub time_off_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkdaysRecord {
    #[serde(rename = "Employee")]
    pub employee: String,
    #[serde(rename = "Workdays")]
    pub workdays: f64,
}

/// Project log row as it appears in the export, before the date is parsed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawProjectLogEntry {
    #[serde(rename = "Employee")]
    pub employee: String,
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Hours Worked")]
    pub hours_worked: f64,
}

impl RawProjectLogEntry {
    pub fn new(employee: &str, project: &str, date: &str, hours_worked: f64) -> Self {
        Self {
            employee: employee.to_string(),
            project: project.to_string(),
            date: Some(date.to_string()),
            hours_worked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectLogEntry {
    pub employee: String,
    pub project: String,
    pub date: NaiveDate,
    pub hours_worked: f64,
}

/// A figure that may be missing from one of the source datasets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Tally {
    Known(f64),
    #[default]
    NotAvailable,
}

impl Tally {
    pub const NOT_AVAILABLE_LABEL: &'static str = "N/A";

    pub fn value(self) -> Option<f64> {
        match self {
            Self::Known(value) => Some(value),
            Self::NotAvailable => None,
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl From<Option<f64>> for Tally {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::NotAvailable, Self::Known)
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(value) => write!(f, "{value}"),
            Self::NotAvailable => f.write_str(Self::NOT_AVAILABLE_LABEL),
        }
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(value) => serializer.serialize_f64(*value),
            Self::NotAvailable => serializer.serialize_str(Self::NOT_AVAILABLE_LABEL),
        }
    }
}

/// One joined row of the attendance summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeSummary {
    #[serde(rename = "Employee")]
    pub employee: String,
    #[serde(rename = "Workdays")]
    pub workdays: Tally,
    #[serde(rename = "Time Off Days")]
    pub time_off_days: Tally,
    #[serde(rename = "Hours Worked")]
    pub hours_worked: Tally,
}

/// How employees missing from one of the sources are treated by the join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinPolicy {
    /// Keep every employee seen in any source; absent figures become N/A.
    #[default]
    Outer,
    /// Keep only employees present in workdays, time off and the project log.
    Inner,
}

impl JoinPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "outer" | "full" => Some(Self::Outer),
            "inner" => Some(Self::Inner),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Outer => "outer",
            Self::Inner => "inner",
        }
    }
}

/// Inclusive date bounds applied to project log lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
