//! Attendance datasets: loading and joining the three exports, per-employee
//! queries, report filters, chart series, and the personal daily log.

mod dataset;
pub mod domain;
pub mod filter;
pub mod personal;
mod query;
pub mod report;

pub use dataset::{AttendanceDataset, DatasetError, DatasetPaths, SummaryTable};
pub use domain::{
    DateWindow, EmployeeSummary, JoinPolicy, ProjectLogEntry, RawProjectLogEntry, Tally,
    TimeOffRecord, WorkdaysRecord,
};
pub use filter::{ReportFilter, Selector, UnknownMonth};
pub use personal::{DailyAttendance, MonthlyAttendance, PersonalAttendanceLog, PersonalLogError};
pub use query::EmployeeQueryResult;
pub use report::visualize;
