use super::dataset::{ordered_unique, AttendanceDataset};
use super::domain::{DateWindow, Tally};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// Aggregate view of one employee, shaped for the assistant context block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeQueryResult {
    pub employee: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<DateWindow>,
    pub total_hours: f64,
    pub projects: Vec<String>,
    pub coworkers: Vec<String>,
    pub time_off: Tally,
    pub workdays: Tally,
}

impl AttendanceDataset {
    /// Summarise `employee` over `[start, end]`, defaulting each bound to the
    /// log's own span. Unknown employees yield zero hours and N/A tallies.
    pub fn query_employee(
        &self,
        employee: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> EmployeeQueryResult {
        let window = self.resolve_window(start, end);
        let log = self.project_log();

        let in_window = log.iter().filter(|entry| {
            entry.employee == employee && window.is_some_and(|window| window.contains(entry.date))
        });

        let mut total_hours = 0.0;
        let mut touched = Vec::new();
        for entry in in_window {
            total_hours += entry.hours_worked;
            touched.push(entry.project.as_str());
        }
        let projects = ordered_unique(touched);

        // Coworkers span the whole log, not just the window.
        let project_set: HashSet<&str> = projects.iter().copied().collect();
        let coworkers = ordered_unique(
            log.iter()
                .filter(|entry| {
                    entry.employee != employee && project_set.contains(entry.project.as_str())
                })
                .map(|entry| entry.employee.as_str()),
        );

        let summary = self.summary().get(employee);

        EmployeeQueryResult {
            employee: employee.to_string(),
            window,
            total_hours,
            projects: projects.into_iter().map(str::to_string).collect(),
            coworkers: coworkers.into_iter().map(str::to_string).collect(),
            time_off: summary.map_or(Tally::NotAvailable, |row| row.time_off_days),
            workdays: summary.map_or(Tally::NotAvailable, |row| row.workdays),
        }
    }

    fn resolve_window(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Option<DateWindow> {
        let span = self.date_span();
        let start = start.or(span.map(|(first, _)| first))?;
        let end = end.or(span.map(|(_, last)| last))?;
        Some(DateWindow { start, end })
    }
}
