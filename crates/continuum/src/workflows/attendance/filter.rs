use super::dataset::{AttendanceDataset, SummaryTable};
use chrono::{Datelike, Month};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

pub const ALL_LABEL: &str = "All";

/// Either every value or one concrete value, as picked in a report dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<T> {
    All,
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T> Selector<T> {
    pub fn as_only(&self) -> Option<&T> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_LABEL),
            Self::Only(value) => value.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a month name")]
pub struct UnknownMonth(pub String);

/// Project / employee / month selectors applied to the summary table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportFilter {
    pub project: Selector<String>,
    pub employee: Selector<String>,
    pub month: Selector<Month>,
}

impl ReportFilter {
    /// Build a filter from dropdown labels; absent or `All` labels pass everything.
    pub fn from_labels(
        project: Option<&str>,
        employee: Option<&str>,
        month: Option<&str>,
    ) -> Result<Self, UnknownMonth> {
        let month = match label_selector(month) {
            Selector::All => Selector::All,
            Selector::Only(name) => Selector::Only(parse_month(name)?),
        };

        Ok(Self {
            project: label_selector(project).map_owned(),
            employee: label_selector(employee).map_owned(),
            month,
        })
    }

    pub fn is_unrestricted(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for ReportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = match &self.month {
            Selector::All => ALL_LABEL,
            Selector::Only(month) => month.name(),
        };
        write!(
            f,
            "project={} employee={} month={}",
            self.project, self.employee, month
        )
    }
}

impl<'a> Selector<&'a str> {
    fn map_owned(self) -> Selector<String> {
        match self {
            Self::All => Selector::All,
            Self::Only(value) => Selector::Only(value.to_string()),
        }
    }
}

fn label_selector(label: Option<&str>) -> Selector<&str> {
    match label.map(str::trim) {
        None | Some("") => Selector::All,
        Some(value) if value.eq_ignore_ascii_case(ALL_LABEL) => Selector::All,
        Some(value) => Selector::Only(value),
    }
}

/// Accepts full English month names in any case.
pub fn parse_month(name: &str) -> Result<Month, UnknownMonth> {
    let trimmed = name.trim();
    Month::from_str(trimmed)
        .ok()
        .filter(|month| month.name().eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| UnknownMonth(name.to_string()))
}

/// Dropdown order for the month selector.
pub fn month_labels() -> Vec<&'static str> {
    std::iter::once(ALL_LABEL)
        .chain((1..=12).filter_map(|number| Month::try_from(number as u8).ok().map(|m| m.name())))
        .collect()
}

impl AttendanceDataset {
    /// Narrow `table` to the rows that pass every selector in `filter`,
    /// preserving row order.
    pub fn filter(&self, table: &SummaryTable, filter: &ReportFilter) -> SummaryTable {
        let log = self.project_log();

        let on_project: Option<HashSet<&str>> = filter.project.as_only().map(|project| {
            log.iter()
                .filter(|entry| &entry.project == project)
                .map(|entry| entry.employee.as_str())
                .collect()
        });

        let in_month: Option<HashSet<&str>> = filter.month.as_only().map(|month| {
            let number = month.number_from_month();
            log.iter()
                .filter(|entry| entry.date.month() == number)
                .map(|entry| entry.employee.as_str())
                .collect()
        });

        table.retain(|row| {
            let employee = row.employee.as_str();
            on_project
                .as_ref()
                .map_or(true, |employees| employees.contains(employee))
                && filter
                    .employee
                    .as_only()
                    .map_or(true, |wanted| wanted == employee)
                && in_month
                    .as_ref()
                    .map_or(true, |employees| employees.contains(employee))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_map_to_selectors() {
        let filter = ReportFilter::from_labels(Some("ProjA"), Some("all"), Some("february"))
            .expect("labels parse");
        assert_eq!(filter.project, Selector::Only("ProjA".to_string()));
        assert_eq!(filter.employee, Selector::All);
        assert_eq!(filter.month, Selector::Only(Month::February));

        let unrestricted = ReportFilter::from_labels(None, Some(""), Some("All")).expect("parse");
        assert!(unrestricted.is_unrestricted());
    }

    #[test]
    fn abbreviations_are_not_month_names() {
        assert_eq!(parse_month("Feb"), Err(UnknownMonth("Feb".to_string())));
        assert!(ReportFilter::from_labels(None, None, Some("Smarch")).is_err());
        assert_eq!(parse_month("DECEMBER"), Ok(Month::December));
    }

    #[test]
    fn month_labels_start_with_all() {
        let labels = month_labels();
        assert_eq!(labels.len(), 13);
        assert_eq!(labels[0], "All");
        assert_eq!(labels[1], "January");
        assert_eq!(labels[12], "December");
    }
}
