use super::domain::{
    EmployeeSummary, JoinPolicy, ProjectLogEntry, RawProjectLogEntry, Tally, TimeOffRecord,
    WorkdaysRecord, PROJECT_LOG_DATE_FORMAT,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {source_name}: {source}")]
    Json {
        source_name: String,
        source: serde_json::Error,
    },
    #[error("project log row {row} ({employee}) has no date")]
    MissingDate { row: usize, employee: String },
    #[error("project log row {row} ({employee}) has malformed date '{value}': expected MM/DD/YYYY")]
    MalformedDate {
        row: usize,
        employee: String,
        value: String,
        source: Option<chrono::ParseError>,
    },
}

/// Locations of the three JSON exports the dashboard is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub time_off: PathBuf,
    pub workdays: PathBuf,
    pub project_log: PathBuf,
}

impl DatasetPaths {
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            time_off: dir.join("time_off.json"),
            workdays: dir.join("workdays.json"),
            project_log: dir.join("project_log.json"),
        }
    }
}

/// Ordered summary rows produced by the join.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTable {
    rows: Vec<EmployeeSummary>,
}

impl SummaryTable {
    pub fn new(rows: Vec<EmployeeSummary>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[EmployeeSummary] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, employee: &str) -> Option<&EmployeeSummary> {
        self.rows.iter().find(|row| row.employee == employee)
    }

    pub fn employees(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.employee.as_str())
    }

    pub(crate) fn retain<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&EmployeeSummary) -> bool,
    {
        Self {
            rows: self.rows.iter().filter(|row| keep(*row)).cloned().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SummaryTable {
    type Item = &'a EmployeeSummary;
    type IntoIter = std::slice::Iter<'a, EmployeeSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// The loaded record sets plus the joined summary, built once per process.
#[derive(Debug, Clone)]
pub struct AttendanceDataset {
    time_off: Vec<TimeOffRecord>,
    workdays: Vec<WorkdaysRecord>,
    project_log: Vec<ProjectLogEntry>,
    summary: SummaryTable,
    join_policy: JoinPolicy,
}

impl AttendanceDataset {
    pub fn load(
        time_off: Vec<TimeOffRecord>,
        workdays: Vec<WorkdaysRecord>,
        project_log: Vec<RawProjectLogEntry>,
        join_policy: JoinPolicy,
    ) -> Result<Self, DatasetError> {
        let project_log = parse_project_log(project_log)?;
        let summary = join_summary(&time_off, &workdays, &project_log, join_policy);

        debug!(
            employees = summary.len(),
            log_entries = project_log.len(),
            join = join_policy.label(),
            "attendance summary joined"
        );

        Ok(Self {
            time_off,
            workdays,
            project_log,
            summary,
            join_policy,
        })
    }

    pub fn from_paths(paths: &DatasetPaths, join_policy: JoinPolicy) -> Result<Self, DatasetError> {
        let time_off = read_json_file(&paths.time_off)?;
        let workdays = read_json_file(&paths.workdays)?;
        let project_log = read_json_file(&paths.project_log)?;
        Self::load(time_off, workdays, project_log, join_policy)
    }

    pub fn from_readers<A, B, C>(
        time_off: A,
        workdays: B,
        project_log: C,
        join_policy: JoinPolicy,
    ) -> Result<Self, DatasetError>
    where
        A: Read,
        B: Read,
        C: Read,
    {
        let time_off = read_json(time_off, "time off")?;
        let workdays = read_json(workdays, "workdays")?;
        let project_log = read_json(project_log, "project log")?;
        Self::load(time_off, workdays, project_log, join_policy)
    }

    pub fn summary(&self) -> &SummaryTable {
        &self.summary
    }

    pub fn project_log(&self) -> &[ProjectLogEntry] {
        &self.project_log
    }

    pub fn time_off(&self) -> &[TimeOffRecord] {
        &self.time_off
    }

    pub fn workdays(&self) -> &[WorkdaysRecord] {
        &self.workdays
    }

    pub fn join_policy(&self) -> JoinPolicy {
        self.join_policy
    }

    /// Earliest and latest project log dates, if the log has any rows.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.project_log.iter().map(|entry| entry.date).min()?;
        let last = self.project_log.iter().map(|entry| entry.date).max()?;
        Some((first, last))
    }

    /// Project names in order of first appearance in the log.
    pub fn projects(&self) -> Vec<&str> {
        ordered_unique(self.project_log.iter().map(|entry| entry.project.as_str()))
    }

    /// Alphabetical employee names for the assistant picker.
    pub fn chat_employees(&self) -> Vec<&str> {
        let mut names = ordered_unique(self.summary.employees());
        names.sort_unstable();
        names
    }
}

fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_json(std::io::BufReader::new(file), &path.display().to_string())
}

fn read_json<T: DeserializeOwned, R: Read>(
    reader: R,
    source_name: &str,
) -> Result<Vec<T>, DatasetError> {
    serde_json::from_reader(reader).map_err(|source| DatasetError::Json {
        source_name: source_name.to_string(),
        source,
    })
}

fn parse_project_log(raw: Vec<RawProjectLogEntry>) -> Result<Vec<ProjectLogEntry>, DatasetError> {
    raw.into_iter()
        .enumerate()
        .map(|(row, entry)| {
            let RawProjectLogEntry {
                employee,
                project,
                date,
                hours_worked,
            } = entry;

            let Some(value) = date else {
                return Err(DatasetError::MissingDate { row, employee });
            };
            let date = match parse_log_date(&value) {
                Ok(date) => date,
                Err(source) => {
                    return Err(DatasetError::MalformedDate {
                        row,
                        employee,
                        value,
                        source,
                    })
                }
            };

            Ok(ProjectLogEntry {
                employee,
                project,
                date,
                hours_worked,
            })
        })
        .collect()
}

/// `%Y` alone accepts any year width, so the four-digit year is checked by hand.
fn parse_log_date(value: &str) -> Result<NaiveDate, Option<chrono::ParseError>> {
    let four_digit_year = value
        .rsplit('/')
        .next()
        .is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()));
    if !four_digit_year || value.chars().any(char::is_whitespace) {
        return Err(None);
    }
    NaiveDate::parse_from_str(value, PROJECT_LOG_DATE_FORMAT).map_err(Some)
}

fn join_summary(
    time_off: &[TimeOffRecord],
    workdays: &[WorkdaysRecord],
    project_log: &[ProjectLogEntry],
    join_policy: JoinPolicy,
) -> SummaryTable {
    let workdays_by_employee = first_per_employee(
        workdays
            .iter()
            .map(|record| (record.employee.as_str(), record.workdays)),
        "workdays",
    );
    let time_off_by_employee = first_per_employee(
        time_off
            .iter()
            .map(|record| (record.employee.as_str(), record.time_off_days)),
        "time off",
    );

    let mut hours_by_employee: HashMap<&str, f64> = HashMap::new();
    for entry in project_log {
        *hours_by_employee.entry(entry.employee.as_str()).or_default() += entry.hours_worked;
    }

    let candidates = match join_policy {
        JoinPolicy::Inner => ordered_unique(workdays.iter().map(|record| record.employee.as_str()))
            .into_iter()
            .filter(|employee| {
                time_off_by_employee.contains_key(employee)
                    && hours_by_employee.contains_key(employee)
            })
            .collect(),
        JoinPolicy::Outer => ordered_unique(
            workdays
                .iter()
                .map(|record| record.employee.as_str())
                .chain(time_off.iter().map(|record| record.employee.as_str()))
                .chain(project_log.iter().map(|entry| entry.employee.as_str())),
        ),
    };

    let rows = candidates
        .into_iter()
        .map(|employee| EmployeeSummary {
            employee: employee.to_string(),
            workdays: workdays_by_employee.get(employee).copied().into(),
            time_off_days: time_off_by_employee.get(employee).copied().into(),
            hours_worked: hours_by_employee.get(employee).copied().into(),
        })
        .collect::<Vec<_>>();

    if join_policy == JoinPolicy::Outer {
        let incomplete = rows
            .iter()
            .filter(|row| {
                !(row.workdays.is_available()
                    && row.time_off_days.is_available()
                    && row.hours_worked.is_available())
            })
            .count();
        if incomplete > 0 {
            debug!(incomplete, "employees missing from at least one dataset");
        }
    }

    SummaryTable::new(rows)
}

fn first_per_employee<'a, I>(records: I, dataset: &'static str) -> HashMap<&'a str, f64>
where
    I: Iterator<Item = (&'a str, f64)>,
{
    let mut by_employee = HashMap::new();
    for (employee, value) in records {
        if by_employee.contains_key(employee) {
            warn!(employee, dataset, "duplicate record ignored");
            continue;
        }
        by_employee.insert(employee, value);
    }
    by_employee
}

pub(crate) fn ordered_unique<'a, I>(values: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(*value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn time_off(employee: &str, days: f64) -> TimeOffRecord {
        TimeOffRecord {
            employee: employee.to_string(),
            time_off_days: days,
        }
    }

    fn workdays(employee: &str, days: f64) -> WorkdaysRecord {
        WorkdaysRecord {
            employee: employee.to_string(),
            workdays: days,
        }
    }

    #[test]
    fn malformed_date_is_fatal() {
        let error = AttendanceDataset::load(
            vec![time_off("Alice", 2.0)],
            vec![workdays("Alice", 20.0)],
            vec![
                RawProjectLogEntry::new("Alice", "ProjA", "01/05/2023", 4.0),
                RawProjectLogEntry::new("Alice", "ProjA", "2023-01-06", 4.0),
            ],
            JoinPolicy::Outer,
        )
        .expect_err("iso date rejected");

        match error {
            DatasetError::MalformedDate { row, value, .. } => {
                assert_eq!(row, 1);
                assert_eq!(value, "2023-01-06");
            }
            other => panic!("expected malformed date, got {other:?}"),
        }
    }

    #[test]
    fn two_digit_year_is_fatal() {
        let error = AttendanceDataset::load(
            Vec::new(),
            Vec::new(),
            vec![
                RawProjectLogEntry::new("Alice", "ProjA", "01/05/2023", 4.0),
                RawProjectLogEntry::new("Bob", "ProjA", "02/10/23", 6.0),
            ],
            JoinPolicy::Outer,
        )
        .expect_err("two digit year rejected");

        match error {
            DatasetError::MalformedDate { row, value, .. } => {
                assert_eq!(row, 1);
                assert_eq!(value, "02/10/23");
            }
            other => panic!("expected malformed date, got {other:?}"),
        }
    }

    #[test]
    fn padded_or_unpadded_dates_parse_but_spaces_do_not() {
        assert_eq!(
            parse_log_date("1/5/2023"),
            Ok(NaiveDate::from_ymd_opt(2023, 1, 5).expect("valid date"))
        );
        assert_eq!(parse_log_date(" 01/05/2023"), Err(None));
        assert_eq!(parse_log_date("01/05/02023"), Err(None));
        assert!(matches!(parse_log_date("13/05/2023"), Err(Some(_))));
    }

    #[test]
    fn missing_date_is_fatal() {
        let mut entry = RawProjectLogEntry::new("Bob", "ProjA", "", 1.0);
        entry.date = None;
        let error = AttendanceDataset::load(Vec::new(), Vec::new(), vec![entry], JoinPolicy::Outer)
            .expect_err("missing date rejected");
        assert!(matches!(error, DatasetError::MissingDate { row: 0, .. }));
    }

    #[test]
    fn duplicate_records_keep_first_value() {
        let dataset = AttendanceDataset::load(
            vec![time_off("Alice", 2.0), time_off("Alice", 9.0)],
            vec![workdays("Alice", 20.0)],
            vec![RawProjectLogEntry::new("Alice", "ProjA", "01/05/2023", 4.0)],
            JoinPolicy::Inner,
        )
        .expect("dataset loads");

        let row = dataset.summary().get("Alice").expect("row present");
        assert_eq!(row.time_off_days, Tally::Known(2.0));
        assert_eq!(dataset.summary().len(), 1);
    }

    #[test]
    fn readers_report_which_source_is_invalid() {
        let error = AttendanceDataset::from_readers(
            Cursor::new("[]"),
            Cursor::new("{not json"),
            Cursor::new("[]"),
            JoinPolicy::Outer,
        )
        .expect_err("invalid workdays");

        match error {
            DatasetError::Json { source_name, .. } => assert_eq!(source_name, "workdays"),
            other => panic!("expected json error, got {other:?}"),
        }
    }

    #[test]
    fn from_paths_propagates_io_errors() {
        let paths = DatasetPaths::in_dir("./does-not-exist");
        let error = AttendanceDataset::from_paths(&paths, JoinPolicy::Outer)
            .expect_err("expected io error");
        assert!(matches!(error, DatasetError::Io { .. }));
    }

    #[test]
    fn span_and_projects_follow_log() {
        let dataset = AttendanceDataset::load(
            Vec::new(),
            Vec::new(),
            vec![
                RawProjectLogEntry::new("Bob", "Beta", "03/01/2023", 2.0),
                RawProjectLogEntry::new("Alice", "Alpha", "01/15/2023", 3.0),
                RawProjectLogEntry::new("Alice", "Beta", "02/01/2023", 3.0),
            ],
            JoinPolicy::Outer,
        )
        .expect("dataset loads");

        assert_eq!(
            dataset.date_span(),
            Some((
                NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()
            ))
        );
        assert_eq!(dataset.projects(), vec!["Beta", "Alpha"]);
        assert_eq!(dataset.chat_employees(), vec!["Alice", "Bob"]);
    }
}
