use super::super::dataset::{AttendanceDataset, SummaryTable};
use super::super::domain::{EmployeeSummary, Tally};
use super::super::filter::{month_labels, ReportFilter, ALL_LABEL};
use super::views::{
    AttendanceReportView, ChartPoint, ChartSeries, ChartView, ReportOptions, SummaryRowView,
    VisualizationView,
};

impl AttendanceDataset {
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            projects: with_all(self.projects()),
            employees: with_all(self.summary().employees().collect()),
            months: month_labels(),
        }
    }

    /// Filtered summary rows, ready to serialise for the report page.
    pub fn report(&self, filter: &ReportFilter) -> AttendanceReportView {
        let table = self.filter(self.summary(), filter);
        AttendanceReportView {
            filter: filter.to_string(),
            rows: table.rows().iter().map(EmployeeSummary::to_view).collect(),
        }
    }

    pub fn visualization(&self, filter: &ReportFilter) -> VisualizationView {
        visualize(&self.filter(self.summary(), filter))
    }
}

impl EmployeeSummary {
    pub fn to_view(&self) -> SummaryRowView {
        SummaryRowView {
            employee: self.employee.clone(),
            workdays: self.workdays,
            time_off_days: self.time_off_days,
            hours_worked: self.hours_worked,
        }
    }
}

/// Chart series for a (usually filtered) summary table. Rows whose figure
/// is not available are left out of that series.
pub fn visualize(table: &SummaryTable) -> VisualizationView {
    VisualizationView {
        hours_by_employee: ChartView {
            title: "Hours Worked by Employee",
            series: vec![series(table, "Hours Worked", |row| row.hours_worked)],
        },
        workdays_and_time_off: ChartView {
            title: "Workdays and Time Off Days by Employee",
            series: vec![
                series(table, "Workdays", |row| row.workdays),
                series(table, "Time Off Days", |row| row.time_off_days),
            ],
        },
    }
}

fn series<F>(table: &SummaryTable, name: &'static str, figure: F) -> ChartSeries
where
    F: Fn(&EmployeeSummary) -> Tally,
{
    let points = table
        .into_iter()
        .filter_map(|row| {
            figure(row).value().map(|value| ChartPoint {
                employee: row.employee.clone(),
                value,
            })
        })
        .collect();

    ChartSeries { name, points }
}

fn with_all(values: Vec<&str>) -> Vec<String> {
    std::iter::once(ALL_LABEL)
        .chain(values)
        .map(str::to_string)
        .collect()
}
