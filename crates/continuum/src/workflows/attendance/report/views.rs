use super::super::domain::Tally;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ReportOptions {
    pub projects: Vec<String>,
    pub employees: Vec<String>,
    pub months: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRowView {
    pub employee: String,
    pub workdays: Tally,
    pub time_off_days: Tally,
    pub hours_worked: Tally,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceReportView {
    pub filter: String,
    pub rows: Vec<SummaryRowView>,
}

/// One bar in a chart series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub employee: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub name: &'static str,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub title: &'static str,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisualizationView {
    pub hours_by_employee: ChartView,
    pub workdays_and_time_off: ChartView,
}
