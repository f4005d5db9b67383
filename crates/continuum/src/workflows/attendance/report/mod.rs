mod builder;
pub use builder::visualize;
pub mod views;

pub use views::{
    AttendanceReportView, ChartPoint, ChartSeries, ChartView, ReportOptions, SummaryRowView,
    VisualizationView,
};
