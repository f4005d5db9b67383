use crate::infra::{default_profile, InMemoryPersonalLog};
use chrono::NaiveDate;
use clap::Args;
use continuum::config::AppConfig;
use continuum::error::AppError;
use continuum::workflows::assistant::{
    Assistant, AssistantQuestion, ChatCompletion, OpenAiCompatibleClient, Page,
};
use continuum::workflows::attendance::report::{
    AttendanceReportView, ChartView, SummaryRowView,
};
use continuum::workflows::attendance::{AttendanceDataset, EmployeeQueryResult, ReportFilter};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Project to report on (defaults to All)
    #[arg(long)]
    pub(crate) project: Option<String>,
    /// Employee to report on (defaults to All)
    #[arg(long)]
    pub(crate) employee: Option<String>,
    /// Full month name, e.g. February (defaults to All)
    #[arg(long)]
    pub(crate) month: Option<String>,
    /// Also print the chart series behind the visualization page
    #[arg(long)]
    pub(crate) charts: bool,
}

#[derive(Args, Debug)]
pub(crate) struct EmployeeArgs {
    /// Employee name as it appears in the exports
    pub(crate) name: String,
    /// Window start (YYYY-MM-DD). Defaults to the earliest log entry.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Window end (YYYY-MM-DD). Defaults to the latest log entry.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) end: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct AskArgs {
    /// Employee the question is about
    pub(crate) employee: String,
    /// Question or navigation request
    pub(crate) question: String,
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start: Option<NaiveDate>,
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) end: Option<NaiveDate>,
    /// Print the prompt instead of calling the chat endpoint
    #[arg(long)]
    pub(crate) dry_run: bool,
}

fn load_dataset(config: &AppConfig) -> Result<Arc<AttendanceDataset>, AppError> {
    let dataset = AttendanceDataset::from_paths(&config.data.paths, config.data.join_policy)?;
    Ok(Arc::new(dataset))
}

fn build_assistant(
    config: &AppConfig,
    dataset: Arc<AttendanceDataset>,
) -> Result<Assistant<OpenAiCompatibleClient>, AppError> {
    let client = OpenAiCompatibleClient::new(&config.llm)?;
    Ok(Assistant::new(
        dataset,
        Arc::new(client),
        config.llm.model.clone(),
        config.llm.temperature,
    ))
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let dataset = load_dataset(&config)?;
    let filter = ReportFilter::from_labels(
        args.project.as_deref(),
        args.employee.as_deref(),
        args.month.as_deref(),
    )?;

    render_report(&dataset.report(&filter));
    if args.charts {
        let charts = dataset.visualization(&filter);
        render_chart(&charts.hours_by_employee);
        render_chart(&charts.workdays_and_time_off);
    }

    Ok(())
}

pub(crate) fn run_employee(args: EmployeeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let dataset = load_dataset(&config)?;
    let result = dataset.query_employee(&args.name, args.start, args.end);
    render_employee(&result);
    Ok(())
}

pub(crate) async fn run_ask(args: AskArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let dataset = load_dataset(&config)?;
    let assistant = build_assistant(&config, dataset)?;
    let question = AssistantQuestion {
        employee: args.employee,
        start: args.start,
        end: args.end,
        question: args.question,
    };

    if args.dry_run {
        let request = assistant.prepare(&question)?;
        println!("Model: {} (temperature {})", request.model, request.temperature);
        for message in &request.messages {
            println!("\n[{:?}]\n{}", message.role, message.content);
        }
        return Ok(());
    }

    let reply = assistant.ask(&question).await?;
    println!("{}", reply.response);
    if let Some(page) = reply.navigate_to {
        println!("\nNavigate to: {}", page.label());
    }
    Ok(())
}

/// Offline walk-through of the dashboard against the configured exports.
pub(crate) fn run_demo() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let dataset = load_dataset(&config)?;

    println!("Continuum attendance demo");
    println!(
        "Join policy: {} | employees: {} | projects: {}",
        dataset.join_policy().label(),
        dataset.summary().len(),
        dataset.projects().len()
    );
    if let Some((first, last)) = dataset.date_span() {
        println!("Project log spans {first} to {last}");
    }

    println!("\nPages:");
    for page in Page::ordered() {
        println!("- {}: {}", page.label(), page.description());
    }

    println!();
    render_report(&dataset.report(&ReportFilter::default()));

    let Some(employee) = dataset.chat_employees().first().map(|name| name.to_string()) else {
        println!("\nNo project log entries; skipping the assistant preview.");
        return Ok(());
    };

    println!();
    render_employee(&dataset.query_employee(&employee, None, None));

    let assistant = build_assistant(&config, dataset)?;
    preview_prompt(&assistant, &employee)?;

    let personal = InMemoryPersonalLog::synthetic(config.attendance_year);
    let view = personal.view(&default_profile());
    println!("\n{} ({}) - {} summary", view.name, view.job_title, view.year);
    for month in &view.monthly_summary {
        println!(
            "  {}: {} h | {} workdays | {} h time off",
            month.month, month.hours_worked, month.workdays, month.time_off
        );
    }

    Ok(())
}

fn preview_prompt<C: ChatCompletion>(
    assistant: &Assistant<C>,
    employee: &str,
) -> Result<(), AppError> {
    let request = assistant.prepare(&AssistantQuestion {
        employee: employee.to_string(),
        start: None,
        end: None,
        question: "Which projects did they work on?".to_string(),
    })?;
    if let Some(message) = request.messages.last() {
        println!("\nAssistant prompt preview:\n{}", message.content);
    }
    Ok(())
}

pub(crate) fn render_report(view: &AttendanceReportView) {
    println!("Attendance report ({})", view.filter);
    if view.rows.is_empty() {
        println!("  no matching employees");
        return;
    }

    println!(
        "  {:<20} {:>10} {:>14} {:>13}",
        "Employee", "Workdays", "Time Off Days", "Hours Worked"
    );
    for SummaryRowView {
        employee,
        workdays,
        time_off_days,
        hours_worked,
    } in &view.rows
    {
        println!(
            "  {:<20} {:>10} {:>14} {:>13}",
            employee,
            workdays.to_string(),
            time_off_days.to_string(),
            hours_worked.to_string()
        );
    }
}

fn render_chart(chart: &ChartView) {
    println!("\n{}", chart.title);
    for series in &chart.series {
        println!("  {}:", series.name);
        for point in &series.points {
            println!("    {:<20} {}", point.employee, point.value);
        }
    }
}

pub(crate) fn render_employee(result: &EmployeeQueryResult) {
    println!("Employee: {}", result.employee);
    if let Some(window) = result.window {
        println!("Window: {window}");
    }
    println!("Total hours worked: {}", result.total_hours);
    println!("Projects: {}", join_or_none(&result.projects));
    println!("Coworkers: {}", join_or_none(&result.coworkers));
    println!("Time off days: {}", result.time_off);
    println!("Workdays: {}", result.workdays);
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}
