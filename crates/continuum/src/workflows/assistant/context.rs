use crate::workflows::attendance::EmployeeQueryResult;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant for IFF Continuum. Answer questions \
based on the provided employee information or navigate to pages. Be concise and don't ask \
follow-up questions.";

/// Context block describing one employee for the model. The date range line
/// appears only when the caller asked for a window.
pub fn build_context(result: &EmployeeQueryResult, include_window: bool) -> String {
    let mut lines = vec![format!("Employee: {}", result.employee)];

    if include_window {
        if let Some(window) = result.window {
            lines.push(format!("Date Range: {window}"));
        }
    }

    lines.push(format!("Total Hours Worked: {}", result.total_hours));
    lines.push(format!("Projects Worked On: {}", result.projects.join(", ")));
    lines.push(format!("Coworkers: {}", result.coworkers.join(", ")));
    lines.push(format!("Total Time Off Days: {}", result.time_off));
    lines.push(format!("Total Workdays: {}", result.workdays));

    lines.join("\n")
}

pub fn user_message(context: &str, question: &str) -> String {
    format!("Context: {context}\n\nQuestion or Navigation: {question}")
}
