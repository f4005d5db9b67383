use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Instructions,
    Attendance,
    MyAttendance,
    AttendanceReport,
    Visualization,
}

impl Page {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Home,
            Self::Instructions,
            Self::Attendance,
            Self::MyAttendance,
            Self::AttendanceReport,
            Self::Visualization,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Instructions => "Instructions",
            Self::Attendance => "Attendance",
            Self::MyAttendance => "My Attendance",
            Self::AttendanceReport => "Attendance Report",
            Self::Visualization => "Visualization",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Home | Self::Instructions => {
                "This is a mock version of 'Continuum by IFF'. Use the chatbot to help navigate \
                 the site or find information about employee attendance data."
            }
            Self::Attendance => "This is the attendance page",
            Self::MyAttendance => "Daily attendance log with a monthly summary.",
            Self::AttendanceReport => "Employee summary filtered by project, employee and month.",
            Self::Visualization => {
                "Hours worked, workdays and time off by employee for the selected filters."
            }
        }
    }

    /// Accepts either the snake_case key or the display label.
    pub fn parse(value: &str) -> Option<Self> {
        let wanted = value.trim();
        Self::ordered().into_iter().find(|page| {
            page.label().eq_ignore_ascii_case(wanted)
                || page.key().eq_ignore_ascii_case(wanted)
        })
    }

    const fn key(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Instructions => "instructions",
            Self::Attendance => "attendance",
            Self::MyAttendance => "my_attendance",
            Self::AttendanceReport => "attendance_report",
            Self::Visualization => "visualization",
        }
    }
}

/// Checked in order; the first keyword found anywhere in the reply wins.
/// "my attendance" must precede "attendance" or it never matches.
const NAVIGATION_KEYWORDS: [(&str, Page); 6] = [
    ("home", Page::Home),
    ("instructions", Page::Instructions),
    ("my attendance", Page::MyAttendance),
    ("attendance", Page::Attendance),
    ("report", Page::AttendanceReport),
    ("visualization", Page::Visualization),
];

/// Pick a destination page from free-text model output.
pub fn navigate(response: &str) -> Option<Page> {
    let lowered = response.to_lowercase();
    NAVIGATION_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, page)| *page)
}
