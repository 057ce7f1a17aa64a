use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::task::{ColorTag, Task};

/// Display status of a task relative to a given day. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Done,
    Late,
    TodayPending,
    Future,
}

impl TaskStatus {
    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Late => "late",
            Self::TodayPending => "today",
            Self::Future => "future",
        }
    }

    pub fn is_pending(&self) -> bool {
        !matches!(self, Self::Done)
    }
}

/// Completion wins over everything: a done task is never late.
pub fn classify(task: &Task, today: NaiveDate) -> TaskStatus {
    if task.done {
        TaskStatus::Done
    } else if task.date < today {
        TaskStatus::Late
    } else if task.date == today {
        TaskStatus::TodayPending
    } else {
        TaskStatus::Future
    }
}

/// Color a task is drawn with: green when done, red when late, its own tag otherwise.
pub fn display_color(task: &Task, today: NaiveDate) -> ColorTag {
    match classify(task, today) {
        TaskStatus::Done => ColorTag::Green,
        TaskStatus::Late => ColorTag::Red,
        TaskStatus::TodayPending | TaskStatus::Future => task.color_tag,
    }
}
