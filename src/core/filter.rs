use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::status::{TaskStatus, classify};
use super::task::Task;

/// Task list filters offered by the list header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Pending,
    Done,
    Today,
    Late,
}

impl FilterMode {
    pub const ALL: [FilterMode; 5] = [
        Self::All,
        Self::Pending,
        Self::Done,
        Self::Today,
        Self::Late,
    ];

    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Today => "today",
            Self::Late => "late",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "pending" => Some(Self::Pending),
            "done" => Some(Self::Done),
            "today" => Some(Self::Today),
            "late" => Some(Self::Late),
            _ => None,
        }
    }

    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.done,
            Self::Done => task.done,
            Self::Today => task.date == today,
            Self::Late => classify(task, today) == TaskStatus::Late,
        }
    }
}

/// Keep the tasks matching `mode`, preserving order. Does not touch the store.
pub fn apply_filter<'a, I>(tasks: I, mode: FilterMode, today: NaiveDate) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter(|t| mode.matches(t, today))
        .collect()
}
