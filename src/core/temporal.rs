use chrono::NaiveDate;

use super::store::TaskStore;
use super::task::Task;

/// What the list shows when today is selected: the overdue backlog, then
/// today's own tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodayView {
    pub overdue: Vec<Task>,
    pub scheduled: Vec<Task>,
}

impl TodayView {
    pub fn build(store: &TaskStore, today: NaiveDate) -> Self {
        Self {
            overdue: store.overdue_tasks(today).into_iter().cloned().collect(),
            scheduled: store.tasks_for_date(today).to_vec(),
        }
    }

    /// Overdue first, then today's.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.overdue.iter().chain(self.scheduled.iter())
    }

    pub fn into_tasks(self) -> Vec<Task> {
        let mut tasks = self.overdue;
        tasks.extend(self.scheduled);
        tasks
    }

    pub fn pending_count(&self) -> usize {
        self.tasks().filter(|t| !t.done).count()
    }

    pub fn total_count(&self) -> usize {
        self.overdue.len() + self.scheduled.len()
    }
}
