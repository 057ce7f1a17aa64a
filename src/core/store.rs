//! In-memory task store keyed by date.
//!
//! # Invariants
//! - A task is filed under exactly one key: its own `date`.
//! - Task ids are unique across the whole store.
//! - Titles are non-empty and trimmed.
//! - Day lists are never empty; a list is dropped with its last task.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};

use super::calendar::first_of_month;
use super::task::{ColorTag, ItemId, Task, normalize_title};
use super::temporal::TodayView;
use super::timestamp;
use crate::error::{Error, Result};

/// Serialized shape of the store: ISO date → tasks, newest first.
pub type TaskStoreState = BTreeMap<NaiveDate, Vec<Task>>;

/// Changes requested by an edit. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub color_tag: Option<ColorTag>,
}

/// Completion counter for one day, e.g. "2/5 done today".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayProgress {
    pub done: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    days: TaskStoreState,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted state, repairing anything that breaks
    /// the invariants: misfiled tasks move to their own date, repeated ids
    /// and blank titles are dropped.
    pub fn from_state(state: TaskStoreState) -> Self {
        let mut store = Self::default();
        let mut seen = HashSet::new();

        for (key, tasks) in state {
            for mut task in tasks {
                match normalize_title(&task.title) {
                    Ok(title) => task.title = title,
                    Err(_) => {
                        log::warn!("Dropping task {} with empty title", task.id);
                        continue;
                    }
                }
                if !seen.insert(task.id.clone()) {
                    log::warn!("Dropping duplicate task id {}", task.id);
                    continue;
                }
                if task.date != key {
                    log::warn!("Refiling task {} from {} to {}", task.id, key, task.date);
                }
                store.days.entry(task.date).or_default().push(task);
            }
        }

        store
    }

    pub fn state(&self) -> &TaskStoreState {
        &self.days
    }

    pub fn into_state(self) -> TaskStoreState {
        self.days
    }

    pub fn add_task(&mut self, date: NaiveDate, title: &str, color_tag: ColorTag) -> Result<Task> {
        self.add_task_at(date, title, color_tag, timestamp::now())
    }

    /// Insert a new task at the head of `date`'s list.
    pub fn add_task_at(
        &mut self,
        date: NaiveDate,
        title: &str,
        color_tag: ColorTag,
        created_at: NaiveDateTime,
    ) -> Result<Task> {
        let title = normalize_title(title)?;
        let task = Task {
            title,
            color_tag,
            created_at,
            ..Task::new(String::new(), date)
        };
        self.days.entry(date).or_default().insert(0, task.clone());
        log::debug!("Added task {} on {}", task.id, date);
        Ok(task)
    }

    /// Flip `done` and return the new value.
    pub fn toggle_done(&mut self, id: &ItemId) -> Result<bool> {
        let task = self
            .days
            .values_mut()
            .flat_map(|list| list.iter_mut())
            .find(|t| &t.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        Ok(task.toggle())
    }

    /// Apply `edit` to a task. A new date moves the task to the head of that
    /// day's list; otherwise it keeps its position.
    pub fn edit_task(&mut self, id: &ItemId, edit: TaskEdit) -> Result<Task> {
        let (old_date, pos) = self
            .locate(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let title = edit.title.as_deref().map(normalize_title).transpose()?;
        let new_date = edit.date.unwrap_or(old_date);

        let list = self
            .days
            .get_mut(&old_date)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if new_date == old_date {
            let task = &mut list[pos];
            apply_edit(task, title, edit.color_tag);
            return Ok(task.clone());
        }

        let mut task = list.remove(pos);
        if list.is_empty() {
            self.days.remove(&old_date);
        }
        apply_edit(&mut task, title, edit.color_tag);
        task.date = new_date;
        self.days.entry(new_date).or_default().insert(0, task.clone());
        log::debug!("Moved task {} from {} to {}", task.id, old_date, new_date);
        Ok(task)
    }

    /// Remove a task. Deleting an absent id is a no-op and returns `None`.
    pub fn delete_task(&mut self, id: &ItemId) -> Option<Task> {
        let (date, pos) = self.locate(id)?;
        let list = self.days.get_mut(&date)?;
        let task = list.remove(pos);
        if list.is_empty() {
            self.days.remove(&date);
        }
        Some(task)
    }

    pub fn get(&self, id: &ItemId) -> Option<&Task> {
        self.iter().find(|t| &t.id == id)
    }

    pub fn tasks_for_date(&self, date: NaiveDate) -> &[Task] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Open tasks dated before `today`, oldest date first.
    pub fn overdue_tasks(&self, today: NaiveDate) -> Vec<&Task> {
        self.days
            .range(..today)
            .flat_map(|(_, list)| list.iter())
            .filter(|t| !t.done)
            .collect()
    }

    pub fn today_view(&self, today: NaiveDate) -> TodayView {
        TodayView::build(self, today)
    }

    /// Tasks listed for the selected day. On today this includes the
    /// overdue backlog, ahead of today's own tasks.
    pub fn view_for(&self, selected: NaiveDate, today: NaiveDate) -> Vec<Task> {
        if selected == today {
            self.today_view(today).into_tasks()
        } else {
            self.tasks_for_date(selected).to_vec()
        }
    }

    pub fn day_progress(&self, date: NaiveDate) -> DayProgress {
        let tasks = self.tasks_for_date(date);
        DayProgress {
            done: tasks.iter().filter(|t| t.done).count(),
            total: tasks.len(),
        }
    }

    /// Days of the month that still have open tasks, for calendar markers.
    pub fn busy_days(&self, year: i32, month0: i32) -> HashSet<NaiveDate> {
        let Some(first) = first_of_month(year, month0) else {
            return HashSet::new();
        };
        let next = first_of_month(year, month0 + 1);

        self.days
            .range(first..)
            .take_while(|(date, _)| next.is_none_or(|n| **date < n))
            .filter(|(_, list)| list.iter().any(|t| !t.done))
            .map(|(date, _)| *date)
            .collect()
    }

    /// Dates that have at least one task, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.days.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    fn locate(&self, id: &ItemId) -> Option<(NaiveDate, usize)> {
        self.days.iter().find_map(|(date, list)| {
            list.iter().position(|t| &t.id == id).map(|pos| (*date, pos))
        })
    }
}

fn apply_edit(task: &mut Task, title: Option<String>, color_tag: Option<ColorTag>) {
    if let Some(title) = title {
        task.title = title;
    }
    if let Some(color_tag) = color_tag {
        task.color_tag = color_tag;
    }
}

impl Serialize for TaskStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.days.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TaskStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        TaskStoreState::deserialize(deserializer).map(Self::from_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ids(tasks: &[Task]) -> Vec<ItemId> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    /// A, B, C, D from the reference scenario, with today = 2024-03-10.
    fn scenario() -> (TaskStore, [ItemId; 4]) {
        let mut store = TaskStore::new();
        let a = store.add_task(date("2024-03-05"), "A", ColorTag::Blue).unwrap();
        let b = store.add_task(date("2024-03-10"), "B", ColorTag::Blue).unwrap();
        let c = store.add_task(date("2024-03-05"), "C", ColorTag::Blue).unwrap();
        store.toggle_done(&c.id).unwrap();
        let d = store.add_task(date("2024-03-20"), "D", ColorTag::Blue).unwrap();
        (store, [a.id, b.id, c.id, d.id])
    }

    #[test]
    fn add_puts_new_task_first() {
        let mut store = TaskStore::new();
        let day = date("2024-03-10");
        store.add_task(day, "older", ColorTag::Blue).unwrap();
        let newer = store.add_task(day, "  newer ", ColorTag::Green).unwrap();
        assert_eq!(newer.title, "newer");
        assert_eq!(store.tasks_for_date(day)[0], newer);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn add_rejects_blank_title() {
        let mut store = TaskStore::new();
        let err = store.add_task(date("2024-03-10"), "   ", ColorTag::Blue).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn add_at_keeps_timestamp() {
        let mut store = TaskStore::new();
        let at = date("2024-03-01").and_hms_opt(9, 30, 0).unwrap();
        let task = store.add_task_at(date("2024-03-10"), "x", ColorTag::Red, at).unwrap();
        assert_eq!(task.created_at, at);
        assert_eq!(store.get(&task.id).map(|t| t.created_at), Some(at));
    }

    #[test]
    fn toggle_flips_and_reports() {
        let mut store = TaskStore::new();
        let task = store.add_task(date("2024-03-05"), "x", ColorTag::Blue).unwrap();
        assert!(store.toggle_done(&task.id).unwrap());
        assert!(!store.toggle_done(&task.id).unwrap());
        assert!(matches!(
            store.toggle_done(&ItemId::from("missing")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn delete_is_idempotent() {
        let mut store = TaskStore::new();
        let day = date("2024-03-10");
        let keep = store.add_task(day, "keep", ColorTag::Blue).unwrap();
        let gone = store.add_task(day, "gone", ColorTag::Blue).unwrap();

        assert_eq!(store.delete_task(&gone.id).map(|t| t.id), Some(gone.id.clone()));
        assert_eq!(ids(store.tasks_for_date(day)), vec![keep.id.clone()]);
        assert!(store.delete_task(&gone.id).is_none());
        assert_eq!(store.len(), 1);

        store.delete_task(&keep.id);
        assert!(store.tasks_for_date(day).is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn edit_moves_between_dates() {
        let mut store = TaskStore::new();
        let old_day = date("2024-03-10");
        let new_day = date("2024-03-12");
        let other = store.add_task(new_day, "already there", ColorTag::Blue).unwrap();
        let task = store.add_task(old_day, "move me", ColorTag::Purple).unwrap();
        store.toggle_done(&task.id).unwrap();

        let moved = store
            .edit_task(&task.id, TaskEdit { date: Some(new_day), ..TaskEdit::default() })
            .unwrap();

        assert!(store.tasks_for_date(old_day).is_empty());
        assert_eq!(ids(store.tasks_for_date(new_day)), vec![task.id.clone(), other.id]);
        assert_eq!(moved.date, new_day);
        assert_eq!(moved.title, task.title);
        assert_eq!(moved.created_at, task.created_at);
        assert_eq!(moved.color_tag, ColorTag::Purple);
        assert!(moved.done);
        assert_eq!(store.dates().collect::<Vec<_>>(), vec![new_day]);
    }

    #[test]
    fn edit_in_place_keeps_position() {
        let mut store = TaskStore::new();
        let day = date("2024-03-10");
        let first = store.add_task(day, "first", ColorTag::Blue).unwrap();
        let second = store.add_task(day, "second", ColorTag::Blue).unwrap();

        let edited = store
            .edit_task(
                &first.id,
                TaskEdit {
                    title: Some(" renamed ".into()),
                    date: Some(day),
                    color_tag: Some(ColorTag::Yellow),
                },
            )
            .unwrap();

        assert_eq!(edited.title, "renamed");
        assert_eq!(edited.color_tag, ColorTag::Yellow);
        assert_eq!(ids(store.tasks_for_date(day)), vec![second.id, first.id]);
    }

    #[test]
    fn failed_edit_changes_nothing() {
        let (mut store, [a, ..]) = scenario();
        let before = store.clone();

        let blank = TaskEdit {
            title: Some("  ".into()),
            date: Some(date("2024-04-01")),
            ..TaskEdit::default()
        };
        assert!(matches!(store.edit_task(&a, blank), Err(Error::Validation(_))));
        assert!(matches!(
            store.edit_task(&ItemId::from("nope"), TaskEdit::default()),
            Err(Error::NotFound(_))
        ));
        assert_eq!(store, before);
    }

    #[test]
    fn overdue_scenario() {
        let (store, [a, ..]) = scenario();
        let overdue: Vec<&ItemId> = store
            .overdue_tasks(date("2024-03-10"))
            .into_iter()
            .map(|t| &t.id)
            .collect();
        assert_eq!(overdue, vec![&a]);
    }

    #[test]
    fn overdue_spans_dates_in_order() {
        let mut store = TaskStore::new();
        store.add_task(date("2024-03-09"), "mar", ColorTag::Blue).unwrap();
        store.add_task(date("2024-02-28"), "feb", ColorTag::Blue).unwrap();
        store.add_task(date("2024-03-10"), "today", ColorTag::Blue).unwrap();
        let titles: Vec<&str> = store
            .overdue_tasks(date("2024-03-10"))
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, ["feb", "mar"]);
        assert!(store.overdue_tasks(date("2024-02-28")).is_empty());
    }

    #[test]
    fn view_for_today_lists_overdue_first() {
        let (store, [a, b, ..]) = scenario();
        let today = date("2024-03-10");
        assert_eq!(ids(&store.view_for(today, today)), vec![a, b]);

        let other = store.view_for(date("2024-03-05"), today);
        assert_eq!(other.len(), 2);
        assert!(other.iter().all(|t| t.date == date("2024-03-05")));
    }

    #[test]
    fn progress_and_busy_days() {
        let (store, _) = scenario();
        assert_eq!(store.day_progress(date("2024-03-05")), DayProgress { done: 1, total: 2 });
        assert_eq!(store.day_progress(date("2024-01-01")), DayProgress::default());

        let busy = store.busy_days(2024, 2);
        let expected: HashSet<NaiveDate> =
            ["2024-03-05", "2024-03-10", "2024-03-20"].into_iter().map(date).collect();
        assert_eq!(busy, expected);
        assert!(store.busy_days(2024, 3).is_empty());
    }

    #[test]
    fn busy_days_ignores_fully_done_days() {
        let mut store = TaskStore::new();
        let t = store.add_task(date("2024-03-07"), "x", ColorTag::Blue).unwrap();
        store.toggle_done(&t.id).unwrap();
        assert!(store.busy_days(2024, 2).is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let (store, _) = scenario();
        let json = serde_json::to_string(&store).unwrap();
        let back: TaskStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn from_state_repairs_invariants() {
        let misfiled = Task::new("misfiled", date("2024-03-07"));
        let dup = Task::new("first copy", date("2024-03-05"));
        let mut dup_again = dup.clone();
        dup_again.title = "second copy".into();
        let blank = Task::new("  ", date("2024-03-05"));

        let mut state = TaskStoreState::new();
        state.insert(date("2024-03-05"), vec![dup.clone(), misfiled.clone(), blank, dup_again]);
        state.insert(date("2024-03-06"), Vec::new());

        let store = TaskStore::from_state(state);
        assert_eq!(store.len(), 2);
        assert_eq!(ids(store.tasks_for_date(date("2024-03-05"))), vec![dup.id.clone()]);
        assert_eq!(store.get(&dup.id).map(|t| t.title.as_str()), Some("first copy"));
        assert_eq!(ids(store.tasks_for_date(date("2024-03-07"))), vec![misfiled.id]);
        assert!(store.tasks_for_date(date("2024-03-06")).is_empty());
        assert_eq!(store.dates().count(), 2);
    }
}
