//! The agenda: tasks, notes and alerts kept in memory and flushed to
//! storage after every change.
//!
//! # Invariants
//! - A mutation that fails validation is not applied and not flushed.
//! - A failed flush is logged; the in-memory change stays and is written by
//!   the next successful flush.

use chrono::NaiveDate;

use crate::config::AgendaConfig;
use crate::core::memo::{Memo, MemoList};
use crate::core::store::{TaskEdit, TaskStore};
use crate::core::task::{ColorTag, ItemId, Task};
use crate::error::Result;
use crate::storage::{FileStorage, KeyValueStorage, PersistenceAdapter};

pub struct Agenda<S: KeyValueStorage> {
    persistence: PersistenceAdapter<S>,
    tasks: TaskStore,
    notes: MemoList,
    alerts: MemoList,
}

impl Agenda<FileStorage> {
    /// Open the agenda stored in the configured data directory.
    pub fn from_config(config: &AgendaConfig) -> Self {
        Self::open(FileStorage::new(&config.data_directory), &config.storage_key)
    }
}

impl<S: KeyValueStorage> Agenda<S> {
    pub fn open(storage: S, key: &str) -> Self {
        let mut persistence = PersistenceAdapter::new(storage, key);
        let tasks = persistence.load();
        let notes = persistence.load_notes();
        let alerts = persistence.load_alerts();
        log::info!(
            "Loaded {} tasks, {} notes, {} alerts",
            tasks.len(),
            notes.len(),
            alerts.len()
        );
        Self {
            persistence,
            tasks,
            notes,
            alerts,
        }
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn notes(&self) -> &MemoList {
        &self.notes
    }

    pub fn alerts(&self) -> &MemoList {
        &self.alerts
    }

    pub fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    pub fn add_task(&mut self, date: NaiveDate, title: &str, color_tag: ColorTag) -> Result<Task> {
        let task = self.tasks.add_task(date, title, color_tag)?;
        self.flush_tasks();
        Ok(task)
    }

    pub fn edit_task(&mut self, id: &ItemId, edit: TaskEdit) -> Result<Task> {
        let task = self.tasks.edit_task(id, edit)?;
        self.flush_tasks();
        Ok(task)
    }

    pub fn toggle_done(&mut self, id: &ItemId) -> Result<bool> {
        let done = self.tasks.toggle_done(id)?;
        self.flush_tasks();
        Ok(done)
    }

    /// The caller is responsible for confirming with the user first.
    pub fn delete_task(&mut self, id: &ItemId) -> Option<Task> {
        let removed = self.tasks.delete_task(id)?;
        self.flush_tasks();
        Some(removed)
    }

    pub fn add_note(&mut self, text: &str) -> Result<Memo> {
        let memo = self.notes.add(text)?;
        self.flush_notes();
        Ok(memo)
    }

    pub fn remove_note(&mut self, id: &ItemId) -> Option<Memo> {
        let removed = self.notes.remove(id)?;
        self.flush_notes();
        Some(removed)
    }

    pub fn add_alert(&mut self, text: &str) -> Result<Memo> {
        let memo = self.alerts.add(text)?;
        self.flush_alerts();
        Ok(memo)
    }

    pub fn remove_alert(&mut self, id: &ItemId) -> Option<Memo> {
        let removed = self.alerts.remove(id)?;
        self.flush_alerts();
        Some(removed)
    }

    fn flush_tasks(&mut self) {
        if let Err(e) = self.persistence.save(&self.tasks) {
            log::error!("Failed to save tasks: {}", e);
        }
    }

    fn flush_notes(&mut self) {
        if let Err(e) = self.persistence.save_notes(&self.notes) {
            log::error!("Failed to save notes: {}", e);
        }
    }

    fn flush_alerts(&mut self) {
        if let Err(e) = self.persistence.save_alerts(&self.alerts) {
            log::error!("Failed to save alerts: {}", e);
        }
    }
}
