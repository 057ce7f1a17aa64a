use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

use super::task::ItemId;
use super::timestamp;
use crate::error::{Error, Result};

/// A free-text note or alert. No date binding and no status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub id: ItemId,
    pub text: String,
    #[serde(default, with = "timestamp")]
    pub created_at: NaiveDateTime,
}

/// Newest-first list of memos. Used for both notes and alerts.
///
/// Deserialization goes through [`MemoList::from_items`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MemoList {
    items: Vec<Memo>,
}

impl MemoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from stored memos, keeping their order. Text is trimmed;
    /// blank memos and repeated ids are dropped with a warning.
    pub fn from_items(items: Vec<Memo>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(items.len());
        for mut memo in items {
            let text = memo.text.trim();
            if text.is_empty() {
                log::warn!("Dropping memo {} with empty text", memo.id);
                continue;
            }
            memo.text = text.to_string();
            if !seen.insert(memo.id.clone()) {
                log::warn!("Dropping duplicate memo id {}", memo.id);
                continue;
            }
            kept.push(memo);
        }
        Self { items: kept }
    }

    pub fn add(&mut self, text: &str) -> Result<Memo> {
        self.add_at(text, timestamp::now())
    }

    pub fn add_at(&mut self, text: &str, created_at: NaiveDateTime) -> Result<Memo> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Validation("memo text must not be empty".into()));
        }
        let memo = Memo {
            id: ItemId::generate(),
            text: text.to_string(),
            created_at,
        };
        self.items.insert(0, memo.clone());
        Ok(memo)
    }

    /// Returns the removed memo, or `None` if it was already gone.
    pub fn remove(&mut self, id: &ItemId) -> Option<Memo> {
        let pos = self.items.iter().position(|m| &m.id == id)?;
        Some(self.items.remove(pos))
    }

    pub fn get(&self, id: &ItemId) -> Option<&Memo> {
        self.items.iter().find(|m| &m.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Memo> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'de> Deserialize<'de> for MemoList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<Memo>::deserialize(deserializer).map(Self::from_items)
    }
}
