use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use super::timestamp;
use crate::error::{Error, Result};

/// Identifier shared by tasks, notes and alerts.
///
/// New ids are UUIDs; ids read from older blobs are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User-chosen label color. Purely cosmetic, independent of the computed status.
///
/// Reads any keyword [`ColorTag::from_keyword`] accepts; an unknown or null
/// color falls back to the default rather than failing the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    #[default]
    Blue,
    Red,
    Green,
    Yellow,
    Purple,
}

impl<'de> Deserialize<'de> for ColorTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(Self::default());
        };
        Ok(Self::from_keyword(&raw).unwrap_or_else(|| {
            log::warn!("Unknown color {:?}, using {}", raw, Self::default().as_keyword());
            Self::default()
        }))
    }
}

impl ColorTag {
    pub const ALL: [ColorTag; 5] = [
        Self::Blue,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Purple,
    ];

    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
        }
    }

    /// Accepts the English keywords and the Portuguese palette names.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "blue" | "azul" => Some(Self::Blue),
            "red" | "vermelho" => Some(Self::Red),
            "green" | "verde" => Some(Self::Green),
            "yellow" | "amarelo" => Some(Self::Yellow),
            "purple" | "roxo" => Some(Self::Purple),
            _ => None,
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            Self::Blue => "#2F80ED",
            Self::Red => "#EF4444",
            Self::Green => "#10B981",
            Self::Yellow => "#F59E0B",
            Self::Purple => "#8B5CF6",
        }
    }
}

/// A to-do item bound to one calendar date.
///
/// Display status (late, today, ...) is derived, see [`crate::core::status`];
/// only the fields below are ever persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: ItemId,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default, with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub done: bool,
    /// Older blobs call this field `palette`.
    #[serde(default, alias = "palette")]
    pub color_tag: ColorTag,
}

impl Task {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: ItemId::generate(),
            title: title.into(),
            date,
            created_at: timestamp::now(),
            done: false,
            color_tag: ColorTag::default(),
        }
    }

    /// Flip completion and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.done = !self.done;
        self.done
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.done && self.date < today
    }
}

/// Trim a title and reject it when nothing is left.
pub fn normalize_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("task title must not be empty".into()));
    }
    Ok(trimmed.to_string())
}
