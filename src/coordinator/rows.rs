//! Headless model of the moderator's poll rows.
//!
//! Each row carries the two presentational highlight classes (`ring` and
//! `ring_color`) and an optional "active" badge. The classes are only written
//! through [`PollRow::set_active`], which keeps them paired.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::db::models::Enquete;

/// A poll as far as the board cares: an id and something to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub enquete_id: String,
    pub title: Option<String>,
    #[serde(default = "default_badge")]
    pub has_badge: bool,
}

fn default_badge() -> bool {
    true
}

impl Poll {
    pub fn new(enquete_id: impl Into<String>) -> Self {
        Self {
            enquete_id: enquete_id.into(),
            title: None,
            has_badge: true,
        }
    }

    pub fn without_badge(mut self) -> Self {
        self.has_badge = false;
        self
    }
}

impl From<Enquete> for Poll {
    fn from(enquete: Enquete) -> Self {
        Self {
            enquete_id: enquete.id,
            title: enquete.title,
            has_badge: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollRow {
    enquete_id: String,
    title: Option<String>,
    ring: bool,
    ring_color: bool,
    badge: Option<Badge>,
}

impl PollRow {
    pub fn new(poll: Poll) -> Self {
        Self {
            enquete_id: poll.enquete_id,
            title: poll.title,
            ring: false,
            ring_color: false,
            badge: poll.has_badge.then_some(Badge { hidden: true }),
        }
    }

    pub fn enquete_id(&self) -> &str {
        &self.enquete_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn has_ring(&self) -> bool {
        self.ring
    }

    pub fn has_ring_color(&self) -> bool {
        self.ring_color
    }

    pub fn is_highlighted(&self) -> bool {
        self.ring && self.ring_color
    }

    /// `None` when the row has no badge element.
    pub fn badge_visible(&self) -> Option<bool> {
        self.badge.map(|b| !b.hidden)
    }

    fn set_active(&mut self, is_active: bool) {
        self.ring = is_active;
        self.ring_color = is_active;
        if let Some(badge) = self.badge.as_mut() {
            badge.hidden = !is_active;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PollBoard {
    rows: Vec<PollRow>,
    index: HashMap<String, usize>,
    active_enquete_id: Option<String>,
}

impl PollBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_polls(polls: impl IntoIterator<Item = Poll>) -> Self {
        let mut board = Self::new();
        board.replace_polls(polls);
        board
    }

    /// Rebuilds the rows and re-applies the current active id to them.
    /// Duplicate ids keep their first occurrence.
    pub fn replace_polls(&mut self, polls: impl IntoIterator<Item = Poll>) {
        self.rows.clear();
        self.index.clear();

        for poll in polls {
            if self.index.contains_key(&poll.enquete_id) {
                warn!("dropping duplicate poll row {}", poll.enquete_id);
                continue;
            }
            self.index.insert(poll.enquete_id.clone(), self.rows.len());
            self.rows.push(PollRow::new(poll));
        }

        let active = self.active_enquete_id.take();
        self.mark_active(active.as_deref());
    }

    /// Sets the active id (empty counts as none) and toggles every row's
    /// highlight and badge to match.
    pub fn mark_active(&mut self, enquete_id: Option<&str>) {
        self.active_enquete_id = enquete_id.filter(|id| !id.is_empty()).map(str::to_string);

        let active = self.active_enquete_id.as_deref();
        for row in self.rows.iter_mut() {
            let is_active = active == Some(row.enquete_id.as_str());
            row.set_active(is_active);
        }
    }

    pub fn active_enquete_id(&self) -> Option<&str> {
        self.active_enquete_id.as_deref()
    }

    pub fn rows(&self) -> &[PollRow] {
        &self.rows
    }

    pub fn row(&self, enquete_id: &str) -> Option<&PollRow> {
        self.index.get(enquete_id).map(|&i| &self.rows[i])
    }

    pub fn highlighted_ids(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|r| r.is_highlighted())
            .map(|r| r.enquete_id())
            .collect()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            active_enquete_id: self.active_enquete_id.clone(),
            rows: self
                .rows
                .iter()
                .map(|r| RowSnapshot {
                    enquete_id: r.enquete_id.clone(),
                    title: r.title.clone(),
                    active: r.is_highlighted(),
                    badge_visible: r.badge_visible(),
                })
                .collect(),
            taken_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RowSnapshot {
    pub enquete_id: String,
    pub title: Option<String>,
    pub active: bool,
    pub badge_visible: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub active_enquete_id: Option<String>,
    pub rows: Vec<RowSnapshot>,
    pub taken_at: DateTime<Utc>,
}
