//! Toast-style user notices.
//!
//! # Invariants
//! - Errors expire after [`ERROR_NOTICE_TTL`], successes after
//!   [`SUCCESS_NOTICE_TTL`]; warnings stay until dismissed.
//! - At most one warning is on the board. A repeated warning replaces it
//!   and keeps its id, so an open dismiss control stays valid.
//! - Nothing here blocks; views read [`NoticeBoard::active`] when rendering.

use std::time::{Duration, Instant};

pub const ERROR_NOTICE_TTL: Duration = Duration::from_secs(4);
pub const SUCCESS_NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Warning,
    Success,
}

impl NoticeLevel {
    fn ttl(self) -> Option<Duration> {
        match self {
            Self::Error => Some(ERROR_NOTICE_TTL),
            Self::Success => Some(SUCCESS_NOTICE_TTL),
            Self::Warning => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
    pub raised_at: Instant,
}

impl Notice {
    pub fn is_persistent(&self) -> bool {
        self.level.ttl().is_none()
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.level
            .ttl()
            .is_some_and(|ttl| now.saturating_duration_since(self.raised_at) >= ttl)
    }
}

#[derive(Debug, Default)]
pub struct NoticeBoard {
    next_id: u64,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>, now: Instant) -> u64 {
        let existing = if level.ttl().is_none() {
            self.notices.iter().position(|notice| notice.level == level)
        } else {
            None
        };
        let id = match existing {
            Some(index) => self.notices.remove(index).id,
            None => {
                self.next_id += 1;
                self.next_id
            }
        };
        self.notices.push(Notice {
            id,
            level,
            message: message.into(),
            raised_at: now,
        });
        id
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) -> u64 {
        self.push(NoticeLevel::Error, message, now)
    }

    pub fn warning(&mut self, message: impl Into<String>, now: Instant) -> u64 {
        self.push(NoticeLevel::Warning, message, now)
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) -> u64 {
        self.push(NoticeLevel::Success, message, now)
    }

    /// Drops expired notices and returns the rest, oldest first.
    pub fn active(&mut self, now: Instant) -> &[Notice] {
        self.notices.retain(|notice| !notice.is_expired(now));
        &self.notices
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|notice| notice.id != id);
        self.notices.len() != before
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
