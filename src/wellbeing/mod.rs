//! Daily wellbeing check-ins with coach replies.

pub mod reminders;

pub use reminders::{daily_reminders, ReminderCategory, ReminderItem};

use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::services::{try_coach_feedback, GatewayError, LlmGateway, COACH_FALLBACK};
use crate::storage::{read_record, write_record};
use crate::workspace::DataLayout;

/// Stored in place of coach feedback when the coach cannot be reached.
pub const COACH_UNREACHABLE: &str = "We couldn't reach your coach right now. Your message was saved. \
Try again later or open the chat to talk to support.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotline {
    pub name: &'static str,
    pub phone: &'static str,
    pub detail: &'static str,
}

/// Crisis and support lines.
pub const HOTLINES: &[Hotline] = &[
    Hotline {
        name: "988 Suicide & Crisis Lifeline",
        phone: "988",
        detail: "24/7",
    },
    Hotline {
        name: "California Youth Crisis Line",
        phone: "8008435200",
        detail: "24/7",
    },
    Hotline {
        name: "National Runaway Safeline",
        phone: "18007862929",
        detail: "24/7",
    },
    Hotline {
        name: "Crisis Text Line",
        phone: "741741",
        detail: "Text HOME",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInEntry {
    pub message: String,
    pub feedback: String,
    pub recorded_at: DateTime<Utc>,
    /// False when `feedback` is the unreachable-coach notice.
    pub coach_reached: bool,
}

/// Entries keyed by `YYYY-MM-DD`.
type JournalDays = BTreeMap<String, Vec<CheckInEntry>>;

/// Per-user journal of check-ins.
pub struct CheckInJournal<'a> {
    layout: &'a DataLayout,
    user_id: &'a str,
}

impl<'a> CheckInJournal<'a> {
    pub fn new(layout: &'a DataLayout, user_id: &'a str) -> Self {
        Self { layout, user_id }
    }

    /// Asks the coach about `message` and saves the exchange under `day`.
    ///
    /// An empty coach reply stores the standard encouragement. The message is
    /// saved even when the coach is unavailable.
    pub fn record(
        &self,
        gateway: &dyn LlmGateway,
        message: &str,
        day: NaiveDate,
    ) -> Result<CheckInEntry> {
        let message = message.trim();
        if message.is_empty() {
            bail!("Check-in message must not be empty.");
        }
        let (feedback, coach_reached) = match try_coach_feedback(gateway, message) {
            Ok(text) => (text, true),
            Err(GatewayError::EmptyResponse { .. }) => (COACH_FALLBACK.to_string(), true),
            Err(err) => {
                tracing::warn!(error = %err, user_id = self.user_id, "coach unreachable for check-in");
                (COACH_UNREACHABLE.to_string(), false)
            }
        };
        let entry = CheckInEntry {
            message: message.to_string(),
            feedback,
            recorded_at: Utc::now(),
            coach_reached,
        };
        let mut days = self.load_days()?;
        days.entry(day_key(day)).or_default().push(entry.clone());
        write_record(self.layout.check_ins_json(self.user_id)?, &days)?;
        Ok(entry)
    }

    /// Entries for one day in the order they were recorded.
    pub fn entries_for(&self, day: NaiveDate) -> Result<Vec<CheckInEntry>> {
        Ok(self
            .load_days()?
            .remove(&day_key(day))
            .unwrap_or_default())
    }

    /// Days with at least one entry, oldest first.
    pub fn days(&self) -> Result<Vec<String>> {
        Ok(self.load_days()?.into_keys().collect())
    }

    fn load_days(&self) -> Result<JournalDays> {
        Ok(read_record(self.layout.check_ins_json(self.user_id)?)?.unwrap_or_default())
    }
}

fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}
