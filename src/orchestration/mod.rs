use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::storage::{append_json_line, read_json_lines};
use crate::workspace::DataLayout;

/// Type of domain events that can be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    OnboardingCompleted,
    ProfileUpdated,
    PostAdded,
    PostLiked,
    CheckInRecorded,
    AssistantReplied,
}

/// General-purpose event stored as JSONL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    pub event_id: Uuid,
    pub user_id: Option<String>,
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub details: serde_json::Value,
}

/// Append-only event log for a workspace.
pub struct EventLog {
    events_path: PathBuf,
}

impl EventLog {
    pub fn for_layout(layout: &DataLayout) -> Self {
        Self {
            events_path: layout.events_log(),
        }
    }

    pub fn append_event(&self, event: &DomainEvent) -> Result<()> {
        append_json_line(&self.events_path, event)
    }

    pub fn load_events(&self) -> Result<Vec<DomainEvent>> {
        read_json_lines(&self.events_path)
    }
}

/// Records an event and mirrors it to the tracing output.
pub fn log_event(
    layout: &DataLayout,
    user_id: Option<&str>,
    event_type: EventType,
    details: serde_json::Value,
) -> Result<DomainEvent> {
    let event = DomainEvent {
        event_id: Uuid::new_v4(),
        user_id: user_id.map(str::to_string),
        event_type,
        timestamp: Utc::now(),
        details,
    };
    EventLog::for_layout(layout).append_event(&event)?;
    tracing::info!(event = ?event.event_type, user_id, "domain event recorded");
    Ok(event)
}
