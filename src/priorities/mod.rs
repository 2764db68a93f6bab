//! Priority action cards derived from the onboarding profile.
//!
//! Survival needs (ID, healthcare, food) are always considered first and
//! unconditionally; wellbeing, legal and housing only fill the slots left
//! over. Actions are never stored: callers recompute them whenever they read
//! a profile.

pub mod roadmap;

pub use roadmap::{roadmap_for, roadmap_for_key, Roadmap};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::profiles::UserProfile;

/// Maximum number of cards surfaced at once.
pub const MAX_PRIORITY_ACTIONS: usize = 3;

/// Number of legal gaps quoted in the legal card subtitle.
const LEGAL_GAPS_IN_SUBTITLE: usize = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    Id,
    Healthcare,
    Food,
    Mental,
    Legal,
    Housing,
}

impl ActionId {
    pub const ALL: [ActionId; 6] = [
        ActionId::Id,
        ActionId::Healthcare,
        ActionId::Food,
        ActionId::Mental,
        ActionId::Legal,
        ActionId::Housing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionId::Id => "id",
            ActionId::Healthcare => "healthcare",
            ActionId::Food => "food",
            ActionId::Mental => "mental",
            ActionId::Legal => "legal",
            ActionId::Housing => "housing",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == key)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency badge shown on a card. Display only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionTag {
    Urgent,
    ThisWeek,
    Opportunity,
}

impl ActionTag {
    pub fn label(&self) -> &'static str {
        match self {
            ActionTag::Urgent => "Urgent",
            ActionTag::ThisWeek => "This week",
            ActionTag::Opportunity => "Opportunity",
        }
    }
}

/// A single recommended next step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriorityAction {
    pub id: ActionId,
    pub title: String,
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<ActionTag>,
}

impl PriorityAction {
    fn new(id: ActionId, tag: ActionTag, title: &str, subtitle: impl Into<String>) -> Self {
        Self {
            id,
            title: title.to_string(),
            subtitle: subtitle.into(),
            tag: Some(tag),
        }
    }
}

struct Rule {
    applies: fn(&UserProfile) -> bool,
    /// Whether the rule only fires while slots remain.
    needs_free_slot: bool,
    build: fn(&UserProfile) -> PriorityAction,
}

const RULES: &[Rule] = &[
    Rule {
        applies: |p| !p.has_id,
        needs_free_slot: false,
        build: |_| {
            PriorityAction::new(
                ActionId::Id,
                ActionTag::Urgent,
                "Get your State ID",
                "DMV on Market St - Free for foster youth.",
            )
        },
    },
    Rule {
        applies: |p| !p.has_healthcare,
        needs_free_slot: false,
        build: |_| {
            PriorityAction::new(
                ActionId::Healthcare,
                ActionTag::ThisWeek,
                "Enroll in Medicaid",
                "You qualify until age 26 - Takes 10 min.",
            )
        },
    },
    Rule {
        applies: |p| !p.food_secure,
        needs_free_slot: false,
        build: |_| {
            PriorityAction::new(
                ActionId::Food,
                ActionTag::ThisWeek,
                "Find food resources",
                "Check the Resources tab for nearby food banks and pantries.",
            )
        },
    },
    Rule {
        applies: UserProfile::wellbeing_at_risk,
        needs_free_slot: true,
        build: |_| {
            PriorityAction::new(
                ActionId::Mental,
                ActionTag::ThisWeek,
                "Check in on your wellbeing",
                "Your mental health matters - we are in your corner.",
            )
        },
    },
    Rule {
        applies: |p| !p.legal_gaps.is_empty(),
        needs_free_slot: true,
        build: |p| {
            PriorityAction::new(
                ActionId::Legal,
                ActionTag::Opportunity,
                "Address legal gaps",
                legal_subtitle(&p.legal_gaps),
            )
        },
    },
    Rule {
        applies: UserProfile::housing_unstable,
        needs_free_slot: true,
        build: |_| {
            PriorityAction::new(
                ActionId::Housing,
                ActionTag::Opportunity,
                "Explore housing options",
                "Extended foster care can include housing support. Shelters in Resources.",
            )
        },
    },
];

/// Derives up to three priority cards for the profile, in rule order.
pub fn compute_priority_actions(profile: &UserProfile) -> Vec<PriorityAction> {
    let mut actions = Vec::with_capacity(MAX_PRIORITY_ACTIONS);
    for rule in RULES {
        if rule.needs_free_slot && actions.len() >= MAX_PRIORITY_ACTIONS {
            continue;
        }
        if (rule.applies)(profile) {
            actions.push((rule.build)(profile));
        }
    }
    actions.truncate(MAX_PRIORITY_ACTIONS);
    actions
}

fn legal_subtitle(gaps: &[String]) -> String {
    let quoted = gaps
        .iter()
        .take(LEGAL_GAPS_IN_SUBTITLE)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{quoted} - see the Legal section in Resources.")
}
