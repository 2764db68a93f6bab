/// Small self-care prompts grouped by theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderItem {
    pub id: &'static str,
    pub label: &'static str,
    pub short_tip: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderCategory {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub items: &'static [ReminderItem],
}

const fn item(id: &'static str, label: &'static str, short_tip: Option<&'static str>) -> ReminderItem {
    ReminderItem {
        id,
        label,
        short_tip,
    }
}

const CATEGORIES: &[ReminderCategory] = &[
    ReminderCategory {
        id: "affirmations",
        title: "Words of affirmation",
        subtitle: "Say these out loud or in your head",
        items: &[
            item("a1", "I am worthy of love and support.", None),
            item("a2", "Today I am enough, just as I am.", None),
            item("a3", "I am capable of taking one step at a time.", None),
            item("a4", "I deserve to feel safe and at peace.", None),
            item("a5", "My story is still being written.", None),
        ],
    },
    ReminderCategory {
        id: "movement",
        title: "Movement & exercise",
        subtitle: "Good habits for your body",
        items: &[
            item("m1", "Take a 10-minute walk outside.", Some("Fresh air and light movement.")),
            item("m2", "Stretch for 5 minutes.", Some("Neck, shoulders, legs.")),
            item("m3", "Dance to one song.", Some("No rules, just move.")),
        ],
    },
    ReminderCategory {
        id: "mindfulness",
        title: "Mindfulness & calm",
        subtitle: "Short practices",
        items: &[
            item("n1", "5-minute breathing exercise.", Some("In for 4, hold 4, out for 6.")),
            item("n2", "Notice 3 things you can see, hear, touch.", Some("Grounding practice.")),
            item("n3", "Write down one thing you're grateful for.", Some("Big or small.")),
        ],
    },
    ReminderCategory {
        id: "rest",
        title: "Rest & recharge",
        subtitle: "You deserve breaks",
        items: &[
            item("r1", "Step away from screens for 15 minutes.", None),
            item("r2", "Listen to music or a podcast you like.", None),
            item("r3", "Get enough sleep tonight.", Some("Aim for 7-8 hours.")),
        ],
    },
    ReminderCategory {
        id: "connection",
        title: "Connection",
        subtitle: "Reach out when you're ready",
        items: &[
            item("c1", "Text or call one person you trust.", None),
            item("c2", "Share something in the community feed.", None),
            item("c3", "Ask for help if you need it.", Some("You don't have to do it alone.")),
        ],
    },
];

pub fn daily_reminders() -> &'static [ReminderCategory] {
    CATEGORIES
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn reminder_ids_are_unique() {
        let ids: Vec<&str> = daily_reminders()
            .iter()
            .flat_map(|c| c.items.iter().map(|i| i.id))
            .collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
        assert_eq!(daily_reminders().len(), 5);
    }
}
