use super::model::{StoredUser, UserProfile};
use crate::priorities::PriorityAction;

#[derive(Debug, Clone, Default)]
pub struct ProfileSummary {
    pub highlights: Vec<String>,
    pub fields: Vec<(String, String)>,
}

impl ProfileSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the summary as plain `Label: value` lines.
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = self.highlights.clone();
        lines.extend(
            self.fields
                .iter()
                .map(|(label, value)| format!("{label}: {value}")),
        );
        lines.join("\n")
    }
}

pub fn summarize_profile(profile: &UserProfile) -> ProfileSummary {
    let mut summary = ProfileSummary::new();
    if !profile.has_id {
        summary.highlights.push("Does not have a state ID yet.".into());
    }
    if !profile.has_healthcare {
        summary.highlights.push("No healthcare coverage.".into());
    }
    if !profile.food_secure {
        summary.highlights.push("Not food secure.".into());
    }
    if profile.wellbeing_at_risk() {
        summary
            .highlights
            .push("Reported low wellbeing recently.".into());
    }
    summary
        .fields
        .push(("Housing".into(), null_safe(&profile.housing_status)));
    summary
        .fields
        .push(("Education".into(), null_safe(&profile.education_level)));
    summary.fields.push((
        "Wellbeing (1-5)".into(),
        profile.wellbeing_score.to_string(),
    ));
    summary.fields.push((
        "Location".into(),
        format!(
            "{} {}",
            null_safe(&profile.state),
            null_safe(&profile.zip_code)
        ),
    ));
    summary
        .fields
        .push(("Legal gaps".into(), join_list(&profile.legal_gaps)));
    summary
}

/// Context handed to the assistant so replies can be personalized.
pub fn assistant_context(user: &StoredUser, actions: &[PriorityAction]) -> String {
    let mut summary = summarize_profile(&user.profile);
    if !user.form.name.trim().is_empty() {
        summary
            .fields
            .insert(0, ("Nickname".into(), user.form.name.trim().to_string()));
    }
    let priorities = actions
        .iter()
        .map(|action| action.title.clone())
        .collect::<Vec<_>>();
    summary
        .fields
        .push(("Current priorities".into(), join_list(&priorities)));
    summary.render()
}

fn null_safe(value: &str) -> String {
    if value.trim().is_empty() {
        "Unset".into()
    } else {
        value.trim().to_string()
    }
}

fn join_list(values: &[String]) -> String {
    if values.is_empty() {
        "None".into()
    } else {
        values.join(", ")
    }
}
