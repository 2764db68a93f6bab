use anyhow::Result;
use compass::onboarding::{OnboardingFlow, ProfileSource};
use compass::orchestration::{EventLog, EventType};
use compass::priorities::ActionId;

use crate::support::{form, today, ScriptedLlm, PROFILE_REPLY};
use crate::IntegrationHarness;

#[test]
fn model_profile_is_stored_and_prioritized() -> Result<()> {
    let harness = IntegrationHarness::new();
    let llm = ScriptedLlm::new().reply(PROFILE_REPLY);
    let mut session = harness.session("user-1").with_llm(Box::new(llm.clone()));

    let outcome = session.onboard(form(), Some("I'm crashing at a friend's place.".into()), today())?;
    assert_eq!(outcome.source, ProfileSource::Model);
    assert!(outcome.user.welcome_summary.starts_with("You're taking a big step"));
    // The model could not infer the zip, so the typed one is kept.
    assert_eq!(outcome.user.profile.zip_code, "95112");
    let ids: Vec<ActionId> = outcome.actions.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![ActionId::Id, ActionId::Food, ActionId::Mental]);

    let request = &llm.requests()[0];
    let sent = &request.messages[0].content;
    assert!(sent.contains("Nickname (alias): Robin. Age: 20. Zip code: 95112."));
    assert!(sent.ends_with("I'm crashing at a friend's place."));

    let stored = session.stored_user()?;
    assert_eq!(stored.profile.legal_gaps.len(), 2);
    assert_eq!(session.priorities()?, outcome.actions);

    let events = EventLog::for_layout(&session.workspace().layout).load_events()?;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, EventType::OnboardingCompleted);
    assert_eq!(events[0].details["source"], "model");
    Ok(())
}

#[test]
fn model_outage_falls_back_to_local_profile() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut session = harness
        .session("user-2")
        .with_llm(Box::new(ScriptedLlm::new().outage()));

    let outcome = session.onboard(form(), None, today())?;
    assert_eq!(outcome.source, ProfileSource::LocalDefault);
    assert_eq!(outcome.user.welcome_summary, "Welcome, Robin. We're here to support you.");
    assert_eq!(outcome.user.profile.zip_code, "95112");
    let ids: Vec<ActionId> = outcome.actions.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![ActionId::Id, ActionId::Healthcare]);
    Ok(())
}

#[test]
fn partial_model_profile_keeps_what_the_user_said() -> Result<()> {
    let harness = IntegrationHarness::new();
    let reply = r#"{"housing_status":"stable","has_id":true,"has_healthcare":true,
        "food_secure":true,"wellbeing_score":4}
WELCOME_SUMMARY:
You've already got a lot in place."#;
    let mut session = harness
        .session("partial")
        .with_llm(Box::new(ScriptedLlm::new().reply(reply)));

    let outcome = session.onboard(form(), None, today())?;
    assert_eq!(outcome.source, ProfileSource::Model);
    assert!(outcome.actions.is_empty());
    assert_eq!(outcome.user.profile.zip_code, "95112");
    assert_eq!(outcome.user.profile.state, "unknown");
    Ok(())
}

#[test]
fn look_alike_user_ids_keep_separate_records() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut dotted = harness.session("a.b");
    dotted.onboard(form(), None, today())?;
    let underscored = harness.session("a_b");
    assert!(underscored.stored_user().is_err());

    let mut other = form();
    other.name = "Sky".into();
    let mut at_sign = harness.session("a@b");
    at_sign.onboard(other, None, today())?;
    assert_eq!(dotted.stored_user()?.form.name, "Robin");
    assert_eq!(at_sign.stored_user()?.form.name, "Sky");
    Ok(())
}

#[test]
fn profile_edits_recompute_priorities() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut session = harness.session("user-3");
    let mut flow = OnboardingFlow::new();
    flow.submit_form(form())?;
    flow.advance();
    let (form, transcript) = flow.finalize()?;
    session.onboard(form, transcript, today())?;

    let mut profile = session.stored_user()?.profile;
    profile.has_id = true;
    profile.has_healthcare = true;
    profile.housing_status = "UNSTABLE".into();
    let actions = session.update_profile(profile)?;
    let ids: Vec<ActionId> = actions.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![ActionId::Housing]);
    assert_eq!(session.priorities()?, actions);

    let events = EventLog::for_layout(&session.workspace().layout).load_events()?;
    assert_eq!(events.last().map(|e| e.event_type), Some(EventType::ProfileUpdated));
    Ok(())
}

#[test]
fn priorities_need_a_profile() {
    let harness = IntegrationHarness::new();
    let session = harness.session("nobody");
    let err = session.priorities().unwrap_err();
    assert!(err.to_string().contains("Complete onboarding first"));
}
