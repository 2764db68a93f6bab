use anyhow::Result;
use compass::services::COACH_FALLBACK;
use compass::wellbeing::{daily_reminders, COACH_UNREACHABLE};

use crate::support::{today, ScriptedLlm};
use crate::IntegrationHarness;

#[test]
fn check_ins_keep_coach_replies_and_outages() -> Result<()> {
    let harness = IntegrationHarness::new();
    let llm = ScriptedLlm::new()
        .reply("  That sounds like a lot. Proud of you for naming it.  ")
        .outage();
    let session = harness.session("checkin").with_llm(Box::new(llm.clone()));

    let first = session.check_in("Stressed about rent", today())?;
    assert!(first.coach_reached);
    assert_eq!(first.feedback, "That sounds like a lot. Proud of you for naming it.");

    let second = session.check_in("Still stressed", today())?;
    assert!(!second.coach_reached);
    assert_eq!(second.feedback, COACH_UNREACHABLE);

    let saved = session.check_ins_for(today())?;
    assert_eq!(saved, vec![first, second]);
    assert_eq!(llm.requests()[0].max_tokens, 256);
    Ok(())
}

#[test]
fn blank_coach_reply_is_not_an_outage() -> Result<()> {
    let harness = IntegrationHarness::new();
    let session = harness
        .session("blank")
        .with_llm(Box::new(ScriptedLlm::new().reply("")));
    let entry = session.check_in("Couldn't sleep", today())?;
    assert!(entry.coach_reached);
    assert_eq!(entry.feedback, COACH_FALLBACK);
    Ok(())
}

#[test]
fn check_ins_need_a_language_model() {
    let harness = IntegrationHarness::new();
    let session = harness.session("offline");
    assert!(session.check_in("hello", today()).is_err());
    assert!(session.check_ins_for(today()).unwrap().is_empty());
}

#[test]
fn reminders_cover_every_category() {
    let reminders = daily_reminders();
    assert_eq!(reminders.len(), 5);
    assert!(reminders.iter().all(|category| !category.items.is_empty()));
}
