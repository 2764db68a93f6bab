use anyhow::Result;
use compass::chat::ASSISTANT_FALLBACK;
use compass::services::ChatRole;

use crate::support::{form, today, ScriptedLlm, PROFILE_REPLY};
use crate::IntegrationHarness;

#[test]
fn assistant_sees_profile_and_history() -> Result<()> {
    let harness = IntegrationHarness::new();
    let llm = ScriptedLlm::new()
        .reply(PROFILE_REPLY)
        .reply("Start with your birth certificate.")
        .reply("The county records office can help.");
    let mut session = harness.session("asker").with_llm(Box::new(llm.clone()));
    session.onboard(form(), None, today())?;

    assert_eq!(
        session.ask("Where do I start with my ID?")?,
        "Start with your birth certificate."
    );
    assert_eq!(
        session.ask("Where do I get one?")?,
        "The county records office can help."
    );

    let requests = llm.requests();
    let first_chat = &requests[1];
    assert!(first_chat.system.contains("Nickname: Robin"));
    assert!(first_chat.system.contains("Legal gaps: Birth certificate, Social Security card"));
    // The second turn carries the first exchange before the new message.
    let second_chat = &requests[2];
    assert_eq!(second_chat.messages.len(), 3);
    assert_eq!(second_chat.messages[1].role, ChatRole::Assistant);
    assert_eq!(second_chat.messages[2].content, "Where do I get one?");
    assert_eq!(session.history().len(), 4);
    Ok(())
}

#[test]
fn failed_replies_are_not_remembered() -> Result<()> {
    let harness = IntegrationHarness::new();
    let llm = ScriptedLlm::new().outage().reply("Hi there.");
    let mut session = harness.session("flaky").with_llm(Box::new(llm.clone()));

    assert_eq!(session.ask("hello?")?, ASSISTANT_FALLBACK);
    assert!(session.history().is_empty());
    assert_eq!(session.ask("hello again")?, "Hi there.");
    assert_eq!(session.history().len(), 2);
    assert!(llm.requests()[1].system.contains("No user profile yet."));
    Ok(())
}

#[test]
fn assistant_without_model_uses_fallback() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut session = harness.session("quiet");
    assert_eq!(session.ask("anyone there?")?, ASSISTANT_FALLBACK);
    assert!(session.ask("   ").is_err());
    Ok(())
}
