use anyhow::Result;
use compass::community::{NewPost, PostCategory, ANONYMOUS_AUTHOR};
use compass::orchestration::{EventLog, EventType};
use compass::CompassSession;

use crate::support::{form, today};
use crate::IntegrationHarness;

fn post(body: &str) -> NewPost {
    NewPost {
        body: body.into(),
        ..NewPost::default()
    }
}

#[test]
fn posts_use_the_onboarding_nickname() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut session = harness.session("poster");
    let before = session.post(post("Anyone in San Jose want to study together?"))?;
    assert_eq!(before.author_name, ANONYMOUS_AUTHOR);

    session.onboard(form(), None, today())?;
    let after = session.post(NewPost {
        category: Some(PostCategory::Win),
        location: Some("San Jose, CA".into()),
        ..post("Got my state ID today!")
    })?;
    assert_eq!(after.author_name, "Robin");
    assert_eq!(after.author_id, "poster");
    assert!(after.avatar_color.starts_with('#'));

    let feed = session.feed_posts()?;
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].id, after.id);
    assert_eq!(feed[0].category, Some(PostCategory::Win));
    Ok(())
}

#[test]
fn likes_are_shared_between_sessions() -> Result<()> {
    let harness = IntegrationHarness::new();
    let author = harness.session("author");
    let reader = harness.session("reader");
    let created = author.post(post("First week at the new job."))?;

    assert_eq!(reader.like(&created.id)?, 1);
    assert_eq!(author.like(&created.id)?, 2);
    let feed = reader.feed_posts()?;
    assert_eq!(feed[0].likes_count, 2);

    let events = EventLog::for_layout(&reader.workspace().layout).load_events()?;
    let kinds: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(
        kinds,
        vec![EventType::PostAdded, EventType::PostLiked, EventType::PostLiked]
    );
    assert!(reader.like(&uuid::Uuid::new_v4()).is_err());
    Ok(())
}

#[test]
fn feed_is_capped_by_config() -> Result<()> {
    let harness = IntegrationHarness::new();
    let mut workspace = harness.open_workspace();
    workspace.config.community.feed_limit = 2;
    let session = CompassSession::new(workspace, "busy");
    for body in ["one", "two", "three"] {
        session.post(post(body))?;
    }
    let bodies: Vec<String> = session.feed_posts()?.into_iter().map(|p| p.body).collect();
    assert_eq!(bodies, vec!["three".to_string(), "two".to_string()]);
    assert!(session.post(post("   ")).is_err());
    Ok(())
}
