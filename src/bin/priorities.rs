use std::env;

use anyhow::{Context, Result};
use compass::priorities::roadmap_for;
use compass::{CompassSession, Workspace};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let user_id = env::args()
        .nth(1)
        .context("Usage: cargo run --bin priorities -- <user-id>")?;
    let session = CompassSession::new(Workspace::open()?, user_id);
    let user = session.stored_user()?;
    println!("{}", user.welcome_summary);
    println!();

    let actions = session.priorities()?;
    if actions.is_empty() {
        println!("No urgent needs right now. Keep going!");
        return Ok(());
    }
    for (index, action) in actions.iter().enumerate() {
        let tag = action
            .tag
            .map(|tag| format!(" [{}]", tag.label()))
            .unwrap_or_default();
        println!("{}. {}{}", index + 1, action.title, tag);
        println!("   {}", action.subtitle);
        let roadmap = roadmap_for(action.id);
        for step in roadmap.steps {
            println!("   - {step}");
        }
        if let Some(tip) = roadmap.tip {
            println!("   Tip: {tip}");
        }
    }
    Ok(())
}
