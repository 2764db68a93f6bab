use compass::{CompassSession, Workspace};
use std::path::Path;
use tempfile::TempDir;

pub struct IntegrationHarness {
    workspace: TempDir,
}

impl IntegrationHarness {
    pub fn new() -> Self {
        let workspace = TempDir::new().expect("failed to create temp workspace");
        Self { workspace }
    }

    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    pub fn open_workspace(&self) -> Workspace {
        Workspace::open_at(self.workspace.path()).expect("failed to open workspace for tests")
    }

    pub fn session(&self, user_id: &str) -> CompassSession {
        CompassSession::new(self.open_workspace(), user_id)
    }
}

mod assistant_chat;
mod community_feed;
mod onboarding_flow;
mod resources_lookup;
pub mod support;
mod wellbeing_checkins;

#[test]
fn workspace_creates_data_directories() {
    let harness = IntegrationHarness::new();
    let workspace = harness.open_workspace();
    assert!(workspace.layout.users_dir.is_dir());
    assert!(workspace.layout.community_dir.is_dir());
    assert!(workspace.layout.wellbeing_dir.is_dir());
    assert!(workspace.root().starts_with(harness.workspace_path()));
}
