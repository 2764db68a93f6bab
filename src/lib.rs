pub mod chat;
pub mod community;
pub mod onboarding;
pub mod orchestration;
pub mod priorities;
pub mod profiles;
pub mod services;
pub mod storage;
pub mod wellbeing;
pub mod workspace;

// Re-export commonly used types for convenience.
pub use chat::CompassSession;
pub use priorities::{compute_priority_actions, ActionId, ActionTag, PriorityAction};
pub use profiles::{StoredUser, UserProfile};
pub use workspace::{AppConfig, Workspace};
