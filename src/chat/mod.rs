use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::json;

use crate::community::{CommunityPost, FeedStore, NewPost};
use crate::onboarding::{OnboardingOutcome, OnboardingService};
use crate::orchestration::{log_event, EventType};
use crate::priorities::{compute_priority_actions, roadmap_for, PriorityAction, Roadmap};
use crate::profiles::{assistant_context, OnboardingForm, ProfileStore, StoredUser, UserProfile};
use crate::services::{
    chat_reply, AnthropicGateway, ChatMessage, GooglePlacesGateway, LlmGateway,
    LocationResources, NearbyResources, PlaceResource, PlacesGateway, PlacesService,
};
use crate::wellbeing::{CheckInEntry, CheckInJournal};
use crate::workspace::Workspace;

/// Shown in the conversation when the assistant cannot answer.
pub const ASSISTANT_FALLBACK: &str = "Sorry, something went wrong. Please try again in a moment.";

const NO_PROFILE_CONTEXT: &str = "No user profile yet.";

/// Facade over the stores and gateways for one signed-in user.
pub struct CompassSession {
    workspace: Workspace,
    user_id: String,
    llm: Option<Box<dyn LlmGateway>>,
    places: Option<PlacesService<Box<dyn PlacesGateway>>>,
    history: Vec<ChatMessage>,
}

impl CompassSession {
    /// Session without hosted services; onboarding uses the local default profile.
    pub fn new(workspace: Workspace, user_id: impl Into<String>) -> Self {
        Self {
            workspace,
            user_id: user_id.into(),
            llm: None,
            places: None,
            history: Vec::new(),
        }
    }

    /// Session wired to whichever hosted services have API keys configured.
    pub fn from_config(workspace: Workspace, user_id: impl Into<String>) -> Self {
        let llm = match AnthropicGateway::from_settings(&workspace.config.llm) {
            Ok(gateway) => Some(Box::new(gateway) as Box<dyn LlmGateway>),
            Err(err) => {
                tracing::info!(error = %err, "language model disabled");
                None
            }
        };
        let places = match GooglePlacesGateway::from_settings(&workspace.config.places) {
            Ok(gateway) => Some(Box::new(gateway) as Box<dyn PlacesGateway>),
            Err(err) => {
                tracing::info!(error = %err, "places lookups disabled");
                None
            }
        };
        let mut session = Self::new(workspace, user_id);
        session.llm = llm;
        if let Some(gateway) = places {
            session = session.with_places(gateway);
        }
        session
    }

    pub fn with_llm(mut self, gateway: Box<dyn LlmGateway>) -> Self {
        self.llm = Some(gateway);
        self
    }

    pub fn with_places(mut self, gateway: Box<dyn PlacesGateway>) -> Self {
        self.places = Some(PlacesService::new(gateway, &self.workspace.config.places));
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn onboard(
        &mut self,
        form: OnboardingForm,
        transcript: Option<String>,
        today: NaiveDate,
    ) -> Result<OnboardingOutcome> {
        self.history.clear();
        OnboardingService::new(&self.workspace.layout).complete(
            &self.user_id,
            form,
            transcript,
            self.llm.as_deref(),
            today,
        )
    }

    pub fn stored_user(&self) -> Result<StoredUser> {
        ProfileStore::new(&self.workspace.layout)
            .load(&self.user_id)?
            .context("No profile yet. Complete onboarding first.")
    }

    /// Priority cards for the current profile, recomputed on every call.
    pub fn priorities(&self) -> Result<Vec<PriorityAction>> {
        Ok(compute_priority_actions(&self.stored_user()?.profile))
    }

    pub fn roadmap(&self, action: &PriorityAction) -> Roadmap {
        roadmap_for(action.id)
    }

    /// Replaces the profile and returns the recomputed cards.
    pub fn update_profile(&mut self, profile: UserProfile) -> Result<Vec<PriorityAction>> {
        let user = ProfileStore::new(&self.workspace.layout).update_profile(&self.user_id, profile)?;
        let actions = compute_priority_actions(&user.profile);
        log_event(
            &self.workspace.layout,
            Some(&self.user_id),
            EventType::ProfileUpdated,
            json!({ "priority_ids": actions.iter().map(|a| a.id.as_str()).collect::<Vec<_>>() }),
        )?;
        Ok(actions)
    }

    /// Sends a message to the assistant and returns its reply.
    ///
    /// Failures produce a fallback reply instead of an error; only successful
    /// exchanges are kept in the conversation history.
    pub fn ask(&mut self, message: &str) -> Result<String> {
        let message = message.trim();
        anyhow::ensure!(!message.is_empty(), "Message must not be empty.");
        let Some(gateway) = self.llm.as_deref() else {
            return Ok(ASSISTANT_FALLBACK.to_string());
        };
        let context = match ProfileStore::new(&self.workspace.layout).load(&self.user_id)? {
            Some(user) => assistant_context(&user, &compute_priority_actions(&user.profile)),
            None => NO_PROFILE_CONTEXT.to_string(),
        };
        match chat_reply(gateway, message, &context, &self.history) {
            Ok(reply) => {
                self.history.push(ChatMessage::user(message));
                self.history.push(ChatMessage::assistant(reply.clone()));
                log_event(
                    &self.workspace.layout,
                    Some(&self.user_id),
                    EventType::AssistantReplied,
                    json!({ "turns": self.history.len() / 2 }),
                )?;
                Ok(reply)
            }
            Err(err) => {
                tracing::warn!(error = %err, "assistant reply failed");
                Ok(ASSISTANT_FALLBACK.to_string())
            }
        }
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn check_in(&self, message: &str, today: NaiveDate) -> Result<CheckInEntry> {
        let gateway = self
            .llm
            .as_deref()
            .context("Check-ins need a configured language model.")?;
        let entry =
            CheckInJournal::new(&self.workspace.layout, &self.user_id).record(gateway, message, today)?;
        log_event(
            &self.workspace.layout,
            Some(&self.user_id),
            EventType::CheckInRecorded,
            json!({ "coach_reached": entry.coach_reached }),
        )?;
        Ok(entry)
    }

    pub fn check_ins_for(&self, day: NaiveDate) -> Result<Vec<CheckInEntry>> {
        CheckInJournal::new(&self.workspace.layout, &self.user_id).entries_for(day)
    }

    fn feed(&self) -> FeedStore {
        FeedStore::new(
            &self.workspace.layout,
            self.workspace.config.community.feed_limit,
        )
    }

    /// Publishes a post under the user's onboarding nickname.
    pub fn post(&self, mut post: NewPost) -> Result<CommunityPost> {
        post.author_id = self.user_id.clone();
        if post.author_name.trim().is_empty() {
            if let Some(user) = ProfileStore::new(&self.workspace.layout).load(&self.user_id)? {
                post.author_name = user.form.name;
            }
        }
        let created = self.feed().add_post(post)?;
        log_event(
            &self.workspace.layout,
            Some(&self.user_id),
            EventType::PostAdded,
            json!({ "post_id": created.id }),
        )?;
        Ok(created)
    }

    pub fn feed_posts(&self) -> Result<Vec<CommunityPost>> {
        self.feed().list_posts()
    }

    pub fn like(&self, post_id: &uuid::Uuid) -> Result<u32> {
        let likes = self.feed().like_post(post_id)?;
        log_event(
            &self.workspace.layout,
            Some(&self.user_id),
            EventType::PostLiked,
            json!({ "post_id": post_id, "likes": likes }),
        )?;
        Ok(likes)
    }

    fn places(&self) -> Result<&PlacesService<Box<dyn PlacesGateway>>> {
        self.places
            .as_ref()
            .context("Resource lookups need a configured maps API key.")
    }

    fn lookup_zip(&self) -> Result<String> {
        let user = self.stored_user()?;
        user.lookup_zip()
            .map(str::to_string)
            .context("No zip code on file for resource lookups.")
    }

    pub fn nearby_resources(&self) -> Result<NearbyResources> {
        let zip = self.lookup_zip()?;
        Ok(self.places()?.nearby_resources(&zip)?)
    }

    /// All resource categories for the user's zip code; empty outside the US.
    pub fn location_resources(&self) -> Result<LocationResources> {
        let zip = self.lookup_zip()?;
        let places = self.places()?;
        match places.locate_zip(&zip)? {
            Some(location) => Ok(places.resources_for_location(&location)?),
            None => Ok(LocationResources::default()),
        }
    }

    pub fn mental_health_resources(&self) -> Result<Vec<PlaceResource>> {
        let zip = self.lookup_zip()?;
        Ok(self.places()?.mental_health_resources(&zip)?)
    }
}
