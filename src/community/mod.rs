//! Community feed: short posts shared between users.
//!
//! The feed is one append-only JSONL log. Likes are stored as their own
//! records and folded into the post counters when the feed is read, so
//! nothing already written is ever rewritten.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

use crate::storage::{append_json_line, read_json_lines};
use crate::workspace::DataLayout;

pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

const AVATAR_PALETTE: &[&str] = &[
    "#E68D33", "#22c55e", "#0ea5e9", "#8b5cf6", "#ec4899", "#f59e0b", "#10b981",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PostCategory {
    Win,
    Meetup,
    Other(String),
}

impl From<String> for PostCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "win" => PostCategory::Win,
            "meetup" => PostCategory::Meetup,
            _ => PostCategory::Other(value),
        }
    }
}

impl From<PostCategory> for String {
    fn from(value: PostCategory) -> Self {
        match value {
            PostCategory::Win => "win".into(),
            PostCategory::Meetup => "meetup".into(),
            PostCategory::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityPost {
    pub id: Uuid,
    pub author_id: String,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<PostCategory>,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub reply_count: u32,
    pub avatar_color: String,
}

impl CommunityPost {
    pub fn display_time(&self, now: DateTime<Utc>) -> String {
        format_post_time(self.created_at, now)
    }
}

/// Input for a new post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub author_id: String,
    pub author_name: String,
    pub body: String,
    pub location: Option<String>,
    pub category: Option<PostCategory>,
    pub avatar_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum FeedRecord {
    Post(CommunityPost),
    Like {
        post_id: Uuid,
        at: DateTime<Utc>,
    },
}

pub struct FeedStore {
    log_path: PathBuf,
    feed_limit: usize,
}

impl FeedStore {
    pub fn new(layout: &DataLayout, feed_limit: u32) -> Self {
        Self {
            log_path: layout.posts_log(),
            feed_limit: feed_limit as usize,
        }
    }

    pub fn add_post(&self, new_post: NewPost) -> Result<CommunityPost> {
        let body = new_post.body.trim();
        if body.is_empty() {
            bail!("Post body must not be empty.");
        }
        let author_name = match new_post.author_name.trim() {
            "" => ANONYMOUS_AUTHOR.to_string(),
            name => name.to_string(),
        };
        let avatar_color = new_post
            .avatar_color
            .filter(|color| !color.trim().is_empty())
            .unwrap_or_else(random_avatar_color);
        let post = CommunityPost {
            id: Uuid::new_v4(),
            author_id: new_post.author_id,
            author_name,
            body: body.to_string(),
            created_at: Utc::now(),
            location: new_post.location,
            category: new_post.category,
            likes_count: 0,
            reply_count: 0,
            avatar_color,
        };
        append_json_line(&self.log_path, &FeedRecord::Post(post.clone()))?;
        Ok(post)
    }

    /// Newest posts first, capped at the configured feed limit.
    pub fn list_posts(&self) -> Result<Vec<CommunityPost>> {
        let mut posts = self.fold_records()?;
        // Reverse first so equal timestamps keep newest-written first.
        posts.reverse();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(self.feed_limit);
        Ok(posts)
    }

    /// Adds one like and returns the post's new like count.
    pub fn like_post(&self, post_id: &Uuid) -> Result<u32> {
        let post = self
            .fold_records()?
            .into_iter()
            .find(|post| &post.id == post_id)
            .with_context(|| format!("Unknown post {post_id}"))?;
        append_json_line(
            &self.log_path,
            &FeedRecord::Like {
                post_id: *post_id,
                at: Utc::now(),
            },
        )?;
        Ok(post.likes_count + 1)
    }

    /// Posts in write order with like counters applied.
    fn fold_records(&self) -> Result<Vec<CommunityPost>> {
        let mut posts: Vec<CommunityPost> = Vec::new();
        let mut index: HashMap<Uuid, usize> = HashMap::new();
        for record in read_json_lines::<FeedRecord>(&self.log_path)? {
            match record {
                FeedRecord::Post(post) => {
                    index.insert(post.id, posts.len());
                    posts.push(post);
                }
                FeedRecord::Like { post_id, .. } => match index.get(&post_id) {
                    Some(&i) => posts[i].likes_count += 1,
                    None => tracing::warn!(%post_id, "like for unknown post ignored"),
                },
            }
        }
        Ok(posts)
    }
}

fn random_avatar_color() -> String {
    AVATAR_PALETTE
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("#E68D33")
        .to_string()
}

/// Relative timestamp used on feed cards.
pub fn format_post_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created_at);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();
    if minutes < 1 {
        "Just now".into()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days == 1 {
        "Yesterday".into()
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        created_at.format("%m/%d/%Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn store(tmp: &TempDir, limit: u32) -> FeedStore {
        FeedStore::new(&DataLayout::new(tmp.path()), limit)
    }

    fn post(body: &str) -> NewPost {
        NewPost {
            author_id: "u1".into(),
            author_name: "Jo".into(),
            body: body.into(),
            ..NewPost::default()
        }
    }

    #[test]
    fn new_posts_start_with_zero_counts() {
        let tmp = TempDir::new().unwrap();
        let feed = store(&tmp, 50);
        let created = feed
            .add_post(NewPost {
                author_name: "  ".into(),
                category: Some(PostCategory::Win),
                ..post("  Got my ID today!  ")
            })
            .unwrap();
        assert_eq!(created.body, "Got my ID today!");
        assert_eq!(created.author_name, ANONYMOUS_AUTHOR);
        assert_eq!(created.likes_count, 0);
        assert!(AVATAR_PALETTE.contains(&created.avatar_color.as_str()));
        assert!(feed.add_post(post("   ")).is_err());
    }

    #[test]
    fn feed_is_newest_first_and_capped() {
        let tmp = TempDir::new().unwrap();
        let feed = store(&tmp, 3);
        for i in 0..5 {
            feed.add_post(post(&format!("post {i}"))).unwrap();
        }
        let bodies: Vec<String> = feed.list_posts().unwrap().into_iter().map(|p| p.body).collect();
        assert_eq!(bodies, vec!["post 4", "post 3", "post 2"]);
    }

    #[test]
    fn likes_accumulate() {
        let tmp = TempDir::new().unwrap();
        let feed = store(&tmp, 50);
        let created = feed.add_post(post("Meetup Saturday?")).unwrap();
        assert_eq!(feed.like_post(&created.id).unwrap(), 1);
        assert_eq!(feed.like_post(&created.id).unwrap(), 2);
        assert_eq!(feed.list_posts().unwrap()[0].likes_count, 2);
        assert!(feed.like_post(&Uuid::new_v4()).is_err());
    }

    #[test]
    fn categories_serialize_as_plain_strings() {
        assert_eq!(
            serde_json::to_string(&PostCategory::Meetup).unwrap(),
            "\"meetup\""
        );
        let other: PostCategory = serde_json::from_str("\"question\"").unwrap();
        assert_eq!(other, PostCategory::Other("question".into()));
    }

    #[test]
    fn relative_times() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let ago = |d: Duration| format_post_time(now - d, now);
        assert_eq!(ago(Duration::seconds(30)), "Just now");
        assert_eq!(ago(Duration::minutes(5)), "5m ago");
        assert_eq!(ago(Duration::hours(3)), "3h ago");
        assert_eq!(ago(Duration::hours(30)), "Yesterday");
        assert_eq!(ago(Duration::days(4)), "4d ago");
        assert_eq!(ago(Duration::days(10)), "10/08/2026");
        assert_eq!(format_post_time(now + Duration::minutes(5), now), "Just now");
    }
}
