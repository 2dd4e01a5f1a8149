use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::UserProfile;
use crate::constants::IMAGE_URL_PATTERN;

static IMAGE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(IMAGE_URL_PATTERN).expect("image URL pattern is valid"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Image URLs must be absolute http(s) links
    pub fn validate_image_url(url: &str) -> bool {
        IMAGE_URL_RE.is_match(url)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Post together with its comments
#[derive(Debug, Clone, Serialize)]
pub struct PostWithComments {
    #[serde(flatten)]
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// Comment together with the post it belongs to and its author
#[derive(Debug, Clone, Serialize)]
pub struct CommentDetail {
    #[serde(flatten)]
    pub comment: Comment,
    pub post: Post,
    pub author: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserActivityLog {
    pub id: i64,
    pub user_id: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
