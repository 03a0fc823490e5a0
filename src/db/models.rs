// Database model structs

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::Deserialize;

use crate::models::{Activity, ActivityConfig, ActivityContent, ActivityType};

#[derive(Clone, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub name: String,
}

/// A raw `activities` row; `config` and `content` are JSON documents keyed
/// by `activity_type`.
#[derive(Clone, Deserialize)]
pub struct ActivityRow {
    pub id: i64,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub activity_type: String,
    pub status: String,
    pub cover_image: Option<String>,
    pub config: String,
    pub content: String,
}

impl ActivityRow {
    /// Decode the JSON columns into a typed [`Activity`]. A row whose
    /// content does not fit its declared type is an error, not a panic.
    pub fn decode(&self) -> Result<Activity> {
        let ty: ActivityType = self
            .activity_type
            .parse()
            .wrap_err_with(|| format!("activity {}", self.id))?;
        let config: ActivityConfig = serde_json::from_str(&self.config)
            .wrap_err_with(|| format!("bad config for activity {}", self.id))?;
        let content = ActivityContent::parse(ty, &self.content)
            .wrap_err_with(|| format!("bad content for activity {}", self.id))?;

        Ok(Activity {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            ty,
            status: self.status.clone(),
            cover_image: self.cover_image.clone(),
            config,
            content,
        })
    }
}

/// The list view projection: no content payload.
#[derive(Clone, Deserialize)]
pub struct ActivitySummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub activity_type: String,
    pub cover_image: Option<String>,
}
