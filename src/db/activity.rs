use color_eyre::eyre::WrapErr;
use color_eyre::{eyre::OptionExt, Result};
use libsql::params;

use crate::authoring::Draft;

use super::helpers::{query_all, query_optional};
use super::models::{ActivityRow, ActivitySummary};
use super::Db;

impl Db {
    pub async fn create_activity(
        &self,
        user_id: i32,
        activity_type: &str,
        draft: &Draft,
        cover_image: Option<&str>,
    ) -> Result<i64> {
        let config = serde_json::to_string(&draft.config).wrap_err("encode config")?;
        let content = encode_content(draft)?;
        let conn = self.db.connect()?;

        let id = conn
            .query(
                r#"INSERT INTO activities
                   (user_id, title, description, category, activity_type, cover_image, config, content)
                   VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                   RETURNING id"#,
                params![
                    user_id,
                    draft.title.clone(),
                    draft.description.clone(),
                    draft.category.clone(),
                    activity_type,
                    cover_image,
                    config,
                    content
                ],
            )
            .await?
            .next()
            .await?
            .ok_or_eyre("could not get activity id")?
            .get::<i64>(0)?;

        tracing::info!("new activity created: id={id}, type={activity_type}");
        Ok(id)
    }

    /// Overwrite an activity the user owns. Returns false when the row does
    /// not exist or belongs to someone else.
    pub async fn update_activity(
        &self,
        id: i64,
        user_id: i32,
        draft: &Draft,
        cover_image: Option<&str>,
    ) -> Result<bool> {
        let config = serde_json::to_string(&draft.config).wrap_err("encode config")?;
        let content = encode_content(draft)?;
        let conn = self.db.connect()?;

        let affected = conn
            .execute(
                r#"UPDATE activities
                   SET title = ?, description = ?, category = ?,
                       cover_image = COALESCE(?, cover_image),
                       config = ?, content = ?, updated_at = datetime('now')
                   WHERE id = ? AND user_id = ?"#,
                params![
                    draft.title.clone(),
                    draft.description.clone(),
                    draft.category.clone(),
                    cover_image,
                    config,
                    content,
                    id,
                    user_id
                ],
            )
            .await?;
        Ok(affected > 0)
    }

    pub async fn delete_activity(&self, id: i64, user_id: i32) -> Result<bool> {
        let conn = self.db.connect()?;
        let affected = conn
            .execute(
                "DELETE FROM activities WHERE id = ? AND user_id = ?",
                params![id, user_id],
            )
            .await?;
        Ok(affected > 0)
    }

    /// Every active activity, newest first. Category/type filtering and
    /// pagination happen in memory on top of this list.
    pub async fn activity_summaries(&self) -> Result<Vec<ActivitySummary>> {
        let conn = self.db.connect()?;
        query_all(
            &conn,
            r#"SELECT id, title, description, category, activity_type, cover_image
               FROM activities WHERE status = 'active' ORDER BY id DESC"#,
            (),
        )
        .await
    }

    pub async fn get_activity(&self, id: i64) -> Result<Option<ActivityRow>> {
        let conn = self.db.connect()?;
        query_optional(
            &conn,
            r#"SELECT id, user_id, title, description, category, activity_type,
                      status, cover_image, config, content
               FROM activities WHERE id = ?"#,
            params![id],
        )
        .await
    }

    /// Distinct categories for the list filter dropdown.
    pub async fn activity_categories(&self) -> Result<Vec<String>> {
        let conn = self.db.connect()?;
        let mut rows = conn
            .query(
                "SELECT DISTINCT category FROM activities WHERE status = 'active' ORDER BY category",
                (),
            )
            .await?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next().await? {
            categories.push(row.get::<String>(0)?);
        }
        Ok(categories)
    }
}

/// The content column stores the same document shape the players parse:
/// word-search and crossword layouts verbatim, the list games wrapped in
/// their `questions`/`pairs` envelope.
fn encode_content(draft: &Draft) -> Result<String> {
    use crate::models::ActivityContent::*;

    let value = match &draft.content {
        WordSearch(content) => serde_json::to_value(content).wrap_err("encode content")?,
        Crossword(content) => serde_json::to_value(content).wrap_err("encode content")?,
        Quiz { questions } => serde_json::json!({ "questions": questions }),
        Cloze { questions } => serde_json::json!({ "questions": questions }),
        DragDrop { pairs } => serde_json::json!({ "pairs": pairs }),
        MultipleChoice { pairs } => serde_json::json!({ "pairs": pairs }),
        SentenceOrder { sentences } => serde_json::json!({ "questions": sentences }),
    };
    Ok(value.to_string())
}
