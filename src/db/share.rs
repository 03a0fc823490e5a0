use color_eyre::Result;
use libsql::params;
use ulid::Ulid;

use super::Db;

impl Db {
    /// Mint a one-time public access token for an activity.
    pub async fn create_share_link(&self, activity_id: i64) -> Result<String> {
        let token = Ulid::new().to_string();
        let conn = self.db.connect()?;
        conn.execute(
            "INSERT INTO share_links (token, activity_id) VALUES (?, ?)",
            params![token.clone(), activity_id],
        )
        .await?;
        tracing::info!("share link created for activity_id={activity_id}");
        Ok(token)
    }

    /// Resolve a share token to its activity and burn it. A second call
    /// with the same token returns `None`.
    pub async fn consume_share_link(&self, token: &str) -> Result<Option<i64>> {
        let conn = self.db.connect()?;
        let row = conn
            .query(
                "DELETE FROM share_links WHERE token = ? RETURNING activity_id",
                params![token],
            )
            .await?
            .next()
            .await?;
        match row {
            Some(row) => Ok(Some(row.get::<i64>(0)?)),
            None => Ok(None),
        }
    }
}
