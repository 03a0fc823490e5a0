// Database schema initialization

use color_eyre::Result;

pub async fn create_schema(conn: &libsql::Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            name TEXT NOT NULL,
            email_verified BOOLEAN NOT NULL DEFAULT FALSE,
            verification_token TEXT,
            token_expires_at TEXT
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS user_sessions (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS activities (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL,
            activity_type TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            cover_image TEXT,
            config TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE INDEX IF NOT EXISTS idx_activities_category_type
        ON activities(category, activity_type)
        "#,
        (),
    )
    .await?;

    // one-time public access links
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS share_links (
            token TEXT PRIMARY KEY,
            activity_id INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY(activity_id) REFERENCES activities(id) ON DELETE CASCADE
        )
        "#,
        (),
    )
    .await?;

    Ok(())
}
