use anyhow::{Context, Result};
use sqlx::SqliteConnection;

use super::schema::Database;
use crate::settings::{FeedSettings, SETTINGS_PREFIX};

impl Database {
    // ========================================================================
    // Settings Operations
    // ========================================================================

    /// Get all settings whose name starts with `prefix`, ordered by name.
    ///
    /// `_` and `%` in the prefix match literally.
    pub async fn get_settings_by_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>> {
        let pattern = format!("{}%", escape_like(prefix));
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT name, value FROM settings WHERE name LIKE ? ESCAPE '\\' ORDER BY name",
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Delete all settings whose name starts with `prefix`. Returns the row count.
    pub async fn delete_settings_by_prefix(&self, prefix: &str) -> Result<u64> {
        let pattern = format!("{}%", escape_like(prefix));
        let result = sqlx::query("DELETE FROM settings WHERE name LIKE ? ESCAPE '\\'")
            .bind(&pattern)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // ========================================================================
    // Feed Settings Record
    // ========================================================================

    /// Persist the whole feed settings record in one transaction.
    pub async fn save_feed_settings(&self, settings: &FeedSettings) -> Result<()> {
        let entries = settings.to_entries()?;
        let mut tx = self.pool.begin().await?;
        for (name, value) in entries {
            upsert_setting(&mut *tx, &name, &value)
                .await
                .with_context(|| format!("Failed to save setting '{}'", name))?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Load the feed settings record, or `None` if it was never installed.
    pub async fn load_feed_settings(&self) -> Result<Option<FeedSettings>> {
        let entries = self.get_settings_by_prefix(SETTINGS_PREFIX).await?;
        if entries.is_empty() {
            return Ok(None);
        }
        Ok(Some(FeedSettings::from_entries(entries)?))
    }

    /// Remove the feed settings record. Returns the number of rows deleted.
    pub async fn delete_feed_settings(&self) -> Result<u64> {
        self.delete_settings_by_prefix(SETTINGS_PREFIX).await
    }
}

async fn upsert_setting(
    conn: &mut SqliteConnection,
    name: &str,
    value: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO settings (name, value, updated_at)
        VALUES (?, ?, datetime('now'))
        ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
    "#,
    )
    .bind(name)
    .bind(value)
    .execute(conn)
    .await?;
    Ok(())
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
