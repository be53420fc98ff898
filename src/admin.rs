//! Admin actions: install, uninstall and generate.
//!
//! These sit between the CLI and the feed library. Generation failures are
//! caught here, logged, and turned into a [`Notification`] for the operator;
//! nothing is retried.
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::catalog::{Store, StoreDirectory};
use crate::feed::{
    feed_path, generate_static_file, store_file_name, FeedError, FeedGenerator, FeedSummary,
};
use crate::settings::FeedSettings;
use crate::storage::Database;

/// Message shown to the operator after an admin action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    pub fn is_success(&self) -> bool {
        matches!(self, Notification::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Notification::Success(msg) | Notification::Error(msg) => msg,
        }
    }
}

/// One feed file written during a generate action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFeed {
    pub store_id: i64,
    pub path: PathBuf,
    pub summary: FeedSummary,
}

/// Write the default settings record, replacing any previous values.
pub async fn install(db: &Database) -> Result<()> {
    db.save_feed_settings(&FeedSettings::default()).await?;
    tracing::info!("Pazaruvaj feed settings installed");
    Ok(())
}

/// Delete the settings record. Returns the number of rows removed.
pub async fn uninstall(db: &Database) -> Result<u64> {
    let removed = db.delete_feed_settings().await?;
    tracing::info!(removed, "Pazaruvaj feed settings removed");
    Ok(removed)
}

/// Generate the feed for `store_scope` (a store id, or 0 for every store).
///
/// With a single target store the file is named after
/// `FeedSettings::feed_file_name`; with several, each store gets its own
/// `<stem>_<store id>.<ext>` file. Stores are processed in id order and the
/// first failure aborts the rest.
///
/// # Errors
///
/// - [`FeedError::Dependency`] if settings are not installed or the catalog
///   cannot be read
/// - [`FeedError::Validation`] if the store does not exist, no store is
///   configured, or a store URL is unusable
/// - [`FeedError::Io`] if a feed file cannot be written
pub async fn generate_feeds(
    db: &Database,
    web_root: &Path,
    store_scope: i64,
) -> Result<Vec<GeneratedFeed>, FeedError> {
    let settings = db
        .load_feed_settings()
        .await
        .map_err(|e| FeedError::Dependency(format!("cannot load feed settings: {:#}", e)))?
        .ok_or_else(|| {
            FeedError::Dependency("feed settings are not installed; run `install` first".to_string())
        })?;

    let snapshot = db
        .load_catalog()
        .await
        .map_err(|e| FeedError::Dependency(format!("cannot load catalog: {:#}", e)))?;

    let stores = target_stores(&snapshot, store_scope)?;
    let per_store_files = stores.len() > 1;
    let generator = FeedGenerator::from_snapshot(&snapshot, &settings);

    let mut generated = Vec::with_capacity(stores.len());
    for store in &stores {
        let file_name = if per_store_files {
            store_file_name(&settings.feed_file_name, store.id)
        } else {
            settings.feed_file_name.clone()
        };
        let path = feed_path(web_root, &file_name)?;
        let summary = generate_static_file(&generator, store, &path)?;
        generated.push(GeneratedFeed {
            store_id: store.id,
            path,
            summary,
        });
    }

    Ok(generated)
}

/// [`generate_feeds`] with failures caught, logged and reported.
pub async fn generate_feeds_action(
    db: &Database,
    web_root: &Path,
    store_scope: i64,
) -> Notification {
    match generate_feeds(db, web_root, store_scope).await {
        Ok(feeds) => {
            let products: usize = feeds.iter().map(|f| f.summary.written).sum();
            tracing::info!(stores = feeds.len(), products, "Pazaruvaj feed generation finished");
            Notification::Success("Pazaruvaj feed has been successfully generated.".to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, store_scope, "Pazaruvaj feed generation failed");
            Notification::Error(e.to_string())
        }
    }
}

fn target_stores(stores: &dyn StoreDirectory, store_scope: i64) -> Result<Vec<Store>, FeedError> {
    if store_scope > 0 {
        let store = stores
            .store_by_id(store_scope)
            .ok_or_else(|| FeedError::Validation(format!("store {} does not exist", store_scope)))?;
        return Ok(vec![store]);
    }

    let all = stores.all_stores();
    if all.is_empty() {
        return Err(FeedError::Validation("no stores are configured".to_string()));
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSnapshot;

    fn snapshot_with_stores(ids: &[i64]) -> CatalogSnapshot {
        let mut snapshot = CatalogSnapshot::new();
        for &id in ids {
            snapshot.add_store(Store {
                id,
                name: format!("Store {}", id),
                url: format!("http://store{}.example.com/", id),
            });
        }
        snapshot
    }

    #[test]
    fn test_target_single_store() {
        let snapshot = snapshot_with_stores(&[1, 2]);
        let stores = target_stores(&snapshot, 2).unwrap();
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].id, 2);
    }

    #[test]
    fn test_target_unknown_store_is_validation_error() {
        let snapshot = snapshot_with_stores(&[1]);
        let result = target_stores(&snapshot, 9);
        assert!(matches!(result, Err(FeedError::Validation(_))));
    }

    #[test]
    fn test_target_all_stores() {
        let snapshot = snapshot_with_stores(&[2, 1]);
        let ids: Vec<i64> = target_stores(&snapshot, 0)
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_target_all_with_no_stores() {
        let snapshot = CatalogSnapshot::new();
        assert!(matches!(
            target_stores(&snapshot, 0),
            Err(FeedError::Validation(_))
        ));
    }

    #[test]
    fn test_notification_accessors() {
        let ok = Notification::Success("done".to_string());
        let err = Notification::Error("boom".to_string());
        assert!(ok.is_success());
        assert!(!err.is_success());
        assert_eq!(err.message(), "boom");
    }

    #[tokio::test]
    async fn test_generate_without_install_is_dependency_error() {
        let db = Database::open(":memory:").await.unwrap();
        let result = generate_feeds(&db, Path::new("/nonexistent"), 0).await;
        assert!(matches!(result, Err(FeedError::Dependency(_))));
    }

    #[tokio::test]
    async fn test_action_reports_error_notification() {
        let db = Database::open(":memory:").await.unwrap();
        install(&db).await.unwrap();

        let notification = generate_feeds_action(&db, Path::new("/nonexistent"), 0).await;
        assert!(!notification.is_success());
        assert!(notification.message().contains("no stores"));
    }

    #[tokio::test]
    async fn test_uninstall_removes_settings() {
        let db = Database::open(":memory:").await.unwrap();
        install(&db).await.unwrap();
        assert!(uninstall(&db).await.unwrap() > 0);
        assert_eq!(db.load_feed_settings().await.unwrap(), None);
        assert_eq!(uninstall(&db).await.unwrap(), 0);
    }
}
