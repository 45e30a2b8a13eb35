use chrono::{Duration, TimeZone, Utc};
use query_catalog::db::sqlite;
use query_catalog::{
    AppSettings, CatalogError, CatalogService, CatalogSettings, CatalogStore, ConnectionRecord,
    CriterionChange, Notification, QueryRecord, SortBy, SqliteStore, StaticIdentity,
};

fn query(id: &str, name: &str, created_by: &str, tags: &[&str], minutes: i64) -> QueryRecord {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    QueryRecord {
        id: id.to_string(),
        name: name.to_string(),
        query_text: format!("select * from {}", name.to_lowercase()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_by: created_by.to_string(),
        connection_id: Some("pg".to_string()),
        modified_date: base + Duration::minutes(minutes),
        chart_configuration: None,
    }
}

fn seeded_store() -> SqliteStore {
    let store = SqliteStore::in_memory().unwrap();
    store
        .with_db(|db| {
            sqlite::save_connection(db, &ConnectionRecord::new("pg", "Postgres"))?;
            sqlite::save_saved_query(db, &query("1", "Users", "bob", &["hr"], 0))?;
            sqlite::save_saved_query(db, &query("2", "Sales", "amy", &[], 10))?;
            sqlite::save_saved_query(db, &query("3", "Churn", "bob", &["sales", ""], 20))
        })
        .unwrap();
    store
}

fn visible_ids<S: CatalogStore>(service: &CatalogService<S, StaticIdentity>) -> Vec<String> {
    service
        .with_session(|s| s.visible_queries().iter().map(|q| q.id.clone()).collect())
        .unwrap()
}

/// Serves a fixed catalog and refuses every delete
struct ReadOnlyStore {
    records: Vec<QueryRecord>,
}

impl CatalogStore for ReadOnlyStore {
    fn load_queries(&self) -> query_catalog::Result<Vec<QueryRecord>> {
        Ok(self.records.clone())
    }

    fn load_connections(&self) -> query_catalog::Result<Vec<ConnectionRecord>> {
        Ok(Vec::new())
    }

    fn delete_query(&self, _id: &str) -> query_catalog::Result<bool> {
        Err(CatalogError::Database(rusqlite::Error::InvalidQuery))
    }
}

#[tokio::test]
async fn refresh_loads_catalog_and_facets() {
    query_catalog::init_logging();
    let service = CatalogService::new(
        seeded_store(),
        StaticIdentity::new("bob"),
        CatalogSettings::default(),
    );
    service.refresh().await.unwrap();

    assert_eq!(visible_ids(&service), vec!["3", "1"]);
    service
        .with_session(|s| {
            assert_eq!(s.facets().authors, vec!["bob", "amy"]);
            // facets follow store order, newest first
            assert_eq!(s.facets().tags, vec!["sales", "hr"]);
            assert_eq!(s.connection_name("pg"), Some("Postgres"));
        })
        .unwrap();
}

#[tokio::test]
async fn unknown_identity_shows_everyone() {
    let service = CatalogService::new(
        seeded_store(),
        StaticIdentity::new("a@x.com"),
        CatalogSettings::default(),
    );
    service.refresh().await.unwrap();
    assert_eq!(visible_ids(&service), vec!["3", "2", "1"]);

    service
        .with_session(|s| s.set_criterion(CriterionChange::SortBy(SortBy::Name)))
        .unwrap();
    assert_eq!(visible_ids(&service), vec!["3", "2", "1"]);

    service
        .with_session(|s| s.set_criterion(CriterionChange::SearchInput(Some("USERS".into()))))
        .unwrap();
    assert_eq!(visible_ids(&service), vec!["1"]);
}

#[tokio::test]
async fn delete_removes_locally_then_from_store() {
    let service = CatalogService::new(
        seeded_store(),
        StaticIdentity::anonymous(),
        CatalogSettings::default(),
    );
    service.refresh().await.unwrap();
    service.with_session(|s| s.set_hovered_selection("2")).unwrap();

    let handle = service.delete("2").unwrap().expect("known id");
    assert_eq!(visible_ids(&service), vec!["3", "1"]);
    assert!(service.with_session(|s| s.selected().is_none()).unwrap());

    handle.await.unwrap();
    let stored = service.store().load_queries().unwrap();
    assert_eq!(stored.len(), 2);
    assert!(service
        .with_session(|s| !s.has_pending_removals() && s.take_notifications().is_empty())
        .unwrap());

    service.refresh().await.unwrap();
    assert_eq!(visible_ids(&service), vec!["3", "1"]);
}

#[tokio::test]
async fn delete_of_unknown_id_does_nothing() {
    let service = CatalogService::new(
        seeded_store(),
        StaticIdentity::anonymous(),
        CatalogSettings::default(),
    );
    service.refresh().await.unwrap();
    assert!(service.delete("missing").unwrap().is_none());
    assert_eq!(visible_ids(&service).len(), 3);
}

#[tokio::test]
async fn failed_delete_restores_and_notifies() {
    let store = ReadOnlyStore {
        records: vec![
            query("1", "Users", "bob", &["hr"], 0),
            query("2", "Sales", "amy", &[], 10),
        ],
    };
    let service = CatalogService::new(store, StaticIdentity::anonymous(), CatalogSettings::default());
    service.refresh().await.unwrap();

    let handle = service.delete("1").unwrap().expect("known id");
    assert_eq!(visible_ids(&service), vec!["2"]);
    handle.await.unwrap();

    assert_eq!(visible_ids(&service), vec!["2", "1"]);
    let notifications = service.with_session(|s| s.take_notifications()).unwrap();
    assert!(matches!(
        notifications.as_slice(),
        [Notification::DeleteFailed { id, .. }] if id == "1"
    ));
}

#[tokio::test]
async fn failed_delete_can_stay_removed() {
    let store = ReadOnlyStore {
        records: vec![query("1", "Users", "bob", &[], 0)],
    };
    let settings = CatalogSettings {
        restore_on_delete_failure: false,
        ..Default::default()
    };
    let service = CatalogService::new(store, StaticIdentity::anonymous(), settings);
    service.refresh().await.unwrap();

    service.delete("1").unwrap().expect("known id").await.unwrap();
    assert!(visible_ids(&service).is_empty());
    assert_eq!(
        service.with_session(|s| s.take_notifications().len()).unwrap(),
        1
    );
}

#[tokio::test]
async fn open_catalog_applies_stored_settings() {
    let dir = std::env::temp_dir().join(format!("query-catalog-{}", uuid::Uuid::new_v4()));
    {
        let store = SqliteStore::open(&dir).unwrap();
        let mut settings = AppSettings::default();
        settings.catalog.default_sort_by = SortBy::Name;
        store.save_settings(&settings).unwrap();
        store
            .with_db(|db| {
                sqlite::save_saved_query(db, &query("1", "beta", "bob", &[], 0))?;
                sqlite::save_saved_query(db, &query("2", "Alpha", "bob", &[], 5))
            })
            .unwrap();
    }

    let service = query_catalog::open_catalog(&dir, StaticIdentity::new("bob"))
        .await
        .unwrap();
    assert_eq!(visible_ids(&service), vec!["2", "1"]);
    assert_eq!(
        service.with_session(|s| s.criteria().created_by.clone()).unwrap(),
        Some("bob".to_string())
    );

    drop(service);
    std::fs::remove_dir_all(&dir).ok();
}
