use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::{
    models::{common::ListQuery, RESOURCES},
    ports::repository::{ResourceCommon, Store},
};
use crate::error::Error;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStats {
    pub resource: &'static str,
    pub label: &'static str,
    pub total: i64,
    pub by_status: BTreeMap<String, i64>,
}

pub async fn overview<S>(store: &mut S) -> Result<Vec<ResourceStats>, Error>
where
    S: Store,
{
    let mut stats = Vec::with_capacity(RESOURCES.len());
    for &schema in RESOURCES {
        let total = ResourceCommon::count(store, schema, &ListQuery::default()).await?;
        let mut by_status: BTreeMap<String, i64> = schema.statuses().iter().map(|s| (s.to_string(), 0)).collect();
        if schema.status().is_some() {
            for (status, n) in ResourceCommon::count_by_status(store, schema).await? {
                by_status.insert(status, n);
            }
        }
        stats.push(ResourceStats {
            resource: schema.name,
            label: schema.label,
            total,
            by_status,
        });
    }
    Ok(stats)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::contact;
    use crate::core::ports::repository::Manager;
    use crate::core::services::resource::{change_status, create_record};
    use crate::database::memory::MemoryManager;
    use serde_json::json;

    #[tokio::test]
    async fn test_overview_counts_statuses() {
        let manager = MemoryManager::default();
        let mut db = manager.db().await.unwrap();
        let payload = json!({"name": "n", "email": "n@example.com", "message": "call me"});
        let payload = payload.as_object().unwrap();
        let first = create_record(&mut db, &contact::SCHEMA, payload).await.unwrap();
        create_record(&mut db, &contact::SCHEMA, payload).await.unwrap();
        change_status(&mut db, &contact::SCHEMA, first, "replied").await.unwrap();

        let stats = overview(&mut db).await.unwrap();
        let contacts = stats.iter().find(|s| s.resource == "contacts").unwrap();
        assert_eq!(contacts.total, 2);
        assert_eq!(contacts.by_status.get("new"), Some(&1));
        assert_eq!(contacts.by_status.get("replied"), Some(&1));
        assert_eq!(contacts.by_status.get("read"), Some(&0));
        let settings = stats.iter().find(|s| s.resource == "settings").unwrap();
        assert!(settings.by_status.is_empty());
    }
}
