//! Cluster repository scenarios against a real store file

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use kubedeck_persistence::entity::cluster;
use kubedeck_persistence::sea_orm::{ActiveValue::NotSet, ColumnTrait, Condition, Set};
use kubedeck_persistence::{
    Cluster, ClusterRepository, EmbeddedStore, FileBasedClusterRepository, StoreOptions,
};
use tempfile::TempDir;

async fn open_store(dir: &TempDir) -> Arc<EmbeddedStore> {
    let store = EmbeddedStore::open(dir.path().join("cluster.db"), StoreOptions::default())
        .await
        .unwrap();
    Arc::new(store)
}

async fn create_test_repository() -> (Arc<dyn ClusterRepository>, Arc<EmbeddedStore>, TempDir) {
    let tmp_dir = TempDir::new().unwrap();
    let store = open_store(&tmp_dir).await;
    let repo: Arc<dyn ClusterRepository> = Arc::new(FileBasedClusterRepository::new(store.clone()));
    (repo, store, tmp_dir)
}

fn ids(clusters: &[Cluster]) -> HashSet<i32> {
    clusters.iter().filter_map(|c| c.id).collect()
}

#[tokio::test]
async fn test_save_then_find_one_by_name() {
    let (repo, _store, _tmp) = create_test_repository().await;

    let mut c1 = Cluster::new("c1", "https://c1:6443").with_config([("token", "abc")]);
    repo.save(&mut c1).await.unwrap();

    let found = repo.find_one("c1").await.unwrap().expect("c1 should be found");
    assert_eq!(found.id, c1.id);
    assert_eq!(
        found.config,
        HashMap::from([("token".to_string(), "abc".to_string())])
    );
    assert!(found.active);
}

#[tokio::test]
async fn test_soft_delete_hides_cluster_from_active_reads() {
    let (repo, store, _tmp) = create_test_repository().await;

    let mut c1 = Cluster::new("c1", "https://c1");
    repo.save(&mut c1).await.unwrap();
    let id = c1.id.unwrap();

    repo.mark_cluster_deleted(&mut c1).await.unwrap();
    assert!(!c1.active);

    assert!(repo.find_one_active("c1").await.unwrap().is_none());
    assert!(repo.find_one("c1").await.unwrap().is_none());
    assert!(repo.find_all_active().await.unwrap().is_empty());
    assert!(repo.find_all().await.unwrap().is_empty());
    assert!(repo.find_by_id(id).await.unwrap().is_none());
    assert!(repo.find_by_ids(&[id]).await.unwrap().is_empty());

    let all = repo.find_all_with_inactive().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, Some(id));
    assert!(!all[0].active);

    // The row is still in the file
    let rows = store
        .find_where::<cluster::Entity>(Condition::all().add(cluster::Column::Id.eq(id)), None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].active, Some(false));
}

#[tokio::test]
async fn test_find_by_ids_returns_both() {
    let (repo, _store, _tmp) = create_test_repository().await;

    let mut c1 = Cluster::new("c1", "https://c1").with_config([("token", "one")]);
    let mut c2 = Cluster::new("c2", "https://c2").with_config([("token", "two")]);
    repo.save(&mut c1).await.unwrap();
    repo.save(&mut c2).await.unwrap();

    let found = repo
        .find_by_ids(&[c1.id.unwrap(), c2.id.unwrap()])
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(ids(&found), ids(&[c1.clone(), c2.clone()]));
    for cluster in &found {
        let expected = if cluster.id == c1.id { &c1 } else { &c2 };
        assert_eq!(cluster, expected);
    }

    // Unknown ids are simply absent
    let found = repo.find_by_ids(&[c1.id.unwrap(), 9999]).await.unwrap();
    assert_eq!(ids(&found), HashSet::from([c1.id.unwrap()]));
}

#[tokio::test]
async fn test_connection_status_only_changes_diagnostic() {
    let (repo, _store, _tmp) = create_test_repository().await;

    let mut c1 = Cluster::new("c1", "https://c1").with_config([("token", "abc")]);
    c1.k8s_version = "v1.30.1".to_string();
    repo.save(&mut c1).await.unwrap();
    c1.server_url = "https://c1-new".to_string();
    repo.update(&c1).await.unwrap();

    repo.update_cluster_connection_status(c1.id.unwrap(), "dial timeout")
        .await
        .unwrap();

    let found = repo.find_by_id(c1.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(found.error_in_connecting, "dial timeout");
    assert_eq!(
        Cluster {
            error_in_connecting: String::new(),
            ..found
        },
        c1
    );
}

#[tokio::test]
async fn test_ids_never_collide_after_hard_delete() {
    let (repo, store, _tmp) = create_test_repository().await;

    let mut first = Cluster::new("c1", "https://c1");
    repo.save(&mut first).await.unwrap();
    repo.delete(&first).await.unwrap();

    let rows = store
        .find_where::<cluster::Entity>(Condition::all(), None)
        .await
        .unwrap();
    assert!(rows.is_empty());

    let mut second = Cluster::new("c2", "https://c2");
    repo.save(&mut second).await.unwrap();
    assert!(second.id.unwrap() > first.id.unwrap());
}

#[tokio::test]
async fn test_reopen_keeps_clusters_and_schema() {
    let tmp_dir = TempDir::new().unwrap();

    let saved = {
        let repo = FileBasedClusterRepository::new(open_store(&tmp_dir).await);
        let mut c1 = Cluster::new("c1", "https://c1").with_config([("token", "abc")]);
        repo.save(&mut c1).await.unwrap();
        c1
    };

    let repo = FileBasedClusterRepository::new(open_store(&tmp_dir).await);
    let found = repo.find_one("c1").await.unwrap().unwrap();
    assert_eq!(found, saved);
}

#[tokio::test]
async fn test_find_all_skips_corrupted_rows() {
    let (repo, store, _tmp) = create_test_repository().await;

    for name in ["c1", "c2", "c3"] {
        let mut cluster = Cluster::new(name, format!("https://{name}"));
        repo.save(&mut cluster).await.unwrap();
    }
    let broken_id = store
        .insert(cluster::ActiveModel {
            id: NotSet,
            cluster_name: Set("broken".to_string()),
            server_url: Set("https://broken".to_string()),
            active: Set(Some(true)),
            config: Set("{\"token\":".to_string()),
            k8s_version: Set(String::new()),
            error_in_connecting: Set(String::new()),
            created_on: Set(Default::default()),
            created_by: Set(0),
            updated_on: Set(Default::default()),
            updated_by: Set(0),
        })
        .await
        .unwrap();

    let all = repo.find_all().await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|c| c.cluster_name != "broken"));

    let mut wanted: Vec<i32> = all.iter().filter_map(|c| c.id).collect();
    wanted.push(broken_id);
    assert_eq!(repo.find_by_ids(&wanted).await.unwrap().len(), 3);

    assert!(repo.find_by_id(broken_id).await.is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_saves_get_distinct_ids() {
    let (repo, _store, _tmp) = create_test_repository().await;

    let mut handles = Vec::new();
    for i in 0..16 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            let mut cluster = Cluster::new(format!("c{i}"), format!("https://c{i}"));
            repo.save(&mut cluster).await.unwrap();
            cluster.id.unwrap()
        }));
    }

    let mut assigned = HashSet::new();
    for handle in handles {
        assert!(assigned.insert(handle.await.unwrap()));
    }
    assert_eq!(assigned.len(), 16);
    assert_eq!(repo.find_all().await.unwrap().len(), 16);
}
