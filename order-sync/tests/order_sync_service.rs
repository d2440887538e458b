// order-sync/tests/order_sync_service.rs
// 服务级集成测试 (本地 redb 存储)

use std::sync::Arc;
use std::time::Duration;

use order_sync::store::{LocalOrderStore, MemoryOrderStore, OrderStore};
use order_sync::sync::Fallback;
use order_sync::{
    CategoryFeeds, CategorySnapshot, Config, DefaultOrderPolicy, OrderList, OrderSyncService,
    Phase, PolicySet, Scope, StoreFactory,
};
use tempfile::TempDir;

fn snapshot(active: &[&str], archive: &[&str], vertical: &[&str]) -> CategorySnapshot {
    let owned = |names: &[&str]| Some(names.iter().map(|s| s.to_string()).collect());
    CategorySnapshot {
        status_active: owned(active),
        status_archive: owned(archive),
        vertical: owned(vertical),
    }
}

async fn run_once(store: Arc<dyn OrderStore>, snap: &CategorySnapshot) -> Vec<OrderList> {
    let feeds = CategoryFeeds::new();
    let service = OrderSyncService::start(store, PolicySet::default(), &feeds);
    feeds.publish(snap);
    let views = service.wait_ready().await.unwrap();
    service.flush().await.unwrap();
    service.shutdown(Duration::from_secs(1)).await;
    views.into_iter().map(|view| view.order).collect()
}

#[tokio::test]
async fn test_customization_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("orders.redb");
    let snap = snapshot(
        &["Review", "In Progress", "Not Started"],
        &["Archived", "Done"],
        &["PAYMENT", "LEAD", "ORDER"],
    );

    {
        let store = Arc::new(LocalOrderStore::open(&db_path).unwrap());
        let feeds = CategoryFeeds::new();
        let service = OrderSyncService::start(store, PolicySet::default(), &feeds);
        feeds.publish(&snap);

        let views = service.wait_ready().await.unwrap();
        assert_eq!(views[0].order, ["Not Started", "In Progress", "Review"]);
        assert_eq!(views[1].order, ["Done", "Archived"]);
        assert_eq!(views[2].order, ["LEAD", "ORDER", "PAYMENT"]);

        service
            .controller(Scope::Vertical)
            .move_item(2, 0)
            .await
            .unwrap();
        service.shutdown(Duration::from_secs(1)).await;
    }

    // New category appears while the app is closed; one is deleted
    let snap = snapshot(
        &["Review", "In Progress", "Not Started"],
        &["Archived", "Done"],
        &["PAYMENT", "ORDER", "ACCOUNT"],
    );
    let store = Arc::new(LocalOrderStore::open(&db_path).unwrap());
    let orders = run_once(store.clone(), &snap).await;
    assert_eq!(orders[2], ["PAYMENT", "ORDER", "ACCOUNT"]);
    assert_eq!(
        store.load(Scope::Vertical).await.unwrap().unwrap(),
        ["PAYMENT", "ORDER", "ACCOUNT"]
    );
}

#[tokio::test]
async fn test_reconcile_is_stable_across_runs() {
    let store = MemoryOrderStore::new();
    let snap = snapshot(&["In Progress", "Blocked"], &[], &["B", "A"]);

    let first = run_once(Arc::new(store.clone()), &snap).await;
    let saves = store.save_count();
    assert_eq!(saves, 3);

    let second = run_once(Arc::new(store.clone()), &snap).await;
    assert_eq!(first, second);
    assert_eq!(store.save_count(), saves);
}

#[tokio::test]
async fn test_scopes_are_independent() {
    let store = MemoryOrderStore::new().with_order(
        Scope::StatusActive,
        &OrderList::from_names(["Blocked", "In Progress"]),
    );
    let feeds = CategoryFeeds::new();
    let service = OrderSyncService::start(Arc::new(store.clone()), PolicySet::default(), &feeds);
    feeds.publish(&snapshot(&["In Progress", "Blocked"], &["Done"], &["X"]));
    service.wait_ready().await.unwrap();

    service.controller(Scope::StatusActive).reset_order().await.unwrap();

    assert_eq!(
        store.snapshot(Scope::StatusActive).unwrap(),
        ["In Progress", "Blocked"]
    );
    assert_eq!(service.controller(Scope::StatusArchive).order(), ["Done"]);
    assert_eq!(service.controller(Scope::Vertical).order(), ["X"]);

    service.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_custom_policy() {
    let policies = PolicySet::default().with_policy(
        Scope::Vertical,
        DefaultOrderPolicy::new(["ORDER"], Fallback::Lexicographic),
    );
    let feeds = CategoryFeeds::new();
    feeds.vertical.publish(["PAYMENT", "ORDER", "LEAD"]);

    let service = OrderSyncService::start(Arc::new(MemoryOrderStore::new()), policies, &feeds);
    let handle = service.controller(Scope::Vertical);
    let view = handle.wait_ready().await.unwrap();
    assert_eq!(view.order, ["ORDER", "LEAD", "PAYMENT"]);
    assert_eq!(view.phase, Phase::Ready);

    service.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn test_factory_from_config_uses_local_store() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        work_dir: temp_dir.path().to_path_buf(),
        db_file: "nested/orders.redb".into(),
        account_id: None,
        auth_token: None,
        ..Config::default()
    };

    let factory = StoreFactory::from_config(&config).unwrap();
    let store = factory.for_session(config.session().as_ref()).unwrap();
    assert_eq!(store.backend(), order_sync::store::Backend::Local);

    store
        .save(Scope::Vertical, &OrderList::from_names(["A"]))
        .await
        .unwrap();
    assert!(config.db_path().exists());
}
