mod test_helpers;

use std::sync::Arc;

use mc_api::mock::MockTransport;
use mc_sync::{
    HostId, LibraryStore, MemoryStore, SyncConfig, SyncError, SyncKind, SyncService, SyncStatus,
    SyncTask, Table,
};
use test_helpers::*;

fn service(mock: &Arc<MockTransport>, store: &Arc<MemoryStore>) -> SyncService {
    SyncService::new(store.clone(), Arc::new(connections(mock)), SyncConfig::default()).unwrap()
}

#[tokio::test]
async fn test_tasks_join_the_active_run() {
    let mock = Arc::new(MockTransport::poll_only());
    script_movies(&mock, 5);
    script_music_videos(&mock, 2);
    let store = Arc::new(MemoryStore::new());
    let service = service(&mock, &store);
    let mut results = service.subscribe();
    let mut runs = service.subscribe_runs();

    let first = service.sync(host(), vec![SyncTask::full(SyncKind::Movies)]).unwrap();
    let second = service.sync(host(), vec![SyncTask::full(SyncKind::MusicVideos)]).unwrap();
    assert_eq!(first, second);

    // The spawned run has not been polled yet
    assert!(service.is_syncing(&host()));
    assert_eq!(service.queued(&host()).len(), 2);
    assert!(service.is_pending(&host(), SyncKind::MusicVideos));
    assert!(!service.is_pending(&host(), SyncKind::Music));

    let received = recv_results(&mut results, 2).await;
    let kinds: Vec<_> = received.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![SyncKind::Movies, SyncKind::MusicVideos]);

    let summary = runs.recv().await.unwrap();
    assert_eq!(summary.run_id, first);
    assert_eq!(summary.succeeded, 2);
    assert!(!service.is_syncing(&host()));
    assert!(service.running(&host()).is_none());
    assert_eq!(store.count(&host(), Table::MusicVideos).unwrap(), 2);
}

#[tokio::test]
async fn test_new_run_after_previous_finished() {
    let mock = Arc::new(MockTransport::poll_only());
    script_movies(&mock, 1);
    let store = Arc::new(MemoryStore::new());
    let service = service(&mock, &store);
    let mut runs = service.subscribe_runs();

    let first = service.sync(host(), vec![SyncTask::full(SyncKind::Movies)]).unwrap();
    runs.recv().await.unwrap();
    let second = service.sync(host(), vec![SyncTask::full(SyncKind::Movies)]).unwrap();
    runs.recv().await.unwrap();

    assert_ne!(first, second);
    assert_eq!(mock.call_count("VideoLibrary.GetMovies"), 2);
}

#[tokio::test]
async fn test_hosts_are_independent() {
    let mock = Arc::new(MockTransport::poll_only());
    script_movies(&mock, 3);
    let store = Arc::new(MemoryStore::new());
    let service = service(&mock, &store);
    let mut runs = service.subscribe_runs();

    let den = HostId::from("den");
    let attic = HostId::from("attic");
    let a = service.sync(den.clone(), vec![SyncTask::full(SyncKind::Movies)]).unwrap();
    let b = service.sync(attic.clone(), vec![SyncTask::full(SyncKind::Movies)]).unwrap();
    assert_ne!(a, b);

    runs.recv().await.unwrap();
    runs.recv().await.unwrap();
    assert_eq!(store.count(&den, Table::Movies).unwrap(), 3);
    assert_eq!(store.count(&attic, Table::Movies).unwrap(), 3);
}

#[tokio::test]
async fn test_results_report_failure_code() {
    let mock = Arc::new(MockTransport::poll_only());
    let store = Arc::new(MemoryStore::new());
    let service = service(&mock, &store);
    let mut results = service.subscribe();

    service.sync(host(), vec![SyncTask::full(SyncKind::Music)]).unwrap();
    let result = recv_results(&mut results, 1).await.remove(0);

    assert_eq!(result.status, SyncStatus::Fail);
    // Unscripted methods answer "method not found"
    let code = result.error.unwrap().code;
    assert_eq!(mc_api::ErrorCode::from_code(code), mc_api::ErrorCode::Method);
}

#[test]
fn test_sync_requires_runtime() {
    let mock = Arc::new(MockTransport::poll_only());
    let store = Arc::new(MemoryStore::new());
    let service = service(&mock, &store);
    let result = service.sync(host(), vec![SyncTask::full(SyncKind::Movies)]);
    assert!(matches!(result, Err(SyncError::NoRuntime(_))));
}

#[test]
fn test_invalid_config_rejected() {
    let mock = Arc::new(MockTransport::poll_only());
    let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let config = SyncConfig::default().with_tv_shows_page_size(0);
    let result = SyncService::new(store, Arc::new(connections(&mock)), config);
    assert!(matches!(result, Err(SyncError::Config(_))));
}
