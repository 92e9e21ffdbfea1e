use gatehouse::db::Store;
use gatehouse::services::{
    AuthError, AuthService, ErrorLogService, SeaOrmAuthService, SeaOrmErrorLogService,
};

const PEPPER: &str = "service-test-pepper";

async fn setup() -> (Store, SeaOrmAuthService) {
    let store = Store::new("sqlite::memory:")
        .await
        .expect("Failed to open in-memory store");
    let service = SeaOrmAuthService::new(store.clone(), PEPPER.to_string());
    (store, service)
}

async fn create_alice(service: &SeaOrmAuthService) -> String {
    service
        .create("alice", "hunter2", "Alice", "alice@example.com")
        .await
        .expect("create failed")
        .token
}

#[tokio::test]
async fn test_login_rotates_credential_epoch() {
    let (store, service) = setup().await;

    create_alice(&service).await;
    let before = store.find_user("alice").await.unwrap().unwrap();

    service.login("alice", "hunter2").await.unwrap();
    let after = store.find_user("alice").await.unwrap().unwrap();

    // Epoch and hash move together; a new epoch means a new hash.
    assert_ne!(before.modification, after.modification);
    assert_ne!(before.hash, after.hash);
}

#[tokio::test]
async fn test_validate_is_read_only() {
    let (store, service) = setup().await;

    let token = create_alice(&service).await;
    let before = store.find_user("alice").await.unwrap().unwrap();

    for _ in 0..3 {
        let result = service.validate("alice", &token).await.unwrap();
        assert!(result.validated);
    }

    let after = store.find_user("alice").await.unwrap().unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_validate_mismatch_is_a_failure_not_false() {
    let (_store, service) = setup().await;

    create_alice(&service).await;

    let err = service.validate("alice", "wrong-token").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(err.to_string(), "Invalid credentials");
}

#[tokio::test]
async fn test_validate_unknown_user() {
    let (_store, service) = setup().await;

    let err = service.validate("nobody", "token").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_create_conflict() {
    let (_store, service) = setup().await;

    create_alice(&service).await;
    let err = service
        .create("alice", "other", "Other", "other@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict(_)));
}

#[tokio::test]
async fn test_stale_epoch_rotation_misses() {
    let (store, service) = setup().await;

    create_alice(&service).await;
    let user = store.find_user("alice").await.unwrap().unwrap();

    // A rotation conditioned on an epoch nobody holds any more must not
    // overwrite; this is what closes the concurrent-login race.
    let rows = store
        .rotate_user_credentials(user.id, "stale-epoch", "new-epoch", "new-hash")
        .await
        .unwrap();
    assert_eq!(rows, 0);

    let rows = store
        .rotate_user_credentials(user.id, &user.modification, "new-epoch", "new-hash")
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn test_update_without_fields_is_a_noop() {
    let (store, service) = setup().await;

    let token = create_alice(&service).await;
    let before = store.find_user("alice").await.unwrap().unwrap();

    let outcome = service
        .update("alice", &token, None, None, None)
        .await
        .unwrap();
    assert!(!outcome.updated);
    assert!(!outcome.login_required);

    let after = store.find_user("alice").await.unwrap().unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_update_treats_blank_fields_as_absent() {
    let (_store, service) = setup().await;

    let token = create_alice(&service).await;

    let outcome = service
        .update("alice", &token, Some("  "), Some(""), None)
        .await
        .unwrap();
    assert!(!outcome.updated);
    assert!(!outcome.login_required);
}

#[tokio::test]
async fn test_account_reports_epoch_as_last_login() {
    let (store, service) = setup().await;

    let token = create_alice(&service).await;
    let user = store.find_user("alice").await.unwrap().unwrap();

    let profile = service.account("alice", &token).await.unwrap();
    assert_eq!(profile.name, "Alice");
    assert_eq!(profile.email, "alice@example.com");
    assert_eq!(profile.last_login, user.modification);
}

#[tokio::test]
async fn test_diagnostic_sink_records_storage_failures() {
    let (store, _service) = setup().await;

    store
        .report_storage_failure("src/services/auth_service_impl.rs", 42, "context")
        .await;

    let logs = SeaOrmErrorLogService::new(store.clone());
    let page = logs.view(0, 10).await.unwrap();
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].line, 42);
    assert!(page.end_of_data);
}

#[tokio::test]
async fn test_error_log_pagination() {
    let (store, _service) = setup().await;
    let logs = SeaOrmErrorLogService::new(store.clone());

    for i in 0..3 {
        logs.record("file.rs", i, &format!("error {i}")).await.unwrap();
    }

    let page = logs.view(0, 2).await.unwrap();
    assert_eq!(page.entries.len(), 2);
    assert!(!page.end_of_data);

    let page = logs.view(2, 2).await.unwrap();
    assert_eq!(page.entries.len(), 1);
    assert!(page.end_of_data);

    let first_id = logs.view(0, 1).await.unwrap().entries[0].id;
    let deleted = logs.delete(first_id).await.unwrap();
    assert_eq!(deleted.deleted, 1);

    let cleared = logs.delete_all().await.unwrap();
    assert!(cleared.deleted);
    assert!(logs.view(0, 10).await.unwrap().entries.is_empty());
}
