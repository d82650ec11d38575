use std::cell::Cell;

use async_trait::async_trait;

use super::*;
use crate::net::types::LoginResponse;
use crate::util::storage::MemoryStorage;

// =============================================================
// Fixtures
// =============================================================

struct FakeAuthApi {
    login: Result<&'static str, AuthError>,
    logout_fails: bool,
    logout_calls: Cell<usize>,
    last_logout_token: Cell<Option<&'static str>>,
}

impl FakeAuthApi {
    fn accepting(body: &'static str) -> Self {
        Self { login: Ok(body), logout_fails: false, logout_calls: Cell::new(0), last_logout_token: Cell::new(None) }
    }

    fn failing(err: AuthError) -> Self {
        Self { login: Err(err), ..Self::accepting("") }
    }
}

#[async_trait(?Send)]
impl AuthApi for FakeAuthApi {
    async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        let body = self.login.clone()?;
        Ok(serde_json::from_str(body)?)
    }

    async fn register(&self, details: &RegistrationDetails) -> Result<RegistrationOutcome, AuthError> {
        Ok(RegistrationOutcome { data: serde_json::json!({ "username": details.username }) })
    }

    async fn logout(&self, token: Option<&str>) -> Result<(), AuthError> {
        self.logout_calls.set(self.logout_calls.get() + 1);
        if token == Some("secret") {
            self.last_logout_token.set(Some("secret"));
        }
        if self.logout_fails { Err(AuthError::Network("offline".into())) } else { Ok(()) }
    }
}

const ADMIN_LOGIN: &str =
    r#"{"user":{"id":3,"name":"Ada","email":"ada@x","role":{"id":1,"name":"admin"}},"token":"12|secret"}"#;
const STUDENT_LOGIN: &str =
    r#"{"user":{"id":4,"name":"Bo","email":"bo@x","roles":[{"id":2,"name":"Student"}]},"token":"13|other"}"#;

fn config() -> ApiConfig {
    ApiConfig::new("http://localhost/api")
}

fn store(api: FakeAuthApi) -> SessionStore<MemoryStorage, FakeAuthApi> {
    SessionStore::new(MemoryStorage::new(), api, &config())
}

fn creds() -> Credentials {
    Credentials::new("ada@x", "pw")
}

// =============================================================
// Session
// =============================================================

#[test]
fn empty_session_is_logged_out() {
    let session = Session::empty();
    assert!(!session.is_logged_in());
    assert!(session.current_user().is_none());
    assert!(session.bearer_token().is_none());
}

// =============================================================
// login
// =============================================================

#[tokio::test]
async fn login_populates_session_and_storage() {
    let mut store = store(FakeAuthApi::accepting(ADMIN_LOGIN));
    let session = store.login(&creds()).await.unwrap();

    assert!(session.is_logged_in());
    assert_eq!(session.current_user().unwrap().name, "Ada");
    assert_eq!(store.session(), &session);
    assert!(store.storage().get("user").is_some());
    assert_eq!(store.token().as_deref(), Some("secret"));
}

#[tokio::test]
async fn login_then_rehydrate_is_identity() {
    let mut store = store(FakeAuthApi::accepting(ADMIN_LOGIN));
    let after_login = store.login(&creds()).await.unwrap();
    store.rehydrate();
    assert_eq!(store.session(), &after_login);
}

#[tokio::test]
async fn fresh_store_rehydrates_previous_login() {
    let mut first = store(FakeAuthApi::accepting(ADMIN_LOGIN));
    let session = first.login(&creds()).await.unwrap();
    let storage = first.storage().clone();

    let second = SessionStore::new(storage, FakeAuthApi::accepting(ADMIN_LOGIN), &config());
    assert_eq!(second.session(), &session);
}

#[tokio::test]
async fn login_overwrites_previous_snapshot() {
    let mut store = store(FakeAuthApi::accepting(ADMIN_LOGIN));
    store.login(&creds()).await.unwrap();
    store.api = FakeAuthApi::accepting(STUDENT_LOGIN);
    store.login(&creds()).await.unwrap();

    store.rehydrate();
    assert!(store.current_user().unwrap().is_student());
    assert_eq!(store.storage().len(), 1);
}

#[tokio::test]
async fn rejected_login_leaves_session_empty() {
    let mut store = store(FakeAuthApi::accepting(ADMIN_LOGIN));
    store.login(&creds()).await.unwrap();

    store.api = FakeAuthApi::failing(AuthError::Rejected { status: 401, message: "bad".into() });
    let err = store.login(&creds()).await.unwrap_err();

    assert_eq!(err.code(), "E_AUTH_REJECTED");
    assert!(!store.is_logged_in());
    assert!(store.storage().get("user").is_none());
    store.rehydrate();
    assert!(!store.is_logged_in());
}

#[tokio::test]
async fn network_error_is_surfaced() {
    let mut store = store(FakeAuthApi::failing(AuthError::Network("offline".into())));
    let err = store.login(&creds()).await.unwrap_err();
    assert!(err.is_retryable());
    assert!(!store.is_logged_in());
}

#[tokio::test]
async fn malformed_login_response_is_decode_error() {
    let mut store = store(FakeAuthApi::accepting(r#"{"user":{"id":"not-a-number"}}"#));
    let err = store.login(&creds()).await.unwrap_err();
    assert_eq!(err.code(), "E_DECODE");
    assert!(!store.is_logged_in());
}

#[tokio::test]
async fn roleless_login_response_is_rejected() {
    let mut store = store(FakeAuthApi::accepting(r#"{"user":{"id":1,"name":"n","email":"e"},"token":"t"}"#));
    assert!(store.login(&creds()).await.is_err());
    assert!(store.storage().is_empty());
}

// =============================================================
// logout
// =============================================================

#[tokio::test]
async fn logout_clears_session_and_storage() {
    let mut store = store(FakeAuthApi::accepting(ADMIN_LOGIN));
    store.login(&creds()).await.unwrap();
    store.logout().await;

    assert!(!store.is_logged_in());
    assert!(store.storage().is_empty());
    assert_eq!(store.api().logout_calls.get(), 1);
    assert_eq!(store.api().last_logout_token.get(), Some("secret"));
    store.rehydrate();
    assert_eq!(store.session(), &Session::empty());
}

#[tokio::test]
async fn logout_succeeds_locally_when_network_fails() {
    let mut api = FakeAuthApi::accepting(ADMIN_LOGIN);
    api.logout_fails = true;
    let mut store = store(api);
    store.login(&creds()).await.unwrap();
    store.logout().await;

    store.rehydrate();
    assert_eq!(store.session(), &Session::empty());
}

#[tokio::test]
async fn logout_removes_legacy_tokens() {
    let mut store = store(FakeAuthApi::accepting(ADMIN_LOGIN));
    store.storage_mut().set("authToken", "legacy");
    store.logout().await;
    assert!(store.storage().is_empty());
    assert!(store.token().is_none());
}

// =============================================================
// register
// =============================================================

#[tokio::test]
async fn register_does_not_log_in() {
    let store = store(FakeAuthApi::accepting(ADMIN_LOGIN));
    let details = RegistrationDetails {
        username: "ada".into(),
        email: "ada@x".into(),
        password: "pw".into(),
        role_id: Some(2),
    };
    let outcome = store.register(&details).await.unwrap();
    assert_eq!(outcome.data["username"], "ada");
    assert!(!store.is_logged_in());
    assert!(store.storage().is_empty());
}

// =============================================================
// rehydrate
// =============================================================

#[test]
fn corrupt_snapshot_is_purged_and_logged_out() {
    let mut storage = MemoryStorage::new();
    storage.set("user", "!!definitely not base64!!");
    let store = SessionStore::new(storage, FakeAuthApi::accepting(ADMIN_LOGIN), &config());

    assert_eq!(store.session(), &Session::empty());
    assert!(store.storage().get("user").is_none());
}

#[tokio::test]
async fn rehydrate_is_idempotent() {
    let mut store = store(FakeAuthApi::accepting(ADMIN_LOGIN));
    store.login(&creds()).await.unwrap();

    store.rehydrate();
    let first = store.session().clone();
    store.rehydrate();
    assert_eq!(store.session(), &first);
}

#[tokio::test]
async fn rehydrate_observes_out_of_band_logout() {
    let mut store = store(FakeAuthApi::accepting(ADMIN_LOGIN));
    store.login(&creds()).await.unwrap();

    store.storage_mut().remove("user");
    store.rehydrate();
    assert!(!store.is_logged_in());
}

// =============================================================
// token
// =============================================================

#[test]
fn token_falls_back_to_legacy_keys_in_order() {
    let mut storage = MemoryStorage::new();
    storage.set("authToken", "second");
    storage.set("auth", "first");
    let store = SessionStore::new(storage, FakeAuthApi::accepting(ADMIN_LOGIN), &config());
    assert_eq!(store.token().as_deref(), Some("first"));
    assert!(!store.is_logged_in());
}

#[tokio::test]
async fn token_follows_login_from_another_tab() {
    let mut store = store(FakeAuthApi::accepting(ADMIN_LOGIN));
    store.login(&creds()).await.unwrap();

    let other: LoginResponse = serde_json::from_str(STUDENT_LOGIN).unwrap();
    let raw = snapshot::encode(&other.into_user().unwrap()).unwrap();
    store.storage_mut().set("user", &raw);

    assert_eq!(store.token().as_deref(), Some("other"));
    assert_eq!(store.current_user().unwrap().name, "Ada");
}

#[test]
fn token_is_none_for_corrupt_snapshot() {
    let mut store = store(FakeAuthApi::accepting(ADMIN_LOGIN));
    store.storage_mut().set("user", "garbage");
    store.storage_mut().set("auth", "legacy");
    assert!(store.token().is_none());
}

#[test]
fn commit_login_error_resets_session() {
    let mut store = store(FakeAuthApi::accepting(ADMIN_LOGIN));
    let ok: LoginResponse = serde_json::from_str(ADMIN_LOGIN).unwrap();
    assert!(store.commit_login(Ok(ok)).unwrap().is_logged_in());

    let err = store.commit_login(Err(AuthError::Network("offline".into()))).unwrap_err();
    assert!(err.is_retryable());
    assert!(!store.is_logged_in());
    assert!(store.storage().get("user").is_none());
}

#[tokio::test]
async fn token_prefers_snapshot_over_legacy() {
    let mut store = store(FakeAuthApi::accepting(ADMIN_LOGIN));
    store.storage_mut().set("auth", "legacy");
    store.login(&creds()).await.unwrap();
    assert_eq!(store.token().as_deref(), Some("secret"));
}
