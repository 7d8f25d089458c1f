use super::*;
use crate::request::MockHttpClient;
use std::cell::RefCell;
use std::rc::Rc;
use crate::storage::MemoryStore;

// =========================================================
// 辅助函数
// =========================================================

const BASE: &str = "https://api.example";
const TOKEN_URL: &str = "https://api.example/api/auth/token";
const DATA_URL: &str = "https://api.example/api/research/abc";

fn token_body(token: &str) -> String {
    format!(r#"{{"access_token":"{}","token_type":"bearer"}}"#, token)
}

fn create_auth(store: MemoryStore, client: MockHttpClient) -> TokenAuth<MemoryStore, MockHttpClient> {
    TokenAuth::new(store, client, ApiConfig::new(BASE))
}

fn authorization(req: &HttpRequest) -> Option<&str> {
    req.headers.get(HEADER_AUTHORIZATION)
}

// =========================================================
// user_id 测试
// =========================================================

#[test]
fn test_user_id_is_stable() {
    let auth = create_auth(MemoryStore::new(), MockHttpClient::new());

    let first = auth.user_id().unwrap();
    let second = auth.user_id().unwrap();

    assert_eq!(first, second);
    assert!(first < USER_ID_UPPER_BOUND);
    assert_eq!(auth.store.get(STORAGE_USER_ID_KEY), Some(first.to_string()));
}

#[test]
fn test_user_id_regenerated_after_clear() {
    let auth = create_auth(MemoryStore::new(), MockHttpClient::new());
    auth.user_id().unwrap();

    auth.store.remove(STORAGE_USER_ID_KEY).unwrap();
    let id = auth.user_id().unwrap();

    assert!(id < USER_ID_UPPER_BOUND);
    assert_eq!(auth.store.get(STORAGE_USER_ID_KEY), Some(id.to_string()));
}

#[test]
fn test_user_id_reads_existing_value() {
    let store = MemoryStore::with_entries([(STORAGE_USER_ID_KEY, "4242")]);
    let auth = create_auth(store, MockHttpClient::new());

    assert_eq!(auth.user_id().unwrap(), 4242);
}

#[test]
fn test_user_id_replaces_garbage() {
    let store = MemoryStore::with_entries([(STORAGE_USER_ID_KEY, "not-a-number")]);
    let auth = create_auth(store, MockHttpClient::new());

    let id = auth.user_id().unwrap();
    assert!(id < USER_ID_UPPER_BOUND);
    assert_eq!(auth.store.get(STORAGE_USER_ID_KEY), Some(id.to_string()));
}

#[test]
fn test_user_id_keeps_leading_integer() {
    let store = MemoryStore::with_entries([(STORAGE_USER_ID_KEY, " 123abc")]);
    let auth = create_auth(store, MockHttpClient::new());

    assert_eq!(auth.user_id().unwrap(), 123);
    assert_eq!(auth.store.get(STORAGE_USER_ID_KEY).as_deref(), Some(" 123abc"));
}

#[test]
fn test_user_id_keeps_out_of_range_value() {
    let store = MemoryStore::with_entries([(STORAGE_USER_ID_KEY, "2000000")]);
    let auth = create_auth(store, MockHttpClient::new());

    assert_eq!(auth.user_id().unwrap(), 2_000_000);
    assert_eq!(auth.user_id().unwrap(), 2_000_000);
    assert_eq!(auth.store.get(STORAGE_USER_ID_KEY).as_deref(), Some("2000000"));
}

// =========================================================
// resolve_token / issue_token 测试
// =========================================================

#[tokio::test]
async fn test_resolve_uses_stored_token() {
    let store = MemoryStore::with_entries([(STORAGE_TOKEN_KEY, "stored")]);
    let auth = create_auth(store, MockHttpClient::new());

    let token = auth.resolve_token().await.unwrap();

    assert_eq!(token, "stored");
    assert!(auth.client.requests.borrow().is_empty());
}

#[tokio::test]
async fn test_resolve_issues_when_missing() {
    let client = MockHttpClient::new();
    client.mock_response(TOKEN_URL, 200, &token_body("fresh"));
    let auth = create_auth(MemoryStore::new(), client);

    let token = auth.resolve_token().await.unwrap();

    assert_eq!(token, "fresh");
    assert_eq!(auth.store.get(STORAGE_TOKEN_KEY).as_deref(), Some("fresh"));
    assert_eq!(auth.client.requests_to(TOKEN_URL).len(), 1);
}

#[tokio::test]
async fn test_resolve_treats_empty_token_as_missing() {
    let store = MemoryStore::with_entries([(STORAGE_TOKEN_KEY, "")]);
    let client = MockHttpClient::new();
    client.mock_response(TOKEN_URL, 200, &token_body("fresh"));
    let auth = create_auth(store, client);

    assert_eq!(auth.resolve_token().await.unwrap(), "fresh");
}

#[tokio::test]
async fn test_issue_sends_user_id_payload() {
    let store = MemoryStore::with_entries([(STORAGE_USER_ID_KEY, "17")]);
    let client = MockHttpClient::new();
    client.mock_response(TOKEN_URL, 200, &token_body("t"));
    let auth = create_auth(store, client);

    auth.issue_token().await.unwrap();

    let requests = auth.client.requests_to(TOKEN_URL);
    let req = &requests[0];
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.body.as_deref(), Some(r#"{"user_id":17}"#));
    assert_eq!(req.headers.get(HEADER_CONTENT_TYPE), Some(CONTENT_TYPE_JSON));
    assert!(authorization(req).is_none());
}

#[tokio::test]
async fn test_issue_failure_is_token_issuance_error() {
    let client = MockHttpClient::new();
    client.mock_response(TOKEN_URL, 500, "boom");
    let auth = create_auth(MemoryStore::new(), client);

    let err = auth.issue_token().await.unwrap_err();

    assert!(matches!(err, AuthError::TokenIssuance { status: 500 }));
    assert_eq!(auth.store.get(STORAGE_TOKEN_KEY), None);
}

#[tokio::test]
async fn test_issue_rejects_body_without_token() {
    let client = MockHttpClient::new();
    client.mock_response(TOKEN_URL, 200, r#"{"token":"wrong-field"}"#);
    let auth = create_auth(MemoryStore::new(), client);

    let err = auth.issue_token().await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidTokenResponse(_)));
}

#[tokio::test]
async fn test_issue_uses_relative_url_without_base() {
    let client = MockHttpClient::new();
    client.mock_response("/api/auth/token", 200, &token_body("rel"));
    let auth = TokenAuth::new(MemoryStore::new(), client, ApiConfig::default());

    assert_eq!(auth.issue_token().await.unwrap(), "rel");
}

// =========================================================
// fetch_with_auth 测试
// =========================================================

#[tokio::test]
async fn test_fetch_issues_once_before_primary_request() {
    let store = Rc::new(MemoryStore::new());
    let client = MockHttpClient::new();
    client.mock_response(TOKEN_URL, 200, &token_body("fresh"));
    client.mock_response(DATA_URL, 200, "{}");

    // 记录主请求发出时存储中的令牌
    let stored_at_send = Rc::new(RefCell::new(None));
    {
        let store = store.clone();
        let stored_at_send = stored_at_send.clone();
        client.on_send(move |req| {
            if req.url == DATA_URL {
                *stored_at_send.borrow_mut() = Some(store.get(STORAGE_TOKEN_KEY));
            }
        });
    }
    let auth = TokenAuth::new(store.clone(), client, ApiConfig::new(BASE));

    let res = auth
        .fetch_with_auth(DATA_URL, RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(res.status, 200);
    assert_eq!(*stored_at_send.borrow(), Some(Some("fresh".to_string())));
    let requests = auth.client.requests.borrow();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, TOKEN_URL);
    assert_eq!(requests[1].url, DATA_URL);
    assert_eq!(authorization(&requests[1]), Some("Bearer fresh"));
}

#[tokio::test]
async fn test_fetch_with_stored_token_skips_issuance() {
    let store = MemoryStore::with_entries([(STORAGE_TOKEN_KEY, "stored")]);
    let client = MockHttpClient::new();
    client.mock_response(DATA_URL, 200, "{}");
    let auth = create_auth(store, client);

    auth.fetch_with_auth(DATA_URL, RequestOptions::default())
        .await
        .unwrap();

    assert!(auth.client.requests_to(TOKEN_URL).is_empty());
    let data = auth.client.requests_to(DATA_URL);
    assert_eq!(data.len(), 1);
    assert_eq!(authorization(&data[0]), Some("Bearer stored"));
}

#[tokio::test]
async fn test_fetch_retries_once_on_401() {
    let store = MemoryStore::with_entries([(STORAGE_TOKEN_KEY, "stale")]);
    let client = MockHttpClient::new();
    client.mock_response(TOKEN_URL, 200, &token_body("renewed"));
    client.mock_response(DATA_URL, 401, "");
    client.mock_response(DATA_URL, 200, "ok");
    let auth = create_auth(store, client);

    let res = auth
        .fetch_with_auth(DATA_URL, RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(res.status, 200);
    assert_eq!(res.body, "ok");
    assert_eq!(auth.client.requests_to(TOKEN_URL).len(), 1);

    let data = auth.client.requests_to(DATA_URL);
    assert_eq!(data.len(), 2);
    assert_eq!(authorization(&data[0]), Some("Bearer stale"));
    assert_eq!(authorization(&data[1]), Some("Bearer renewed"));
    assert_eq!(auth.store.get(STORAGE_TOKEN_KEY).as_deref(), Some("renewed"));
}

#[tokio::test]
async fn test_fetch_second_401_is_returned_without_more_retries() {
    let store = MemoryStore::with_entries([(STORAGE_TOKEN_KEY, "stale")]);
    let client = MockHttpClient::new();
    client.mock_response(TOKEN_URL, 200, &token_body("renewed"));
    client.mock_response(DATA_URL, 401, "still no");
    let auth = create_auth(store, client);

    let res = auth
        .fetch_with_auth(DATA_URL, RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(res.status, 401);
    assert_eq!(res.body, "still no");
    assert_eq!(auth.client.requests_to(DATA_URL).len(), 2);
    assert_eq!(auth.client.requests_to(TOKEN_URL).len(), 1);
}

#[tokio::test]
async fn test_fetch_does_not_retry_other_statuses() {
    for status in [200u16, 403, 500] {
        let store = MemoryStore::with_entries([(STORAGE_TOKEN_KEY, "stored")]);
        let client = MockHttpClient::new();
        client.mock_response(DATA_URL, status, "body");
        let auth = create_auth(store, client);

        let res = auth
            .fetch_with_auth(DATA_URL, RequestOptions::default())
            .await
            .unwrap();

        assert_eq!(res.status, status);
        assert_eq!(res.body, "body");
        assert_eq!(auth.client.requests.borrow().len(), 1, "status {}", status);
        assert_eq!(auth.store.get(STORAGE_TOKEN_KEY).as_deref(), Some("stored"));
    }
}

#[tokio::test]
async fn test_fetch_reissue_failure_propagates() {
    let store = MemoryStore::with_entries([(STORAGE_TOKEN_KEY, "stale")]);
    let client = MockHttpClient::new();
    client.mock_response(TOKEN_URL, 503, "");
    client.mock_response(DATA_URL, 401, "");
    let auth = create_auth(store, client);

    let err = auth
        .fetch_with_auth(DATA_URL, RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::TokenIssuance { status: 503 }));
    // 旧令牌已被丢弃
    assert_eq!(auth.store.get(STORAGE_TOKEN_KEY), None);
    assert_eq!(auth.client.requests_to(DATA_URL).len(), 1);
}

#[tokio::test]
async fn test_fetch_network_error_is_not_retried() {
    let store = MemoryStore::with_entries([(STORAGE_TOKEN_KEY, "stored")]);
    let auth = create_auth(store, MockHttpClient::new());

    let err = auth
        .fetch_with_auth(DATA_URL, RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Http(HttpError::NetworkError(_))));
    assert_eq!(auth.client.requests.borrow().len(), 1);
}

#[tokio::test]
async fn test_fetch_keeps_custom_headers() {
    let store = MemoryStore::with_entries([(STORAGE_TOKEN_KEY, "stored")]);
    let client = MockHttpClient::new();
    client.mock_response(DATA_URL, 200, "");
    let auth = create_auth(store, client);

    let options = RequestOptions::default().header("X-Custom", "1");
    auth.fetch_with_auth(DATA_URL, options).await.unwrap();

    let data = auth.client.requests_to(DATA_URL);
    assert_eq!(authorization(&data[0]), Some("Bearer stored"));
    assert_eq!(data[0].headers.get("X-Custom"), Some("1"));
}

#[tokio::test]
async fn test_fetch_caller_authorization_overrides() {
    let store = MemoryStore::with_entries([(STORAGE_TOKEN_KEY, "stored")]);
    let client = MockHttpClient::new();
    client.mock_response(DATA_URL, 200, "");
    let auth = create_auth(store, client);

    let options = RequestOptions::default().header("Authorization", "Bearer override");
    auth.fetch_with_auth(DATA_URL, options).await.unwrap();

    let data = auth.client.requests_to(DATA_URL);
    assert_eq!(data[0].headers.len(), 1);
    assert_eq!(authorization(&data[0]), Some("Bearer override"));
}

#[tokio::test]
async fn test_fetch_forwards_method_and_body_on_retry() {
    let store = MemoryStore::with_entries([(STORAGE_TOKEN_KEY, "stale")]);
    let client = MockHttpClient::new();
    client.mock_response(TOKEN_URL, 200, &token_body("renewed"));
    client.mock_response(DATA_URL, 401, "");
    client.mock_response(DATA_URL, 201, "");
    let auth = create_auth(store, client);

    let options = RequestOptions::new(HttpMethod::Post).json_body(r#"{"k":1}"#.to_string());
    let res = auth.fetch_with_auth(DATA_URL, options).await.unwrap();

    assert_eq!(res.status, 201);
    for req in auth.client.requests_to(DATA_URL) {
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body.as_deref(), Some(r#"{"k":1}"#));
        assert_eq!(req.headers.get(HEADER_CONTENT_TYPE), Some(CONTENT_TYPE_JSON));
    }
}

// =========================================================
// 并发
// =========================================================

#[tokio::test]
async fn test_concurrent_calls_both_issue_tokens() {
    let client = MockHttpClient::new();
    client.mock_response(TOKEN_URL, 200, &token_body("first"));
    client.mock_response(TOKEN_URL, 200, &token_body("second"));
    let auth = create_auth(MemoryStore::new(), client);

    let (a, b) = tokio::join!(auth.resolve_token(), auth.resolve_token());
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_ne!(a, b);
    assert_eq!(auth.client.requests_to(TOKEN_URL).len(), 2);
    // 后写者胜：存储中只保留其中一个
    let stored = auth.store.get(STORAGE_TOKEN_KEY).unwrap();
    assert!(stored == a || stored == b);
}
