//! Endpoint groups against a scripted backend.

use api_client::models::{AgentConfigUpdate, CheckoutRequest, CommentFilter, UserUpdate};
use api_client::testing::MockTransport;
use api_client::{ApiClient, ApiError, ApiOrigin, Method};
use credential_storage::{CredentialPair, CredentialsManager, MemoryStore};
use serde_json::json;
use std::sync::Arc;

fn logged_in_client(transport: Arc<MockTransport>) -> ApiClient {
    let credentials = CredentialsManager::new(Arc::new(MemoryStore::new()));
    credentials
        .set_pair(&CredentialPair::new("access", "refresh"))
        .unwrap();
    let origin = ApiOrigin::resolve(Some("https://api.example.com/"), None).unwrap();
    ApiClient::new(origin, transport, credentials)
}

fn user_json() -> serde_json::Value {
    json!({
        "id": "u1", "email": "ana@example.com", "name": "Ana",
        "is_admin": false, "email_verified": true,
        "timezone": "America/Sao_Paulo", "language": "pt-BR",
        "created_at": "2024-05-01T12:00:00Z"
    })
}

#[tokio::test]
async fn login_posts_credentials_without_refresh() {
    let transport = Arc::new(MockTransport::new());
    transport.on_json(
        Method::POST,
        "auth/login",
        200,
        json!({"access_token": "a", "refresh_token": "r", "token_type": "bearer"}),
    );
    let client = logged_in_client(transport.clone());

    let tokens = client.auth().login("ana@example.com", "secret123").await.unwrap();

    assert_eq!(tokens.access_token, "a");
    let request = &transport.requests()[0];
    assert_eq!(request.url, "https://api.example.com/api/v1/auth/login");
    assert_eq!(
        request.body,
        Some(json!({"email": "ana@example.com", "password": "secret123"}))
    );
}

#[tokio::test]
async fn wrong_password_never_refreshes() {
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::POST, "auth/login", 401, r#"{"detail":"Email ou senha inválidos"}"#);
    let client = logged_in_client(transport.clone());

    let err = client.auth().login("ana@example.com", "wrong").await.unwrap_err();

    assert_eq!(err.to_string(), "HTTP 401: Email ou senha inválidos");
    assert_eq!(transport.count(Method::POST, "auth/refresh"), 0);
}

#[tokio::test]
async fn register_sends_name_email_password() {
    let transport = Arc::new(MockTransport::new());
    transport.on_json(
        Method::POST,
        "auth/register",
        201,
        json!({"access_token": "a", "refresh_token": "r"}),
    );
    let client = logged_in_client(transport.clone());

    client
        .auth()
        .register("Ana", "ana@example.com", "secret123")
        .await
        .unwrap();

    assert_eq!(
        transport.requests()[0].body,
        Some(json!({"name": "Ana", "email": "ana@example.com", "password": "secret123"}))
    );
}

#[tokio::test]
async fn profile_update_sends_only_changed_fields() {
    let transport = Arc::new(MockTransport::new());
    transport.on_json(Method::PATCH, "users/me", 200, user_json());
    let client = logged_in_client(transport.clone());

    let user = client
        .users()
        .update(&UserUpdate {
            language: Some("en".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(user.name, "Ana");
    assert_eq!(transport.requests()[0].body, Some(json!({"language": "en"})));
}

#[tokio::test]
async fn comment_list_forwards_filters() {
    let transport = Arc::new(MockTransport::new());
    transport.on_json(Method::GET, "comments/", 200, json!([]));
    let client = logged_in_client(transport.clone());

    let filter = CommentFilter {
        category: Some("question".into()),
        page: Some(1),
        limit: Some(10),
        ..Default::default()
    };
    let comments = client.comments().list(&filter).await.unwrap();

    assert!(comments.is_empty());
    let request = &transport.requests()[0];
    assert_eq!(request.url, "https://api.example.com/api/v1/comments/");
    assert_eq!(request.query, filter.to_query());
}

#[tokio::test]
async fn moderation_actions_hit_comment_paths() {
    let transport = Arc::new(MockTransport::new());
    transport.on_json(Method::PATCH, "comments/c1/approve", 200, json!({"message": "ok"}));
    transport.on_json(Method::PATCH, "comments/c1/reject", 200, json!({"message": "ok"}));
    transport.on_json(Method::PATCH, "comments/c1/edit", 200, json!({"message": "ok"}));
    let client = logged_in_client(transport.clone());

    client.comments().approve("c1").await.unwrap();
    client.comments().reject("c1").await.unwrap();
    client.comments().edit("c1", "Obrigado!").await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[0].body.is_none());
    assert_eq!(requests[2].body, Some(json!({"text": "Obrigado!"})));
}

#[tokio::test]
async fn agent_run_status_stop() {
    let transport = Arc::new(MockTransport::new());
    transport.on_json(Method::POST, "agents/run/i1", 200, json!({"status": "queued", "task_id": "t1"}));
    transport.on_json(
        Method::GET,
        "agents/status/t1",
        200,
        json!({"task_id": "t1", "status": "STARTED", "result": null}),
    );
    transport.on_json(Method::POST, "agents/stop/t1", 200, json!({"status": "revoked", "task_id": "t1"}));
    let client = logged_in_client(transport.clone());

    let run = client.agents().run("i1").await.unwrap();
    let status = client.agents().status(&run.task_id).await.unwrap();
    let stop = client.agents().stop(&run.task_id).await.unwrap();

    assert_eq!(run.status, "queued");
    assert_eq!(status.status, "STARTED");
    assert!(status.result.is_none());
    assert_eq!(stop.status, "revoked");
}

#[tokio::test]
async fn agent_config_update_and_toggle() {
    let config = json!({
        "id": "cfg1", "persona_name": "Luna", "tone": "friendly", "language": "pt-BR",
        "blacklist_words": [], "respond_to_praise": true, "respond_to_questions": true,
        "respond_to_neutral": false, "respond_to_criticism": true, "skip_spam": true,
        "skip_offensive": true, "working_hours_start": "08:00", "working_hours_end": "22:00",
        "working_days": [1, 2, 3, 4, 5], "auto_mode": false, "approval_required": true
    });
    let transport = Arc::new(MockTransport::new());
    transport.on_json(Method::PATCH, "integrations/i1/config", 200, config);
    transport.on_json(Method::PATCH, "agents/toggle/i1", 200, json!({"is_active": false}));
    let client = logged_in_client(transport.clone());

    let updated = client
        .integrations()
        .update_config(
            "i1",
            &AgentConfigUpdate {
                persona_name: Some("Luna".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let toggled = client.agents().toggle("i1").await.unwrap();

    assert_eq!(updated.working_days, vec![1, 2, 3, 4, 5]);
    assert!(!toggled.is_active);
}

#[tokio::test]
async fn integration_delete_accepts_no_content() {
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::DELETE, "integrations/i1", 204, "");
    let client = logged_in_client(transport);

    client.integrations().delete("i1").await.unwrap();
}

#[tokio::test]
async fn subscription_absent_is_none() {
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::GET, "billing/subscription", 200, "null");
    let client = logged_in_client(transport);

    assert!(client.billing().subscription().await.unwrap().is_none());
}

#[tokio::test]
async fn checkout_returns_gateway_payload() {
    let transport = Arc::new(MockTransport::new());
    transport.on_json(
        Method::POST,
        "billing/checkout",
        200,
        json!({"gateway": "asaas", "pix_qr_code": "base64", "pix_copy_paste": "000201", "payment_id": "p1"}),
    );
    let client = logged_in_client(transport.clone());

    let response = client
        .billing()
        .checkout(&CheckoutRequest {
            plan_slug: "pro".into(),
            gateway: "asaas".into(),
            payment_method: Some("pix".into()),
            success_url: None,
            cancel_url: None,
        })
        .await
        .unwrap();

    assert_eq!(response.pix_copy_paste.as_deref(), Some("000201"));
    assert_eq!(
        transport.requests()[0].body,
        Some(json!({"plan_slug": "pro", "gateway": "asaas", "payment_method": "pix"}))
    );
}

#[tokio::test]
async fn admin_user_status_uses_query_flag() {
    let transport = Arc::new(MockTransport::new());
    transport.on_json(Method::PATCH, "admin/users/u2/status", 200, json!({"message": "ok"}));
    let client = logged_in_client(transport.clone());

    client.admin().set_user_active("u2", false).await.unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.query, vec![("is_active".to_string(), "false".to_string())]);
    assert!(request.body.is_none());
}

#[tokio::test]
async fn admin_forbidden_for_regular_users() {
    let transport = Arc::new(MockTransport::new());
    transport.on(Method::GET, "admin/stats", 403, r#"{"detail":"Acesso negado"}"#);
    let client = logged_in_client(transport.clone());

    let err = client.admin().stats().await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(transport.count(Method::POST, "auth/refresh"), 0);
}

#[tokio::test]
async fn invalid_identifiers_rejected_before_sending() {
    let transport = Arc::new(MockTransport::new());
    let client = logged_in_client(transport.clone());

    let err = client.agents().status("../admin/stats").await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidPathSegment(_)));
    assert!(transport.requests().is_empty());
}
