//! Request and response bodies for the backend REST API.
//!
//! Unknown fields are ignored and optional fields default, so older clients
//! keep working when the backend grows new fields.

use chrono::{DateTime, Utc};
use credential_storage::CredentialPair;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// Auth
// ==========================================

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Credential pair issued by login, register and refresh.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .field("token_type", &self.token_type)
            .finish()
    }
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl From<TokenResponse> for CredentialPair {
    fn from(tokens: TokenResponse) -> Self {
        CredentialPair::new(tokens.access_token, tokens.refresh_token)
    }
}

// ==========================================
// Users
// ==========================================

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub trial_ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stripe_customer_id: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Profile fields the user may change; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.avatar_url.is_none()
            && self.timezone.is_none()
            && self.language.is_none()
    }
}

// ==========================================
// Plans & billing
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub price_monthly: f64,
    pub max_integrations: i64,
    pub max_responses_per_day: i64,
    pub max_personas: i64,
    #[serde(default)]
    pub platforms_json: Vec<String>,
    #[serde(default)]
    pub features_json: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub gateway: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub current_period_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    #[serde(default)]
    pub plan: Option<Plan>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub plan_slug: String,
    /// "stripe", "asaas" or "mp"
    pub gateway: String,
    /// "pix", "boleto" or "credit_card"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub gateway: String,
    #[serde(default)]
    pub checkout_url: Option<String>,
    #[serde(default)]
    pub pix_qr_code: Option<String>,
    #[serde(default)]
    pub pix_copy_paste: Option<String>,
    #[serde(default)]
    pub boleto_url: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
}

// ==========================================
// Integrations & agent configuration
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    pub id: String,
    pub platform: String,
    pub channel_id: String,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub channel_avatar: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub last_run_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// OAuth consent URL for connecting a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectUrl {
    pub auth_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub id: Option<String>,
    pub persona_name: String,
    pub tone: String,
    #[serde(default)]
    pub custom_prompt: Option<String>,
    pub language: String,
    #[serde(default)]
    pub blacklist_words: Vec<String>,
    pub respond_to_praise: bool,
    pub respond_to_questions: bool,
    pub respond_to_neutral: bool,
    pub respond_to_criticism: bool,
    pub skip_spam: bool,
    pub skip_offensive: bool,
    pub working_hours_start: String,
    pub working_hours_end: String,
    #[serde(default)]
    pub working_days: Vec<u8>,
    pub auto_mode: bool,
    pub approval_required: bool,
}

/// Partial agent configuration; only `Some` fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blacklist_words: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respond_to_praise: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respond_to_questions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respond_to_neutral: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respond_to_criticism: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_spam: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_offensive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_hours_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_hours_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_days: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_required: Option<bool>,
}

// ==========================================
// Comments
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub integration_id: String,
    pub external_comment_id: String,
    #[serde(default)]
    pub author: Option<String>,
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub platform_url: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub response: Option<ReplyResponse>,
}

/// The AI-generated reply attached to a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyResponse {
    pub id: String,
    pub text: String,
    pub status: String,
    #[serde(default)]
    pub ai_model_used: Option<String>,
    #[serde(default)]
    pub tokens_used: i64,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Query filters for the comment list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentFilter {
    pub platform: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl CommentFilter {
    /// Most recent `limit` comments.
    pub fn latest(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                query.push((key.to_string(), value));
            }
        };
        push("platform", self.platform.clone());
        push("category", self.category.clone());
        push("status", self.status.clone());
        push("search", self.search.clone());
        push("page", self.page.map(|p| p.to_string()));
        push("limit", self.limit.map(|l| l.to_string()));
        query
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyEdit {
    pub text: String,
}

/// Dashboard summary counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub today_comments: i64,
    #[serde(default)]
    pub today_responses: i64,
    #[serde(default)]
    pub total_comments: i64,
    #[serde(default)]
    pub total_responses: i64,
    #[serde(default)]
    pub response_rate: f64,
    #[serde(default)]
    pub active_integrations: i64,
}

// ==========================================
// Agents
// ==========================================

/// Acknowledgement of a queued agent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRunResponse {
    #[serde(default)]
    pub status: String,
    pub task_id: String,
}

/// Raw background job status as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStatusResponse {
    #[serde(default)]
    pub task_id: String,
    pub status: String,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStopResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub task_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentToggleResponse {
    pub is_active: bool,
}

// ==========================================
// Admin
// ==========================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: i64,
    #[serde(default)]
    pub total_integrations: i64,
    #[serde(default)]
    pub total_comments: i64,
    #[serde(default)]
    pub total_responses: i64,
    #[serde(default)]
    pub users_by_plan: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    #[serde(default)]
    pub api: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub celery_workers: String,
    #[serde(default)]
    pub scheduler: String,
}

// ==========================================
// Shared
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Timestamp parsing that accepts RFC 3339 as well as naive ISO 8601
/// (interpreted as UTC), since the backend emits both depending on the
/// database driver.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }

    pub fn option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_token_response_debug_redacts_tokens() {
        let tokens: TokenResponse = serde_json::from_str(
            r#"{"access_token":"secret-access","refresh_token":"secret-refresh"}"#,
        )
        .unwrap();

        let debug = format!("{:?}", tokens);
        assert!(!debug.contains("secret-access"));
        assert!(!debug.contains("secret-refresh"));
        assert!(debug.contains("bearer"));
    }

    #[test]
    fn test_user_deserializes_with_optional_fields_missing() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","email":"a@b.com","name":"Ana","unexpected":"ignored"}"#,
        )
        .unwrap();
        assert_eq!(user.id, "u1");
        assert!(!user.is_admin);
        assert!(user.created_at.is_none());
    }

    #[test]
    fn test_timestamps_accept_offset_and_naive() {
        let user: User = serde_json::from_str(
            r#"{"id":"u1","email":"a@b.com","name":"Ana",
                "created_at":"2024-05-01T12:30:00+00:00",
                "trial_ends_at":"2024-05-15T08:00:00.123456"}"#,
        )
        .unwrap();
        assert_eq!(
            user.created_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap())
        );
        assert_eq!(
            user.trial_ends_at.map(|t| t.date_naive().to_string()),
            Some("2024-05-15".to_string())
        );
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let result: Result<Integration, _> = serde_json::from_str(
            r#"{"id":"i1","platform":"youtube","channel_id":"c","created_at":"yesterday"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_comment_with_nested_reply() {
        let comment: Comment = serde_json::from_str(
            r#"{"id":"c1","integration_id":"i1","external_comment_id":"yt-1",
                "text":"Great video!","category":"praise",
                "created_at":"2024-05-01T12:30:00Z",
                "response":{"id":"r1","text":"Thanks!","status":"pending_approval",
                            "tokens_used":42,"created_at":"2024-05-01T12:31:00Z"}}"#,
        )
        .unwrap();
        let reply = comment.response.unwrap();
        assert_eq!(reply.status, "pending_approval");
        assert_eq!(reply.tokens_used, 42);
    }

    #[test]
    fn test_comment_filter_query_skips_empty() {
        let filter = CommentFilter {
            category: Some("question".into()),
            search: Some(String::new()),
            page: Some(2),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("category".to_string(), "question".to_string()),
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_partial_updates_serialize_only_set_fields() {
        let update = AgentConfigUpdate {
            tone: Some("friendly".into()),
            auto_mode: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"tone": "friendly", "auto_mode": true})
        );
        assert!(UserUpdate::default().is_empty());
    }

    #[test]
    fn test_token_response_into_pair() {
        let tokens: TokenResponse =
            serde_json::from_str(r#"{"access_token":"a","refresh_token":"r"}"#).unwrap();
        assert_eq!(tokens.token_type, "bearer");
        let pair: CredentialPair = tokens.into();
        assert_eq!(pair, CredentialPair::new("a", "r"));
    }

    #[test]
    fn test_admin_stats_plan_breakdown() {
        let stats: AdminStats = serde_json::from_str(
            r#"{"total_users":3,"total_integrations":2,"total_comments":10,
                "total_responses":7,"users_by_plan":{"Pro":2,"Free":1}}"#,
        )
        .unwrap();
        assert_eq!(stats.users_by_plan.get("Pro"), Some(&2));
    }
}
