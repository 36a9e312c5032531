//! Identity supplied by the upstream auth layer.
//!
//! calmserver never authenticates. The reverse proxy in front of it has
//! already validated the session and injects the caller's identity as
//! request headers; this module only parses them into a typed context
//! used for authorization decisions.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const HEADER_USER_ID: &str = "x-user-id";
pub const HEADER_USER_ROLE: &str = "x-user-role";
pub const HEADER_SUBSCRIPTION_TIER: &str = "x-subscription-tier";
pub const HEADER_SUBSCRIPTION_EXPIRES: &str = "x-subscription-expires";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: Uuid,
    pub role: UserRole,
    pub subscription: Option<SubscriptionInfo>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Member,
    Admin,
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            _ => Self::Member,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Basic,
    Premium,
}

impl From<&str> for SubscriptionTier {
    fn from(s: &str) -> Self {
        match s {
            "premium" => Self::Premium,
            _ => Self::Basic,
        }
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Premium => write!(f, "premium"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionInfo {
    pub tier: SubscriptionTier,
    pub expires_at: DateTime<Utc>,
}

impl SubscriptionInfo {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }
}

impl UserContext {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

#[async_trait]
impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_str(parts, HEADER_USER_ID)
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({
                        "success": false,
                        "error": "Missing or invalid x-user-id header"
                    })),
                )
            })?;

        let role = header_str(parts, HEADER_USER_ROLE)
            .map(UserRole::from)
            .unwrap_or(UserRole::Member);

        let subscription = match (
            header_str(parts, HEADER_SUBSCRIPTION_TIER),
            header_str(parts, HEADER_SUBSCRIPTION_EXPIRES),
        ) {
            (Some(tier), Some(expires)) => DateTime::parse_from_rfc3339(expires)
                .ok()
                .map(|exp| SubscriptionInfo {
                    tier: SubscriptionTier::from(tier),
                    expires_at: exp.with_timezone(&Utc),
                }),
            _ => None,
        };

        Ok(UserContext {
            user_id,
            role,
            subscription,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_role_conversion() {
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        assert_eq!(UserRole::from("member"), UserRole::Member);
        assert_eq!(UserRole::from("anything-else"), UserRole::Member);
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_tier_conversion() {
        assert_eq!(SubscriptionTier::from("premium"), SubscriptionTier::Premium);
        assert_eq!(SubscriptionTier::from("basic"), SubscriptionTier::Basic);
        assert_eq!(SubscriptionTier::Premium.to_string(), "premium");
    }

    #[test]
    fn test_subscription_expiry() {
        let now = Utc::now();
        let active = SubscriptionInfo {
            tier: SubscriptionTier::Premium,
            expires_at: now + Duration::days(30),
        };
        let lapsed = SubscriptionInfo {
            tier: SubscriptionTier::Premium,
            expires_at: now - Duration::seconds(1),
        };
        assert!(active.is_active_at(now));
        assert!(!lapsed.is_active_at(now));
    }
}
