//! # Payments Module
//!
//! Payment records for course purchases: checkout-order creation, the
//! gateway webhook that verifies a payment and feeds the enrollment
//! bridge, and the admin refund path. The gateway itself is opaque; only
//! its signed verdict is consumed here.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::UserContext;
use crate::courses::types::PricingType;
use crate::courses::{self, Course};
use crate::enrollment::error::EnrollmentError;
use crate::shared::state::AppState;
use crate::shared::utils::DbPool;

pub mod bridge;
pub mod gateway;

use gateway::VerificationRequest;

// ============================================================================
// DATABASE SCHEMA
// ============================================================================

diesel::table! {
    payments (id) {
        id -> Uuid,
        user_id -> Uuid,
        payment_type -> Text,
        status -> Text,
        amount -> Numeric,
        currency -> Text,
        course_id -> Nullable<Uuid>,
        gateway_order_id -> Text,
        gateway_payment_id -> Nullable<Text>,
        created_at -> Timestamptz,
        verified_at -> Nullable<Timestamptz>,
        refunded_at -> Nullable<Timestamptz>,
    }
}

// ============================================================================
// DATA MODELS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Insertable)]
#[diesel(table_name = payments)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub payment_type: String,
    pub status: String,
    pub amount: BigDecimal,
    pub currency: String,
    pub course_id: Option<Uuid>,
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
    pub refunded_at: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn current_status(&self) -> PaymentStatus {
        PaymentStatus::from(self.status.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl From<&str> for PaymentStatus {
    fn from(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "refunded" => Self::Refunded,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Refunded => write!(f, "refunded"),
        }
    }
}

impl PaymentStatus {
    /// Lifecycle guard: pending settles or fails; completed can only be
    /// refunded by an explicit admin action; failed and refunded are
    /// terminal.
    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Completed)
                | (Self::Pending, Self::Failed)
                | (Self::Completed, Self::Refunded)
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Course,
    Content,
    Subscription,
}

impl From<&str> for PaymentType {
    fn from(s: &str) -> Self {
        match s {
            "content" => Self::Content,
            "subscription" => Self::Subscription,
            _ => Self::Course,
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Course => write!(f, "course"),
            Self::Content => write!(f, "content"),
            Self::Subscription => write!(f, "subscription"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub course_id: Uuid,
}

// ============================================================================
// PAYMENT ENGINE
// ============================================================================

pub struct PaymentEngine {
    db: DbPool,
}

impl PaymentEngine {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    fn conn(
        &self,
    ) -> Result<
        diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>,
        EnrollmentError,
    > {
        self.db
            .get()
            .map_err(|e| EnrollmentError::Database(e.to_string()))
    }

    /// Create a pending payment for a course checkout. A failed or
    /// abandoned checkout leaves only this pending row behind; nothing
    /// touches enrollments until the gateway verdict arrives.
    pub async fn create_checkout_order(
        &self,
        user: &UserContext,
        req: CreateOrderRequest,
    ) -> Result<Payment, EnrollmentError> {
        let mut conn = self.conn()?;

        let course: Option<Course> = courses::courses::table
            .filter(courses::courses::id.eq(req.course_id))
            .first::<Course>(&mut conn)
            .optional()?;
        let course =
            course.ok_or_else(|| EnrollmentError::NotFound("Course not found".to_string()))?;

        if course.pricing() == PricingType::Free {
            return Err(EnrollmentError::Validation(
                "Free courses do not require payment".to_string(),
            ));
        }
        let amount = course.price.clone().ok_or_else(|| {
            EnrollmentError::Validation("Course has no one-off purchase price".to_string())
        })?;

        let payment = Payment {
            id: Uuid::new_v4(),
            user_id: user.user_id,
            payment_type: PaymentType::Course.to_string(),
            status: PaymentStatus::Pending.to_string(),
            amount,
            currency: course.currency.clone(),
            course_id: Some(course.id),
            gateway_order_id: format!("order_{}", Uuid::new_v4().simple()),
            gateway_payment_id: None,
            created_at: Utc::now(),
            verified_at: None,
            refunded_at: None,
        };

        diesel::insert_into(payments::table)
            .values(&payment)
            .execute(&mut conn)?;

        Ok(payment)
    }

    pub async fn list_payments(&self, user_id: Uuid) -> Result<Vec<Payment>, EnrollmentError> {
        let mut conn = self.conn()?;
        let list = payments::table
            .filter(payments::user_id.eq(user_id))
            .order(payments::created_at.desc())
            .load::<Payment>(&mut conn)?;
        Ok(list)
    }

    /// Verify a gateway callback and feed the enrollment bridge. A failed
    /// verification changes nothing; the payment stays as it was and the
    /// caller owns any retry.
    pub async fn handle_webhook(
        &self,
        verifier: &dyn gateway::GatewayVerifier,
        req: VerificationRequest,
    ) -> Result<(Payment, crate::enrollment::Enrollment), EnrollmentError> {
        verifier.verify(&req).map_err(|e| {
            warn!(
                "Gateway verification rejected for order {}: {e}",
                req.gateway_order_id
            );
            EnrollmentError::ExternalVerification(e.to_string())
        })?;

        let mut conn = self.conn()?;
        bridge::on_payment_verified(&mut conn, &req.gateway_order_id, &req.gateway_payment_id)
    }

    /// Admin-only refund: the single permitted exit from `completed`.
    pub async fn refund(
        &self,
        user: &UserContext,
        payment_id: Uuid,
    ) -> Result<Payment, EnrollmentError> {
        if !user.is_admin() {
            return Err(EnrollmentError::Forbidden(
                "Refunds require the admin role".to_string(),
            ));
        }

        let mut conn = self.conn()?;
        conn.transaction::<Payment, EnrollmentError, _>(|conn| {
            let payment: Option<Payment> = payments::table
                .filter(payments::id.eq(payment_id))
                .for_update()
                .first::<Payment>(conn)
                .optional()?;
            let payment = payment
                .ok_or_else(|| EnrollmentError::NotFound("Payment not found".to_string()))?;

            if !payment
                .current_status()
                .can_transition_to(PaymentStatus::Refunded)
            {
                return Err(EnrollmentError::Conflict(format!(
                    "Cannot refund a {} payment",
                    payment.status
                )));
            }

            let refunded: Payment = diesel::update(
                payments::table.filter(payments::id.eq(payment.id)),
            )
            .set((
                payments::status.eq(PaymentStatus::Refunded.to_string()),
                payments::refunded_at.eq(Some(Utc::now())),
            ))
            .get_result::<Payment>(conn)?;
            Ok(refunded)
        })
    }
}

// ============================================================================
// HTTP HANDLERS
// ============================================================================

fn error_response(err: EnrollmentError) -> axum::response::Response {
    let status = err.status_code();
    if status.is_server_error() {
        log::error!("Payment operation failed: {err}");
    }
    (
        status,
        Json(serde_json::json!({
            "success": false,
            "error": err.to_string()
        })),
    )
        .into_response()
}

/// Create a checkout order for a paid or premium course
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Json(req): Json<CreateOrderRequest>,
) -> impl IntoResponse {
    let engine = PaymentEngine::new(state.conn.clone());

    match engine.create_checkout_order(&user, req).await {
        Ok(payment) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "data": payment
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// List the caller's payments
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    user: UserContext,
) -> impl IntoResponse {
    let engine = PaymentEngine::new(state.conn.clone());

    match engine.list_payments(user.user_id).await {
        Ok(list) => Json(serde_json::json!({
            "success": true,
            "data": list
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// Gateway webhook: verify the signed verdict and unlock the enrollment
pub async fn payment_webhook(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerificationRequest>,
) -> impl IntoResponse {
    let engine = PaymentEngine::new(state.conn.clone());

    match engine.handle_webhook(state.gateway.as_ref(), req).await {
        Ok((payment, enrollment)) => Json(serde_json::json!({
            "success": true,
            "data": {
                "payment": payment,
                "enrollment": enrollment
            }
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// Refund a completed payment (admin only)
pub async fn refund_payment(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    let engine = PaymentEngine::new(state.conn.clone());

    match engine.refund(&user, payment_id).await {
        Ok(payment) => Json(serde_json::json!({
            "success": true,
            "data": payment
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// ROUTE CONFIGURATION
// ============================================================================

pub fn configure_payment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/payments", get(list_payments))
        .route("/api/payments/orders", post(create_order))
        .route("/api/payments/webhook", post(payment_webhook))
        .route("/api/payments/:id/refund", post(refund_payment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion() {
        assert_eq!(PaymentStatus::from("pending"), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::from("completed"), PaymentStatus::Completed);
        assert_eq!(PaymentStatus::from("failed"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::from("refunded"), PaymentStatus::Refunded);
        assert_eq!(PaymentStatus::from("junk"), PaymentStatus::Pending);
    }

    #[test]
    fn test_lifecycle_transitions() {
        use PaymentStatus::*;
        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Failed));
        assert!(Completed.can_transition_to(Refunded));

        // completed never regresses except to refunded
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Failed));
        // terminal states
        assert!(!Failed.can_transition_to(Completed));
        assert!(!Refunded.can_transition_to(Completed));
        assert!(!Refunded.can_transition_to(Pending));
    }

    #[test]
    fn test_payment_type_conversion() {
        assert_eq!(PaymentType::from("course"), PaymentType::Course);
        assert_eq!(PaymentType::from("content"), PaymentType::Content);
        assert_eq!(
            PaymentType::from("subscription"),
            PaymentType::Subscription
        );
        assert_eq!(PaymentType::Subscription.to_string(), "subscription");
    }
}
