//! # Enrollment Module - Progress Engine
//!
//! The stateful core of the platform: enrollments, the per-lesson progress
//! ledger, quiz grading, access gating, and the aggregate completion
//! percentage. One enrollment row is one consistency unit; every mutation
//! is a single read-modify-write transaction holding a row lock, so
//! concurrent progress updates for the same enrollment serialize instead
//! of losing writes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::UserContext;
use crate::courses::types::ContentType;
use crate::courses::{self, CourseStructure};
use crate::shared::state::AppState;
use crate::shared::utils::DbPool;

pub mod access;
pub mod error;
pub mod ledger;
pub mod quiz;
pub mod rules;

use access::AccessFacts;
use error::EnrollmentError;
use ledger::{ModulesProgress, QuizOutcome};
use quiz::{GradedQuiz, SubmittedAnswers};

// ============================================================================
// DATABASE SCHEMA
// ============================================================================

diesel::table! {
    enrollments (id) {
        id -> Uuid,
        user_id -> Uuid,
        course_id -> Uuid,
        status -> Text,
        progress_percentage -> Int4,
        modules_progress -> Jsonb,
        payment_id -> Nullable<Uuid>,
        enrolled_at -> Timestamptz,
        last_accessed_at -> Timestamptz,
        completed_at -> Nullable<Timestamptz>,
    }
}

// ============================================================================
// DATA MODELS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Insertable)]
#[diesel(table_name = enrollments)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub status: String,
    pub progress_percentage: i32,
    pub modules_progress: serde_json::Value,
    pub payment_id: Option<Uuid>,
    pub enrolled_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Enrollment {
    pub fn new(user_id: Uuid, course_id: Uuid, payment_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            course_id,
            status: EnrollmentStatus::Enrolled.to_string(),
            progress_percentage: 0,
            modules_progress: serde_json::json!({}),
            payment_id,
            enrolled_at: now,
            last_accessed_at: now,
            completed_at: None,
        }
    }

    pub fn current_status(&self) -> EnrollmentStatus {
        EnrollmentStatus::from(self.status.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Enrolled,
    InProgress,
    Completed,
}

impl From<&str> for EnrollmentStatus {
    fn from(s: &str) -> Self {
        match s {
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            _ => Self::Enrolled,
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enrolled => write!(f, "enrolled"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl EnrollmentStatus {
    /// State machine: enrolled -> in_progress -> completed, strictly
    /// monotonic. Nothing leaves `completed`.
    pub fn advance(self, percentage: i32, any_lesson_completed: bool) -> Self {
        if self == Self::Completed {
            return Self::Completed;
        }
        if percentage >= 100 {
            Self::Completed
        } else if any_lesson_completed {
            Self::InProgress
        } else {
            self
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollRequest {
    pub course_id: Uuid,
    pub payment_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdateRequest {
    pub watch_time_seconds: Option<i32>,
    pub mark_complete: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSubmission {
    pub answers: SubmittedAnswers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRequest {
    pub rating: i32,
    pub review: Option<String>,
}

// ============================================================================
// ENROLLMENT ENGINE
// ============================================================================

pub struct EnrollmentEngine {
    db: DbPool,
}

/// True when the user holds a completed payment for this course.
pub fn has_completed_course_payment(
    conn: &mut PgConnection,
    user_id: Uuid,
    course_id: Uuid,
) -> Result<bool, diesel::result::Error> {
    use crate::payments::payments;

    let count: i64 = payments::table
        .filter(payments::user_id.eq(user_id))
        .filter(payments::course_id.eq(course_id))
        .filter(payments::status.eq("completed"))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

fn gather_access_facts(
    conn: &mut PgConnection,
    user_id: Uuid,
    course_id: Uuid,
) -> Result<AccessFacts, EnrollmentError> {
    Ok(AccessFacts {
        has_completed_payment: has_completed_course_payment(conn, user_id, course_id)?,
    })
}

fn ensure_lesson_access(
    conn: &mut PgConnection,
    user: &UserContext,
    structure: &CourseStructure,
    is_preview: bool,
) -> Result<(), EnrollmentError> {
    if is_preview {
        return Ok(());
    }
    let facts = gather_access_facts(conn, user.user_id, structure.course.id)?;
    if access::evaluate(&structure.course, facts, user.subscription.as_ref(), Utc::now()) {
        Ok(())
    } else {
        Err(EnrollmentError::Forbidden(
            "Course content requires purchase or an active subscription".to_string(),
        ))
    }
}

fn load_owned_enrollment_for_update(
    conn: &mut PgConnection,
    user: &UserContext,
    enrollment_id: Uuid,
) -> Result<Enrollment, EnrollmentError> {
    let enrollment: Option<Enrollment> = enrollments::table
        .filter(enrollments::id.eq(enrollment_id))
        .for_update()
        .first::<Enrollment>(conn)
        .optional()?;

    let enrollment = enrollment
        .ok_or_else(|| EnrollmentError::NotFound("Enrollment not found".to_string()))?;

    if enrollment.user_id != user.user_id && !user.is_admin() {
        // Do not leak whether another user's enrollment exists.
        return Err(EnrollmentError::NotFound("Enrollment not found".to_string()));
    }
    Ok(enrollment)
}

/// Recompute the derived fields and persist the whole ledger in one update.
fn persist_progress(
    conn: &mut PgConnection,
    enrollment: &Enrollment,
    ledger: &ModulesProgress,
    structure: &CourseStructure,
) -> Result<Enrollment, EnrollmentError> {
    let percentage = ledger.percentage(structure);
    let status = enrollment
        .current_status()
        .advance(percentage, ledger.any_completed());
    let now = Utc::now();
    let completed_at = match (enrollment.completed_at, status) {
        (Some(at), _) => Some(at),
        (None, EnrollmentStatus::Completed) => Some(now),
        (None, _) => None,
    };

    let updated: Enrollment = diesel::update(
        enrollments::table.filter(enrollments::id.eq(enrollment.id)),
    )
    .set((
        enrollments::modules_progress.eq(ledger.to_value()?),
        enrollments::progress_percentage.eq(percentage),
        enrollments::status.eq(status.to_string()),
        enrollments::last_accessed_at.eq(now),
        enrollments::completed_at.eq(completed_at),
    ))
    .get_result::<Enrollment>(conn)?;

    if status == EnrollmentStatus::Completed
        && enrollment.current_status() != EnrollmentStatus::Completed
    {
        info!(
            "Enrollment {} completed course {}",
            enrollment.id, enrollment.course_id
        );
    }

    Ok(updated)
}

impl EnrollmentEngine {
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

    /// Enroll the user in a course. Free courses enroll directly; paid and
    /// premium courses require access (completed payment or qualifying
    /// subscription) before an enrollment is created. Re-enrolling returns
    /// the existing enrollment untouched.
    pub async fn enroll(
        &self,
        user: &UserContext,
        course_id: Uuid,
        payment_id: Option<Uuid>,
    ) -> Result<Enrollment, EnrollmentError> {
        let mut conn = self.conn()?;

        conn.transaction::<Enrollment, EnrollmentError, _>(|conn| {
            let structure = courses::load_structure(conn, course_id)?
                .ok_or_else(|| EnrollmentError::NotFound("Course not found".to_string()))?;
            if !structure.course.is_published && !user.is_admin() {
                return Err(EnrollmentError::NotFound("Course not found".to_string()));
            }

            if let Some(pid) = payment_id {
                // A carried payment id must be the caller's own completed
                // payment for this course.
                use crate::payments::payments;
                let valid: i64 = payments::table
                    .filter(payments::id.eq(pid))
                    .filter(payments::user_id.eq(user.user_id))
                    .filter(payments::course_id.eq(course_id))
                    .filter(payments::status.eq("completed"))
                    .count()
                    .get_result(conn)?;
                if valid == 0 {
                    return Err(EnrollmentError::Validation(
                        "Payment is not a completed payment for this course".to_string(),
                    ));
                }
            }

            let facts = gather_access_facts(conn, user.user_id, course_id)?;
            if !access::evaluate(&structure.course, facts, user.subscription.as_ref(), Utc::now())
            {
                return Err(EnrollmentError::Forbidden(
                    "Course requires payment before enrollment".to_string(),
                ));
            }

            let candidate = Enrollment::new(user.user_id, course_id, payment_id);
            let insert = diesel::insert_into(enrollments::table)
                .values(&candidate)
                .on_conflict((enrollments::user_id, enrollments::course_id));
            // Re-enrolling keeps the existing ledger; a carried payment id is
            // relinked onto the surviving row.
            let enrollment: Enrollment = if payment_id.is_some() {
                insert
                    .do_update()
                    .set((
                        enrollments::payment_id.eq(payment_id),
                        enrollments::last_accessed_at.eq(Utc::now()),
                    ))
                    .get_result::<Enrollment>(conn)?
            } else {
                insert
                    .do_update()
                    .set(enrollments::last_accessed_at.eq(Utc::now()))
                    .get_result::<Enrollment>(conn)?
            };

            Ok(enrollment)
        })
    }

    pub async fn list_enrollments(&self, user_id: Uuid) -> Result<Vec<Enrollment>, EnrollmentError> {
        let mut conn = self.conn()?;
        let list = enrollments::table
            .filter(enrollments::user_id.eq(user_id))
            .order(enrollments::last_accessed_at.desc())
            .load::<Enrollment>(&mut conn)?;
        Ok(list)
    }

    pub async fn get_enrollment(
        &self,
        user: &UserContext,
        enrollment_id: Uuid,
    ) -> Result<Enrollment, EnrollmentError> {
        let mut conn = self.conn()?;
        let enrollment: Option<Enrollment> = enrollments::table
            .filter(enrollments::id.eq(enrollment_id))
            .first::<Enrollment>(&mut conn)
            .optional()?;
        let enrollment = enrollment
            .ok_or_else(|| EnrollmentError::NotFound("Enrollment not found".to_string()))?;
        if enrollment.user_id != user.user_id && !user.is_admin() {
            return Err(EnrollmentError::NotFound("Enrollment not found".to_string()));
        }
        Ok(enrollment)
    }

    /// Apply a watch-time report and/or an explicit mark-complete to one
    /// lesson and recompute the aggregate. The whole nested ledger is
    /// rewritten under a row lock.
    pub async fn record_lesson_progress(
        &self,
        user: &UserContext,
        enrollment_id: Uuid,
        module_id: Uuid,
        lesson_id: Uuid,
        update: ProgressUpdateRequest,
    ) -> Result<Enrollment, EnrollmentError> {
        if let Some(watch_time) = update.watch_time_seconds {
            if watch_time < 0 {
                return Err(EnrollmentError::Validation(
                    "Watch time cannot be negative".to_string(),
                ));
            }
        }
        if update.watch_time_seconds.is_none() && update.mark_complete.is_none() {
            return Err(EnrollmentError::Validation(
                "Progress update carries no fields".to_string(),
            ));
        }

        let mut conn = self.conn()?;
        conn.transaction::<Enrollment, EnrollmentError, _>(|conn| {
            let enrollment = load_owned_enrollment_for_update(conn, user, enrollment_id)?;
            let structure = courses::load_structure(conn, enrollment.course_id)?
                .ok_or_else(|| EnrollmentError::NotFound("Course not found".to_string()))?;
            let lesson = structure
                .find_lesson(module_id, lesson_id)
                .ok_or_else(|| {
                    EnrollmentError::NotFound("Lesson not found in this course".to_string())
                })?
                .clone();

            ensure_lesson_access(conn, user, &structure, lesson.is_preview)?;

            let mut ledger = ModulesProgress::from_value(&enrollment.modules_progress)?;

            if let Some(watch_time) = update.watch_time_seconds {
                if lesson.content().is_timed() {
                    ledger.apply_watch_time(module_id, lesson_id, watch_time);
                }
            }

            if update.mark_complete == Some(true) {
                match lesson.content() {
                    ContentType::Text => ledger.set_completed(module_id, lesson_id, Utc::now()),
                    ContentType::Quiz => {
                        return Err(EnrollmentError::Validation(
                            "Quiz lessons complete through a passing submission".to_string(),
                        ))
                    }
                    ContentType::Video | ContentType::Audio => {
                        return Err(EnrollmentError::Validation(
                            "Timed lessons complete through watch time".to_string(),
                        ))
                    }
                }
            }

            let progress = ledger.lesson_mut(module_id, lesson_id).clone();
            if rules::is_lesson_complete(&lesson, &progress) {
                ledger.set_completed(module_id, lesson_id, Utc::now());
            }

            persist_progress(conn, &enrollment, &ledger, &structure)
        })
    }

    /// Grade a quiz submission, record the attempt, and run the same
    /// completion/aggregation path as a lesson-progress update. Grading is
    /// pure and happens before any write.
    pub async fn submit_quiz(
        &self,
        user: &UserContext,
        enrollment_id: Uuid,
        module_id: Uuid,
        lesson_id: Uuid,
        submission: QuizSubmission,
    ) -> Result<(GradedQuiz, Enrollment), EnrollmentError> {
        let mut conn = self.conn()?;
        conn.transaction::<(GradedQuiz, Enrollment), EnrollmentError, _>(|conn| {
            let enrollment = load_owned_enrollment_for_update(conn, user, enrollment_id)?;
            let structure = courses::load_structure(conn, enrollment.course_id)?
                .ok_or_else(|| EnrollmentError::NotFound("Course not found".to_string()))?;
            let lesson = structure
                .find_lesson(module_id, lesson_id)
                .ok_or_else(|| {
                    EnrollmentError::NotFound("Lesson not found in this course".to_string())
                })?
                .clone();

            if lesson.content() != ContentType::Quiz {
                return Err(EnrollmentError::Validation(
                    "Lesson is not a quiz".to_string(),
                ));
            }
            let definition = lesson.quiz_definition().ok_or_else(|| {
                EnrollmentError::Validation("Lesson has no quiz definition".to_string())
            })?;

            ensure_lesson_access(conn, user, &structure, lesson.is_preview)?;

            let graded = quiz::grade(&definition, &submission.answers)?;

            let mut ledger = ModulesProgress::from_value(&enrollment.modules_progress)?;
            ledger.record_quiz(
                module_id,
                lesson_id,
                QuizOutcome {
                    score: graded.score,
                    passed: graded.passed,
                    attempted_at: Utc::now(),
                },
            );
            if graded.passed {
                ledger.set_completed(module_id, lesson_id, Utc::now());
            }

            let updated = persist_progress(conn, &enrollment, &ledger, &structure)?;
            Ok((graded, updated))
        })
    }

    /// Rate the enrolled course. One rating per user per course; a
    /// resubmission replaces the prior one and the course mean is
    /// recomputed in the same transaction. The enrollment itself is the
    /// entitlement: access was proven when it was created, and a learner
    /// whose subscription has since lapsed may still rate the course.
    pub async fn rate(
        &self,
        user: &UserContext,
        enrollment_id: Uuid,
        req: RatingRequest,
    ) -> Result<(f32, i32), EnrollmentError> {
        if !(1..=5).contains(&req.rating) {
            return Err(EnrollmentError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let mut conn = self.conn()?;
        conn.transaction::<(f32, i32), EnrollmentError, _>(|conn| {
            let enrollment = load_owned_enrollment_for_update(conn, user, enrollment_id)?;
            let result = courses::apply_rating(
                conn,
                enrollment.course_id,
                enrollment.user_id,
                req.rating,
                req.review,
            )?;
            Ok(result)
        })
    }

    /// Whether the user may view the course's non-preview content.
    pub async fn has_access(
        &self,
        user: &UserContext,
        course_id: Uuid,
    ) -> Result<bool, EnrollmentError> {
        let mut conn = self.conn()?;
        let course: Option<crate::courses::Course> = crate::courses::courses::table
            .filter(crate::courses::courses::id.eq(course_id))
            .first(&mut conn)
            .optional()?;
        let course =
            course.ok_or_else(|| EnrollmentError::NotFound("Course not found".to_string()))?;
        let facts = gather_access_facts(&mut conn, user.user_id, course_id)?;
        Ok(access::evaluate(
            &course,
            facts,
            user.subscription.as_ref(),
            Utc::now(),
        ))
    }
}

// ============================================================================
// HTTP HANDLERS
// ============================================================================

fn error_response(err: EnrollmentError) -> axum::response::Response {
    let status = err.status_code();
    if status.is_server_error() {
        log::error!("Enrollment operation failed: {err}");
    } else {
        warn!("Enrollment operation rejected: {err}");
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

/// Enroll in a course, optionally carrying a completed payment id
pub async fn enroll(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Json(req): Json<EnrollRequest>,
) -> impl IntoResponse {
    let engine = EnrollmentEngine::new(state.conn.clone());

    match engine.enroll(&user, req.course_id, req.payment_id).await {
        Ok(enrollment) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "data": enrollment
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// List the caller's enrollments
pub async fn list_enrollments(
    State(state): State<Arc<AppState>>,
    user: UserContext,
) -> impl IntoResponse {
    let engine = EnrollmentEngine::new(state.conn.clone());

    match engine.list_enrollments(user.user_id).await {
        Ok(list) => Json(serde_json::json!({
            "success": true,
            "data": list
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// Fetch one enrollment snapshot
pub async fn get_enrollment(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Path(enrollment_id): Path<Uuid>,
) -> impl IntoResponse {
    let engine = EnrollmentEngine::new(state.conn.clone());

    match engine.get_enrollment(&user, enrollment_id).await {
        Ok(enrollment) => Json(serde_json::json!({
            "success": true,
            "data": enrollment
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// Update lesson progress (watch time and/or explicit mark-complete)
pub async fn update_lesson_progress(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Path((enrollment_id, module_id, lesson_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(req): Json<ProgressUpdateRequest>,
) -> impl IntoResponse {
    let engine = EnrollmentEngine::new(state.conn.clone());

    match engine
        .record_lesson_progress(&user, enrollment_id, module_id, lesson_id, req)
        .await
    {
        Ok(enrollment) => Json(serde_json::json!({
            "success": true,
            "data": enrollment
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// Submit quiz answers for a quiz lesson
pub async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Path((enrollment_id, module_id, lesson_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(submission): Json<QuizSubmission>,
) -> impl IntoResponse {
    let engine = EnrollmentEngine::new(state.conn.clone());

    match engine
        .submit_quiz(&user, enrollment_id, module_id, lesson_id, submission)
        .await
    {
        Ok((graded, enrollment)) => Json(serde_json::json!({
            "success": true,
            "data": {
                "result": graded,
                "enrollment": enrollment
            }
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// Rate the enrolled course
pub async fn rate_course(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Path(enrollment_id): Path<Uuid>,
    Json(req): Json<RatingRequest>,
) -> impl IntoResponse {
    let engine = EnrollmentEngine::new(state.conn.clone());

    match engine.rate(&user, enrollment_id, req).await {
        Ok((average, count)) => Json(serde_json::json!({
            "success": true,
            "data": {
                "rating_average": average,
                "rating_count": count
            }
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// Check whether the caller can view a course's non-preview content
pub async fn check_access(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Path(course_id): Path<Uuid>,
) -> impl IntoResponse {
    let engine = EnrollmentEngine::new(state.conn.clone());

    match engine.has_access(&user, course_id).await {
        Ok(has_access) => Json(serde_json::json!({
            "success": true,
            "data": { "has_access": has_access }
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// ROUTE CONFIGURATION
// ============================================================================

pub fn configure_enrollment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/enrollments", get(list_enrollments).post(enroll))
        .route("/api/enrollments/:id", get(get_enrollment))
        .route(
            "/api/enrollments/:id/modules/:module_id/lessons/:lesson_id/progress",
            post(update_lesson_progress),
        )
        .route(
            "/api/enrollments/:id/modules/:module_id/lessons/:lesson_id/quiz",
            post(submit_quiz),
        )
        .route("/api/enrollments/:id/rating", post(rate_course))
        .route("/api/courses/:course_id/access", get(check_access))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion() {
        assert_eq!(EnrollmentStatus::from("enrolled"), EnrollmentStatus::Enrolled);
        assert_eq!(
            EnrollmentStatus::from("in_progress"),
            EnrollmentStatus::InProgress
        );
        assert_eq!(
            EnrollmentStatus::from("completed"),
            EnrollmentStatus::Completed
        );
        assert_eq!(EnrollmentStatus::from("junk"), EnrollmentStatus::Enrolled);
        assert_eq!(EnrollmentStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn test_status_advances_on_first_completion() {
        let status = EnrollmentStatus::Enrolled.advance(25, true);
        assert_eq!(status, EnrollmentStatus::InProgress);
    }

    #[test]
    fn test_status_stays_enrolled_without_completions() {
        let status = EnrollmentStatus::Enrolled.advance(0, false);
        assert_eq!(status, EnrollmentStatus::Enrolled);
    }

    #[test]
    fn test_status_completes_at_hundred() {
        let status = EnrollmentStatus::InProgress.advance(100, true);
        assert_eq!(status, EnrollmentStatus::Completed);
    }

    #[test]
    fn test_completed_is_terminal() {
        // Authoring added lessons after completion: percentage drops, but
        // the status machine never leaves completed.
        let status = EnrollmentStatus::Completed.advance(50, true);
        assert_eq!(status, EnrollmentStatus::Completed);
        let status = EnrollmentStatus::Completed.advance(0, false);
        assert_eq!(status, EnrollmentStatus::Completed);
    }

    #[test]
    fn test_new_enrollment_defaults() {
        let e = Enrollment::new(Uuid::new_v4(), Uuid::new_v4(), None);
        assert_eq!(e.current_status(), EnrollmentStatus::Enrolled);
        assert_eq!(e.progress_percentage, 0);
        assert!(e.completed_at.is_none());
        assert_eq!(e.modules_progress, serde_json::json!({}));
    }
}
