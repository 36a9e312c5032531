//! # Courses Module - Content Catalog
//!
//! Course / module / lesson reference data for the Calm Mind platform:
//! - Catalog listing and detail for the client
//! - Minimal authoring surface (create course, add modules and lessons)
//! - Per-user course ratings with a cached aggregate mean
//!
//! The enrollment engine treats this data as read-mostly: course structure
//! may change underneath a live enrollment, and progress aggregation always
//! runs against the structure as it exists at query time.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::UserContext;
use crate::shared::state::AppState;
use crate::shared::utils::DbPool;

pub mod types;

use types::{ContentType, PricingType, QuizDefinition};

// ============================================================================
// DATABASE SCHEMA
// ============================================================================

diesel::table! {
    courses (id) {
        id -> Uuid,
        title -> Text,
        description -> Nullable<Text>,
        category -> Text,
        pricing_type -> Text,
        price -> Nullable<Numeric>,
        currency -> Text,
        premium_tier -> Nullable<Text>,
        is_published -> Bool,
        rating_average -> Float4,
        rating_count -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    course_modules (id) {
        id -> Uuid,
        course_id -> Uuid,
        title -> Text,
        module_order -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    course_lessons (id) {
        id -> Uuid,
        module_id -> Uuid,
        course_id -> Uuid,
        title -> Text,
        content_type -> Text,
        content_url -> Nullable<Text>,
        content_text -> Nullable<Text>,
        quiz -> Nullable<Jsonb>,
        duration_seconds -> Int4,
        is_preview -> Bool,
        lesson_order -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    course_ratings (id) {
        id -> Uuid,
        course_id -> Uuid,
        user_id -> Uuid,
        rating -> Int4,
        review -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    courses,
    course_modules,
    course_lessons,
    course_ratings,
);

// ============================================================================
// DATA MODELS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Insertable)]
#[diesel(table_name = courses)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub pricing_type: String,
    pub price: Option<BigDecimal>,
    pub currency: String,
    pub premium_tier: Option<String>,
    pub is_published: bool,
    pub rating_average: f32,
    pub rating_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn pricing(&self) -> PricingType {
        PricingType::from(self.pricing_type.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Insertable)]
#[diesel(table_name = course_modules)]
pub struct CourseModule {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub module_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Insertable)]
#[diesel(table_name = course_lessons)]
pub struct CourseLesson {
    pub id: Uuid,
    pub module_id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub content_type: String,
    pub content_url: Option<String>,
    pub content_text: Option<String>,
    pub quiz: Option<serde_json::Value>,
    pub duration_seconds: i32,
    pub is_preview: bool,
    pub lesson_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseLesson {
    pub fn content(&self) -> ContentType {
        ContentType::from(self.content_type.as_str())
    }

    pub fn quiz_definition(&self) -> Option<QuizDefinition> {
        self.quiz
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Identifiable, Insertable)]
#[diesel(table_name = course_ratings)]
pub struct CourseRating {
    pub id: Uuid,
    pub course_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub review: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub pricing_type: Option<String>,
    pub price: Option<BigDecimal>,
    pub currency: Option<String>,
    pub premium_tier: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateModuleRequest {
    pub title: String,
    pub module_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLessonRequest {
    pub title: String,
    pub content_type: Option<String>,
    pub content_url: Option<String>,
    pub content_text: Option<String>,
    pub quiz: Option<QuizDefinition>,
    pub duration_seconds: Option<i32>,
    pub is_preview: Option<bool>,
    pub lesson_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseFilters {
    pub category: Option<String>,
    pub pricing_type: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ============================================================================
// COURSE STRUCTURE
// ============================================================================

/// Ordered in-memory view of a course's module/lesson hierarchy, loaded per
/// request. The enrollment engine uses it to validate that a progress update
/// references a lesson that actually belongs to the course, and to count
/// lessons for the completion percentage.
#[derive(Debug, Clone)]
pub struct CourseStructure {
    pub course: Course,
    pub modules: Vec<(CourseModule, Vec<CourseLesson>)>,
}

impl CourseStructure {
    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(|(_, lessons)| lessons.len()).sum()
    }

    pub fn find_lesson(&self, module_id: Uuid, lesson_id: Uuid) -> Option<&CourseLesson> {
        self.modules
            .iter()
            .find(|(m, _)| m.id == module_id)
            .and_then(|(_, lessons)| lessons.iter().find(|l| l.id == lesson_id))
    }

    pub fn lesson_ids(&self) -> impl Iterator<Item = (Uuid, Uuid)> + '_ {
        self.modules
            .iter()
            .flat_map(|(m, lessons)| lessons.iter().map(move |l| (m.id, l.id)))
    }
}

/// Load the ordered structure for a course, or `None` when the course does
/// not exist. Runs on a borrowed connection so the enrollment engine can
/// call it inside its own transaction.
pub fn load_structure(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<CourseStructure>, diesel::result::Error> {
    let course: Option<Course> = courses::table
        .filter(courses::id.eq(id))
        .first::<Course>(conn)
        .optional()?;

    let Some(course) = course else {
        return Ok(None);
    };

    let mods: Vec<CourseModule> = course_modules::table
        .filter(course_modules::course_id.eq(id))
        .order(course_modules::module_order.asc())
        .load::<CourseModule>(conn)?;

    let lessons: Vec<CourseLesson> = course_lessons::table
        .filter(course_lessons::course_id.eq(id))
        .order(course_lessons::lesson_order.asc())
        .load::<CourseLesson>(conn)?;

    let modules = mods
        .into_iter()
        .map(|m| {
            let own: Vec<CourseLesson> = lessons
                .iter()
                .filter(|l| l.module_id == m.id)
                .cloned()
                .collect();
            (m, own)
        })
        .collect();

    Ok(Some(CourseStructure { course, modules }))
}

/// Upsert a user's rating for a course and recompute the cached mean.
/// One rating per user per course; a resubmission replaces the prior one.
/// Returns the new (average, count).
pub fn apply_rating(
    conn: &mut PgConnection,
    course: Uuid,
    user: Uuid,
    rating: i32,
    review: Option<String>,
) -> Result<(f32, i32), diesel::result::Error> {
    let now = Utc::now();
    diesel::insert_into(course_ratings::table)
        .values((
            course_ratings::id.eq(Uuid::new_v4()),
            course_ratings::course_id.eq(course),
            course_ratings::user_id.eq(user),
            course_ratings::rating.eq(rating),
            course_ratings::review.eq(review.clone()),
            course_ratings::created_at.eq(now),
            course_ratings::updated_at.eq(now),
        ))
        .on_conflict((course_ratings::course_id, course_ratings::user_id))
        .do_update()
        .set((
            course_ratings::rating.eq(rating),
            course_ratings::review.eq(review),
            course_ratings::updated_at.eq(now),
        ))
        .execute(conn)?;

    let all: Vec<i32> = course_ratings::table
        .filter(course_ratings::course_id.eq(course))
        .select(course_ratings::rating)
        .load(conn)?;

    let count = all.len() as i32;
    let average = if count > 0 {
        all.iter().sum::<i32>() as f32 / count as f32
    } else {
        0.0
    };

    diesel::update(courses::table.filter(courses::id.eq(course)))
        .set((
            courses::rating_average.eq(average),
            courses::rating_count.eq(count),
            courses::updated_at.eq(now),
        ))
        .execute(conn)?;

    Ok((average, count))
}

// ============================================================================
// COURSE ENGINE
// ============================================================================

pub struct CourseEngine {
    db: DbPool,
}

impl CourseEngine {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn create_course(&self, req: CreateCourseRequest) -> Result<Course, String> {
        let pricing = PricingType::from(req.pricing_type.as_deref().unwrap_or("free"));
        if pricing == PricingType::Paid && req.price.is_none() {
            return Err("Paid course requires a price".to_string());
        }

        let now = Utc::now();
        let course = Course {
            id: Uuid::new_v4(),
            title: req.title,
            description: req.description,
            category: req.category,
            pricing_type: pricing.to_string(),
            price: req.price,
            currency: req.currency.unwrap_or_else(|| "USD".to_string()),
            premium_tier: req.premium_tier,
            is_published: false,
            rating_average: 0.0,
            rating_count: 0,
            created_at: now,
            updated_at: now,
        };

        let mut conn = self.db.get().map_err(|e| e.to_string())?;
        diesel::insert_into(courses::table)
            .values(&course)
            .execute(&mut conn)
            .map_err(|e| e.to_string())?;

        Ok(course)
    }

    pub async fn get_course(&self, course_id: Uuid) -> Result<Option<Course>, String> {
        let mut conn = self.db.get().map_err(|e| e.to_string())?;
        courses::table
            .filter(courses::id.eq(course_id))
            .first::<Course>(&mut conn)
            .optional()
            .map_err(|e| e.to_string())
    }

    pub async fn get_structure(&self, course_id: Uuid) -> Result<Option<CourseStructure>, String> {
        let mut conn = self.db.get().map_err(|e| e.to_string())?;
        load_structure(&mut conn, course_id).map_err(|e| e.to_string())
    }

    pub async fn list_courses(&self, filters: CourseFilters) -> Result<Vec<Course>, String> {
        let mut conn = self.db.get().map_err(|e| e.to_string())?;

        let mut query = courses::table
            .filter(courses::is_published.eq(true))
            .into_boxed();

        if let Some(category) = filters.category {
            query = query.filter(courses::category.eq(category));
        }

        if let Some(pricing) = filters.pricing_type {
            query = query.filter(courses::pricing_type.eq(pricing));
        }

        if let Some(search) = filters.search {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                courses::title
                    .ilike(pattern.clone())
                    .or(courses::description.ilike(pattern)),
            );
        }

        query = query.order(courses::created_at.desc());

        if let Some(limit) = filters.limit {
            query = query.limit(limit);
        }
        if let Some(offset) = filters.offset {
            query = query.offset(offset);
        }

        query.load::<Course>(&mut conn).map_err(|e| e.to_string())
    }

    pub async fn publish_course(&self, course_id: Uuid) -> Result<Course, String> {
        let mut conn = self.db.get().map_err(|e| e.to_string())?;
        diesel::update(courses::table.filter(courses::id.eq(course_id)))
            .set((
                courses::is_published.eq(true),
                courses::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .map_err(|e| e.to_string())?;

        courses::table
            .filter(courses::id.eq(course_id))
            .first::<Course>(&mut conn)
            .map_err(|e| e.to_string())
    }

    pub async fn add_module(
        &self,
        course_id: Uuid,
        req: CreateModuleRequest,
    ) -> Result<CourseModule, String> {
        let mut conn = self.db.get().map_err(|e| e.to_string())?;

        let exists: i64 = courses::table
            .filter(courses::id.eq(course_id))
            .count()
            .get_result(&mut conn)
            .map_err(|e| e.to_string())?;
        if exists == 0 {
            return Err("Course not found".to_string());
        }

        let order = match req.module_order {
            Some(o) => o,
            None => {
                let max_order: Option<i32> = course_modules::table
                    .filter(course_modules::course_id.eq(course_id))
                    .select(diesel::dsl::max(course_modules::module_order))
                    .first(&mut conn)
                    .map_err(|e| e.to_string())?;
                max_order.unwrap_or(0) + 1
            }
        };

        let module = CourseModule {
            id: Uuid::new_v4(),
            course_id,
            title: req.title,
            module_order: order,
            created_at: Utc::now(),
        };

        diesel::insert_into(course_modules::table)
            .values(&module)
            .execute(&mut conn)
            .map_err(|e| e.to_string())?;

        Ok(module)
    }

    pub async fn add_lesson(
        &self,
        course_id: Uuid,
        module_id: Uuid,
        req: CreateLessonRequest,
    ) -> Result<CourseLesson, String> {
        let mut conn = self.db.get().map_err(|e| e.to_string())?;

        let module: Option<CourseModule> = course_modules::table
            .filter(course_modules::id.eq(module_id))
            .filter(course_modules::course_id.eq(course_id))
            .first::<CourseModule>(&mut conn)
            .optional()
            .map_err(|e| e.to_string())?;
        if module.is_none() {
            return Err("Module not found in course".to_string());
        }

        let content = ContentType::from(req.content_type.as_deref().unwrap_or("text"));
        if content == ContentType::Quiz {
            match &req.quiz {
                Some(quiz) if !quiz.questions.is_empty() => {}
                _ => return Err("Quiz lesson requires a quiz with at least one question".to_string()),
            }
        }
        let duration = req.duration_seconds.unwrap_or(0);
        if duration < 0 {
            return Err("Lesson duration cannot be negative".to_string());
        }

        let order = match req.lesson_order {
            Some(o) => o,
            None => {
                let max_order: Option<i32> = course_lessons::table
                    .filter(course_lessons::module_id.eq(module_id))
                    .select(diesel::dsl::max(course_lessons::lesson_order))
                    .first(&mut conn)
                    .map_err(|e| e.to_string())?;
                max_order.unwrap_or(0) + 1
            }
        };

        let now = Utc::now();
        let lesson = CourseLesson {
            id: Uuid::new_v4(),
            module_id,
            course_id,
            title: req.title,
            content_type: content.to_string(),
            content_url: req.content_url,
            content_text: req.content_text,
            quiz: req
                .quiz
                .map(|q| serde_json::to_value(q).unwrap_or(serde_json::json!(null))),
            duration_seconds: duration,
            is_preview: req.is_preview.unwrap_or(false),
            lesson_order: order,
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(course_lessons::table)
            .values(&lesson)
            .execute(&mut conn)
            .map_err(|e| e.to_string())?;

        Ok(lesson)
    }
}

// ============================================================================
// HTTP HANDLERS
// ============================================================================

/// List published courses
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    Query(filters): Query<CourseFilters>,
) -> impl IntoResponse {
    let engine = CourseEngine::new(state.conn.clone());

    match engine.list_courses(filters).await {
        Ok(courses) => Json(serde_json::json!({
            "success": true,
            "data": courses
        }))
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "success": false,
                "error": e
            })),
        )
            .into_response(),
    }
}

/// Create a new course (authoring, admin only)
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Json(req): Json<CreateCourseRequest>,
) -> impl IntoResponse {
    if !user.is_admin() {
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({
                "success": false,
                "error": "Course authoring requires the admin role"
            })),
        )
            .into_response();
    }

    let engine = CourseEngine::new(state.conn.clone());

    match engine.create_course(req).await {
        Ok(course) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "data": course
            })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": e
            })),
        )
            .into_response(),
    }
}

/// Get course detail with its module/lesson structure
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<Uuid>,
) -> impl IntoResponse {
    let engine = CourseEngine::new(state.conn.clone());

    match engine.get_structure(course_id).await {
        Ok(Some(structure)) => {
            let modules: Vec<serde_json::Value> = structure
                .modules
                .iter()
                .map(|(m, lessons)| {
                    serde_json::json!({
                        "module": m,
                        "lessons": lessons
                    })
                })
                .collect();
            Json(serde_json::json!({
                "success": true,
                "data": {
                    "course": structure.course,
                    "modules": modules
                }
            }))
            .into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "success": false,
                "error": "Course not found"
            })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "success": false,
                "error": e
            })),
        )
            .into_response(),
    }
}

/// Publish a course (admin only)
pub async fn publish_course(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Path(course_id): Path<Uuid>,
) -> impl IntoResponse {
    if !user.is_admin() {
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({
                "success": false,
                "error": "Course authoring requires the admin role"
            })),
        )
            .into_response();
    }

    let engine = CourseEngine::new(state.conn.clone());

    match engine.publish_course(course_id).await {
        Ok(course) => Json(serde_json::json!({
            "success": true,
            "data": course
        }))
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "success": false,
                "error": e
            })),
        )
            .into_response(),
    }
}

/// Add a module to a course (admin only)
pub async fn create_module(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Path(course_id): Path<Uuid>,
    Json(req): Json<CreateModuleRequest>,
) -> impl IntoResponse {
    if !user.is_admin() {
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({
                "success": false,
                "error": "Course authoring requires the admin role"
            })),
        )
            .into_response();
    }

    let engine = CourseEngine::new(state.conn.clone());

    match engine.add_module(course_id, req).await {
        Ok(module) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "data": module
            })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": e
            })),
        )
            .into_response(),
    }
}

/// Add a lesson to a module (admin only)
pub async fn create_lesson(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    Path((course_id, module_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<CreateLessonRequest>,
) -> impl IntoResponse {
    if !user.is_admin() {
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({
                "success": false,
                "error": "Course authoring requires the admin role"
            })),
        )
            .into_response();
    }

    let engine = CourseEngine::new(state.conn.clone());

    match engine.add_lesson(course_id, module_id, req).await {
        Ok(lesson) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "success": true,
                "data": lesson
            })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": e
            })),
        )
            .into_response(),
    }
}

// ============================================================================
// ROUTE CONFIGURATION
// ============================================================================

pub fn configure_course_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/courses", get(list_courses).post(create_course))
        .route("/api/courses/:course_id", get(get_course))
        .route("/api/courses/:course_id/publish", post(publish_course))
        .route("/api/courses/:course_id/modules", post(create_module))
        .route(
            "/api/courses/:course_id/modules/:module_id/lessons",
            post(create_lesson),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::QuizQuestion;

    fn lesson(module_id: Uuid, course_id: Uuid, order: i32) -> CourseLesson {
        let now = Utc::now();
        CourseLesson {
            id: Uuid::new_v4(),
            module_id,
            course_id,
            title: format!("Lesson {order}"),
            content_type: "video".to_string(),
            content_url: Some("https://cdn.example/video.mp4".to_string()),
            content_text: None,
            quiz: None,
            duration_seconds: 300,
            is_preview: false,
            lesson_order: order,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_structure() -> CourseStructure {
        let now = Utc::now();
        let course_id = Uuid::new_v4();
        let course = Course {
            id: course_id,
            title: "Foundations of Mindfulness".to_string(),
            description: None,
            category: "mindfulness".to_string(),
            pricing_type: "free".to_string(),
            price: None,
            currency: "USD".to_string(),
            premium_tier: None,
            is_published: true,
            rating_average: 0.0,
            rating_count: 0,
            created_at: now,
            updated_at: now,
        };
        let modules = (0..2)
            .map(|i| {
                let module = CourseModule {
                    id: Uuid::new_v4(),
                    course_id,
                    title: format!("Module {i}"),
                    module_order: i,
                    created_at: now,
                };
                let lessons = vec![lesson(module.id, course_id, 1), lesson(module.id, course_id, 2)];
                (module, lessons)
            })
            .collect();
        CourseStructure { course, modules }
    }

    #[test]
    fn test_total_lessons() {
        let structure = sample_structure();
        assert_eq!(structure.total_lessons(), 4);
    }

    #[test]
    fn test_find_lesson_requires_matching_module() {
        let structure = sample_structure();
        let (m0, lessons0) = &structure.modules[0];
        let (m1, _) = &structure.modules[1];

        assert!(structure.find_lesson(m0.id, lessons0[0].id).is_some());
        // Lesson exists, but under a different module.
        assert!(structure.find_lesson(m1.id, lessons0[0].id).is_none());
        assert!(structure.find_lesson(Uuid::new_v4(), lessons0[0].id).is_none());
    }

    #[test]
    fn test_quiz_definition_round_trip() {
        let quiz = QuizDefinition {
            passing_score: Some(80),
            questions: vec![QuizQuestion {
                id: Uuid::new_v4(),
                text: "What anchors attention in breath meditation?".to_string(),
                options: vec!["The breath".to_string(), "The ceiling".to_string()],
                correct_answers: vec![0],
            }],
        };

        let mut l = lesson(Uuid::new_v4(), Uuid::new_v4(), 1);
        l.content_type = "quiz".to_string();
        l.quiz = Some(serde_json::to_value(&quiz).unwrap());

        let parsed = l.quiz_definition().unwrap();
        assert_eq!(parsed.passing_score(), 80);
        assert_eq!(parsed.questions.len(), 1);
    }
}
