//! Unified API router: merges the per-module route configurations into
//! one `Router` served by `main`.

use axum::Router;
use std::sync::Arc;

use crate::shared::state::AppState;

pub fn configure_api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(crate::courses::configure_course_routes())
        .merge(crate::enrollment::configure_enrollment_routes())
        .merge(crate::payments::configure_payment_routes())
}
