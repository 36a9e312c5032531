pub mod api_router;
pub mod auth;
pub mod config;
pub mod courses;
pub mod enrollment;
pub mod payments;
pub mod shared;
