//! HTTP handlers for all API routes.

pub mod apex;
pub mod datasets;
pub mod system;
pub mod user_metrics;
