use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;
pub mod services;
pub mod workflow;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::submission_routes())
        .merge(handlers::admin_routes())
}
