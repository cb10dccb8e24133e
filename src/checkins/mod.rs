use crate::state::AppState;
use axum::Router;

pub mod handlers;
pub mod repo;
pub mod streak;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::checkin_routes())
}
