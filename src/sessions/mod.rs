mod form;
pub mod handlers;
pub mod repo;
pub mod repo_types;
mod views;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
