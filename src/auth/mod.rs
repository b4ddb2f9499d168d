use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod pages;
mod password;
pub mod repo;
pub mod repo_types;
mod services;

pub use extractors::AuthUser;

/// JSON API routes, mounted under `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::me_routes())
}

/// Browser login/logout pages.
pub fn page_router() -> Router<AppState> {
    pages::routes()
}
