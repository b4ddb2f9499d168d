use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::repo::{PgUserRepository, UserRepository};
use crate::config::AppConfig;
use crate::sessions::repo::{PgSessionRepository, SessionRepository};
use crate::web::i18n::Translator;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub translator: Translator,
}

impl AppState {
    pub fn from_pool(config: Arc<AppConfig>, db: PgPool) -> Self {
        Self::from_parts(
            config,
            Arc::new(PgUserRepository::new(db.clone())),
            Arc::new(PgSessionRepository::new(db)),
        )
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        let translator = Translator::new(&config.locale);
        Self {
            config,
            users,
            sessions,
            translator,
        }
    }
}
