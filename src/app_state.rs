use std::sync::Arc;

use crate::{
    config::Config,
    domains::{
        auth::AuthService,
        catalog::{CatalogKind, CatalogRepository},
        comments::CommentRepository,
        reviews::ReviewRepository,
        titles::TitleRepository,
        users::UserRepository,
    },
    infrastructure::{
        database::Database,
        mailer::{LogMailer, Mailer},
        security::TokenService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: Arc<TokenService>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Initialize database
        let db = Database::connect(&config.database.url, config.database.max_connections).await?;
        db.init().await?;

        Ok(Self::from_parts(db, config, Arc::new(LogMailer)))
    }

    pub fn from_parts(db: Database, config: Config, mailer: Arc<dyn Mailer>) -> Self {
        let tokens = Arc::new(TokenService::new(&config.auth));
        Self {
            db,
            tokens,
            mailer,
            config: Arc::new(config),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.config.pagination.page_size
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.pool().clone())
    }

    pub fn catalog(&self, kind: CatalogKind) -> CatalogRepository {
        CatalogRepository::new(self.db.pool().clone(), kind)
    }

    pub fn titles(&self) -> TitleRepository {
        TitleRepository::new(self.db.clone())
    }

    pub fn reviews(&self) -> ReviewRepository {
        ReviewRepository::new(self.db.pool().clone())
    }

    pub fn comments(&self) -> CommentRepository {
        CommentRepository::new(self.db.pool().clone())
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(
            self.users(),
            self.tokens.clone(),
            self.mailer.clone(),
            self.config.auth.confirmation_code_length,
            self.config.mail.default_from_email.clone(),
        )
    }
}
