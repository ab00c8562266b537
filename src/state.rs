use std::sync::Arc;

use crate::{
    auth::{
        credentials::CredentialStore,
        repo::{IdentityRepo, PgIdentityRepo},
        session::SessionAuthenticator,
    },
    config::AppConfig,
    db,
    records::{
        repo::{HealthRecordRepo, PgHealthRecordRepo},
        services::HealthRecordStore,
    },
    views::{JsonViews, ViewRenderer},
};

/// Services shared by every handler. Built once by `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credentials: CredentialStore,
    pub sessions: SessionAuthenticator,
    pub records: HealthRecordStore,
    pub views: Arc<dyn ViewRenderer>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;

        let identities = Arc::new(PgIdentityRepo::new(pool.clone())) as Arc<dyn IdentityRepo>;
        let records = Arc::new(PgHealthRecordRepo::new(pool)) as Arc<dyn HealthRecordRepo>;
        Ok(Self::from_parts(
            Arc::new(config),
            identities,
            records,
            Arc::new(JsonViews),
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        identities: Arc<dyn IdentityRepo>,
        records: Arc<dyn HealthRecordRepo>,
        views: Arc<dyn ViewRenderer>,
    ) -> Self {
        let credentials = CredentialStore::new(identities);
        let sessions = SessionAuthenticator::new(credentials.clone(), &config.session);
        Self {
            config,
            credentials,
            sessions,
            records: HealthRecordStore::new(records),
            views,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let mem = Arc::new(crate::memory::MemoryStore::default());
        Self::from_parts(
            Arc::new(AppConfig::test()),
            mem.clone(),
            mem,
            Arc::new(JsonViews),
        )
    }
}
