use std::{collections::HashMap, sync::Arc};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::{credentials::CredentialStore, repo_types::Identity},
    config::SessionConfig,
    error::{AppError, AppResult},
};

/// Signed payload carried by the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,      // identity ID
    pub sid: Uuid,      // server-side session ID
    pub iat: usize,     // issued at (unix timestamp)
    pub exp: usize,     // hard expiry (unix timestamp)
    pub iss: String,
    pub aud: String,
    pub remember: bool,
}

/// Server-side view of a live session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub identity_id: Uuid,
    pub created_at: OffsetDateTime,
    pub last_seen: OffsetDateTime,
    pub expires_at: OffsetDateTime,
    pub remember: bool,
}

impl SessionRecord {
    fn is_expired(&self, now: OffsetDateTime, idle_timeout: Duration) -> bool {
        if now >= self.expires_at {
            return true;
        }
        !self.remember && now - self.last_seen > idle_timeout
    }
}

/// Opaque token handed to the client after a successful login.
#[derive(Debug, Clone)]
pub struct SessionToken {
    value: String,
    pub remember: bool,
    pub expires_at: OffsetDateTime,
}

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

#[derive(Clone)]
struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
}

impl SessionKeys {
    fn new(cfg: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
        }
    }

    fn sign(&self, claims: &SessionClaims) -> anyhow::Result<String> {
        let token = encode(&Header::default(), claims, &self.encoding)?;
        debug!(identity_id = %claims.sub, sid = %claims.sid, "session token signed");
        Ok(token)
    }

    fn verify(&self, token: &str) -> anyhow::Result<SessionClaims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<SessionClaims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

/// Turns credential checks into sessions and resolves sessions back to identities.
///
/// Session state is kept in process memory keyed by session id. Expiry is
/// evaluated lazily whenever a session is read.
#[derive(Clone)]
pub struct SessionAuthenticator {
    credentials: CredentialStore,
    keys: SessionKeys,
    idle_timeout: Duration,
    max_lifetime: Duration,
    remember_lifetime: Duration,
    sessions: Arc<RwLock<HashMap<Uuid, SessionRecord>>>,
}

impl SessionAuthenticator {
    pub fn new(credentials: CredentialStore, cfg: &SessionConfig) -> Self {
        Self {
            credentials,
            keys: SessionKeys::new(cfg),
            idle_timeout: Duration::minutes(cfg.idle_minutes),
            max_lifetime: Duration::hours(cfg.max_hours),
            remember_lifetime: Duration::days(cfg.remember_days),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn login(&self, username: &str, secret: &str, remember: bool) -> AppResult<SessionToken> {
        self.login_at(username, secret, remember, OffsetDateTime::now_utc())
            .await
    }

    pub async fn current_identity(&self, token: Option<&str>) -> AppResult<Option<Identity>> {
        self.resolve_at(token, OffsetDateTime::now_utc()).await
    }

    /// Like `current_identity`, but a missing identity is `Unauthorized`.
    pub async fn require_identity(&self, token: Option<&str>) -> AppResult<Identity> {
        self.current_identity(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Invalidates the session behind `token`. Unknown, expired or forged
    /// tokens are ignored.
    pub async fn logout(&self, token: Option<&str>) {
        let Some(claims) = token.and_then(|t| self.keys.verify(t).ok()) else {
            debug!("logout without a valid session");
            return;
        };
        if self.sessions.write().await.remove(&claims.sid).is_some() {
            info!(identity_id = %claims.sub, sid = %claims.sid, "logged out");
        }
    }

    async fn login_at(
        &self,
        username: &str,
        secret: &str,
        remember: bool,
        now: OffsetDateTime,
    ) -> AppResult<SessionToken> {
        let identity = match self.credentials.find_by_username(username).await? {
            Some(identity) => identity,
            None => {
                warn!(%username, "login unknown username");
                return Err(AppError::UserNotFound);
            }
        };

        if !self.credentials.verify_secret(&identity, secret) {
            warn!(identity_id = %identity.id, "login invalid password");
            return Err(AppError::BadCredentials);
        }

        let sid = Uuid::new_v4();
        let lifetime = if remember {
            self.remember_lifetime
        } else {
            self.max_lifetime
        };
        let expires_at = now
            .checked_add(lifetime)
            .ok_or_else(|| anyhow::anyhow!("session expiry out of range"))?;
        let claims = SessionClaims {
            sub: identity.id,
            sid,
            iat: now.unix_timestamp() as usize,
            exp: expires_at.unix_timestamp() as usize,
            iss: self.keys.issuer.clone(),
            aud: self.keys.audience.clone(),
            remember,
        };
        let value = self.keys.sign(&claims)?;

        {
            let mut sessions = self.sessions.write().await;
            let before = sessions.len();
            sessions.retain(|_, rec| !rec.is_expired(now, self.idle_timeout));
            let pruned = before - sessions.len();
            if pruned > 0 {
                debug!(pruned, "expired sessions pruned");
            }
            sessions.insert(
                sid,
                SessionRecord {
                    identity_id: identity.id,
                    created_at: now,
                    last_seen: now,
                    expires_at,
                    remember,
                },
            );
        }

        info!(identity_id = %identity.id, %sid, remember, "user logged in");
        Ok(SessionToken {
            value,
            remember,
            expires_at,
        })
    }

    async fn resolve_at(&self, token: Option<&str>, now: OffsetDateTime) -> AppResult<Option<Identity>> {
        let Some(token) = token else {
            return Ok(None);
        };
        let claims = match self.keys.verify(token) {
            Ok(c) => c,
            Err(e) => {
                debug!(error = %e, "rejected session token");
                return Ok(None);
            }
        };

        {
            let mut sessions = self.sessions.write().await;
            let stale_since = match sessions.get(&claims.sid) {
                None => return Ok(None),
                Some(rec)
                    if rec.identity_id != claims.sub || rec.is_expired(now, self.idle_timeout) =>
                {
                    Some(rec.created_at)
                }
                Some(_) => None,
            };
            if let Some(created_at) = stale_since {
                sessions.remove(&claims.sid);
                info!(
                    identity_id = %claims.sub,
                    sid = %claims.sid,
                    age_secs = (now - created_at).whole_seconds(),
                    "session expired"
                );
                return Ok(None);
            }
            if let Some(rec) = sessions.get_mut(&claims.sid) {
                rec.last_seen = now;
            }
        }

        match self.credentials.find_by_id(claims.sub).await? {
            Some(identity) => Ok(Some(identity)),
            None => {
                warn!(identity_id = %claims.sub, "session references a missing identity");
                self.sessions.write().await.remove(&claims.sid);
                Ok(None)
            }
        }
    }
}
