use super::{CallerIdentity, IdentityError, IdentityVerifier};
use crate::config::IdentityConfig;
use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Google's published signing keys for Firebase ID tokens.
pub const FIREBASE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const KEY_CACHE_TTL: Duration = Duration::from_secs(60 * 60);
/// Unknown key ids do not trigger a refetch more often than this.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// Verifies Firebase ID tokens (RS256) against Google's JWK set.
///
/// Keys are cached for an hour and refetched early when a token names a
/// key id the cache does not know, at most once per minute.
#[derive(Clone)]
pub struct FirebaseVerifier {
    http: reqwest::Client,
    config: Arc<RwLock<IdentityConfig>>,
    keys: Arc<RwLock<Option<CachedKeys>>>,
    refresh: Arc<Mutex<()>>,
    jwks_url: String,
}

impl FirebaseVerifier {
    pub fn new(config: Arc<RwLock<IdentityConfig>>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            config,
            keys: Arc::new(RwLock::new(None)),
            refresh: Arc::new(Mutex::new(())),
            jwks_url: FIREBASE_JWKS_URL.to_string(),
        }
    }

    /// Seed the key cache, skipping the first fetch.
    pub async fn with_keys(self, keys: JwkSet) -> Self {
        *self.keys.write().await = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });
        self
    }

    async fn refresh_keys(&self) -> Result<(), IdentityError> {
        let keys: JwkSet = self
            .http
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        info!(count = keys.keys.len(), "Refreshed identity signing keys");
        *self.keys.write().await = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });
        Ok(())
    }

    /// Look the key up in the cache. `None` means the cache is stale or the
    /// key id is unknown.
    async fn cached_key(&self, kid: &str) -> Result<Option<DecodingKey>, IdentityError> {
        let guard = self.keys.read().await;
        let Some(cached) = guard.as_ref() else {
            return Ok(None);
        };
        if cached.fetched_at.elapsed() > KEY_CACHE_TTL {
            return Ok(None);
        }
        cached
            .keys
            .find(kid)
            .map(DecodingKey::from_jwk)
            .transpose()
            .map_err(IdentityError::from)
    }

    async fn fetched_within(&self, interval: Duration) -> bool {
        self.keys
            .read()
            .await
            .as_ref()
            .is_some_and(|cached| cached.fetched_at.elapsed() < interval)
    }

    async fn decoding_key(&self, kid: Option<String>) -> Result<DecodingKey, IdentityError> {
        let Some(kid) = kid else {
            return Err(IdentityError::UnknownKey(None));
        };
        if let Some(key) = self.cached_key(&kid).await? {
            return Ok(key);
        }

        let _refresh = self.refresh.lock().await;
        // Another request may have refreshed while this one waited.
        if let Some(key) = self.cached_key(&kid).await? {
            return Ok(key);
        }
        if self.fetched_within(MIN_REFRESH_INTERVAL).await {
            debug!(kid = %kid, "Unknown signing key, keys were refreshed recently");
            return Err(IdentityError::UnknownKey(Some(kid)));
        }
        debug!(kid = %kid, "Signing key not cached, refreshing");
        self.refresh_keys().await?;
        self.cached_key(&kid)
            .await?
            .ok_or(IdentityError::UnknownKey(Some(kid)))
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, token: &str) -> Result<CallerIdentity, IdentityError> {
        let header = decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            let kind = jsonwebtoken::errors::ErrorKind::InvalidAlgorithm;
            return Err(jsonwebtoken::errors::Error::from(kind).into());
        }
        let key = self.decoding_key(header.kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        {
            let config = self.config.read().await;
            validation.set_issuer(&[config.issuer()]);
            validation.set_audience(&[config.project_id.as_str()]);
        }
        validation.set_required_spec_claims(&["exp", "iat", "iss", "aud", "sub"]);

        let claims = decode::<FirebaseClaims>(token, &key, &validation)?.claims;
        if claims.sub.is_empty() {
            return Err(IdentityError::MissingSubject);
        }
        Ok(CallerIdentity {
            uid: claims.sub,
            phone: claims.phone_number,
            email: claims.email,
            email_verified: claims.email_verified.unwrap_or(false),
        })
    }
}
