//! OAuth access token cache.
//!
//! Tokens are refreshed a minute before they expire. Concurrent callers
//! share one refresh, and a failed refresh falls back to the current token
//! while it is still usable.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use gcp_auth::TokenProvider;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{FirestoreError, FirestoreResult};

/// Refresh this long before expiry.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Assumed lifetime when the provider reports no usable expiry.
const TOKEN_DEFAULT_TTL: Duration = Duration::from_secs(50 * 60);

/// OAuth scope for Firestore REST access.
pub const FIRESTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }

    fn is_usable(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Shared, lazily refreshed access token.
pub struct TokenCache {
    provider: Arc<dyn TokenProvider>,
    cache: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            cache: RwLock::new(None),
        }
    }

    /// Drop the cached token so the next call refreshes.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    pub async fn get_token(&self) -> FirestoreResult<String> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.access_token.clone());
            }
        }

        let mut cache = self.cache.write().await;

        // Another task may have refreshed while we waited for the lock.
        if let Some(cached) = cache.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.access_token.clone());
            }
        }

        match self.provider.token(&[FIRESTORE_SCOPE]).await {
            Ok(token) => {
                let now = Utc::now();
                let expires_at = if token.expires_at() > now {
                    let ttl = (token.expires_at() - now)
                        .to_std()
                        .unwrap_or(TOKEN_DEFAULT_TTL);
                    Instant::now() + ttl
                } else {
                    Instant::now()
                };

                let access_token = token.as_str().to_string();
                *cache = Some(CachedToken {
                    access_token: access_token.clone(),
                    expires_at,
                });
                debug!("Refreshed Firestore access token");
                Ok(access_token)
            }
            Err(e) => match cache.as_ref() {
                Some(cached) if cached.is_usable() => {
                    warn!(error = %e, "Token refresh failed, reusing current token");
                    Ok(cached.access_token.clone())
                }
                _ => Err(FirestoreError::auth_error(format!(
                    "Failed to obtain auth token: {}",
                    e
                ))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(TOKEN_REFRESH_MARGIN, Duration::from_secs(60));
        assert!(TOKEN_DEFAULT_TTL > TOKEN_REFRESH_MARGIN);
        assert!(FIRESTORE_SCOPE.ends_with("/datastore"));
    }

    #[test]
    fn test_freshness_window() {
        let token = CachedToken {
            access_token: "t".into(),
            expires_at: Instant::now() + Duration::from_secs(30),
        };
        assert!(token.is_usable());
        assert!(!token.is_fresh());
    }
}
