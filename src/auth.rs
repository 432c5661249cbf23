use base64::{
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
    Engine,
};
use serde_json::Value;

use crate::{
    cache::TripCache,
    error::AppError,
    models::user::{UserCreate, UserRead},
    services::{api::TripApi, store::StateStore},
};

/// Who the caller is, as far as the client can tell without asking the
/// server. Holds the stored credential; derives a display identity from it.
#[derive(Clone)]
pub struct SessionIdentity {
    store: StateStore,
}

impl SessionIdentity {
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }

    /// Pure lookup of the stored credential. No validation happens here;
    /// an expired token looks exactly like a live one until a call 401s.
    pub async fn token(&self) -> Result<Option<String>, AppError> {
        self.store.load_token().await
    }

    /// Fails with `AppError::Auth` when no credential is stored, which is
    /// the caller's cue to redirect to sign-in.
    pub async fn require_token(&self) -> Result<String, AppError> {
        self.token().await?.ok_or(AppError::Auth)
    }

    /// Derived user id for display/association. `None` does not mean the
    /// session is invalid, only that the token payload was unreadable.
    pub async fn user_id(&self) -> Result<Option<i64>, AppError> {
        Ok(self.token().await?.as_deref().and_then(derive_user_id))
    }

    pub async fn sign_in(
        &self,
        api: &dyn TripApi,
        username: &str,
        password: &str,
    ) -> Result<(), AppError> {
        let issued = api.login(username, password).await?;
        self.store.save_token(&issued.access_token).await?;
        Ok(())
    }

    pub async fn register(
        &self,
        api: &dyn TripApi,
        user: &UserCreate,
    ) -> Result<UserRead, AppError> {
        api.register(user).await
    }

    /// Drops the token and the active-trip state in one go. Also the right
    /// call after any 401: the server has rejected the session, nothing
    /// cached on its behalf can be trusted.
    pub async fn sign_out(&self, cache: &TripCache) -> Result<(), AppError> {
        cache.forget();
        self.store.clear().await?;
        Ok(())
    }
}

/// Untrusted claim extraction. Decodes the middle segment of a three-part
/// dot-delimited token as base64url JSON and reads the `sub` claim. The
/// signature and expiry are deliberately NOT checked - the server is the
/// only authority on token validity, and it signals through 401 responses.
/// The returned id is therefore only good for display and for associating
/// records with their owner, never for authorization.
pub fn derive_user_id(token: &str) -> Option<i64> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return None,
    };

    let raw = URL_SAFE_NO_PAD
        .decode(payload.as_bytes())
        .or_else(|_| URL_SAFE.decode(payload.as_bytes()))
        .ok()?;
    let claims: Value = serde_json::from_slice(&raw).ok()?;

    match claims.get("sub")? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}
