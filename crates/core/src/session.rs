//! Session context: the credential and profile of the signed-in user.
//!
//! The context is created once at startup and handed to everything that needs the token
//! or the profile (API client, auth service, header). It is a thin view over the
//! persistent storage scope: written at sign-in and sign-out, read everywhere else.

use crate::constants::{TOKEN_KEY, USER_KEY};
use crate::models::UserProfile;
use crate::CoreResult;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use rx_storage::{Scope, Storage};
use serde::Deserialize;
use std::sync::Arc;

/// Claims read from the token payload. The signature is never checked client-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiry as seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    storage: Arc<Storage>,
}

impl SessionContext {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Underlying storage, for callers that keep their own keys alongside the session.
    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    /// The stored credential, if any.
    pub fn token(&self) -> Option<String> {
        self.storage
            .get::<String>(Scope::Persistent, TOKEN_KEY)
            .filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The stored profile.
    ///
    /// A stored value that is not a valid profile is removed and reported as absent.
    pub fn user(&self) -> Option<UserProfile> {
        if let Some(user) = self.storage.get::<UserProfile>(Scope::Persistent, USER_KEY) {
            return Some(user);
        }

        if self.storage.contains(Scope::Persistent, USER_KEY) {
            tracing::warn!("discarding malformed stored user profile");
            if let Err(e) = self.storage.remove(Scope::Persistent, USER_KEY) {
                tracing::warn!("failed to remove malformed user profile: {}", e);
            }
        }
        None
    }

    /// Store the credential and profile returned by a successful login.
    pub fn sign_in(&self, token: &str, user: &UserProfile) -> CoreResult<()> {
        self.storage.set(Scope::Persistent, TOKEN_KEY, token)?;
        self.storage.set(Scope::Persistent, USER_KEY, user)?;
        tracing::info!("signed in as {}", user.email);
        Ok(())
    }

    /// Forget everything: both storage scopes are cleared.
    pub fn sign_out(&self) -> CoreResult<()> {
        self.storage.clear_all()?;
        tracing::info!("signed out");
        Ok(())
    }

    /// Decode the payload segment of a JWT-shaped token.
    ///
    /// Returns `None` when there is no token or it is not a three-part token with a JSON
    /// payload.
    pub fn token_claims(&self) -> Option<TokenClaims> {
        let token = self.token()?;
        decode_claims(&token)
    }

    /// Whether the token carries an `exp` claim that lies before `now`.
    ///
    /// A missing token, an undecodable token, or a token without `exp` counts as not
    /// expired; the backend remains the authority and answers 401 if it disagrees.
    pub fn is_token_expired(&self, now: DateTime<Utc>) -> bool {
        self.token_claims()
            .and_then(|claims| claims.exp)
            .is_some_and(|exp| exp.saturating_mul(1000) < now.timestamp_millis())
    }
}

fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}
