//! Signed cookie sessions.
//!
//! The whole chat history lives in the client's cookie as
//! `base64url(json) "." base64url(hmac_sha256(secret, base64url(json)))`.
//! Nothing is stored server-side.

use crate::error::SessionError;
use crate::history::ChatHistory;
use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Largest cookie most browsers will store; bigger ones are silently dropped.
pub const MAX_COOKIE_BYTES: usize = 4096;

/// Signs and verifies session cookie values.
#[derive(Clone)]
pub struct SessionCodec {
    key: Vec<u8>,
    cookie_name: String,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("cookie_name", &self.cookie_name)
            .finish_non_exhaustive()
    }
}

impl SessionCodec {
    pub fn new(secret: &str, cookie_name: impl Into<String>) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    fn mac(&self) -> Result<HmacSha256, SessionError> {
        HmacSha256::new_from_slice(&self.key).map_err(|_| SessionError::Malformed)
    }

    /// Serialize and sign a history into a cookie value.
    pub fn encode(&self, history: &ChatHistory) -> Result<String, SessionError> {
        let json = serde_json::to_vec(history).map_err(|e| SessionError::Payload {
            message: e.to_string(),
        })?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{payload}.{signature}"))
    }

    /// Verify and deserialize a cookie value.
    pub fn decode(&self, value: &str) -> Result<ChatHistory, SessionError> {
        let (payload, signature) = value.split_once('.').ok_or(SessionError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| SessionError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| SessionError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| SessionError::Malformed)?;
        serde_json::from_slice(&json).map_err(|e| SessionError::Payload {
            message: e.to_string(),
        })
    }

    /// Read the history from request headers.
    ///
    /// No cookie yields an empty history. A cookie that fails verification
    /// is discarded with a warning, also yielding an empty history.
    pub fn load(&self, headers: &HeaderMap) -> ChatHistory {
        let Some(value) = find_cookie(headers, &self.cookie_name) else {
            return ChatHistory::new();
        };
        match self.decode(value) {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session cookie");
                ChatHistory::new()
            }
        }
    }

    /// `Set-Cookie` header value carrying the given history.
    pub fn set_cookie(&self, history: &ChatHistory) -> Result<String, SessionError> {
        let value = self.encode(history)?;
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            self.cookie_name, value
        );
        if exceeds_cookie_limit(&cookie) {
            tracing::warn!(
                bytes = cookie.len(),
                turns = history.len(),
                "Session cookie exceeds browser size limit; the latest turn may be lost"
            );
        }
        Ok(cookie)
    }
}

fn exceeds_cookie_limit(cookie: &str) -> bool {
    cookie.len() > MAX_COOKIE_BYTES
}

/// Find a cookie value by name across all `Cookie` headers.
pub fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
