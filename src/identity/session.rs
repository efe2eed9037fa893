//! Client-side session carried in a signed cookie.
//!
//! Cookie value: `base64url(json(SessionData)) "." base64url(hmac_sha256(key, payload))`.
//! Anything that fails to verify is treated as an anonymous session.

use axum::http::{HeaderMap, HeaderValue};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::error::{AppError, AppResult};
use crate::tprintln;

pub const SESSION_COOKIE: &str = "session";

type HmacSha256 = Hmac<Sha256>;

/// Everything the gateway remembers about a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl SessionData {
    pub fn for_user(user: impl Into<String>) -> Self { Self { user: Some(user.into()) } }

    /// Authenticated user, if the session holds a non-empty one.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref().filter(|u| !u.is_empty())
    }

    pub fn is_authenticated(&self) -> bool { self.user().is_some() }

    pub fn clear_user(&mut self) { self.user = None; }

    pub fn is_empty(&self) -> bool { self.user.is_none() }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session cookie is not of the form payload.signature")]
    Malformed,
    #[error("session cookie signature does not match")]
    BadSignature,
    #[error("session payload could not be decoded: {0}")]
    Payload(String),
}

/// Signs and verifies session cookies with the configured secret key.
#[derive(Clone)]
pub struct SessionCodec {
    mac: HmacSha256,
    secure: bool,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec").field("secure", &self.secure).finish_non_exhaustive()
    }
}

impl SessionCodec {
    pub fn new(secret_key: &str, secure: bool) -> AppResult<Self> {
        if secret_key.is_empty() {
            return Err(AppError::config("bad_secret_key", "session signing key must not be empty"));
        }
        let mac = <HmacSha256 as Mac>::new_from_slice(secret_key.as_bytes())
            .map_err(|e| AppError::config("bad_secret_key", e.to_string()))?;
        Ok(Self { mac, secure })
    }

    fn mac(&self) -> HmacSha256 { self.mac.clone() }

    pub fn encode(&self, data: &SessionData) -> AppResult<String> {
        let json = serde_json::to_vec(data)
            .map_err(|e| AppError::internal("session_encode", e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let sig = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{}.{}", payload, sig))
    }

    pub fn decode(&self, token: &str) -> Result<SessionData, SessionError> {
        let (payload, sig) = token.rsplit_once('.').ok_or(SessionError::Malformed)?;
        let sig = URL_SAFE_NO_PAD.decode(sig).map_err(|_| SessionError::Malformed)?;
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        // Constant-time comparison
        mac.verify_slice(&sig).map_err(|_| SessionError::BadSignature)?;
        let json = URL_SAFE_NO_PAD.decode(payload).map_err(|e| SessionError::Payload(e.to_string()))?;
        serde_json::from_slice(&json).map_err(|e| SessionError::Payload(e.to_string()))
    }

    /// Session for a request; missing or invalid cookies yield the anonymous session.
    pub fn load(&self, headers: &HeaderMap) -> SessionData {
        let Some(token) = parse_cookie(headers, SESSION_COOKIE) else {
            return SessionData::default();
        };
        match self.decode(&token) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(target: "gateway", error = %e, "ignoring session cookie");
                tprintln!("session.reject err={}", e);
                SessionData::default()
            }
        }
    }

    fn attrs(&self) -> &'static str {
        if self.secure { "HttpOnly; Secure; SameSite=Lax; Path=/" } else { "HttpOnly; SameSite=Lax; Path=/" }
    }

    /// `Set-Cookie` value persisting `data`, or removing the cookie when it is empty.
    pub fn set_cookie(&self, data: &SessionData) -> AppResult<HeaderValue> {
        if data.is_empty() {
            return Ok(self.clear_cookie());
        }
        let token = self.encode(data)?;
        HeaderValue::from_str(&format!("{}={}; {}", SESSION_COOKIE, token, self.attrs()))
            .map_err(|e| AppError::internal("session_cookie", e.to_string()))
    }

    pub fn clear_cookie(&self) -> HeaderValue {
        let v = format!("{}=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; {}", SESSION_COOKIE, self.attrs());
        HeaderValue::from_str(&v).unwrap_or_else(|_| HeaderValue::from_static("session=; Max-Age=0; Path=/"))
    }
}

pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for cookie in headers.get_all(axum::http::header::COOKIE) {
        let Ok(s) = cookie.to_str() else { continue };
        for part in s.split(';') {
            let p = part.trim();
            if let Some((k, v)) = p.split_once('=') {
                if k == name { return Some(v.to_string()); }
            }
        }
    }
    None
}
