//! HMAC-SHA256 signed read URLs.
//!
//! `<base>/<encoded key>?expires=<unix>&signature=<hex>` where the signature
//! is the HMAC of the key and expiry, NUL-separated.

use std::time::Duration;

use chrono::Utc;
use ring::hmac;

use crate::config::StorageConfig;
use crate::error::{Result, SkillError};

#[derive(Clone)]
pub struct UrlSigner {
    base_url: String,
    key: hmac::Key,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("base_url", &self.base_url)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl UrlSigner {
    pub fn new(base_url: impl Into<String>, secret: impl AsRef<[u8]>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            key: hmac::Key::new(hmac::HMAC_SHA256, secret.as_ref()),
        }
    }

    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.public_base_url.clone(), config.signing_secret.as_bytes())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sign `key` for `ttl` from now.
    #[must_use]
    pub fn sign(&self, key: &str, ttl: Duration) -> String {
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        self.sign_until(key, Utc::now().timestamp().saturating_add(ttl))
    }

    /// Sign `key` with an absolute expiry in unix seconds.
    #[must_use]
    pub fn sign_until(&self, key: &str, expires: i64) -> String {
        format!(
            "{}/{}?expires={expires}&signature={}",
            self.base_url,
            encode_key(key),
            self.signature(key, expires)
        )
    }

    /// Check a URL produced by this signer, returning the key it grants.
    pub fn verify(&self, url: &str, now: i64) -> Result<String> {
        let rest = url
            .strip_prefix(&self.base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| invalid("URL does not belong to this store"))?;
        let (encoded_key, query) = rest
            .split_once('?')
            .ok_or_else(|| invalid("missing query string"))?;
        let key = decode_key(encoded_key)?;

        let mut expires = None;
        let mut signature = None;
        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("expires", value)) => {
                    expires = Some(value.parse::<i64>().map_err(|_| invalid("bad expiry"))?);
                }
                Some(("signature", value)) => signature = Some(value),
                _ => {}
            }
        }
        let expires = expires.ok_or_else(|| invalid("missing expiry"))?;
        let signature = signature.ok_or_else(|| invalid("missing signature"))?;

        let tag = hex::decode(signature).map_err(|_| invalid("bad signature encoding"))?;
        hmac::verify(&self.key, &message(&key, expires), &tag)
            .map_err(|_| invalid("signature mismatch"))?;
        if now >= expires {
            return Err(invalid("URL expired"));
        }
        Ok(key)
    }

    fn signature(&self, key: &str, expires: i64) -> String {
        hex::encode(hmac::sign(&self.key, &message(key, expires)))
    }
}

fn message(key: &str, expires: i64) -> Vec<u8> {
    let mut message = Vec::with_capacity(key.len() + 24);
    message.extend_from_slice(key.as_bytes());
    message.push(0);
    message.extend_from_slice(expires.to_string().as_bytes());
    message
}

fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn decode_key(encoded: &str) -> Result<String> {
    let segments = encoded
        .split('/')
        .map(|segment| {
            urlencoding::decode(segment)
                .map(std::borrow::Cow::into_owned)
                .map_err(|_| invalid("key is not valid UTF-8"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(segments.join("/"))
}

fn invalid(reason: &str) -> SkillError {
    SkillError::ValidationFailed(format!("signed URL rejected: {reason}"))
}
