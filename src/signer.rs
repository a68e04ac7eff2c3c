//! Signed resource URIs for the Bambuser web player.
//!
//! A signed URI is the resource URI with the `da_*` parameters appended in
//! canonical (sorted, strictly encoded) order, followed by `da_signature`: the
//! hex HMAC-SHA256 of `"GET " + <uri with parameters>` keyed with the shared
//! secret.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::{BambuserError, Result};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_METHOD: &str = "HMAC-SHA256";

/// A `ttl` must be strictly greater than this many seconds.
pub const MIN_TTL_SECS: u64 = 60;

/// Options for [`Signer::sign`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SignOptions {
    /// Lifetime of the signature in seconds (must exceed 60). `None` produces
    /// a static, non-expiring signature.
    pub ttl: Option<u64>,
}

impl SignOptions {
    /// A signature valid for `secs` seconds.
    pub fn with_ttl(secs: u64) -> Self {
        Self { ttl: Some(secs) }
    }
}

/// Signing key pair (`daId` / `daSecret`).
#[derive(Clone)]
pub struct Signer {
    id: String,
    secret: String,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Signer {
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let secret = secret.into();
        if id.is_empty() {
            return Err(BambuserError::Config(
                "missing first half of signing keys (daId)".into(),
            ));
        }
        if secret.is_empty() {
            return Err(BambuserError::Config(
                "missing second half of signing keys (daSecret)".into(),
            ));
        }
        Ok(Self { id, secret })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sign `resource_uri` with the current time and a fresh random nonce.
    ///
    /// Two calls never produce the same output.
    pub fn sign(&self, resource_uri: &str, options: &SignOptions) -> Result<String> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let nonce = rand::random::<u64>().to_string();
        self.sign_at(resource_uri, options, timestamp, &nonce)
    }

    /// Sign with an explicit timestamp and nonce. Deterministic.
    pub fn sign_at(
        &self,
        resource_uri: &str,
        options: &SignOptions,
        timestamp: u64,
        nonce: &str,
    ) -> Result<String> {
        let mut params: Vec<(&str, String)> = vec![
            ("da_id", self.id.clone()),
            ("da_timestamp", timestamp.to_string()),
            ("da_nonce", nonce.to_string()),
            ("da_signature_method", SIGNATURE_METHOD.to_string()),
        ];

        match options.ttl {
            Some(ttl) if ttl <= MIN_TTL_SECS => {
                return Err(BambuserError::InvalidArgument(format!(
                    "invalid ttl {ttl}: expected a number of seconds greater than {MIN_TTL_SECS}"
                )));
            }
            Some(ttl) => params.push(("da_ttl", ttl.to_string())),
            None => params.push(("static", "1".to_string())),
        }

        let separator = if resource_uri.contains('?') { '&' } else { '?' };
        let uri_with_params = format!("{resource_uri}{separator}{}", canonical_query(params));
        let signature = hmac_sha256_hex(self.secret.as_bytes(), &format!("GET {uri_with_params}"))?;

        Ok(format!("{uri_with_params}&da_signature={signature}"))
    }
}

/// Sorted, strictly percent-encoded `key=value` pairs joined with `&`.
fn canonical_query(mut params: Vec<(&str, String)>) -> String {
    params.sort_by(|a, b| a.0.cmp(b.0));
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Hex-encoded HMAC-SHA256 of `message` keyed with `secret`.
pub fn hmac_sha256_hex(secret: &[u8], message: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| BambuserError::Config(format!("unusable signing secret: {e}")))?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
