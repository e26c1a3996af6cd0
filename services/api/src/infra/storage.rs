//! Filesystem object store and signed file URLs.
//!
//! Objects live under a configured root keyed `{student_id}/{timestamp}.{ext}`.
//! Download links carry an HS256 token binding the exact object key to an
//! expiry; tampering with either invalidates the link.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::repository::ObjectStorePort;
use crate::domain::types::SIGNED_URL_TTL_SECS;
use crate::error::ApiError;

/// Object keys are server-generated, but the download route receives them
/// from the URL path — reject anything that could escape the storage root.
pub fn is_safe_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('/')
        && key.split('/').all(|part| {
            !part.is_empty()
                && part != "."
                && part != ".."
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        })
}

#[derive(Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, ApiError> {
        if !is_safe_key(key) {
            return Err(ApiError::FileNotFound);
        }
        Ok(self.root.join(Path::new(key)))
    }
}

impl ObjectStorePort for FsObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), ApiError> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("create object directory")?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("write object {key}"))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ApiError> {
        let path = self.object_path(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ApiError::Internal(
                anyhow::Error::new(e).context(format!("read object {key}")),
            )),
        }
    }
}

/// Claims embedded in a signed file URL token.
#[derive(Debug, Serialize, Deserialize)]
struct SignedUrlClaims {
    key: String,
    exp: u64,
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Mint a download token for `key`, valid for [`SIGNED_URL_TTL_SECS`].
pub fn sign_object_key(key: &str, secret: &str) -> Result<String, ApiError> {
    let claims = SignedUrlClaims {
        key: key.to_owned(),
        exp: now_secs() + SIGNED_URL_TTL_SECS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(anyhow::Error::new(e).context("sign object key")))
}

/// Verify a download token against the requested key.
///
/// Fails on bad signature, expiry, or a token minted for a different key —
/// a valid token never grants access to any other object.
pub fn verify_object_token(token: &str, key: &str, secret: &str) -> Result<(), ApiError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<SignedUrlClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| ApiError::Forbidden)?;

    if data.claims.key != key {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

/// Assemble the externally visible signed URL for an object.
pub fn signed_url(public_base_url: &str, key: &str, token: &str) -> String {
    format!(
        "{}/files/{key}?token={token}",
        public_base_url.trim_end_matches('/')
    )
}
