//! Master key request signing.
//!
//! Every REST call carries an `authorization` header of the form
//! `type=master&ver=1.0&sig=<signature>` (URL-encoded), where the signature
//! is a base64 HMAC-SHA256 over the verb, resource type, resource link and
//! `x-ms-date`, keyed with the decoded account key.

use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use cosmos_api_core::storage::{Result, StoreError};

type HmacSha256 = Hmac<Sha256>;

/// Signs requests with the account master key.
#[derive(Clone)]
pub struct MasterKeySigner {
    key: Vec<u8>,
}

impl MasterKeySigner {
    /// Decodes the base64 account key.
    pub fn new(access_key: &str) -> Result<Self> {
        let key = base64::engine::general_purpose::STANDARD
            .decode(access_key.trim())
            .map_err(|e| StoreError::Provisioning(format!("invalid account key: {e}")))?;

        Ok(Self { key })
    }

    /// Builds the URL-encoded `authorization` header value.
    ///
    /// `resource_link` is the unencoded path of the addressed resource
    /// (or of its parent for feed operations), without a leading slash.
    pub fn authorization(
        &self,
        verb: &str,
        resource_type: &str,
        resource_link: &str,
        date: &str,
    ) -> String {
        let payload = format!(
            "{}\n{}\n{}\n{}\n\n",
            verb.to_lowercase(),
            resource_type.to_lowercase(),
            resource_link,
            date.to_lowercase()
        );

        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        let signature =
            base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());

        urlencoding::encode(&format!("type=master&ver=1.0&sig={signature}")).into_owned()
    }
}

/// Formats a timestamp as the RFC 1123 value expected in `x-ms-date`.
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
