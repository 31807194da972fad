//! Interaction signature middleware
//!
//! Discord signs every interaction request with the application's Ed25519
//! key over `timestamp || body`. Requests that fail the check are rejected
//! with 401 before the interaction handler runs.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use tracing::warn;

use crate::error::{ApiError, Result};

/// Hex-encoded Ed25519 signature header
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";

/// Timestamp header, prepended to the body before verification
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Largest interaction body buffered for verification
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Verifies interaction signatures against the application public key
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    /// Parse a hex-encoded 32 byte public key
    pub fn from_hex(public_key: &str) -> Result<Self> {
        let bytes = hex::decode(public_key.trim())
            .map_err(|e| ApiError::InvalidPublicKey(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| ApiError::InvalidPublicKey(format!("expected 32 bytes, got {}", b.len())))?;
        let key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| ApiError::InvalidPublicKey(e.to_string()))?;

        Ok(Self { key })
    }

    /// Check a hex-encoded signature over `timestamp || body`
    pub fn verify(&self, signature: &str, timestamp: &str, body: &[u8]) -> Result<()> {
        let signature = hex::decode(signature).map_err(|_| ApiError::InvalidSignature)?;
        let signature =
            Signature::from_slice(&signature).map_err(|_| ApiError::InvalidSignature)?;

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.key
            .verify(&message, &signature)
            .map_err(|_| ApiError::InvalidSignature)
    }

    /// Verify a request given its headers and raw body
    pub fn verify_request(&self, headers: &HeaderMap, body: &[u8]) -> Result<()> {
        let signature =
            header_str(headers, SIGNATURE_HEADER).ok_or(ApiError::MissingHeader(SIGNATURE_HEADER))?;
        let timestamp =
            header_str(headers, TIMESTAMP_HEADER).ok_or(ApiError::MissingHeader(TIMESTAMP_HEADER))?;

        self.verify(signature, timestamp, body)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Signature verification middleware
///
/// Buffers the body, verifies it, then hands the same bytes on so the
/// handler's extractors see the original request.
pub async fn verify_signature(
    State(verifier): State<Arc<SignatureVerifier>>,
    request: Request,
    next: Next,
) -> std::result::Result<Response, StatusCode> {
    let (parts, body) = request.into_parts();

    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            warn!("Failed to read interaction body: {}", e);
            StatusCode::PAYLOAD_TOO_LARGE
        })?;

    if let Err(e) = verifier.verify_request(&parts.headers, &bytes) {
        warn!("Rejected interaction request: {}", e);
        return Err(StatusCode::UNAUTHORIZED);
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}
