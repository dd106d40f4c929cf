use rand::Rng;
use sha1::{Digest, Sha1};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Largest nonce value; nonces are rendered as exactly six decimal digits.
pub const NONCE_MAX: u32 = 999_999;

/// Signer trait for request payload signatures
///
/// Implementations turn the canonical string produced by [`canonical_string`]
/// into the digest that travels with the request.
pub trait Signer: Send + Sync {
    /// Hash the canonical string into a hex digest
    fn digest(&self, canonical: &str) -> String;

    /// Canonicalize the parameter set and hash it
    fn sign(&self, params: &HashMap<String, String>) -> String {
        self.digest(&canonical_string(params))
    }
}

/// Unkeyed SHA-1 signer expected by the server.
///
/// Anyone holding the request can recompute this digest; it is an integrity
/// tag for the server-side validator, not an authentication code. Changing the
/// algorithm or adding a key breaks compatibility with that validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1Signer;

impl Signer for Sha1Signer {
    fn digest(&self, canonical: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Build the `key=value&key=value` string with keys in ascending byte order.
///
/// Values are used verbatim: no escaping, no trimming.
pub fn canonical_string(params: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = params.keys().collect();
    keys.sort_unstable();

    keys.into_iter()
        .map(|key| format!("{}={}", key, params[key]))
        .collect::<Vec<_>>()
        .join("&")
}

/// Draw a uniform nonce in `[0, 999999]` zero-padded to six digits.
pub fn generate_nonce() -> String {
    let value = rand::thread_rng().gen_range(0..=NONCE_MAX);
    format_nonce(value)
}

pub fn format_nonce(value: u32) -> String {
    format!("{:06}", value)
}

/// Current wall-clock time in whole seconds since the Unix epoch.
///
/// A clock set before the epoch yields `0` rather than an error.
pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() as i64)
}

/// The derived fields stamped onto a signable request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureStamp {
    pub nonce: String,
    pub timestamp: i64,
    pub signature: String,
}

/// Issues stamps from a signer, a nonce and a timestamp.
#[derive(Debug, Clone, Default)]
pub struct RequestSigner<S: Signer = Sha1Signer> {
    signer: S,
}

impl RequestSigner<Sha1Signer> {
    pub const fn new() -> Self {
        Self { signer: Sha1Signer }
    }
}

impl<S: Signer> RequestSigner<S> {
    pub const fn with_signer(signer: S) -> Self {
        Self { signer }
    }

    /// Stamp with a fresh nonce and the current time.
    ///
    /// `params` holds the payload's signable fields; `nonce` and `timestamp`
    /// are inserted before hashing.
    pub fn stamp(&self, params: HashMap<String, String>) -> SignatureStamp {
        self.stamp_with(params, generate_nonce(), current_timestamp())
    }

    /// Stamp with a caller-chosen nonce and timestamp.
    pub fn stamp_with(
        &self,
        mut params: HashMap<String, String>,
        nonce: String,
        timestamp: i64,
    ) -> SignatureStamp {
        params.insert("nonce".to_string(), nonce.clone());
        params.insert("timestamp".to_string(), timestamp.to_string());

        let signature = self.signer.sign(&params);
        debug!(nonce = %nonce, timestamp, "stamped request");

        SignatureStamp {
            nonce,
            timestamp,
            signature,
        }
    }
}
