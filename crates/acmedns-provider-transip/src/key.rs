//! API key loading and request signing
//!
//! TransIP authenticates token requests with an RSA-SHA512 (PKCS#1 v1.5)
//! signature over the exact request body, sent base64-encoded in the
//! `Signature` header.

use acmedns_core::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use ring::rand::{SecureRandom, SystemRandom};
use ring::signature::{RSA_PKCS1_SHA512, RsaKeyPair};
use std::path::Path;

/// A TransIP API private key
///
/// # Security
///
/// The Debug implementation does NOT expose key material.
pub struct SigningKey {
    key_pair: RsaKeyPair,
    rng: SystemRandom,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("key", &"<REDACTED>")
            .field("modulus_bits", &(self.key_pair.public().modulus_len() * 8))
            .finish()
    }
}

impl SigningKey {
    /// Parse a PEM-encoded RSA key
    ///
    /// Accepts PKCS#8 (`BEGIN PRIVATE KEY`) and PKCS#1
    /// (`BEGIN RSA PRIVATE KEY`) encodings.
    pub fn from_pem(text: &str) -> Result<Self> {
        let block = pem::parse(text)
            .map_err(|e| Error::config(format!("Failed to parse private key PEM: {}", e)))?;

        let key_pair = match block.tag() {
            "PRIVATE KEY" => RsaKeyPair::from_pkcs8(block.contents()),
            "RSA PRIVATE KEY" => RsaKeyPair::from_der(block.contents()),
            other => {
                return Err(Error::config(format!(
                    "Unsupported private key type '{}', expected an RSA key",
                    other
                )));
            }
        }
        .map_err(|e| Error::config(format!("Private key rejected: {}", e)))?;

        Ok(Self {
            key_pair,
            rng: SystemRandom::new(),
        })
    }

    /// Load a PEM-encoded RSA key from `path`
    ///
    /// Warns when the file is readable by group or others.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = std::fs::metadata(path).map_err(|e| {
                Error::config(format!(
                    "Could not load private key from path {}: {}",
                    path.display(),
                    e
                ))
            })?;

            let file_mode = metadata.permissions().mode() & 0o777;
            if file_mode & 0o077 != 0 {
                tracing::warn!(
                    path = %path.display(),
                    mode = format!("{:o}", file_mode),
                    "Private key file has overly permissive permissions (should be 0600 or 0400)"
                );
            }
        }

        let pem = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Could not load private key from path {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_pem(&pem).map_err(|e| {
            Error::config(format!(
                "Could not load private key from path {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Sign `message`, returning the base64-encoded signature
    pub fn sign(&self, message: &[u8]) -> Result<String> {
        let mut signature = vec![0u8; self.key_pair.public().modulus_len()];
        self.key_pair
            .sign(&RSA_PKCS1_SHA512, &self.rng, message, &mut signature)
            .map_err(|_| Error::auth("Failed to sign authentication request"))?;

        Ok(STANDARD.encode(signature))
    }

    /// A random hex nonce for token requests
    pub fn nonce(&self) -> Result<String> {
        let mut bytes = [0u8; 16];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| Error::auth("Failed to generate nonce"))?;

        Ok(hex::encode(bytes))
    }

    /// DER-encoded public key, for verifying signatures
    pub fn public_key_der(&self) -> &[u8] {
        self.key_pair.public().as_ref()
    }
}
