//! # Signing Context
//!
//! The secp256k1 context is created once at process start and shared
//! read-only (usually behind an `Arc`) by every component that signs or
//! verifies. It holds no mutable state, so concurrent verification calls need
//! no locking.

use crate::ecdsa::{Secp256k1PrivateKey, Secp256k1PublicKey, Secp256k1Signature};
use crate::CryptoError;
use k256::ecdsa::signature::{Signer as _, Verifier as _};
use k256::ecdsa::Signature;
use subtle::ConstantTimeEq;

/// secp256k1 ECDSA context.
#[derive(Debug, Default)]
pub struct Secp256k1Context {
    _private: (),
}

impl Secp256k1Context {
    /// Construct the context. Call once and share it.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a fresh random private key.
    pub fn new_random_private_key(&self) -> Secp256k1PrivateKey {
        Secp256k1PrivateKey::random()
    }

    /// Derive the compressed public key of `private_key`.
    pub fn get_public_key(&self, private_key: &Secp256k1PrivateKey) -> Secp256k1PublicKey {
        private_key.public_key()
    }

    /// Sign `message` (SHA-256 digest, RFC 6979 nonce).
    pub fn sign(&self, message: &[u8], private_key: &Secp256k1PrivateKey) -> Secp256k1Signature {
        let sig: Signature = private_key.signing_key().sign(message);
        let sig = sig.normalize_s().unwrap_or(sig);
        let mut bytes = [0u8; crate::ecdsa::SIGNATURE_LENGTH];
        bytes.copy_from_slice(&sig.to_bytes());
        Secp256k1Signature::from_array(bytes)
    }

    /// Verify `signature` over `message` under `public_key`.
    pub fn verify(
        &self,
        signature: &Secp256k1Signature,
        message: &[u8],
        public_key: &Secp256k1PublicKey,
    ) -> Result<(), CryptoError> {
        let verifying_key = public_key.verifying_key()?;
        let sig = signature.to_k256()?;

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }

    /// Verify a hex signature against a hex public key.
    ///
    /// Any decoding problem is reported as an error, never a panic.
    pub fn verify_hex(
        &self,
        signature_hex: &str,
        message: &[u8],
        public_key_hex: &str,
    ) -> Result<(), CryptoError> {
        let signature = Secp256k1Signature::from_hex(signature_hex)?;
        let public_key = Secp256k1PublicKey::from_hex(public_key_hex)?;
        self.verify(&signature, message, &public_key)
    }

    /// Constant-time equality for hex digests.
    pub fn digests_match(&self, left: &str, right: &str) -> bool {
        left.len() == right.len() && bool::from(left.as_bytes().ct_eq(right.as_bytes()))
    }
}

/// A private key bound to a context, mirroring what client tooling holds.
#[derive(Debug)]
pub struct Signer<'a> {
    context: &'a Secp256k1Context,
    private_key: Secp256k1PrivateKey,
}

impl<'a> Signer<'a> {
    /// Bind `private_key` to `context`.
    pub fn new(context: &'a Secp256k1Context, private_key: Secp256k1PrivateKey) -> Self {
        Self {
            context,
            private_key,
        }
    }

    /// Public key of this signer.
    pub fn public_key(&self) -> Secp256k1PublicKey {
        self.context.get_public_key(&self.private_key)
    }

    /// Sign `message`, returning the hex signature.
    pub fn sign(&self, message: &[u8]) -> String {
        self.context.sign(message, &self.private_key).as_hex()
    }
}
