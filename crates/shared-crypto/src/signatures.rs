//! # RSA-PSS Signatures
//!
//! Transaction signing identity. The public key travels as the raw
//! big-endian modulus (exponent fixed at 65537), and a wallet address is
//! the SHA-256 digest of that modulus.

use rsa::pss::{Signature, SigningKey, VerifyingKey};
use rsa::sha2::Sha256;
use rsa::signature::{RandomizedSigner, SignatureEncoding, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};

use crate::errors::CryptoError;
use crate::hashing::{sha256, Hash256};

/// The fixed RSA public exponent.
const PUBLIC_EXPONENT: u32 = 65537;

/// Modulus size used for newly generated keys, in bits.
const KEY_BITS: usize = 2048;

/// An RSA public key carried as its raw big-endian modulus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaPublicModulus(Vec<u8>);

impl RsaPublicModulus {
    /// Wrap raw modulus bytes, validating that they form a usable key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Self::to_key(bytes)?;
        Ok(Self(bytes.to_vec()))
    }

    /// Get the raw modulus bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Verify an RSA-PSS-SHA256 signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let key = Self::to_key(&self.0)?;
        let verifying_key = VerifyingKey::<Sha256>::new(key);
        let sig =
            Signature::try_from(signature).map_err(|_| CryptoError::InvalidSignatureFormat)?;
        verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }

    fn to_key(modulus: &[u8]) -> Result<RsaPublicKey, CryptoError> {
        if modulus.is_empty() {
            return Err(CryptoError::InvalidPublicKey);
        }
        RsaPublicKey::new(
            BigUint::from_bytes_be(modulus),
            BigUint::from(PUBLIC_EXPONENT),
        )
        .map_err(|_| CryptoError::InvalidPublicKey)
    }
}

/// Verify an RSA-PSS-SHA256 signature against a raw modulus.
///
/// Convenience wrapper for callers holding owner bytes rather than a
/// constructed [`RsaPublicModulus`].
pub fn verify_with_modulus(
    modulus: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    RsaPublicModulus::from_bytes(modulus)?.verify(message, signature)
}

/// The wallet address owning `modulus`: its SHA-256 digest.
pub fn owner_address(modulus: &[u8]) -> Hash256 {
    sha256(modulus)
}

/// RSA keypair, used by block producers and test fixtures.
pub struct RsaKeyPair {
    private_key: RsaPrivateKey,
}

impl RsaKeyPair {
    /// Generate a fresh keypair.
    pub fn generate() -> Result<Self, CryptoError> {
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), KEY_BITS)
            .map_err(|e| CryptoError::KeyGenerationFailed(e.to_string()))?;
        Ok(Self { private_key })
    }

    /// The public modulus, big-endian.
    pub fn public_modulus(&self) -> Vec<u8> {
        self.private_key.to_public_key().n().to_bytes_be()
    }

    /// The wallet address of this keypair.
    pub fn address(&self) -> Hash256 {
        owner_address(&self.public_modulus())
    }

    /// Sign a message with RSA-PSS-SHA256.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signing_key = SigningKey::<Sha256>::new(self.private_key.clone());
        signing_key
            .sign_with_rng(&mut rand::thread_rng(), message)
            .to_vec()
    }
}
