use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::digest::KeyInit;
use hmac::Hmac;
use hmac::Mac;
use log::debug;
use sha1::Sha1;
use sha2::Sha256;
use sha2::Sha384;
use sha2::Sha512;

use crate::config::ClientConfig;
use crate::error::CredentialError;

/// validity window of derived credentials
pub const CREDENTIAL_LIFETIME_SECS: u64 = 3600 * 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub fn digest_size(self) -> usize {
        match self {
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    pub fn hmac(self, key: &[u8], message: &[u8]) -> Result<Vec<u8>, CredentialError> {
        match self {
            HashAlgorithm::Sha1 => compute::<Hmac<Sha1>>(key, message),
            HashAlgorithm::Sha256 => compute::<Hmac<Sha256>>(key, message),
            HashAlgorithm::Sha384 => compute::<Hmac<Sha384>>(key, message),
            HashAlgorithm::Sha512 => compute::<Hmac<Sha512>>(key, message),
        }
    }
}

fn compute<M: Mac + KeyInit>(key: &[u8], message: &[u8]) -> Result<Vec<u8>, CredentialError> {
    let mut mac = <M as Mac>::new_from_slice(key).map_err(|_| CredentialError::Digest)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// The username that carries its own expiry, the decimal unix timestamp a
/// day from now, optionally joined to the configured name.
pub fn expiring_username(username: &str, separator: char, now_unix_secs: u64) -> String {
    let expiry = now_unix_secs + CREDENTIAL_LIFETIME_SECS;
    if username.is_empty() {
        format!("{expiry}")
    } else {
        format!("{expiry}{separator}{username}")
    }
}

/// Derives the REST credential pair in place. Does nothing unless a shared
/// secret is configured. The clock is passed in so the result is
/// deterministic for a given time.
pub fn apply_rest_credentials(config: &mut ClientConfig, now_unix_secs: u64) {
    let Some(secret) = config.rest_secret.clone() else {
        return;
    };
    config.username = expiring_username(&config.username, config.rest_separator, now_unix_secs);
    let digest = config
        .hash_algorithm
        .hmac(secret.as_bytes(), config.username.as_bytes());
    set_password_from_digest(config, digest);
}

// a digest failure keeps whatever password was configured before
fn set_password_from_digest(config: &mut ClientConfig, digest: Result<Vec<u8>, CredentialError>) {
    match digest {
        Ok(digest) => config.password = STANDARD.encode(digest),
        Err(e) => debug!("credential digest failed, keeping configured password: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // HMAC-SHA1("key", "The quick brown fox jumps over the lazy dog")
    const HMAC_SHA1_FOX: [u8; 20] = [
        0xde, 0x7c, 0x9b, 0x85, 0xb8, 0xb7, 0x8a, 0xa6, 0xbc, 0x8a, 0x7a, 0x36, 0xf7, 0x0a, 0x90,
        0x70, 0x1c, 0x9d, 0xb4, 0xd9,
    ];
    // HMAC-SHA256("key", "The quick brown fox jumps over the lazy dog")
    const HMAC_SHA256_FOX: [u8; 32] = [
        0xf7, 0xbc, 0x83, 0xf4, 0x30, 0x53, 0x84, 0x24, 0xb1, 0x32, 0x98, 0xe6, 0xaa, 0x6f, 0xb1,
        0x43, 0xef, 0x4d, 0x59, 0xa1, 0x49, 0x46, 0x17, 0x59, 0x97, 0x47, 0x9d, 0xbc, 0x2d, 0x1a,
        0x3c, 0xd8,
    ];

    #[test]
    fn test_hmac_known_vectors() {
        let message = b"The quick brown fox jumps over the lazy dog";
        let digest = HashAlgorithm::Sha1.hmac(b"key", message).unwrap();
        assert_eq!(digest, HMAC_SHA1_FOX);
        let digest = HashAlgorithm::Sha256.hmac(b"key", message).unwrap();
        assert_eq!(digest, HMAC_SHA256_FOX);
    }

    #[test]
    fn test_digest_sizes() {
        let data = [
            (HashAlgorithm::Sha1, 20),
            (HashAlgorithm::Sha256, 32),
            (HashAlgorithm::Sha384, 48),
            (HashAlgorithm::Sha512, 64),
        ];
        for (algorithm, expected) in data {
            assert_eq!(algorithm.digest_size(), expected);
            let digest = algorithm.hmac(b"secret", b"message").unwrap();
            assert_eq!(digest.len(), expected, "{algorithm:?}");
        }
    }

    #[test]
    fn test_expiring_username() {
        assert_eq!(expiring_username("alice", ':', 1_000_000), "1086400:alice");
        assert_eq!(expiring_username("alice", '+', 1_000_000), "1086400+alice");
        assert_eq!(expiring_username("", ':', 1_000_000), "1086400");
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let mut config = ClientConfig {
            username: "alice".into(),
            rest_secret: Some("topsecret".into()),
            ..Default::default()
        };
        apply_rest_credentials(&mut config, 1_000_000);
        assert_eq!(config.username, "1086400:alice");
        let expected = HashAlgorithm::Sha1
            .hmac(b"topsecret", b"1086400:alice")
            .unwrap();
        assert_eq!(config.password, STANDARD.encode(expected));

        let mut again = ClientConfig {
            username: "alice".into(),
            rest_secret: Some("topsecret".into()),
            ..Default::default()
        };
        apply_rest_credentials(&mut again, 1_000_000);
        assert_eq!(config.username, again.username);
        assert_eq!(config.password, again.password);
    }

    #[test]
    fn test_derivation_with_empty_username() {
        let mut config = ClientConfig {
            rest_secret: Some("topsecret".into()),
            ..Default::default()
        };
        apply_rest_credentials(&mut config, 500);
        assert_eq!(config.username, "86900");
        assert!(!config.password.is_empty());
    }

    #[test]
    fn test_no_secret_leaves_credentials_alone() {
        let mut config = ClientConfig {
            username: "alice".into(),
            password: "static".into(),
            ..Default::default()
        };
        apply_rest_credentials(&mut config, 1_000_000);
        assert_eq!(config.username, "alice");
        assert_eq!(config.password, "static");
    }

    // Digest failures are swallowed: the previously configured password
    // stays in place instead of the derivation failing the bootstrap.
    #[test]
    fn test_digest_failure_keeps_previous_password() {
        let mut config = ClientConfig {
            password: "configured".into(),
            ..Default::default()
        };
        set_password_from_digest(&mut config, Err(CredentialError::Digest));
        assert_eq!(config.password, "configured");
    }
}
