use core::fmt::Display;
use core::fmt::Formatter;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::OauthError;
use crate::types::OauthKeys;

/// built-in test identities
pub const BUILTIN_OAUTH_KEYS: [RawOauthKey; crate::config::OAUTH_KEY_COUNT] = [
    RawOauthKey {
        kid: "north",
        ikm: "MDEyMzQ1Njc4OTAxMjM0NTY3ODkwMTIzNDU2Nzg5MDEK",
        timestamp: 0,
        lifetime: 0,
        algorithm: "A256GCM",
        issuer: "crinna.org",
    },
    RawOauthKey {
        kid: "union",
        ikm: "MTIzNDU2Nzg5MDEyMzQ1Ngo=",
        timestamp: 0,
        lifetime: 0,
        algorithm: "A128GCM",
        issuer: "north.gov",
    },
    RawOauthKey {
        kid: "oldempire",
        ikm: "MTIzNDU2Nzg5MDEyMzQ1Njc4OTAxMjM0NTY3ODkwMTIK",
        timestamp: 0,
        lifetime: 0,
        algorithm: "A256GCM",
        issuer: "",
    },
];

/// A pre-shared key as declared: identifier, base64 key material, the
/// authentication cipher it is meant for and the issuing realm.
#[derive(Debug, Clone, Copy)]
pub struct RawOauthKey {
    pub kid: &'static str,
    pub ikm: &'static str,
    pub timestamp: u64,
    pub lifetime: u32,
    pub algorithm: &'static str,
    pub issuer: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AeadAlgorithm {
    A128Gcm,
    A256Gcm,
}

impl AeadAlgorithm {
    pub fn key_size(self) -> usize {
        match self {
            AeadAlgorithm::A128Gcm => 16,
            AeadAlgorithm::A256Gcm => 32,
        }
    }
}

impl Display for AeadAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            AeadAlgorithm::A128Gcm => write!(f, "A128GCM"),
            AeadAlgorithm::A256Gcm => write!(f, "A256GCM"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OauthKey {
    pub kid: String,
    pub ikm: Vec<u8>,
    pub timestamp: u64,
    pub lifetime: u32,
    pub algorithm: AeadAlgorithm,
    pub issuer: String,
}

/// Decodes and validates one raw key record. The decoded material must
/// match the declared algorithm's key size exactly; the built-in key set
/// is newline terminated text, so trailing whitespace does not count.
pub fn convert_key(raw: &RawOauthKey) -> Result<OauthKey, OauthError> {
    let algorithm = match raw.algorithm {
        "A128GCM" => AeadAlgorithm::A128Gcm,
        "A256GCM" => AeadAlgorithm::A256Gcm,
        other => {
            return Err(OauthError::UnknownAlgorithm {
                kid: raw.kid.into(),
                algorithm: other.into(),
            })
        }
    };
    let mut ikm = STANDARD
        .decode(raw.ikm)
        .map_err(|_| OauthError::InvalidKeyEncoding { kid: raw.kid.into() })?;
    while ikm.last().is_some_and(|b| b.is_ascii_whitespace()) {
        ikm.pop();
    }
    if ikm.len() != algorithm.key_size() {
        return Err(OauthError::KeyLength {
            kid: raw.kid.into(),
            expected: algorithm.key_size(),
            actual: ikm.len(),
        });
    }
    Ok(OauthKey {
        kid: raw.kid.into(),
        ikm,
        timestamp: raw.timestamp,
        lifetime: raw.lifetime,
        algorithm,
        issuer: raw.issuer.into(),
    })
}

/// Loads the built-in key set. All three records activate or none do.
pub fn load_builtin_keys() -> Result<OauthKeys, OauthError> {
    let mut keys = OauthKeys::new();
    for raw in &BUILTIN_OAUTH_KEYS {
        keys.push(convert_key(raw)?)
            .map_err(|_| OauthError::CapacityExceeded)?;
    }
    Ok(keys)
}
